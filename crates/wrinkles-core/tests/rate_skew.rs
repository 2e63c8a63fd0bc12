//! A timeline at the NTSC rate 24000/1001 feeding a clip at a plain 24 Hz,
//! through an identity continuous transform. The continuous projection must
//! be identity across the whole domain regardless of the discretization
//! grids on either side -- discretization is strictly separate from the
//! continuous transform.

use wrinkles_core::tree::{CompositionTreeBuilder, SpaceKind};
use wrinkles_core::{Config, DiscreteInfo, Interval, Ordinate, ProjectionOperator, Rational, TopologicalMap};

fn di(rate_num: i32, rate_den: u32, start_index: i64) -> DiscreteInfo {
    DiscreteInfo::new(Rational::new(rate_num, rate_den), start_index)
}

#[test]
fn continuous_projection_is_identity_across_rate_skew() {
    let mut b = CompositionTreeBuilder::new();
    let clip = b.add_clip("clip", Interval::from_f64(0.0, 10.0), di(24, 1, 0), "clip.mov");
    let timeline = b.add_timeline("timeline", clip, di(24000, 1001, 0));
    let tree = b.build(timeline);
    let map = TopologicalMap::build(&tree);
    let cfg = Config::default();

    let src = map.space(timeline, SpaceKind::Presentation).unwrap();
    let dst = map.space(clip, SpaceKind::Media).unwrap();
    let op = ProjectionOperator::build(&map, src, dst, &cfg).unwrap();

    for t in [0.0, 1.23456, 5.0, 9.999] {
        let y = op.project_instantaneous_cc(Ordinate(t), &cfg).unwrap();
        assert!((y.value() - t).abs() < 1e-9);
    }
}

#[test]
fn index_for_ord_at_zero_is_exact_under_rate_skew() {
    // The zero ordinate carries no floating-point division error regardless
    // of how skewed the rate is, so this edge is safe to assert exactly:
    // source index 0 spans [0, 1001/24000) seconds, which
    // maps under the identity transform to destination indices 0 and 1 at
    // 24 Hz (0.0 -> 0, and 1001/24000 ~= 0.0417s -> floor(0.0417*24) = 1).
    let d_ntsc = di(24000, 1001, 0);
    let d_film = di(24, 1, 0);

    let start = d_ntsc.ord_for_index(0).unwrap();
    let end = d_ntsc.ord_for_index(1).unwrap();
    assert_eq!(d_film.index_for_ord(start).unwrap(), 0);
    assert_eq!(d_film.index_for_ord(end).unwrap(), 1);
}

#[test]
fn rational_rate_normalizes_and_compares_exactly() {
    let ntsc = Rational::new(24000, 1001);
    let film = Rational::new(24, 1);
    assert!(ntsc.lt(&film));
    assert_eq!(ntsc.normalized(), ntsc.normalized().normalized());
}
