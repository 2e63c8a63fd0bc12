//! Warp-specific end-to-end tests: a hold-frame warp and a reversing warp,
//! built through the public tree/topological-map/operator API.
//!
//! Both scenarios use binary-friendly fractions (halves, quarters) rather
//! than film/video rates like 24 Hz so every expected index is exact under
//! IEEE-754 double arithmetic, not just exact in real-number math.

use wrinkles_core::tree::{CompositionTreeBuilder, SpaceKind};
use wrinkles_core::{
    Config, ControlPoint, DiscreteInfo, Interval, LinearCurve, Mapping, Ordinate, ProjectionOperator,
    Rational, Topology, TopologicalMap,
};

fn di(rate_num: i32, rate_den: u32, start_index: i64) -> DiscreteInfo {
    DiscreteInfo::new(Rational::new(rate_num, rate_den), start_index)
}

#[test]
fn hold_frame_warp_holds_a_single_media_index() {
    let mut b = CompositionTreeBuilder::new();
    // Clip presentation bounds are [0, 4) (media_bounds duration 4); the
    // warp never samples anywhere but 1.5 inside that range.
    let clip = b.add_clip("clip", Interval::from_f64(2.0, 6.0), di(8, 1, 0), "clip.wav");
    let hold_curve = LinearCurve::new(vec![
        ControlPoint::new(0.0, 1.5),
        ControlPoint::new(4.0, 1.5),
    ])
    .unwrap();
    let transform = Topology::new(vec![Mapping::Linear { curve: hold_curve }]).unwrap();
    let cfg = Config::default();
    let warp = b.add_warp("warp", clip, transform, &cfg).unwrap();
    let timeline = b.add_timeline("timeline", warp, di(8, 1, 0));
    let tree = b.build(timeline);
    let map = TopologicalMap::build(&tree);

    let src = map.space(timeline, SpaceKind::Presentation).unwrap();
    let dst = map.space(clip, SpaceKind::Media).unwrap();
    let op = ProjectionOperator::build(&map, src, dst, &cfg).unwrap();

    // media ordinate is always 1.5 (warp hold) + 2.0 (media_bounds.start) = 3.5s;
    // at 8Hz that's index 28, exactly, for every instant in the warp's domain.
    for t in [0.0, 1.0, 2.0, 3.9] {
        let idx = op.project_instantaneous_cd(Ordinate(t), &cfg).unwrap();
        assert_eq!(idx, 28);
    }

    let dd = op.project_range_cd(Interval::from_f64(0.0, 2.0), &cfg).unwrap();
    assert_eq!(dd, vec![28]);
}

#[test]
fn reverse_warp_dd_indices_descend_with_source() {
    let mut b = CompositionTreeBuilder::new();
    // Clip presentation bounds [0, 4); media_bounds.start = 0 so clip
    // presentation and media ordinates coincide.
    let clip = b.add_clip("clip", Interval::from_f64(0.0, 4.0), di(8, 1, 0), "clip.wav");
    let reverse_curve = LinearCurve::new(vec![
        ControlPoint::new(0.0, 4.0),
        ControlPoint::new(4.0, 0.0),
    ])
    .unwrap();
    let transform = Topology::new(vec![Mapping::Linear { curve: reverse_curve }]).unwrap();
    let cfg = Config::default();
    let warp = b.add_warp("warp", clip, transform, &cfg).unwrap();
    // A coarser 2Hz timeline rate so each source sample spans 0.5s, wide
    // enough to straddle several destination (8Hz) samples.
    let timeline = b.add_timeline("timeline", warp, di(2, 1, 0));
    let tree = b.build(timeline);
    let map = TopologicalMap::build(&tree);

    let src = map.space(timeline, SpaceKind::Presentation).unwrap();
    let dst = map.space(clip, SpaceKind::Media).unwrap();
    let op = ProjectionOperator::build(&map, src, dst, &cfg).unwrap();

    // source sample 0 spans [0, 0.5); media ordinate runs 4.0 -> 3.5, i.e.
    // destination indices 32 down to 28 inclusive, in evaluation order.
    let dd0 = op.project_index_dd(0, &cfg).unwrap();
    assert_eq!(dd0, vec![32, 31, 30, 29, 28]);

    // source sample 1 spans [0.5, 1.0); media ordinate runs 3.5 -> 3.0,
    // indices 28 down to 24.
    let dd1 = op.project_index_dd(1, &cfg).unwrap();
    assert_eq!(dd1, vec![28, 27, 26, 25, 24]);

    // the projected instant strictly decreases as the source index advances:
    // reversal preserves evaluation order, not numerical order.
    assert!(dd0.first().unwrap() > dd1.first().unwrap());
}
