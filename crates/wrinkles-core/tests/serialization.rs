//! JSON round-trip of a built composition tree through its public API,
//! mirroring the teacher's `serde_json::to_string`/`from_str` test pattern.

use wrinkles_core::tree::{CompositionTreeBuilder, SpaceKind};
use wrinkles_core::{Config, DiscreteInfo, Interval, Ordinate, ProjectionOperator, Rational, TopologicalMap};

fn di(rate_num: i32, rate_den: u32, start_index: i64) -> DiscreteInfo {
    DiscreteInfo::new(Rational::new(rate_num, rate_den), start_index)
}

fn track_clip_gap_clip() -> wrinkles_core::CompositionTree {
    let mut b = CompositionTreeBuilder::new();
    let clip1 = b.add_clip("clip1", Interval::from_f64(1.0, 3.0), di(24, 1, 10), "clip1.mov");
    let gap = b.add_gap("gap", Ordinate(1.0));
    let clip2 = b.add_clip("clip2", Interval::from_f64(10.0, 11.0), di(30, 1, 10), "clip2.mov");
    let track = b.add_track("track", vec![clip1, gap, clip2]).unwrap();
    let timeline = b.add_timeline("timeline", track, di(24, 1, 86400));
    b.build(timeline)
}

#[test]
fn composition_tree_round_trips_through_json() {
    let tree = track_clip_gap_clip();

    let json = serde_json::to_string(&tree).unwrap();
    let restored: wrinkles_core::CompositionTree = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.nodes().len(), tree.nodes().len());
    assert_eq!(restored.root(), tree.root());
    for (a, b) in tree.nodes().iter().zip(restored.nodes().iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.presentation_bounds, b.presentation_bounds);
    }

    // A projection operator built over the restored tree must agree with one
    // built over the original -- the round trip lost nothing an operator
    // query can observe.
    let map = TopologicalMap::build(&tree);
    let restored_map = TopologicalMap::build(&restored);
    let cfg = Config::default();

    let src = map.space(tree.root(), SpaceKind::Presentation).unwrap();
    let restored_src = restored_map.space(restored.root(), SpaceKind::Presentation).unwrap();
    let op = ProjectionOperator::build(&map, src, src, &cfg).unwrap();
    let restored_op = ProjectionOperator::build(&restored_map, restored_src, restored_src, &cfg).unwrap();

    for t in [0.0, 1.5, 3.9] {
        let y = op.project_instantaneous_cc(Ordinate(t), &cfg).unwrap();
        let restored_y = restored_op.project_instantaneous_cc(Ordinate(t), &cfg).unwrap();
        assert_eq!(y.value(), restored_y.value());
    }
}

#[test]
fn rational_round_trips_through_json() {
    let r = Rational::new(24000, 1001);
    let json = serde_json::to_string(&r).unwrap();
    let restored: Rational = serde_json::from_str(&json).unwrap();
    assert_eq!(r, restored);
}
