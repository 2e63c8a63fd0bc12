#![allow(dead_code)]
//! The Projection Operator: a composed [`Topology`] between a source and
//! destination space, plus CC/CD/DD query methods.

use crate::config::Config;
use crate::discrete::DiscreteInfo;
use crate::error::{Error, Result};
use crate::ids::SpaceId;
use crate::ordinate::{Interval, Ordinate};
use crate::topo_map::{Space, TopologicalMap};
use crate::topology::Topology;

/// The composed topology between two named spaces, owning its own copy so it
/// outlives the [`TopologicalMap`] and [`crate::tree::CompositionTree`] used
/// to build it.
#[derive(Clone, Debug)]
pub struct ProjectionOperator {
    pub source: Space,
    pub destination: Space,
    pub src_to_dst_topo: Topology,
    source_discrete: Option<DiscreteInfo>,
    destination_discrete: Option<DiscreteInfo>,
}

impl ProjectionOperator {
    /// `map.path(src, dst)`, folded by successive `join` into one topology.
    pub fn build(map: &TopologicalMap, src: SpaceId, dst: SpaceId, cfg: &Config) -> Result<Self> {
        let edges = map.path(src, dst)?;
        let mut iter = edges.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| Error::empty_topology("path between spaces produced no edges"))?;
        let composed = iter.try_fold(first, |acc, next| Topology::join(&acc, &next, cfg))?;

        let source = map.space_of(src)?;
        let destination = map.space_of(dst)?;
        let source_discrete = map.tree().discrete_info_for(source.node, source.kind);
        let destination_discrete = map.tree().discrete_info_for(destination.node, destination.kind);

        Ok(ProjectionOperator {
            source,
            destination,
            src_to_dst_topo: composed,
            source_discrete,
            destination_discrete,
        })
    }

    pub fn source_bounds(&self) -> Option<Interval> {
        self.src_to_dst_topo.input_bounds()
    }

    pub fn destination_bounds(&self, cfg: &Config) -> Result<Option<Interval>> {
        self.src_to_dst_topo.output_bounds(cfg)
    }

    /// Continuous → continuous.
    pub fn project_instantaneous_cc(&self, t: Ordinate, cfg: &Config) -> Result<Ordinate> {
        self.src_to_dst_topo.project_ordinate(t, cfg)
    }

    /// Continuous → discrete: project then discretize through the
    /// destination's sample grid.
    pub fn project_instantaneous_cd(&self, t: Ordinate, cfg: &Config) -> Result<i64> {
        let y = self.project_instantaneous_cc(t, cfg)?;
        let di = self
            .destination_discrete
            .ok_or_else(|| Error::incompatible_rates("destination space has no discrete info"))?;
        di.index_for_ord(y)
    }

    /// Discrete → discrete: expand source index `i` to its continuous
    /// interval, project both endpoints, re-discretize. Returns every
    /// integer destination index between the two resulting indices
    /// inclusive, in the order the source interval evaluates across
    /// (ascending for monotonic-non-decreasing topologies; descending for a
    /// reversal segment, per the ordering guarantee).
    pub fn project_index_dd(&self, i: i64, cfg: &Config) -> Result<Vec<i64>> {
        let src_di = self
            .source_discrete
            .ok_or_else(|| Error::incompatible_rates("source space has no discrete info"))?;
        let dst_di = self
            .destination_discrete
            .ok_or_else(|| Error::incompatible_rates("destination space has no discrete info"))?;
        let src_interval = src_di.ord_interval_for_index(i)?;
        self.project_range_dd(src_interval, &dst_di, cfg)
    }

    /// Continuous → discrete over a range: every destination index between
    /// the indices of the projected endpoints, inclusive.
    pub fn project_range_cd(&self, interval: Interval, cfg: &Config) -> Result<Vec<i64>> {
        let dst_di = self
            .destination_discrete
            .ok_or_else(|| Error::incompatible_rates("destination space has no discrete info"))?;
        self.project_range_dd(interval, &dst_di, cfg)
    }

    /// Projects both endpoints of `src_interval` directly (no inward
    /// epsilon nudge) and returns the inclusive integer range between their
    /// discretized indices. Evaluating exactly at `src_interval.end` relies
    /// on [`Topology::project_ordinate`]'s own half-open convention, which
    /// treats the final mapping's upper bound as inclusive -- this is what
    /// makes a query over a whole clip's presentation range land exactly on
    /// that clip's last media sample rather than stopping one short of it.
    fn project_range_dd(&self, src_interval: Interval, dst_di: &DiscreteInfo, cfg: &Config) -> Result<Vec<i64>> {
        let y_lo = self.project_instantaneous_cc(src_interval.start, cfg)?;
        let y_hi = self.project_instantaneous_cc(src_interval.end, cfg)?;
        let idx_lo = dst_di.index_for_ord(y_lo)?;
        let idx_hi = dst_di.index_for_ord(y_hi)?;
        Ok(inclusive_range(idx_lo, idx_hi))
    }

    /// Continuous → continuous over a range. Returns the destination image
    /// together with a `non_monotonic` warning flag, per spec.md §4.8: when
    /// the topology is monotonic non-decreasing across the query range the
    /// returned interval is the exact image and the flag is `false`;
    /// otherwise the interval is only the convex hull of the image and the
    /// flag is `true`.
    pub fn project_range_cc(&self, interval: Interval, cfg: &Config) -> Result<(Interval, bool)> {
        let a = self.project_instantaneous_cc(interval.start, cfg)?;
        let b = self.project_instantaneous_cc(interval.end, cfg)?;
        let mut lo = a.min(b);
        let mut hi = a.max(b);
        let mut non_monotonic = false;
        for m in self.src_to_dst_topo.mappings() {
            let mb = m.input_bounds();
            let overlaps_query =
                mb.end.value() > interval.start.value() && mb.start.value() < interval.end.value();
            if !overlaps_query {
                continue;
            }
            if !m.is_monotonic_non_decreasing(cfg) {
                non_monotonic = true;
            }
            if mb.start.value() > interval.start.value() && mb.start.value() < interval.end.value() {
                let y = m.output_at_input(mb.start, cfg)?;
                if y.value() < lo.value() - 1e-12 || y.value() > hi.value() + 1e-12 {
                    non_monotonic = true;
                }
                lo = lo.min(y);
                hi = hi.max(y);
            }
        }
        Ok((Interval::new(lo, hi), non_monotonic))
    }
}

/// Integer range from `a` to `b` inclusive, in evaluation order: ascending
/// if `a <= b`, descending otherwise (preserves direction across a reversal
/// segment rather than always sorting numerically).
fn inclusive_range(a: i64, b: i64) -> Vec<i64> {
    if a <= b {
        (a..=b).collect()
    } else {
        (b..=a).rev().collect()
    }
}

/// Given a source space, the ordered partition of its input bounds plus, for
/// each sub-interval, which descendant media spaces are reachable there.
/// Built by taking the union of cut points across every leaf-space
/// projection from `src`, then bucketing per sub-interval.
pub struct ProjectionOperatorMap {
    pub end_points: Vec<Ordinate>,
    pub operators: Vec<Vec<ProjectionOperator>>,
}

impl ProjectionOperatorMap {
    pub fn build(map: &TopologicalMap, src: SpaceId, leaves: &[SpaceId], cfg: &Config) -> Result<Self> {
        let mut ops = Vec::new();
        for &leaf in leaves {
            if let Ok(op) = ProjectionOperator::build(map, src, leaf, cfg) {
                ops.push(op);
            }
        }
        let mut cuts: Vec<f64> = Vec::new();
        for op in &ops {
            if let Some(b) = op.source_bounds() {
                cuts.push(b.start.value());
                cuts.push(b.end.value());
            }
        }
        cuts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        cuts.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

        let end_points: Vec<Ordinate> = cuts.into_iter().map(Ordinate).collect();
        let mut operators = Vec::new();
        for w in end_points.windows(2) {
            let (lo, hi) = (w[0].value(), w[1].value());
            let mid = 0.5 * (lo + hi);
            let active: Vec<ProjectionOperator> = ops
                .iter()
                .filter(|op| {
                    op.source_bounds()
                        .map(|b| mid >= b.start.value() && mid < b.end.value())
                        .unwrap_or(false)
                })
                .cloned()
                .collect();
            operators.push(active);
        }

        Ok(ProjectionOperatorMap { end_points, operators })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordinate::Interval as Iv;
    use crate::rational::Rational;
    use crate::tree::{CompositionTreeBuilder, SpaceKind};

    fn di(rate_num: i32, rate_den: u32, start: i64) -> DiscreteInfo {
        DiscreteInfo::new(Rational::new(rate_num, rate_den), start)
    }

    #[test]
    fn scenario_track_clip_gap_clip() {
        let mut b = CompositionTreeBuilder::new();
        let clip1 = b.add_clip("clip1", Iv::from_f64(1.0, 3.0), di(24, 1, 10), "clip1.mov");
        let gap = b.add_gap("gap", Ordinate(1.0));
        let clip2 = b.add_clip("clip2", Iv::from_f64(10.0, 11.0), di(30, 1, 10), "clip2.mov");
        let track = b.add_track("track", vec![clip1, gap, clip2]).unwrap();
        let timeline = b.add_timeline("timeline", track, di(24, 1, 86400));
        let tree = b.build(timeline);
        let map = TopologicalMap::build(&tree);
        let cfg = Config::default();

        let src = map.space(timeline, SpaceKind::Presentation).unwrap();
        let dst = map.space(clip2, SpaceKind::Media).unwrap();
        let op = ProjectionOperator::build(&map, src, dst, &cfg).unwrap();

        // clip2's presentation slot in the track is [3, 4); in timeline
        // presentation space (identity from timeline down) that's also
        // [3,4). clip2 media covers [10,11) at 30Hz starting at index 10:
        // media ordinate 10.0 is index 310, and -- since this query spans
        // clip2's entire slot, touching the composed topology's own final
        // upper bound -- media ordinate 11.0 is included too, at index 340.
        let indices = op.project_range_cd(Iv::from_f64(3.0, 4.0), &cfg).unwrap();
        assert_eq!(indices.len(), 31);
        assert_eq!(*indices.first().unwrap(), 310);
        assert_eq!(*indices.last().unwrap(), 340);
    }

    #[test]
    fn scenario_warp_scale_2() {
        // A timeline wrapping a 2x-speed warp over a clip: the timeline's
        // own sample 0 (rate 2Hz, so [0, 0.5) seconds) covers clip
        // presentation time [0, 1.0) under the 2x warp, which (after the
        // clip's internal +1.0 offset into media space) lands on media
        // ordinates [1.0, 2.0).
        let mut b = CompositionTreeBuilder::new();
        let clip = b.add_clip("clip", Iv::from_f64(1.0, 3.0), di(48000, 1, 0), "clip.wav");
        let transform = Topology::new(vec![crate::mapping::Mapping::affine(
            Iv::from_f64(0.0, 1.0),
            Ordinate(0.0),
            Ordinate(2.0),
        )])
        .unwrap();
        let cfg = Config::default();
        let warp = b.add_warp("warp", clip, transform, &cfg).unwrap();
        let timeline = b.add_timeline("timeline", warp, di(2, 1, 0));
        let tree = b.build(timeline);
        let map = TopologicalMap::build(&tree);

        let src = map.space(timeline, SpaceKind::Presentation).unwrap();
        let dst = map.space(clip, SpaceKind::Media).unwrap();
        let op = ProjectionOperator::build(&map, src, dst, &cfg).unwrap();

        let idx = op.project_instantaneous_cd(Ordinate(0.0), &cfg).unwrap();
        assert_eq!(idx, 48000);

        // timeline sample 0 spans [0, 0.5) seconds; under the 2x warp and
        // the clip's +1.0 media offset that's media ordinates [1.0, 2.0),
        // i.e. media indices 48000 through 96000 inclusive at 48kHz.
        let dd = op.project_index_dd(0, &cfg).unwrap();
        assert_eq!(dd.first().copied(), Some(48000));
        assert_eq!(dd.last().copied(), Some(96000));
    }

    #[test]
    fn composed_operator_matches_chained_instantaneous_projection() {
        // O_track_to_clip2media == O_clip2pres_to_media(O_track_to_clip2pres(t))
        // for every t in the shared source domain -- the map-level `path` folds
        // through the same intermediate Clip2 presentation space either way.
        let mut b = CompositionTreeBuilder::new();
        let clip1 = b.add_clip("clip1", Iv::from_f64(1.0, 3.0), di(24, 1, 10), "clip1.mov");
        let gap = b.add_gap("gap", Ordinate(1.0));
        let clip2 = b.add_clip("clip2", Iv::from_f64(10.0, 11.0), di(30, 1, 10), "clip2.mov");
        let track = b.add_track("track", vec![clip1, gap, clip2]).unwrap();
        let timeline = b.add_timeline("timeline", track, di(24, 1, 86400));
        let tree = b.build(timeline);
        let map = TopologicalMap::build(&tree);
        let cfg = Config::default();

        let track_pres = map.space(timeline, SpaceKind::Presentation).unwrap();
        let clip2_pres = map.space(clip2, SpaceKind::Presentation).unwrap();
        let clip2_media = map.space(clip2, SpaceKind::Media).unwrap();

        let whole = ProjectionOperator::build(&map, track_pres, clip2_media, &cfg).unwrap();
        let first_leg = ProjectionOperator::build(&map, track_pres, clip2_pres, &cfg).unwrap();
        let second_leg = ProjectionOperator::build(&map, clip2_pres, clip2_media, &cfg).unwrap();

        for t in [3.0, 3.25, 3.9] {
            let direct = whole.project_instantaneous_cc(Ordinate(t), &cfg).unwrap();
            let mid = first_leg.project_instantaneous_cc(Ordinate(t), &cfg).unwrap();
            let chained = second_leg.project_instantaneous_cc(mid, &cfg).unwrap();
            assert!((direct.value() - chained.value()).abs() < 1e-9);
        }
    }
}
