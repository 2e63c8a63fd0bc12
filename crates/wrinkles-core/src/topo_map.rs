#![allow(dead_code)]
//! A cached graph over a [`CompositionTree`] enabling O(depth) path queries
//! between any two named spaces.
//!
//! Built by a single tree walk that assigns every node a *tree-code* (its
//! root-to-node chain of `NodeId`s); `path` finds the lowest common ancestor
//! by longest common prefix of the two endpoints' chains, then walks up from
//! the source to the LCA (inverting each parent-to-child transform) and back
//! down to the destination (applying transforms forward).

use crate::error::{Error, Result};
use crate::ids::{IdAllocator, NodeId, SpaceId};
use crate::ordinate::Interval;
use crate::topology::Topology;
use crate::tree::{CompositionTree, NodeKind, SpaceKind};
use std::collections::HashMap;

/// A named space: a node plus which of its coordinate systems is meant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Space {
    pub node: NodeId,
    pub kind: SpaceKind,
}

pub struct TopologicalMap<'a> {
    tree: &'a CompositionTree,
    spaces: Vec<Space>,
    space_ids: HashMap<(u32, u8), SpaceId>,
    ancestors: HashMap<u32, Vec<NodeId>>,
    child_index: HashMap<u32, usize>,
}

fn kind_tag(k: SpaceKind) -> u8 {
    match k {
        SpaceKind::Presentation => 0,
        SpaceKind::Intrinsic => 1,
        SpaceKind::Media => 2,
    }
}

impl<'a> TopologicalMap<'a> {
    /// Build the map with a single recursive walk from `tree.root()`.
    pub fn build(tree: &'a CompositionTree) -> Self {
        let mut ids = IdAllocator::new();
        let mut spaces = Vec::new();
        let mut space_ids = HashMap::new();
        let mut ancestors = HashMap::new();
        let mut child_index = HashMap::new();

        fn walk(
            tree: &CompositionTree,
            node: NodeId,
            path: &[NodeId],
            ids: &mut IdAllocator,
            spaces: &mut Vec<Space>,
            space_ids: &mut HashMap<(u32, u8), SpaceId>,
            ancestors: &mut HashMap<u32, Vec<NodeId>>,
            child_index: &mut HashMap<u32, usize>,
        ) {
            let mut chain = path.to_vec();
            chain.push(node);
            ancestors.insert(node.0, chain.clone());

            for kind in tree.node(node).spaces() {
                let sid = ids.alloc_space();
                space_ids.insert((node.0, kind_tag(kind)), sid);
                spaces.push(Space { node, kind });
            }

            for (i, &child) in tree.node(node).children().iter().enumerate() {
                child_index.insert(child.0, i);
                walk(tree, child, &chain, ids, spaces, space_ids, ancestors, child_index);
            }
        }

        walk(
            tree,
            tree.root(),
            &[],
            &mut ids,
            &mut spaces,
            &mut space_ids,
            &mut ancestors,
            &mut child_index,
        );

        TopologicalMap {
            tree,
            spaces,
            space_ids,
            ancestors,
            child_index,
        }
    }

    pub fn tree(&self) -> &'a CompositionTree {
        self.tree
    }

    /// Look up the stable [`SpaceId`] for `(node, kind)`. Fails if the node
    /// doesn't own that space (e.g. `Media` on a non-Clip).
    pub fn space(&self, node: NodeId, kind: SpaceKind) -> Result<SpaceId> {
        self.space_ids
            .get(&(node.0, kind_tag(kind)))
            .copied()
            .ok_or_else(|| Error::no_path(format!("{node:?}"), format!("{kind:?}")))
    }

    pub fn space_of(&self, id: SpaceId) -> Result<Space> {
        self.spaces
            .get(id.0 as usize)
            .copied()
            .ok_or_else(|| Error::no_path(format!("{id:?}"), "<unknown>"))
    }

    pub fn bounds_of(&self, s: Space) -> Interval {
        let n = self.tree.node(s.node);
        match (&n.kind, s.kind) {
            (NodeKind::Clip { media_bounds, .. }, SpaceKind::Media) => *media_bounds,
            _ => n.presentation_bounds,
        }
    }

    fn edge_down(&self, parent: NodeId, child_index: usize) -> Result<Topology> {
        let n = self.tree.node(parent);
        match &n.kind {
            NodeKind::Warp { transform, .. } => Ok(transform.clone()),
            NodeKind::Stack { .. } | NodeKind::Track { .. } | NodeKind::Timeline { .. } => {
                let m = self.tree.child_presentation_mapping(parent, child_index)?;
                Topology::new(vec![m])
            }
            _ => Err(Error::no_path(
                n.name.clone(),
                "node kind has no parent-to-child transform",
            )),
        }
    }

    fn edge_up(&self, parent: NodeId, child_index: usize) -> Result<Topology> {
        self.edge_down(parent, child_index)?.inverse()
    }

    /// The ordered list of per-hop Topologies from `src` to `dst`, in
    /// traversal order. Callers fold these via successive [`Topology::join`]
    /// to obtain the single composed topology (see
    /// [`crate::operator::ProjectionOperator::build`]).
    pub fn path(&self, src: SpaceId, dst: SpaceId) -> Result<Vec<Topology>> {
        let src_space = self.space_of(src)?;
        let dst_space = self.space_of(dst)?;

        if src_space == dst_space {
            return Ok(vec![Topology::identity(self.bounds_of(src_space))]);
        }

        let anc_src = self
            .ancestors
            .get(&src_space.node.0)
            .ok_or_else(|| Error::no_path(format!("{src:?}"), format!("{dst:?}")))?;
        let anc_dst = self
            .ancestors
            .get(&dst_space.node.0)
            .ok_or_else(|| Error::no_path(format!("{src:?}"), format!("{dst:?}")))?;

        let mut common = 0usize;
        while common < anc_src.len() && common < anc_dst.len() && anc_src[common].0 == anc_dst[common].0 {
            common += 1;
        }
        let lca_depth = common - 1;

        let mut edges = Vec::new();

        if src_space.kind != SpaceKind::Presentation {
            let m = self
                .tree
                .clip_internal_mapping(src_space.node, src_space.kind, SpaceKind::Presentation)?;
            edges.push(Topology::new(vec![m])?);
        }

        for i in (lca_depth + 1..anc_src.len()).rev() {
            let node = anc_src[i];
            let parent = anc_src[i - 1];
            let idx = *self
                .child_index
                .get(&node.0)
                .ok_or_else(|| Error::no_path(format!("{node:?}"), "parent"))?;
            edges.push(self.edge_up(parent, idx)?);
        }

        for i in lca_depth + 1..anc_dst.len() {
            let node = anc_dst[i];
            let parent = anc_dst[i - 1];
            let idx = *self
                .child_index
                .get(&node.0)
                .ok_or_else(|| Error::no_path(format!("{node:?}"), "parent"))?;
            edges.push(self.edge_down(parent, idx)?);
        }

        if dst_space.kind != SpaceKind::Presentation {
            let m = self
                .tree
                .clip_internal_mapping(dst_space.node, SpaceKind::Presentation, dst_space.kind)?;
            edges.push(Topology::new(vec![m])?);
        }

        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::discrete::DiscreteInfo;
    use crate::ordinate::Ordinate;
    use crate::rational::Rational;
    use crate::tree::CompositionTreeBuilder;

    fn di(rate: i32, start: i64) -> DiscreteInfo {
        DiscreteInfo::new(Rational::new(rate, 1), start)
    }

    #[test]
    fn path_within_clip_shifts_to_media() {
        let mut b = CompositionTreeBuilder::new();
        let clip = b.add_clip("clip", Interval::from_f64(1.0, 3.0), di(24, 10), "clip.mov");
        let tree = b.build(clip);
        let map = TopologicalMap::build(&tree);

        let pres = map.space(clip, SpaceKind::Presentation).unwrap();
        let media = map.space(clip, SpaceKind::Media).unwrap();
        let edges = map.path(pres, media).unwrap();
        let cfg = Config::default();
        let composed = edges
            .into_iter()
            .reduce(|a, b| Topology::join(&a, &b, &cfg).unwrap())
            .unwrap();
        let y = composed.project_ordinate(Ordinate(0.0), &cfg).unwrap();
        assert_eq!(y.value(), 1.0);
    }

    #[test]
    fn path_through_track_sibling_offset() {
        let mut b = CompositionTreeBuilder::new();
        let clip1 = b.add_clip("clip1", Interval::from_f64(1.0, 3.0), di(24, 10), "clip1.mov");
        let gap = b.add_gap("gap", Ordinate(1.0));
        let clip2 = b.add_clip("clip2", Interval::from_f64(10.0, 11.0), di(30, 10), "clip2.mov");
        let track = b.add_track("track", vec![clip1, gap, clip2]).unwrap();
        let tree = b.build(track);
        let map = TopologicalMap::build(&tree);

        let track_pres = map.space(track, SpaceKind::Presentation).unwrap();
        let clip2_media = map.space(clip2, SpaceKind::Media).unwrap();
        let edges = map.path(track_pres, clip2_media).unwrap();
        let cfg = Config::default();
        let composed = edges
            .into_iter()
            .reduce(|a, b| Topology::join(&a, &b, &cfg).unwrap())
            .unwrap();
        // track time 3.0 (start of clip2's presentation slot) -> clip2 media 10.0
        let y = composed.project_ordinate(Ordinate(3.0), &cfg).unwrap();
        assert_eq!(y.value(), 10.0);
    }

    #[test]
    fn identity_path_same_space() {
        let mut b = CompositionTreeBuilder::new();
        let clip = b.add_clip("clip", Interval::from_f64(0.0, 2.0), di(24, 0), "clip.mov");
        let tree = b.build(clip);
        let map = TopologicalMap::build(&tree);
        let pres = map.space(clip, SpaceKind::Presentation).unwrap();
        let edges = map.path(pres, pres).unwrap();
        assert_eq!(edges.len(), 1);
    }
}
