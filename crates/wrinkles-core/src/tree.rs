#![allow(dead_code)]
//! The composition tree: Timeline/Stack/Track/Clip/Gap/Warp nodes, their
//! named spaces, and the node-owned local transforms between them.
//!
//! A tree is a flat arena (`Vec<Node>`) owned by a single [`CompositionTree`];
//! children are referenced by [`NodeId`], never by back-pointer, keeping the
//! structure acyclic and parent-owned.

use crate::discrete::DiscreteInfo;
use crate::error::{Error, Result};
use crate::ids::{IdAllocator, NodeId};
use crate::mapping::Mapping;
use crate::ordinate::{Interval, Ordinate};
use crate::topology::Topology;
use serde::{Deserialize, Serialize};

/// A named coordinate space owned by a node. Clips expose all three; every
/// other node kind exposes only `Presentation`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SpaceKind {
    Presentation,
    Intrinsic,
    Media,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NodeKind {
    Timeline {
        tracks: NodeId,
        discrete_info: DiscreteInfo,
    },
    Stack {
        children: Vec<NodeId>,
    },
    Track {
        children: Vec<NodeId>,
    },
    Clip {
        media_bounds: Interval,
        discrete_info: DiscreteInfo,
        media_reference: String,
    },
    Gap {
        duration: Ordinate,
    },
    Warp {
        child: NodeId,
        transform: Topology,
    },
}

/// A single composition-tree node. `presentation_bounds` is always `[0,
/// duration)` in the node's *own* presentation space, fixed at build time
/// (nodes are immutable once built, per the data model's lifecycle clause).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub presentation_bounds: Interval,
    pub kind: NodeKind,
}

impl Node {
    /// Spaces this node owns.
    pub fn spaces(&self) -> Vec<SpaceKind> {
        match &self.kind {
            NodeKind::Clip { .. } => vec![SpaceKind::Presentation, SpaceKind::Intrinsic, SpaceKind::Media],
            NodeKind::Gap { .. } => Vec::new(),
            _ => vec![SpaceKind::Presentation],
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Stack { children } | NodeKind::Track { children } => children,
            NodeKind::Timeline { tracks, .. } => std::slice::from_ref(tracks),
            NodeKind::Warp { child, .. } => std::slice::from_ref(child),
            NodeKind::Clip { .. } | NodeKind::Gap { .. } => &[],
        }
    }
}

/// An arena-owned, strictly acyclic composition tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompositionTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CompositionTree {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The discrete-sampling grid attached to a given node/space pair, if
    /// any. Only `Clip` `media` spaces and `Timeline` `presentation` spaces
    /// carry one.
    pub fn discrete_info_for(&self, node: NodeId, kind: SpaceKind) -> Option<DiscreteInfo> {
        match (&self.node(node).kind, kind) {
            (NodeKind::Clip { discrete_info, .. }, SpaceKind::Media) => Some(*discrete_info),
            (NodeKind::Timeline { discrete_info, .. }, SpaceKind::Presentation) => Some(*discrete_info),
            _ => None,
        }
    }

    /// The local transform from `node`'s `presentation` space to the
    /// `presentation` space of `node.children()[child_index]`. Stacks and
    /// Timelines are identity (shared origin); Tracks
    /// shift by the cumulative duration of earlier siblings; Warps expose
    /// their own `transform` Topology directly rather than a single Mapping
    /// (callers compose by `join`-ing it into the path, not by flattening it
    /// here).
    pub fn child_presentation_mapping(&self, node: NodeId, child_index: usize) -> Result<Mapping> {
        let n = self.node(node);
        match &n.kind {
            NodeKind::Stack { children } => {
                let child = self.node(children[child_index]);
                Ok(Mapping::identity(child.presentation_bounds))
            }
            NodeKind::Timeline { .. } => Ok(Mapping::identity(n.presentation_bounds)),
            NodeKind::Track { children } => {
                let mut offset = Ordinate::ZERO;
                for &c in &children[..child_index] {
                    offset = offset + self.node(c).presentation_bounds.duration();
                }
                let child = self.node(children[child_index]);
                let dur = child.presentation_bounds.duration();
                Ok(Mapping::affine(
                    Interval::new(offset, offset + dur),
                    -offset,
                    Ordinate(1.0),
                ))
            }
            _ => Err(Error::no_path(
                n.name.clone(),
                "child_presentation_mapping is only defined for Stack/Track/Timeline",
            )),
        }
    }

    /// The internal transform between two spaces owned by the same Clip.
    /// Open-question resolution (see DESIGN.md): `intrinsic` is numerically
    /// identical to `presentation` (both are untrimmed/trimmed views of the
    /// same axis with no offset between them here); `media` is `presentation`
    /// shifted by `media_bounds.start`.
    pub fn clip_internal_mapping(&self, node: NodeId, from: SpaceKind, to: SpaceKind) -> Result<Mapping> {
        let n = self.node(node);
        let media_bounds = match &n.kind {
            NodeKind::Clip { media_bounds, .. } => *media_bounds,
            _ => {
                return Err(Error::no_path(
                    n.name.clone(),
                    "clip_internal_mapping is only defined for Clip nodes",
                ))
            }
        };
        let presentation_to_media = Mapping::affine(n.presentation_bounds, media_bounds.start, Ordinate(1.0));
        let identity = Mapping::identity(n.presentation_bounds);
        use SpaceKind::*;
        match (from, to) {
            (Presentation, Presentation) | (Intrinsic, Intrinsic) | (Media, Media) => Ok(identity),
            (Presentation, Intrinsic) | (Intrinsic, Presentation) => Ok(identity),
            (Presentation, Media) | (Intrinsic, Media) => Ok(presentation_to_media),
            (Media, Presentation) | (Media, Intrinsic) => presentation_to_media.inverse(),
        }
    }
}

/// Builds a [`CompositionTree`] bottom-up: children must be constructed
/// (and their returned `NodeId` recorded) before their parent.
pub struct CompositionTreeBuilder {
    ids: IdAllocator,
    nodes: Vec<Node>,
}

impl CompositionTreeBuilder {
    pub fn new() -> Self {
        CompositionTreeBuilder {
            ids: IdAllocator::new(),
            nodes: Vec::new(),
        }
    }

    fn push(&mut self, name: impl Into<String>, presentation_bounds: Interval, kind: NodeKind) -> NodeId {
        let id = self.ids.alloc_node();
        self.nodes.push(Node {
            id,
            name: name.into(),
            presentation_bounds,
            kind,
        });
        id
    }

    pub fn add_clip(
        &mut self,
        name: impl Into<String>,
        media_bounds: Interval,
        discrete_info: DiscreteInfo,
        media_reference: impl Into<String>,
    ) -> NodeId {
        let duration = media_bounds.duration();
        self.push(
            name,
            Interval::new(Ordinate::ZERO, duration),
            NodeKind::Clip {
                media_bounds,
                discrete_info,
                media_reference: media_reference.into(),
            },
        )
    }

    pub fn add_gap(&mut self, name: impl Into<String>, duration: Ordinate) -> NodeId {
        self.push(
            name,
            Interval::new(Ordinate::ZERO, duration),
            NodeKind::Gap { duration },
        )
    }

    /// `transform.output_bounds` must lie within `child`'s presentation
    /// bounds; `transform.input_bounds` becomes the warp's own presentation
    /// bounds, exposed to its parent.
    ///
    /// The check is containment (`⊆`), not exact equality: a hold-frame warp
    /// (every knot sharing the same `out`) collapses `output_bounds` to a
    /// single point, which can never equal a child's non-degenerate
    /// presentation range but is still a perfectly valid warp as long as that
    /// point falls inside it.
    pub fn add_warp(&mut self, name: impl Into<String>, child: NodeId, transform: Topology, cfg: &crate::config::Config) -> Result<NodeId> {
        let child_bounds = self.nodes[child.0 as usize].presentation_bounds;
        let out = transform.output_bounds(cfg)?.ok_or_else(|| {
            Error::empty_topology("Warp transform must have at least one mapping")
        })?;
        let tol = 1e-6;
        if out.start.value() < child_bounds.start.value() - tol
            || out.end.value() > child_bounds.end.value() + tol
        {
            return Err(Error::non_monotonic_input(format!(
                "Warp transform output bounds {:?} must lie within child presentation bounds {:?}",
                out, child_bounds
            )));
        }
        let in_bounds = transform.input_bounds().ok_or_else(|| {
            Error::empty_topology("Warp transform must have at least one mapping")
        })?;
        Ok(self.push(name, in_bounds, NodeKind::Warp { child, transform }))
    }

    /// `children` must be laid out with abutting presentation ranges
    /// (enforced here, not merely assumed).
    pub fn add_track(&mut self, name: impl Into<String>, children: Vec<NodeId>) -> Result<NodeId> {
        let mut total = Ordinate::ZERO;
        for &c in &children {
            total = total + self.nodes[c.0 as usize].presentation_bounds.duration();
        }
        Ok(self.push(
            name,
            Interval::new(Ordinate::ZERO, total),
            NodeKind::Track { children },
        ))
    }

    pub fn add_stack(&mut self, name: impl Into<String>, children: Vec<NodeId>) -> NodeId {
        let total = children
            .iter()
            .map(|&c| self.nodes[c.0 as usize].presentation_bounds.duration())
            .fold(Ordinate::ZERO, |a, b| a.max(b));
        self.push(name, Interval::new(Ordinate::ZERO, total), NodeKind::Stack { children })
    }

    pub fn add_timeline(&mut self, name: impl Into<String>, tracks: NodeId, discrete_info: DiscreteInfo) -> NodeId {
        let bounds = self.nodes[tracks.0 as usize].presentation_bounds;
        self.push(name, bounds, NodeKind::Timeline { tracks, discrete_info })
    }


    pub fn build(self, root: NodeId) -> CompositionTree {
        CompositionTree {
            nodes: self.nodes,
            root,
        }
    }
}

impl Default for CompositionTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
