#![allow(dead_code)]
//! A topological projection engine for hierarchical timed media
//! compositions, in the spirit of OpenTimelineIO's time algebra.
//!
//! The crate is organized bottom-up:
//!
//! - [`rational`] and [`ordinate`]: exact rational arithmetic and the
//!   half-open `Ordinate`/`Interval` types every other module builds on.
//! - [`curve`]: the three curve kinds (`LinearCurve`, `BezierCurve`, and their
//!   shared [`curve::control_point::ControlPoint`]) underlying a [`mapping::Mapping`].
//! - [`mapping`]: the atomic 1D transform (`Empty`/`Affine`/`Linear`/`Bezier`).
//! - [`topology`]: an ordered tiling of `Mapping`s over one contiguous
//!   interval, and the `join` operator that composes two topologies.
//! - [`tree`]: the composition tree (Timeline/Stack/Track/Clip/Gap/Warp) and
//!   its node-owned local transforms.
//! - [`topo_map`]: a cached graph over a tree enabling O(depth) path queries
//!   between any two named spaces.
//! - [`operator`]: the projection operator, folding a path into one composed
//!   topology and answering continuous/discrete queries against it.
//! - [`discrete`]: the bridge between continuous ordinates and integer
//!   sample indices on a rational sample rate.
//! - [`config`]: numerical tolerances threaded through curve and topology
//!   evaluation.
//! - [`error`]: the crate-wide `Error`/`Result`.

pub mod config;
pub mod curve;
pub mod discrete;
pub mod error;
pub mod ids;
pub mod mapping;
pub mod operator;
pub mod ordinate;
pub mod rational;
pub mod topo_map;
pub mod topology;
pub mod tree;

pub use config::Config;
pub use curve::bezier::{BezierCurve, BezierSegment};
pub use curve::control_point::ControlPoint;
pub use curve::linear::LinearCurve;
pub use discrete::DiscreteInfo;
pub use error::{Error, Result};
pub use ids::{NodeId, SpaceId};
pub use mapping::Mapping;
pub use operator::{ProjectionOperator, ProjectionOperatorMap};
pub use ordinate::{Interval, Ordinate};
pub use rational::Rational;
pub use topo_map::{Space, TopologicalMap};
pub use topology::Topology;
pub use tree::{CompositionTree, CompositionTreeBuilder, Node, NodeKind, SpaceKind};
