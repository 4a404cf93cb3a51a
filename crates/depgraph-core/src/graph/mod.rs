//! Dependency graph for one render.
//!
//! ## Pipeline
//!
//! ```text
//! LinkStore::all_links()
//!        ↓  build::DepGraph::build()   (memoized ticket fetch, milestone filter)
//! DepGraph (included tickets, edges, blocked ids)
//!        ↓  classify::Classification::of()
//!        ↓  cluster::partition()
//! emit::Emitter
//! ```
//!
//! ## Submodules
//!
//! - [`build`]: graph construction and the blocked set.
//! - [`classify`]: overlay precedence for node styling.
//! - [`cluster`]: milestone buckets.

pub mod build;
pub mod classify;
pub mod cluster;

pub use build::DepGraph;
pub use classify::{Classification, NodeStyle};
pub use cluster::{Cluster, partition};
