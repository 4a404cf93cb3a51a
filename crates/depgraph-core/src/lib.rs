#![forbid(unsafe_code)]
//! depgraph-core library.
//!
//! Turns "ticket blocks ticket" links into a Graphviz document: tickets are
//! filtered by milestone, classified as blocked, unblocked, critical or
//! closed, optionally grouped into milestone clusters, and given wrapped,
//! escaped labels. Layout is left to Graphviz.
//!
//! # Conventions
//!
//! - **Errors**: [`DepGraphError`] for the render pipeline; stores use
//!   `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Usage
//!
//! ```rust,ignore
//! use depgraph_core::{MacroCall, MemoryStore, Renderer, Ticket};
//!
//! let store = MemoryStore::new()
//!     .with_ticket(Ticket::new(1, "Parser"))
//!     .with_ticket(Ticket::new(2, "Type checker"))
//!     .with_link(1, 2);
//!
//! let text = Renderer::new(store).expand_macro(&MacroCall {
//!     content: Some("group_by_milestone=0"),
//!     ..MacroCall::default()
//! });
//! ```

pub mod db;
pub mod emit;
pub mod error;
pub mod graph;
pub mod label;
pub mod model;
pub mod options;
pub mod render;
pub mod store;

pub use db::SqliteStore;
pub use error::{DepGraphError, ErrorCode, Result};
pub use graph::{Classification, DepGraph};
pub use model::{Link, Status, Ticket, TicketId};
pub use options::{MilestoneFilter, OptionMap, Options, parse_macro_args};
pub use render::{DEFAULT_BASE_URL, MacroCall, Renderer};
pub use store::{LinkStore, MemoryStore, TicketStore};
