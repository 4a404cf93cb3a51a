//! Graph construction from blocking links.
//!
//! # Overview
//!
//! [`DepGraph::build`] walks the blocking links once. Each endpoint is
//! resolved through a per-build memo so the ticket store is asked about any
//! given id at most once. A resolved ticket is either included (it passes the
//! milestone filter and becomes a node) or excluded for the rest of the build.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A **blocks** B".
//!
//! ## Blocked Tickets
//!
//! B is blocked when some included A with `A → B` is not closed. A link with
//! an excluded endpoint contributes neither an edge nor a blocked flag.
//!
//! ## Ordering
//!
//! petgraph keeps insertion order for node and edge indices, so nodes come
//! out in the order tickets were first resolved and edges in the order links
//! were first seen. Duplicate links collapse into one edge.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument, trace};

use crate::error::{DepGraphError, Result};
use crate::model::{Link, Ticket, TicketId};
use crate::options::MilestoneFilter;
use crate::store::TicketStore;

// ---------------------------------------------------------------------------
// DepGraph
// ---------------------------------------------------------------------------

/// The filtered blocking graph for one render.
#[derive(Debug, Default)]
pub struct DepGraph {
    /// Nodes are included tickets; an edge `A → B` means "A blocks B".
    pub graph: DiGraph<Ticket, ()>,
    /// Mapping from ticket id to petgraph `NodeIndex`.
    pub node_map: HashMap<TicketId, NodeIndex>,
    blocked: HashSet<TicketId>,
}

impl DepGraph {
    /// Build the graph for `links`, fetching tickets from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`DepGraphError::Lookup`] if a link references a ticket the
    /// store does not have, and [`DepGraphError::Render`] if the store fails.
    #[instrument(skip_all, fields(links = links.len()))]
    pub fn build<S>(links: &[Link], store: &S, filter: &MilestoneFilter) -> Result<Self>
    where
        S: TicketStore + ?Sized,
    {
        let mut lookup = TicketLookup::new(store, filter);
        let mut graph = Self::default();

        for link in links {
            let src = lookup.resolve(link.blocking, &mut graph)?;
            let dst = lookup.resolve(link.blocked, &mut graph)?;
            let (Some(src), Some(dst)) = (src, dst) else {
                trace!(blocking = %link.blocking, blocked = %link.blocked, "link dropped by filter");
                continue;
            };

            if !graph.graph.contains_edge(src, dst) {
                graph.graph.add_edge(src, dst, ());
            }
            if !graph.graph[src].is_closed() {
                graph.blocked.insert(link.blocked);
            }
        }

        debug!(
            fetched = lookup.fetched(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            blocked = graph.blocked.len(),
            "dependency graph built"
        );
        Ok(graph)
    }

    fn add_ticket(&mut self, ticket: Ticket) -> NodeIndex {
        let id = ticket.id;
        let idx = self.graph.add_node(ticket);
        self.node_map.insert(id, idx);
        idx
    }

    /// Return the number of included tickets.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct blocking edges between included tickets.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn contains(&self, id: TicketId) -> bool {
        self.node_map.contains_key(&id)
    }

    #[must_use]
    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.node_map.get(&id).map(|&idx| &self.graph[idx])
    }

    /// Included tickets in resolution order.
    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// `(blocking, blocked)` pairs in discovery order.
    pub fn edges(&self) -> impl Iterator<Item = (&Ticket, &Ticket)> + '_ {
        self.graph
            .edge_references()
            .map(move |edge| (&self.graph[edge.source()], &self.graph[edge.target()]))
    }

    /// `true` if an included, non-closed ticket blocks `id`.
    #[must_use]
    pub fn is_blocked(&self, id: TicketId) -> bool {
        self.blocked.contains(&id)
    }

    #[must_use]
    pub const fn blocked_ids(&self) -> &HashSet<TicketId> {
        &self.blocked
    }

    /// Ids of the included tickets that `id` directly blocks, sorted.
    #[must_use]
    pub fn blocking(&self, id: TicketId) -> Vec<TicketId> {
        let Some(&idx) = self.node_map.get(&id) else {
            return Vec::new();
        };
        let mut ids: Vec<TicketId> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

// ---------------------------------------------------------------------------
// Memoized ticket lookup
// ---------------------------------------------------------------------------

/// Per-build memo from ticket id to its node, or `None` when excluded.
struct TicketLookup<'a, S: ?Sized> {
    store: &'a S,
    filter: &'a MilestoneFilter,
    resolved: HashMap<TicketId, Option<NodeIndex>>,
}

impl<'a, S: TicketStore + ?Sized> TicketLookup<'a, S> {
    fn new(store: &'a S, filter: &'a MilestoneFilter) -> Self {
        Self {
            store,
            filter,
            resolved: HashMap::new(),
        }
    }

    fn resolve(&mut self, id: TicketId, graph: &mut DepGraph) -> Result<Option<NodeIndex>> {
        if let Some(&known) = self.resolved.get(&id) {
            return Ok(known);
        }

        trace!(ticket = %id, "fetching ticket");
        let ticket = self
            .store
            .get(id)
            .map_err(DepGraphError::Render)?
            .ok_or(DepGraphError::Lookup(id))?;

        let slot = if self.filter.matches(&ticket.milestone) {
            Some(graph.add_ticket(ticket))
        } else {
            None
        };
        self.resolved.insert(id, slot);
        Ok(slot)
    }

    fn fetched(&self) -> usize {
        self.resolved.len()
    }
}
