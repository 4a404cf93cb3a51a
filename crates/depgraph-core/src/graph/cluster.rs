//! Milestone grouping of included tickets.

use crate::graph::build::DepGraph;
use crate::model::Ticket;

/// Tickets sharing one milestone. The empty milestone is the ungrouped bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster<'g> {
    pub milestone: &'g str,
    pub tickets: Vec<&'g Ticket>,
}

impl Cluster<'_> {
    #[must_use]
    pub fn is_ungrouped(&self) -> bool {
        self.milestone.is_empty()
    }
}

/// Split the graph's tickets by milestone.
///
/// Buckets appear in the order their milestone is first met while walking
/// tickets in resolution order; tickets keep that order within a bucket.
/// Every ticket lands in exactly one bucket.
#[must_use]
pub fn partition(graph: &DepGraph) -> Vec<Cluster<'_>> {
    let mut clusters: Vec<Cluster<'_>> = Vec::new();
    for ticket in graph.tickets() {
        let milestone = ticket.milestone.as_str();
        match clusters.iter_mut().find(|c| c.milestone == milestone) {
            Some(cluster) => cluster.tickets.push(ticket),
            None => clusters.push(Cluster {
                milestone,
                tickets: vec![ticket],
            }),
        }
    }
    clusters
}
