//! Read-only access to tickets and blocking links.
//!
//! The render pipeline only ever reads through these two traits. The
//! [`crate::db::SqliteStore`] backs the CLI; [`MemoryStore`] is for tests
//! and for callers that already hold their tickets in memory.

use std::collections::HashMap;

use anyhow::Result;

use crate::model::{Link, Ticket, TicketId};

/// Source of ticket records.
pub trait TicketStore {
    /// Fetch one ticket. `Ok(None)` means the ticket does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, id: TicketId) -> Result<Option<Ticket>>;
}

/// Source of the blocking relation.
pub trait LinkStore {
    /// Every blocking link. No ordering or uniqueness guarantee.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn all_links(&self) -> Result<Vec<Link>>;
}

impl<T: TicketStore + ?Sized> TicketStore for &T {
    fn get(&self, id: TicketId) -> Result<Option<Ticket>> {
        (**self).get(id)
    }
}

impl<T: LinkStore + ?Sized> LinkStore for &T {
    fn all_links(&self) -> Result<Vec<Link>> {
        (**self).all_links()
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory ticket and link store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tickets: HashMap<TicketId, Ticket>,
    links: Vec<Link>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a ticket.
    pub fn insert_ticket(&mut self, ticket: Ticket) {
        self.tickets.insert(ticket.id, ticket);
    }

    /// Record that `blocking` blocks `blocked`. Neither ticket has to exist.
    pub fn add_link(&mut self, blocking: impl Into<TicketId>, blocked: impl Into<TicketId>) {
        self.links.push(Link::new(blocking, blocked));
    }

    #[must_use]
    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.insert_ticket(ticket);
        self
    }

    #[must_use]
    pub fn with_link(mut self, blocking: impl Into<TicketId>, blocked: impl Into<TicketId>) -> Self {
        self.add_link(blocking, blocked);
        self
    }
}

impl TicketStore for MemoryStore {
    fn get(&self, id: TicketId) -> Result<Option<Ticket>> {
        Ok(self.tickets.get(&id).cloned())
    }
}

impl LinkStore for MemoryStore {
    fn all_links(&self) -> Result<Vec<Link>> {
        Ok(self.links.clone())
    }
}
