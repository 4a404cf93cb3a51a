//! Ticket records and blocking links as read from the ticket store.
//!
//! Everything here is plain data: the store hands out [`Ticket`] values and
//! [`Link`] pairs, and the graph builder decides which of them make it into
//! a render.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TicketId
// ---------------------------------------------------------------------------

/// Numeric ticket identifier.
///
/// Displays as the bare number. The Graphviz node for a ticket is named
/// `ticket<id>` (see [`TicketId::node_name`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(i64);

impl TicketId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Graphviz node identifier for this ticket.
    #[must_use]
    pub fn node_name(self) -> String {
        format!("ticket{}", self.0)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TicketId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<i32> for TicketId {
    fn from(raw: i32) -> Self {
        Self(i64::from(raw))
    }
}

impl FromStr for TicketId {
    type Err = ParseIntError;

    /// Accepts `42` as well as the wiki-style `#42`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.strip_prefix('#').unwrap_or(s).parse().map(Self)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Ticket workflow status.
///
/// Only [`Status::Closed`] changes how a ticket is drawn; the other states
/// are kept so that round-tripping through the store is lossless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    New,
    Assigned,
    Accepted,
    Reopened,
    Closed,
    Other(String),
}

impl Status {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Assigned => "assigned",
            Self::Accepted => "accepted",
            Self::Reopened => "reopened",
            Self::Closed => "closed",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        match raw {
            "new" => Self::New,
            "assigned" => Self::Assigned,
            "accepted" => Self::Accepted,
            "reopened" => Self::Reopened,
            "closed" => Self::Closed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// Priority value that gets the critical styling.
pub const CRITICAL_PRIORITY: &str = "critical";

/// A ticket record as returned by [`crate::store::TicketStore::get`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: String,
    /// Empty when the ticket has no milestone.
    #[serde(default)]
    pub milestone: String,
}

impl Ticket {
    /// Create an open ticket with no priority or milestone.
    #[must_use]
    pub fn new(id: impl Into<TicketId>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            status: Status::New,
            priority: String::new(),
            milestone: String::new(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<Status>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    #[must_use]
    pub fn with_milestone(mut self, milestone: impl Into<String>) -> Self {
        self.milestone = milestone.into();
        self
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.status.is_closed()
    }

    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.priority == CRITICAL_PRIORITY
    }
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// A blocking link: `blocking` must be resolved before `blocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub blocking: TicketId,
    pub blocked: TicketId,
}

impl Link {
    #[must_use]
    pub fn new(blocking: impl Into<TicketId>, blocked: impl Into<TicketId>) -> Self {
        Self {
            blocking: blocking.into(),
            blocked: blocked.into(),
        }
    }
}
