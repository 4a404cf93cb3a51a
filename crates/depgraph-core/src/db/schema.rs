//! SQLite schema for the ticket store.
//!
//! - `tickets` holds one row per ticket with the fields a render reads
//! - `ticket_links` holds the blocking relation as `(source, dest)` pairs,
//!   "source blocks dest". Links are not foreign keys: a link may outlive
//!   the ticket it points at, and the renderer reports that case.

/// Layout v1: tickets, blocking links and their lookup indexes.
pub const LAYOUT_V1: &str = r"
CREATE TABLE tickets (
    id INTEGER PRIMARY KEY,
    summary TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'new',
    priority TEXT NOT NULL DEFAULT '',
    milestone TEXT NOT NULL DEFAULT ''
);

CREATE INDEX idx_tickets_milestone ON tickets(milestone);

CREATE TABLE ticket_links (
    source INTEGER NOT NULL,
    dest INTEGER NOT NULL,
    PRIMARY KEY (source, dest),
    CHECK (source <> dest)
);

CREATE INDEX idx_ticket_links_dest ON ticket_links(dest, source);
";
