//! SQLite-backed ticket store.
//!
//! Writable connections ([`SqliteStore::open`]) use:
//! - `journal_mode = WAL` so renders can read while an import writes
//! - `busy_timeout = 5s` to ride out short lock contention
//! - `foreign_keys = ON`
//!
//! Read-only connections ([`SqliteStore::open_read_only`]) only set the busy
//! timeout and check the schema version; they never write to the file.

pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::{path::Path, time::Duration};
use tracing::debug;

use crate::model::{Link, Ticket, TicketId};
use crate::store::{LinkStore, TicketStore};

/// Busy timeout used for ticket store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Ticket and link store over a SQLite database.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, apply runtime pragmas and
    /// migrate the schema to the latest version.
    ///
    /// # Errors
    ///
    /// Returns an error if opening, configuring or migrating the database fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create database directory {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("open ticket database {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// In-memory database, mostly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory ticket database")?;
        Self::from_connection(conn)
    }

    /// Open an existing database for reading only.
    ///
    /// No pragma that writes, and no schema change, is issued; the file must
    /// already be at [`migrations::SCHEMA_VERSION`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its schema version
    /// is not the current one.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("open ticket database {} read-only", path.display()))?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)
            .context("set busy timeout")?;
        migrations::require_current(&conn)
            .with_context(|| format!("check ticket database {}", path.display()))?;
        debug!(path = %path.display(), "ticket store opened read-only");
        Ok(Self { conn })
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        configure_connection(&conn).context("configure sqlite pragmas")?;
        let upgrade = migrations::upgrade(&mut conn).context("upgrade ticket store schema")?;
        debug!(?upgrade, "ticket store ready");
        Ok(Self { conn })
    }

    /// Schema version recorded in the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be read.
    pub fn schema_version(&self) -> Result<i64> {
        migrations::schema_version(&self.conn)
    }

    /// Insert a ticket, replacing any existing row with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_ticket(&self, ticket: &Ticket) -> Result<()> {
        upsert_ticket(&self.conn, ticket)
    }

    /// Record a blocking link. Duplicate links are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (including a ticket blocking itself).
    pub fn add_link(&self, link: Link) -> Result<()> {
        add_link(&self.conn, link)
    }

    /// Write tickets and links in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is committed in that case.
    pub fn import(&mut self, tickets: &[Ticket], links: &[Link]) -> Result<()> {
        let tx = self.conn.transaction().context("begin import transaction")?;
        for ticket in tickets {
            upsert_ticket(&tx, ticket)?;
        }
        for link in links {
            add_link(&tx, *link)?;
        }
        tx.commit().context("commit import")?;
        debug!(tickets = tickets.len(), links = links.len(), "imported");
        Ok(())
    }

    /// Number of stored tickets.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn ticket_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))
            .context("count tickets")?;
        usize::try_from(count).context("ticket count out of range")
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

fn upsert_ticket(conn: &Connection, ticket: &Ticket) -> Result<()> {
    conn.execute(
        "INSERT INTO tickets (id, summary, status, priority, milestone)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            summary = excluded.summary,
            status = excluded.status,
            priority = excluded.priority,
            milestone = excluded.milestone",
        params![
            ticket.id.get(),
            ticket.summary,
            ticket.status.as_str(),
            ticket.priority,
            ticket.milestone
        ],
    )
    .with_context(|| format!("upsert ticket #{}", ticket.id))?;
    Ok(())
}

fn add_link(conn: &Connection, link: Link) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO ticket_links (source, dest) VALUES (?1, ?2)",
        params![link.blocking.get(), link.blocked.get()],
    )
    .with_context(|| format!("add link #{} -> #{}", link.blocking, link.blocked))?;
    Ok(())
}

impl TicketStore for SqliteStore {
    fn get(&self, id: TicketId) -> Result<Option<Ticket>> {
        self.conn
            .query_row(
                "SELECT id, summary, status, priority, milestone FROM tickets WHERE id = ?1",
                params![id.get()],
                |row| {
                    Ok(Ticket {
                        id: TicketId::new(row.get(0)?),
                        summary: row.get(1)?,
                        status: row.get::<_, String>(2)?.into(),
                        priority: row.get(3)?,
                        milestone: row.get(4)?,
                    })
                },
            )
            .optional()
            .with_context(|| format!("get ticket #{id}"))
    }
}

impl LinkStore for SqliteStore {
    fn all_links(&self) -> Result<Vec<Link>> {
        let mut stmt = self
            .conn
            .prepare("SELECT source, dest FROM ticket_links ORDER BY rowid")
            .context("prepare all_links query")?;

        let links = stmt
            .query_map([], |row| {
                Ok(Link::new(
                    TicketId::new(row.get(0)?),
                    TicketId::new(row.get(1)?),
                ))
            })
            .context("execute all_links query")?
            .collect::<Result<Vec<_>, _>>()
            .context("collect links")?;

        Ok(links)
    }
}
