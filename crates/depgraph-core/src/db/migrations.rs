//! Schema versioning for the ticket store.
//!
//! `PRAGMA user_version` records the layout a file was written with: `0` is
//! a file nobody has initialized, [`SCHEMA_VERSION`] is the layout this
//! build reads. Upgrades are applied by writers only ([`upgrade`]); readers
//! call [`require_current`] and never touch the schema.

use anyhow::{Context as _, Result, bail};
use rusqlite::Connection;
use tracing::info;

use super::schema;

/// Layout version this build reads and writes.
pub const SCHEMA_VERSION: i64 = 1;

/// Layout scripts; entry `n` moves a file from version `n` to `n + 1`.
const LAYOUTS: &[&str] = &[schema::LAYOUT_V1];

/// What [`upgrade`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upgrade {
    /// Already at [`SCHEMA_VERSION`]; no statement was run.
    Current,
    /// Layouts after `from` were applied.
    Applied { from: i64 },
}

/// The file's `user_version`.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .context("read schema version")
}

/// Bring the file up to [`SCHEMA_VERSION`] inside one transaction.
///
/// # Errors
///
/// Returns an error if the file was written by a newer build, or a layout
/// script fails (the file is then left at its old version).
pub fn upgrade(conn: &mut Connection) -> Result<Upgrade> {
    let from = schema_version(conn)?;
    if from == SCHEMA_VERSION {
        return Ok(Upgrade::Current);
    }
    let Some(pending) = usize::try_from(from).ok().and_then(|start| LAYOUTS.get(start..)) else {
        bail!("ticket database schema v{from} is not supported by this build (v{SCHEMA_VERSION})");
    };

    let tx = conn.transaction().context("begin schema upgrade")?;
    for (step, sql) in (from + 1..).zip(pending) {
        tx.execute_batch(sql)
            .with_context(|| format!("apply schema v{step}"))?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)
        .context("record schema version")?;
    tx.commit().context("commit schema upgrade")?;

    info!(from, to = SCHEMA_VERSION, "upgraded ticket database schema");
    Ok(Upgrade::Applied { from })
}

/// Fail unless the file is exactly at [`SCHEMA_VERSION`].
///
/// # Errors
///
/// Returns an error naming the found version otherwise.
pub fn require_current(conn: &Connection) -> Result<()> {
    match schema_version(conn)? {
        SCHEMA_VERSION => Ok(()),
        0 => bail!("ticket database is not initialized; run `dg init`"),
        found if found < SCHEMA_VERSION => {
            bail!("ticket database schema v{found} is out of date; run `dg init` to upgrade")
        }
        found => bail!("ticket database schema v{found} is newer than this build (v{SCHEMA_VERSION})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objects(conn: &Connection) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    #[test]
    fn fresh_file_gets_the_full_layout() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;

        assert_eq!(upgrade(&mut conn)?, Upgrade::Applied { from: 0 });
        assert_eq!(schema_version(&conn)?, SCHEMA_VERSION);
        assert_eq!(
            objects(&conn)?,
            ["idx_ticket_links_dest", "idx_tickets_milestone", "ticket_links", "tickets"]
        );
        Ok(())
    }

    #[test]
    fn current_file_runs_no_ddl() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        assert_eq!(upgrade(&mut conn)?, Upgrade::Current);
        assert!(objects(&conn)?.is_empty());
        Ok(())
    }

    #[test]
    fn newer_file_is_refused_untouched() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 3)?;

        let err = upgrade(&mut conn).expect_err("newer schema");
        assert!(err.to_string().contains("not supported"), "{err}");
        assert_eq!(schema_version(&conn)?, SCHEMA_VERSION + 3);
        assert!(objects(&conn)?.is_empty());
        Ok(())
    }

    #[test]
    fn failed_layout_keeps_the_old_version() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch("CREATE TABLE tickets (id INTEGER PRIMARY KEY)")?;

        assert!(upgrade(&mut conn).is_err());
        assert_eq!(schema_version(&conn)?, 0);
        assert_eq!(objects(&conn)?, ["tickets"]);
        Ok(())
    }

    #[test]
    fn readers_need_the_current_layout() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        let err = require_current(&conn).expect_err("uninitialized");
        assert!(err.to_string().contains("dg init"), "{err}");

        upgrade(&mut conn)?;
        require_current(&conn)?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)?;
        assert!(require_current(&conn).is_err());
        Ok(())
    }

    #[test]
    fn self_links_are_rejected() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        upgrade(&mut conn)?;

        let result = conn.execute(
            "INSERT INTO ticket_links (source, dest) VALUES (?1, ?1)",
            [4_i64],
        );
        assert!(result.is_err());
        Ok(())
    }
}
