use rusqlite::{params, Connection};

use super::paths::get_styledesk_dir;
use super::remote::{fetch_compact_index, CompactStyle};

// ── Compact index cache (~/.styledesk/index.db) ──────────────────────────────
//
// A local SQLite copy of the platform's compact style index, so search works
// offline and stays fast between refreshes.  A refresh replaces the whole
// table; rows are never updated in place.

pub fn open_index_db() -> Result<Connection, String> {
    let dir = get_styledesk_dir()?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    }
    let conn = Connection::open(dir.join("index.db")).map_err(|e| e.to_string())?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS styles (
            id              INTEGER PRIMARY KEY,
            name            TEXT NOT NULL,
            username        TEXT NOT NULL,
            preview         TEXT NOT NULL DEFAULT '',
            category        TEXT NOT NULL DEFAULT '',
            updated_at      INTEGER NOT NULL DEFAULT 0,
            total_installs  INTEGER NOT NULL DEFAULT 0,
            weekly_installs INTEGER NOT NULL DEFAULT 0,
            rating          REAL NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_styles_weekly ON styles (weekly_installs DESC);",
    )
    .map_err(|e| e.to_string())
}

/// Replace the entire cached index in one transaction.  Returns the number
/// of rows written.
pub fn refresh_index(conn: &mut Connection, entries: &[CompactStyle]) -> Result<usize, String> {
    let tx = conn.transaction().map_err(|e| e.to_string())?;
    tx.execute("DELETE FROM styles", []).map_err(|e| e.to_string())?;
    {
        let mut stmt = tx
            .prepare(
                "INSERT OR REPLACE INTO styles
                 (id, name, username, preview, category, updated_at, total_installs, weekly_installs, rating)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )
            .map_err(|e| e.to_string())?;
        for entry in entries {
            stmt.execute(params![
                entry.id,
                entry.name,
                entry.username,
                entry.preview,
                entry.category,
                entry.updated_at,
                entry.total_installs,
                entry.weekly_installs,
                entry.rating,
            ])
            .map_err(|e| e.to_string())?;
        }
    }
    tx.commit().map_err(|e| e.to_string())?;
    Ok(entries.len())
}

/// Case-insensitive search over name, author and category, busiest styles
/// first.  An empty query returns the top of the index.
pub fn search_index(
    conn: &Connection,
    query: &str,
    limit: u32,
) -> Result<Vec<CompactStyle>, String> {
    let pattern = format!("%{}%", query.trim());
    let mut stmt = conn
        .prepare(
            "SELECT id, name, username, preview, category, updated_at, total_installs, weekly_installs, rating
             FROM styles
             WHERE name LIKE ?1 OR username LIKE ?1 OR category LIKE ?1
             ORDER BY weekly_installs DESC, total_installs DESC
             LIMIT ?2",
        )
        .map_err(|e| e.to_string())?;

    let rows = stmt
        .query_map(params![pattern, limit], |row| {
            Ok(CompactStyle {
                id: row.get(0)?,
                name: row.get(1)?,
                username: row.get(2)?,
                preview: row.get(3)?,
                category: row.get(4)?,
                updated_at: row.get(5)?,
                total_installs: row.get(6)?,
                weekly_installs: row.get(7)?,
                rating: row.get(8)?,
            })
        })
        .map_err(|e| e.to_string())?;

    rows.collect::<Result<Vec<_>, _>>().map_err(|e| e.to_string())
}

pub fn index_len(conn: &Connection) -> Result<i64, String> {
    conn.query_row("SELECT COUNT(*) FROM styles", [], |row| row.get(0))
        .map_err(|e| e.to_string())
}

/// Fetch the compact index from the platform and replace the local cache.
pub async fn refresh_cached_index() -> Result<usize, String> {
    let entries = fetch_compact_index().await?;
    let mut conn = open_index_db()?;
    refresh_index(&mut conn, &entries)
}

// ── Tests ────────────────────────────────────────────────────────────────────
