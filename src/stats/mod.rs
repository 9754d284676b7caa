use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

pub mod models;
use models::*;

/// Immutable, in-memory copy of one precomputed statistics table.
#[derive(Debug, Clone)]
pub struct StatsTable<R> {
    rows: Vec<R>,
}

impl<R: RankedRecord> StatsTable<R> {
    pub fn new(rows: Vec<R>) -> Self {
        StatsTable { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for `team` (exact, case-sensitive), or every row when `team` is
    /// `None`, sorted by ranking metric descending. Ties keep table order.
    pub fn query(&self, team: Option<&str>) -> Vec<&R> {
        let mut hits: Vec<&R> = self
            .rows
            .iter()
            .filter(|r| team.map_or(true, |t| r.team() == t))
            .collect();
        hits.sort_by(|a, b| b.ranking_metric().cmp(&a.ranking_metric()));
        hits
    }
}

/// Both player statistics tables, loaded once at startup.
#[derive(Debug, Clone)]
pub struct StatsStore {
    pub batting: StatsTable<BattingRecord>,
    pub bowling: StatsTable<BowlingRecord>,
}

impl StatsStore {
    /// Read both tables from the SQLite file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("Failed to open stats database {}", path.display()))?;
        Self::from_connection(&conn)
    }

    pub fn from_connection(conn: &Connection) -> Result<Self> {
        let batting = load_batting(conn).context("Failed to load batting_stats")?;
        let bowling = load_bowling(conn).context("Failed to load bowling_stats")?;
        Ok(StatsStore {
            batting: StatsTable::new(batting),
            bowling: StatsTable::new(bowling),
        })
    }
}

// ── SQL helpers ────────────────────────────────────────────────────────────────

fn load_batting(conn: &Connection) -> rusqlite::Result<Vec<BattingRecord>> {
    let mut stmt = conn.prepare(
        "SELECT player, team, total_runs, avg_runs, avg_strikerate,
                total_4s, total_6s, innings_count
         FROM batting_stats ORDER BY rowid",
    )?;
    let rows = stmt
        .query_map([], map_batting)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn load_bowling(conn: &Connection) -> rusqlite::Result<Vec<BowlingRecord>> {
    let mut stmt = conn.prepare(
        "SELECT player, team, total_wicket, total_runs1, avg_runrate,
                total_overs, total_maiden, matches
         FROM bowling_stats ORDER BY rowid",
    )?;
    let rows = stmt
        .query_map([], map_bowling)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn map_batting(row: &rusqlite::Row) -> rusqlite::Result<BattingRecord> {
    Ok(BattingRecord {
        player: row.get(0)?,
        team: row.get(1)?,
        total_runs: row.get(2)?,
        avg_runs: row.get(3)?,
        avg_strikerate: row.get(4)?,
        total_4s: row.get(5)?,
        total_6s: row.get(6)?,
        innings_count: row.get(7)?,
    })
}

fn map_bowling(row: &rusqlite::Row) -> rusqlite::Result<BowlingRecord> {
    Ok(BowlingRecord {
        player: row.get(0)?,
        team: row.get(1)?,
        total_wicket: row.get(2)?,
        total_runs1: row.get(3)?,
        avg_runrate: row.get(4)?,
        total_overs: row.get(5)?,
        total_maiden: row.get(6)?,
        matches: row.get(7)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rusqlite::params;

    /// Layout the loader expects, as produced by the stats export.
    const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS batting_stats (
    player         TEXT    NOT NULL,
    team           TEXT    NOT NULL,
    total_runs     INTEGER NOT NULL,
    avg_runs       REAL,
    avg_strikerate REAL,
    total_4s       INTEGER NOT NULL,
    total_6s       INTEGER NOT NULL,
    innings_count  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS bowling_stats (
    player       TEXT    NOT NULL,
    team         TEXT    NOT NULL,
    total_wicket INTEGER NOT NULL,
    total_runs1  INTEGER NOT NULL,
    avg_runrate  REAL,
    total_overs  REAL    NOT NULL,
    total_maiden INTEGER NOT NULL,
    matches      INTEGER NOT NULL
);
"#;

    pub(crate) fn batting(player: &str, team: &str, runs: i64) -> BattingRecord {
        BattingRecord {
            player: player.into(),
            team: team.into(),
            total_runs: runs,
            avg_runs: Some(runs as f64 / 10.0),
            avg_strikerate: Some(88.5),
            total_4s: 4,
            total_6s: 1,
            innings_count: 10,
        }
    }

    pub(crate) fn bowling(player: &str, team: &str, wickets: i64) -> BowlingRecord {
        BowlingRecord {
            player: player.into(),
            team: team.into(),
            total_wicket: wickets,
            total_runs1: wickets * 25,
            avg_runrate: Some(5.1),
            total_overs: 40.2,
            total_maiden: 2,
            matches: 8,
        }
    }

    fn names<R>(rows: &[&R], name: impl Fn(&R) -> &str) -> Vec<String> {
        rows.iter().map(|r| name(r).to_string()).collect()
    }

    #[test]
    fn unfiltered_query_sorts_descending_with_stable_ties() {
        let table = StatsTable::new(vec![
            batting("A", "England", 50),
            batting("B", "India", 90),
            batting("C", "Australia", 90),
        ]);
        let rows = table.query(None);
        assert_eq!(rows.len(), table.len());
        assert_eq!(names(&rows, |r| r.player.as_str()), ["B", "C", "A"]);
    }

    #[test]
    fn team_filter_is_exact_and_case_sensitive() {
        let table = StatsTable::new(vec![
            batting("A", "India", 10),
            batting("B", "England", 30),
            batting("C", "India", 20),
        ]);
        assert_eq!(names(&table.query(Some("India")), |r| r.player.as_str()), ["C", "A"]);
        assert!(table.query(Some("india")).is_empty());
    }

    #[test]
    fn unknown_team_yields_empty_result() {
        let table = StatsTable::new(vec![batting("A", "England", 10)]);
        assert!(table.query(Some("India")).is_empty());
    }

    #[test]
    fn query_leaves_table_untouched() {
        let table = StatsTable::new(vec![batting("A", "England", 1), batting("B", "England", 2)]);
        let _ = table.query(None);
        assert_eq!(table.rows[0].player, "A");
    }

    #[test]
    fn bowling_ranks_by_wickets() {
        let table = StatsTable::new(vec![
            bowling("X", "Pakistan", 12),
            bowling("Y", "Pakistan", 30),
            bowling("Z", "India", 18),
        ]);
        assert_eq!(names(&table.query(None), |r| r.player.as_str()), ["Y", "Z", "X"]);
    }

    #[test]
    fn loads_tables_in_rowid_order() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA_SQL).unwrap();
        for (player, team, runs) in [("Kohli", "India", 765), ("Head", "Australia", 765)] {
            conn.execute(
                "INSERT INTO batting_stats VALUES (?1, ?2, ?3, NULL, 90.3, 60, 9, 11)",
                params![player, team, runs],
            )
            .unwrap();
        }
        conn.execute(
            "INSERT INTO bowling_stats VALUES ('Shami', 'India', 24, 257, 5.26, 48.5, 1, 7)",
            [],
        )
        .unwrap();

        let store = StatsStore::from_connection(&conn).unwrap();
        assert_eq!(store.batting.len(), 2);
        assert_eq!(store.bowling.len(), 1);

        let rows = store.batting.query(None);
        assert_eq!(names(&rows, |r| r.player.as_str()), ["Kohli", "Head"]);
        assert_eq!(rows[0].avg_runs, None);
        assert_eq!(store.bowling.query(Some("India"))[0].total_wicket, 24);
    }

    #[test]
    fn missing_table_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(StatsStore::from_connection(&conn).is_err());
    }
}
