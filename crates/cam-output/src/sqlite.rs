//! SQLite output backend (feature `sqlite`).
//!
//! Two tables: `segments` (one row per segment) and `segment_points` (one row
//! per sample, ordered by `seq` within a segment).

use std::path::Path;

use rusqlite::Connection;

use cam_core::AggregatedSegment;

use crate::OutputResult;
use crate::row::SegmentSummaryRow;
use crate::writer::SegmentWriter;

/// Writes segments to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    next_id:  i64,
    finished: bool,
}

impl SqliteWriter {
    /// Create `path` and initialise the schema.  An existing file is
    /// replaced.
    pub fn create(path: &Path) -> OutputResult<Self> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Initialise the schema on an already-open connection.
    pub fn from_connection(conn: Connection) -> OutputResult<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS segments (
                 segment_id         INTEGER PRIMARY KEY,
                 station_id         INTEGER NOT NULL,
                 station_type       INTEGER NOT NULL,
                 way_id             TEXT,
                 avg_speed_mps      REAL,
                 point_count        INTEGER NOT NULL,
                 first_timestamp_ms INTEGER,
                 last_timestamp_ms  INTEGER,
                 length_m           REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS segment_points (
                 segment_id   INTEGER NOT NULL REFERENCES segments(segment_id),
                 seq          INTEGER NOT NULL,
                 timestamp_ms INTEGER NOT NULL,
                 lon          REAL NOT NULL,
                 lat          REAL NOT NULL,
                 PRIMARY KEY (segment_id, seq)
             );",
        )?;

        Ok(Self { conn, next_id: 0, finished: false })
    }
}

impl SegmentWriter for SqliteWriter {
    fn write_segments(&mut self, segments: &[AggregatedSegment]) -> OutputResult<()> {
        if segments.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut seg_stmt = tx.prepare_cached(
                "INSERT INTO segments \
                 (segment_id, station_id, station_type, way_id, avg_speed_mps, \
                  point_count, first_timestamp_ms, last_timestamp_ms, length_m) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            let mut pt_stmt = tx.prepare_cached(
                "INSERT INTO segment_points (segment_id, seq, timestamp_ms, lon, lat) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for s in segments {
                let id = self.next_id;
                self.next_id += 1;

                let row = SegmentSummaryRow::from_segment(s);
                seg_stmt.execute(rusqlite::params![
                    id,
                    row.station_id,
                    row.station_type,
                    row.way_id,
                    row.avg_speed_mps,
                    row.point_count as i64,
                    row.first_timestamp_ms,
                    row.last_timestamp_ms,
                    row.length_m,
                ])?;

                for (seq, (p, ts)) in s.coordinates.iter().zip(&s.timestamps).enumerate() {
                    pt_stmt.execute(rusqlite::params![id, seq as i64, ts, p.lon, p.lat])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
