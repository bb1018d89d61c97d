use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

use crate::models::{Status, Task, TimeTag};
use crate::utils::create_private_dir;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    Directory(String),
}

const SELECT_TASK_COLUMNS: &str =
    "SELECT id, title, category, detail, status, time_tag, due_date, created_at, updated_at FROM todos";

/// Status rank first, newest first within a rank. Unknown statuses sort last.
const ORDER_BY_STATUS_RANK: &str = " ORDER BY
    CASE status
        WHEN 'in_progress' THEN 1
        WHEN 'pending' THEN 2
        WHEN 'done' THEN 3
        WHEN 'closed' THEN 4
        ELSE 5
    END,
    created_at DESC,
    id DESC";

/// Declared column types that mean a timestamp is stored as calendar text
const LEGACY_TIMESTAMP_TYPES: &str = "'DATETIME', 'TIMESTAMP', 'DATE', 'TEXT'";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` and bring its schema up to date
    pub fn new(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                create_private_dir(parent)
                    .map_err(|e| DatabaseError::Directory(format!("{}: {}", parent.display(), e)))?;
            }
        }

        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// In-memory database with the same schema, used by tests
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.migrate_legacy_timestamps()?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS todos (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       TEXT NOT NULL,
                category    TEXT DEFAULT '',
                detail      TEXT DEFAULT '',
                status      TEXT DEFAULT 'pending',
                time_tag    TEXT DEFAULT '',
                due_date    INTEGER,
                created_at  INTEGER,
                updated_at  INTEGER
            )",
            [],
        )?;

        self.migrate_add_time_tag()?;

        Ok(())
    }

    /// Rewrite a `todos` table that stores calendar-text timestamps into
    /// integer epoch seconds. Detection, copy and swap share one transaction.
    fn migrate_legacy_timestamps(&self) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;

        let legacy_columns: i64 = tx.query_row(
            &format!(
                "SELECT COUNT(*) FROM pragma_table_info('todos')
                 WHERE name IN ('created_at', 'updated_at', 'due_date')
                 AND upper(type) IN ({})",
                LEGACY_TIMESTAMP_TYPES
            ),
            [],
            |row| row.get(0),
        )?;
        if legacy_columns == 0 {
            return Ok(());
        }

        let has_time_tag = column_exists(&tx, "todos", "time_tag")?;
        tracing::info!(has_time_tag, "migrating todos table to epoch-second timestamps");

        tx.execute("DROP TABLE IF EXISTS todos_new", [])?;
        tx.execute(
            "CREATE TABLE todos_new (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       TEXT NOT NULL,
                category    TEXT DEFAULT '',
                detail      TEXT DEFAULT '',
                status      TEXT DEFAULT 'pending',
                time_tag    TEXT DEFAULT '',
                due_date    INTEGER,
                created_at  INTEGER,
                updated_at  INTEGER
            )",
            [],
        )?;

        let time_tag_expr = if has_time_tag {
            "COALESCE(time_tag, '')"
        } else {
            "''"
        };
        let copied = tx.execute(
            &format!(
                "INSERT INTO todos_new (id, title, category, detail, status, time_tag, due_date, created_at, updated_at)
                 SELECT id, title, COALESCE(category, ''), COALESCE(detail, ''), COALESCE(status, 'pending'), {time_tag},
                    CAST(strftime('%s', due_date) AS INTEGER),
                    created,
                    MAX(COALESCE(CAST(strftime('%s', updated_at) AS INTEGER), created), created)
                 FROM (
                    SELECT *, COALESCE(CAST(strftime('%s', created_at) AS INTEGER), ?1) AS created
                    FROM todos
                 )",
                time_tag = time_tag_expr
            ),
            rusqlite::params![Utc::now().timestamp()],
        )?;

        // Dropping the old table also drops its AUTOINCREMENT high-water mark
        let high_water = sequence_high_water(&tx, "todos")?;

        tx.execute("DROP TABLE todos", [])?;
        tx.execute("ALTER TABLE todos_new RENAME TO todos", [])?;

        if let Some(seq) = high_water {
            let updated = tx.execute(
                "UPDATE sqlite_sequence SET seq = MAX(seq, ?1) WHERE name = 'todos'",
                rusqlite::params![seq],
            )?;
            if updated == 0 {
                tx.execute(
                    "INSERT INTO sqlite_sequence (name, seq) VALUES ('todos', ?1)",
                    rusqlite::params![seq],
                )?;
            }
        }
        tx.commit()?;

        tracing::info!(rows = copied, "timestamp migration complete");
        Ok(())
    }

    /// Add `time_tag` to tables created before the column existed
    fn migrate_add_time_tag(&self) -> Result<(), DatabaseError> {
        if column_exists(&self.conn, "todos", "time_tag")? {
            return Ok(());
        }

        match self
            .conn
            .execute("ALTER TABLE todos ADD COLUMN time_tag TEXT DEFAULT ''", [])
        {
            Ok(_) => {
                tracing::info!("added time_tag column to todos");
                Ok(())
            }
            Err(e) if e.to_string().contains("duplicate column name") => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Insert a pending task with the given tag and return it with its new id
    pub fn create_task(&self, title: &str, time_tag: TimeTag) -> Result<Task, DatabaseError> {
        let now = now_seconds();
        self.conn.execute(
            "INSERT INTO todos (title, status, time_tag, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![title, Status::Pending, time_tag, now.timestamp(), now.timestamp()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, time_tag = %time_tag, "created task");

        Ok(Task {
            id,
            title: title.to_string(),
            category: String::new(),
            detail: String::new(),
            status: Status::Pending,
            time_tag,
            due_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a single task by ID
    pub fn get_task(&self, id: i64) -> Result<Task, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE id = ?1", SELECT_TASK_COLUMNS))?;
        stmt.query_row(rusqlite::params![id], Self::row_to_task)
            .map_err(DatabaseError::from)
    }

    /// Overwrite the editable fields of an existing task.
    /// On success the caller's `updated_at` is refreshed.
    pub fn update_task(&self, task: &mut Task) -> Result<(), DatabaseError> {
        let now = now_seconds().max(task.created_at);
        let due_date = task.due_date.map(|d| d.timestamp());

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE todos SET title = ?1, category = ?2, detail = ?3, status = ?4,
             time_tag = ?5, due_date = ?6, updated_at = ?7 WHERE id = ?8",
            rusqlite::params![
                task.title,
                task.category,
                task.detail,
                task.status,
                task.time_tag,
                due_date,
                now.timestamp(),
                task.id
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
        }
        tx.commit()?;

        task.updated_at = now;
        tracing::debug!(id = task.id, status = %task.status, "updated task");
        Ok(())
    }

    /// Delete a task by ID. Unknown IDs are not an error.
    pub fn delete_task(&self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM todos WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        tracing::debug!(id, removed, "deleted task");
        Ok(())
    }

    /// Tasks carrying `time_tag`, or every task when the tag is empty,
    /// ordered by status rank then newest first.
    /// Rows whose values cannot be read are skipped and logged.
    pub fn list_filtered(&self, time_tag: TimeTag) -> Result<Vec<Task>, DatabaseError> {
        if time_tag == TimeTag::None {
            let mut stmt = self
                .conn
                .prepare(&format!("{}{}", SELECT_TASK_COLUMNS, ORDER_BY_STATUS_RANK))?;
            let rows = stmt.query_map([], Self::row_to_task)?;
            return collect_readable(rows);
        }

        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE time_tag = ?1{}",
            SELECT_TASK_COLUMNS, ORDER_BY_STATUS_RANK
        ))?;
        let rows = stmt.query_map(rusqlite::params![time_tag], Self::row_to_task)?;
        collect_readable(rows)
    }

    /// Helper function to map a row to a Task
    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        let due_date: Option<i64> = row.get(6)?;
        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            category: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            detail: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            status: row.get(4)?,
            time_tag: row.get(5)?,
            due_date: due_date.map(|secs| from_epoch(6, secs)).transpose()?,
            created_at: from_epoch(7, row.get::<_, Option<i64>>(7)?.unwrap_or(0))?,
            updated_at: from_epoch(8, row.get::<_, Option<i64>>(8)?.unwrap_or(0))?,
        })
    }
}

/// Collect mapped rows, dropping the ones holding values outside the
/// known enums or timestamp range. Any other error aborts the listing.
fn collect_readable(
    rows: impl Iterator<Item = rusqlite::Result<Task>>,
) -> Result<Vec<Task>, DatabaseError> {
    let mut tasks = Vec::new();
    for row in rows {
        match row {
            Ok(task) => tasks.push(task),
            Err(e @ rusqlite::Error::FromSqlConversionFailure(..))
            | Err(e @ rusqlite::Error::IntegralValueOutOfRange(..)) => {
                tracing::warn!(error = %e, "skipping unreadable task row");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(tasks)
}

/// Check whether `table` already has `column`
fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        rusqlite::params![table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Last id handed out for `table`, if SQLite has recorded one
fn sequence_high_water(conn: &Connection, table: &str) -> Result<Option<i64>, DatabaseError> {
    let has_sequence: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'",
        [],
        |row| row.get(0),
    )?;
    if has_sequence == 0 {
        return Ok(None);
    }

    let seq = conn
        .query_row(
            "SELECT seq FROM sqlite_sequence WHERE name = ?1",
            rusqlite::params![table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(seq)
}

/// Current time truncated to whole seconds, matching what the table stores
fn now_seconds() -> DateTime<Utc> {
    let secs = Utc::now().timestamp();
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn from_epoch(column: usize, secs: i64) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(column, secs)
    })
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Status::Pending),
            other => other
                .as_str()?
                .parse()
                .map_err(|e| FromSqlError::Other(Box::new(e))),
        }
    }
}

impl ToSql for TimeTag {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TimeTag {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(TimeTag::None),
            other => other
                .as_str()?
                .parse()
                .map_err(|e| FromSqlError::Other(Box::new(e))),
        }
    }
}
