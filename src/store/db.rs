use crate::models::checklist::ChecklistItem;
use crate::models::day_score::DayScore;
use crate::models::journal::JournalEntry;
use crate::models::profile::UserProfile;
use crate::models::session::SleepSession;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

const DB_SCHEMA_VERSION: i64 = 3;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version < 2 {
        apply_migration_2(conn)?;
        version = 2;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version < 3 {
        apply_migration_3(conn)?;
        version = 3;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        // Future schema; do not fail reads/writes for forward-compatible changes.
        conn.pragma_update(None, "user_version", version)?;
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sleep_sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT
        );

        CREATE TABLE IF NOT EXISTS checklist_items (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            rule_name TEXT NOT NULL,
            checked INTEGER NOT NULL DEFAULT 0,
            date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS journal_entries (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS user_profiles (
            user_id TEXT PRIMARY KEY,
            birthdate TEXT
        );
        ",
    )
}

fn apply_migration_2(conn: &Connection) -> Result<()> {
    // Sessions originally derived duration from the timestamps only;
    // imported records carry a stored duration instead.
    add_column_if_missing(conn, "sleep_sessions", "duration_hours REAL")?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS widget_toggles (
            user_id TEXT NOT NULL,
            widget TEXT NOT NULL,
            enabled INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, widget)
        );

        CREATE TABLE IF NOT EXISTS day_scores (
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,
            sleep_score REAL NOT NULL DEFAULT 0,
            bedroom_score REAL NOT NULL DEFAULT 0,
            journal_presence REAL NOT NULL DEFAULT 0,
            composite INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, date)
        );
        ",
    )
}

fn apply_migration_3(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_sleep_sessions_user_end ON sleep_sessions(user_id, end_time);
        CREATE INDEX IF NOT EXISTS idx_checklist_items_user_date ON checklist_items(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_journal_entries_user_date ON journal_entries(user_id, date);
        ",
    )
}

fn add_column_if_missing(conn: &Connection, table: &str, column_def: &str) -> Result<()> {
    let column_name = column_def
        .split_whitespace()
        .next()
        .unwrap_or(column_def)
        .to_string();

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let exists = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .filter_map(|res| res.ok())
        .any(|name| name == column_name);

    if !exists {
        conn.execute(&format!("ALTER TABLE {table} ADD COLUMN {column_def}"), [])?;
    }

    Ok(())
}

/// Open (or create) the store under the app data directory.
pub fn open_store(data_dir: &Path) -> crate::Result<Connection> {
    std::fs::create_dir_all(data_dir)?;
    let conn = Connection::open(data_dir.join("sleeplens.db"))?;
    initialize_schema(&conn)?;
    log::debug!("opened store at {}", data_dir.display());
    Ok(conn)
}

fn row_uuid(row: &Row, idx: usize) -> Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// --- sleep sessions ---

/// Start a sleep timer: insert an open session.
pub fn start_session(
    conn: &Connection,
    user_id: &str,
    start_time: DateTime<Utc>,
) -> Result<SleepSession> {
    let session = SleepSession {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        start_time,
        end_time: None,
        duration_hours: None,
    };

    conn.execute(
        "INSERT INTO sleep_sessions (id, user_id, start_time, end_time, duration_hours) VALUES (?1, ?2, ?3, NULL, NULL)",
        params![session.id.to_string(), session.user_id, session.start_time],
    )?;

    Ok(session)
}

/// Stop the timer: close the most recently started open session and store
/// the derived duration. Returns `None` when no session is open.
pub fn finish_session(
    conn: &Connection,
    user_id: &str,
    end_time: DateTime<Utc>,
) -> Result<Option<SleepSession>> {
    let open: Option<(Uuid, DateTime<Utc>)> = conn
        .query_row(
            "SELECT id, start_time FROM sleep_sessions WHERE user_id = ?1 AND end_time IS NULL ORDER BY start_time DESC LIMIT 1",
            params![user_id],
            |row| Ok((row_uuid(row, 0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((id, start_time)) = open else {
        return Ok(None);
    };

    let duration_hours = ((end_time - start_time).num_seconds() as f64 / 3600.0).max(0.0);
    conn.execute(
        "UPDATE sleep_sessions SET end_time = ?2, duration_hours = ?3 WHERE id = ?1",
        params![id.to_string(), end_time, duration_hours],
    )?;

    Ok(Some(SleepSession {
        id,
        user_id: user_id.to_string(),
        start_time,
        end_time: Some(end_time),
        duration_hours: Some(duration_hours),
    }))
}

/// Insert a complete session record, e.g. one imported from a wearable.
pub fn insert_session(conn: &Connection, session: &SleepSession) -> Result<()> {
    conn.execute(
        "INSERT INTO sleep_sessions (id, user_id, start_time, end_time, duration_hours) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            session.id.to_string(),
            session.user_id,
            session.start_time,
            session.end_time,
            session.duration_hours,
        ],
    )?;
    Ok(())
}

/// Completed sessions whose end date falls inside the inclusive range.
pub fn sessions_in_range(
    conn: &Connection,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SleepSession>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, start_time, end_time, duration_hours FROM sleep_sessions WHERE user_id = ?1 AND end_time IS NOT NULL ORDER BY end_time ASC",
    )?;

    let sessions = stmt
        .query_map(params![user_id], |row| {
            Ok(SleepSession {
                id: row_uuid(row, 0)?,
                user_id: row.get(1)?,
                start_time: row.get(2)?,
                end_time: row.get(3)?,
                duration_hours: row.get(4)?,
            })
        })?
        .filter_map(|r| r.ok())
        .filter(|s| {
            s.end_date()
                .map(|d| d >= start && d <= end)
                .unwrap_or(false)
        })
        .collect();

    Ok(sessions)
}

// --- bedroom checklist ---

/// Seed the default rules for one user and day. Idempotent: rules already
/// present for that day are left untouched.
pub fn seed_checklist(
    conn: &Connection,
    user_id: &str,
    date: NaiveDate,
    rules: &[String],
) -> Result<usize> {
    let mut inserted = 0;
    for rule in rules {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM checklist_items WHERE user_id = ?1 AND date = ?2 AND rule_name = ?3)",
            params![user_id, date, rule],
            |row| row.get(0),
        )?;

        if !exists {
            conn.execute(
                "INSERT INTO checklist_items (id, user_id, rule_name, checked, date) VALUES (?1, ?2, ?3, 0, ?4)",
                params![Uuid::new_v4().to_string(), user_id, rule, date],
            )?;
            inserted += 1;
        }
    }
    Ok(inserted)
}

/// Append a custom rule after the seeded defaults.
pub fn add_checklist_item(
    conn: &Connection,
    user_id: &str,
    date: NaiveDate,
    rule_name: &str,
) -> Result<ChecklistItem> {
    let item = ChecklistItem {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        rule_name: rule_name.to_string(),
        checked: false,
        date,
    };

    conn.execute(
        "INSERT INTO checklist_items (id, user_id, rule_name, checked, date) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![item.id.to_string(), item.user_id, item.rule_name, item.checked, item.date],
    )?;

    Ok(item)
}

/// Toggle one rule; returns false when the id is unknown.
pub fn set_checklist_checked(conn: &Connection, id: Uuid, checked: bool) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE checklist_items SET checked = ?2 WHERE id = ?1",
        params![id.to_string(), checked],
    )?;
    Ok(changed > 0)
}

pub fn checklist_in_range(
    conn: &Connection,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ChecklistItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, rule_name, checked, date FROM checklist_items WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY date ASC",
    )?;

    let items = stmt
        .query_map(params![user_id, start, end], |row| {
            Ok(ChecklistItem {
                id: row_uuid(row, 0)?,
                user_id: row.get(1)?,
                rule_name: row.get(2)?,
                checked: row.get(3)?,
                date: row.get(4)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(items)
}

// --- journal ---

pub fn add_journal_entry(
    conn: &Connection,
    user_id: &str,
    date: NaiveDate,
    content: &str,
) -> Result<JournalEntry> {
    let entry = JournalEntry {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        date,
        content: content.to_string(),
    };

    conn.execute(
        "INSERT INTO journal_entries (id, user_id, date, content) VALUES (?1, ?2, ?3, ?4)",
        params![entry.id.to_string(), entry.user_id, entry.date, entry.content],
    )?;

    Ok(entry)
}

pub fn journal_in_range(
    conn: &Connection,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<JournalEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, date, content FROM journal_entries WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY date ASC",
    )?;

    let entries = stmt
        .query_map(params![user_id, start, end], |row| {
            Ok(JournalEntry {
                id: row_uuid(row, 0)?,
                user_id: row.get(1)?,
                date: row.get(2)?,
                content: row.get(3)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(entries)
}

// --- profile ---

pub fn upsert_profile(conn: &Connection, profile: &UserProfile) -> Result<()> {
    conn.execute(
        "
        INSERT INTO user_profiles (user_id, birthdate) VALUES (?1, ?2)
        ON CONFLICT(user_id) DO UPDATE SET birthdate = excluded.birthdate
        ",
        params![profile.user_id, profile.birthdate],
    )?;
    Ok(())
}

pub fn load_profile(conn: &Connection, user_id: &str) -> Result<Option<UserProfile>> {
    conn.query_row(
        "SELECT user_id, birthdate FROM user_profiles WHERE user_id = ?1",
        params![user_id],
        |row| {
            Ok(UserProfile {
                user_id: row.get(0)?,
                birthdate: row.get(1)?,
            })
        },
    )
    .optional()
}

// --- day scores ---

pub fn upsert_day_scores(
    conn: &Connection,
    user_id: &str,
    days: &BTreeMap<NaiveDate, DayScore>,
) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for day in days.values() {
        upsert_day_score_with_conn(&tx, user_id, day)?;
    }
    tx.commit()
}

pub fn upsert_day_score(conn: &Connection, user_id: &str, day: &DayScore) -> Result<()> {
    upsert_day_score_with_conn(conn, user_id, day)
}

fn upsert_day_score_with_conn(conn: &Connection, user_id: &str, day: &DayScore) -> Result<()> {
    let now = Utc::now().timestamp();

    conn.execute(
        "
        INSERT INTO day_scores (
            user_id,
            date,
            sleep_score,
            bedroom_score,
            journal_presence,
            composite,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(user_id, date) DO UPDATE SET
            sleep_score = excluded.sleep_score,
            bedroom_score = excluded.bedroom_score,
            journal_presence = excluded.journal_presence,
            composite = excluded.composite,
            updated_at = excluded.updated_at
        ",
        params![
            user_id,
            day.date,
            day.sleep_score,
            day.bedroom_score,
            day.journal_presence,
            day.composite as i64,
            now,
        ],
    )?;

    Ok(())
}

pub fn load_day_scores(
    conn: &Connection,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BTreeMap<NaiveDate, DayScore>> {
    let mut stmt = conn.prepare(
        "SELECT date, sleep_score, bedroom_score, journal_presence, composite FROM day_scores WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3",
    )?;

    let days = stmt
        .query_map(params![user_id, start, end], |row| {
            Ok(DayScore {
                date: row.get(0)?,
                sleep_score: row.get(1)?,
                bedroom_score: row.get(2)?,
                journal_presence: row.get(3)?,
                composite: row.get::<_, i64>(4)?.clamp(0, 100) as u8,
            })
        })?
        .filter_map(|r| r.ok())
        .map(|day: DayScore| (day.date, day))
        .collect();

    Ok(days)
}
