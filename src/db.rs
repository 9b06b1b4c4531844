// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::models::{Expense, Trip};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.wanderly", "Wanderly", "wanderly"));

/// Environment variable overriding the database location.
pub const DB_ENV: &str = "WANDERLY_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("wanderly.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    open_at(&db_path()?)
}

pub fn open_at(path: &std::path::Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS trips(
        id TEXT PRIMARY KEY,
        destination TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        budget TEXT NOT NULL,
        notes TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_trips_start ON trips(start_date);

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        trip_id TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        note TEXT,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(trip_id) REFERENCES trips(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_trip ON expenses(trip_id, date);
    "#,
    )?;
    Ok(())
}

fn parse_col_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid stored date '{}'", s))
}

fn parse_col_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid stored amount '{}'", s))
}

type TripCols = (String, String, String, String, String, String);

fn trip_cols(r: &Row<'_>) -> rusqlite::Result<TripCols> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

fn trip_from_cols(cols: TripCols) -> Result<Trip> {
    let (id, destination, start, end, budget, notes) = cols;
    Ok(Trip {
        start_date: parse_col_date(&start)?,
        end_date: parse_col_date(&end)?,
        budget: parse_col_decimal(&budget)
            .with_context(|| format!("Trip '{}' has a bad budget", destination))?,
        id,
        destination,
        notes,
    })
}

const TRIP_COLUMNS: &str = "id, destination, start_date, end_date, budget, notes";

/// Snapshot of every stored trip, earliest start first.
pub fn load_trips(conn: &Connection) -> Result<Vec<Trip>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRIP_COLUMNS} FROM trips ORDER BY start_date, destination"
    ))?;
    let rows = stmt.query_map([], trip_cols)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(trip_from_cols(row?)?);
    }
    Ok(out)
}

pub fn get_trip(conn: &Connection, id: &str) -> Result<Option<Trip>> {
    let cols = conn
        .query_row(
            &format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id=?1"),
            params![id],
            trip_cols,
        )
        .optional()?;
    cols.map(trip_from_cols).transpose()
}

pub fn insert_trip(conn: &Connection, trip: &Trip) -> Result<()> {
    conn.execute(
        "INSERT INTO trips(id, destination, start_date, end_date, budget, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            trip.id,
            trip.destination,
            trip.start_date.to_string(),
            trip.end_date.to_string(),
            trip.budget.to_string(),
            trip.notes
        ],
    )?;
    debug!(id = %trip.id, "trip inserted");
    Ok(())
}

pub fn update_trip(conn: &Connection, trip: &Trip) -> Result<()> {
    let n = conn.execute(
        "UPDATE trips SET destination=?2, start_date=?3, end_date=?4, budget=?5, notes=?6
         WHERE id=?1",
        params![
            trip.id,
            trip.destination,
            trip.start_date.to_string(),
            trip.end_date.to_string(),
            trip.budget.to_string(),
            trip.notes
        ],
    )?;
    anyhow::ensure!(n == 1, "Trip '{}' not found", trip.id);
    debug!(id = %trip.id, "trip updated");
    Ok(())
}

/// Removes the trip; its expenses go with it through the foreign key cascade.
pub fn delete_trip(conn: &Connection, id: &str) -> Result<bool> {
    let n = conn.execute("DELETE FROM trips WHERE id=?1", params![id])?;
    debug!(id, removed = n, "trip delete");
    Ok(n > 0)
}

type ExpenseCols = (i64, String, String, String, Option<String>, String);

fn expense_cols(r: &Row<'_>) -> rusqlite::Result<ExpenseCols> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

fn expense_from_cols(cols: ExpenseCols) -> Result<Expense> {
    let (id, trip_id, category, amount, note, date) = cols;
    Ok(Expense {
        amount: parse_col_decimal(&amount)
            .with_context(|| format!("Expense #{} has a bad amount", id))?,
        date: parse_col_date(&date)?,
        id,
        trip_id,
        category,
        note,
    })
}

const EXPENSE_COLUMNS: &str = "id, trip_id, category, amount, note, date";

/// Snapshot of the expenses attached to one trip, oldest first.
pub fn load_expenses(conn: &Connection, trip_id: &str) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE trip_id=?1 ORDER BY date, id"
    ))?;
    let rows = stmt.query_map(params![trip_id], expense_cols)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(expense_from_cols(row?)?);
    }
    Ok(out)
}

pub fn load_all_expenses(conn: &Connection) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY date, id"
    ))?;
    let rows = stmt.query_map([], expense_cols)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(expense_from_cols(row?)?);
    }
    Ok(out)
}

pub fn get_expense(conn: &Connection, id: i64) -> Result<Option<Expense>> {
    let cols = conn
        .query_row(
            &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id=?1"),
            params![id],
            expense_cols,
        )
        .optional()?;
    cols.map(expense_from_cols).transpose()
}

/// Inserts and returns the store-assigned id.
pub fn insert_expense(
    conn: &Connection,
    trip_id: &str,
    category: &str,
    amount: Decimal,
    note: Option<&str>,
    date: NaiveDate,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO expenses(trip_id, category, amount, note, date) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![trip_id, category, amount.to_string(), note, date.to_string()],
    )?;
    let id = conn.last_insert_rowid();
    debug!(id, trip_id, "expense inserted");
    Ok(id)
}

pub fn update_expense(conn: &Connection, expense: &Expense) -> Result<()> {
    let n = conn.execute(
        "UPDATE expenses SET category=?2, amount=?3, note=?4, date=?5 WHERE id=?1",
        params![
            expense.id,
            expense.category,
            expense.amount.to_string(),
            expense.note,
            expense.date.to_string()
        ],
    )?;
    anyhow::ensure!(n == 1, "Expense #{} not found", expense.id);
    Ok(())
}

pub fn delete_expense(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?;
    Ok(n > 0)
}
