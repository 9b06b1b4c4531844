// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use crate::validator::ranges_overlap;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Raw scan of the stored rows; does not go through the typed loaders so a
/// single malformed row is reported instead of aborting the whole check.
pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    let mut stmt =
        conn.prepare("SELECT id, destination, start_date, end_date, budget FROM trips ORDER BY start_date")?;
    let mut cur = stmt.query([])?;
    let mut ranges: Vec<(String, NaiveDate, NaiveDate)> = Vec::new();
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let dest: String = r.get(1)?;
        let s: String = r.get(2)?;
        let e: String = r.get(3)?;
        let b: String = r.get(4)?;

        if dest.trim().is_empty() {
            rows.push(vec!["empty_destination".into(), id.clone()]);
        }
        match b.parse::<Decimal>() {
            Ok(v) if v < Decimal::ZERO => {
                rows.push(vec!["negative_budget".into(), format!("{} {}", dest, b)])
            }
            Ok(_) => {}
            Err(_) => rows.push(vec!["bad_budget".into(), format!("{} '{}'", dest, b)]),
        }
        let start = NaiveDate::parse_from_str(&s, "%Y-%m-%d");
        let end = NaiveDate::parse_from_str(&e, "%Y-%m-%d");
        match (start, end) {
            (Ok(start), Ok(end)) if end < start => {
                rows.push(vec!["inverted_dates".into(), format!("{} {}..{}", dest, s, e)])
            }
            (Ok(start), Ok(end)) => ranges.push((dest, start, end)),
            _ => rows.push(vec!["bad_date".into(), format!("{} {}..{}", dest, s, e)]),
        }
    }

    for (i, a) in ranges.iter().enumerate() {
        for b in &ranges[i + 1..] {
            if ranges_overlap(a.1, a.2, b.1, b.2) {
                rows.push(vec!["overlapping_trips".into(), format!("{} / {}", a.0, b.0)]);
            }
        }
    }

    let mut stmt2 = conn.prepare("SELECT id, amount FROM expenses ORDER BY id")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let a: String = r.get(1)?;
        match a.parse::<Decimal>() {
            Ok(v) if v > Decimal::ZERO => {}
            _ => rows.push(vec!["bad_expense_amount".into(), format!("#{} '{}'", id, a)]),
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        tracing::warn!(count = rows.len(), "doctor found issues");
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
