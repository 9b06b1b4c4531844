// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{Expense, ExpenseDraft};
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, resolve_trip, today};
use crate::validator::{validate_new_expense, AcceptedExpense};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let (id, accepted) = add(conn, sub)?;
            println!(
                "Recorded expense #{}: {} {}",
                id,
                accepted.category,
                fmt_money(&accepted.amount)
            );
            if let Some(w) = accepted.warning {
                println!("Warning: {}", w);
            }
        }
        Some(("edit", sub)) => {
            let accepted = edit(conn, sub)?;
            println!(
                "Updated expense: {} {}",
                accepted.category,
                fmt_money(&accepted.amount)
            );
            if let Some(w) = accepted.warning {
                println!("Warning: {}", w);
            }
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            anyhow::ensure!(db::delete_expense(conn, id)?, "Expense #{} not found", id);
            println!("Removed expense #{}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Validates and stores a new expense. Over-budget expenses are still stored;
/// the returned value carries the warning.
pub fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<(i64, AcceptedExpense)> {
    let trip = resolve_trip(conn, sub.get_one::<String>("trip").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let draft = ExpenseDraft {
        category: sub.get_one::<String>("category").unwrap().clone(),
        amount: sub.get_one::<String>("amount").unwrap().clone(),
        note: sub.get_one::<String>("note").cloned(),
        date,
    };
    let expenses = db::load_expenses(conn, &trip.id)?;
    let accepted = validate_new_expense(&trip, &expenses, &draft)?;
    let id = db::insert_expense(
        conn,
        &trip.id,
        &accepted.category,
        accepted.amount,
        accepted.note.as_deref(),
        accepted.date,
    )?;
    if let Some(w) = &accepted.warning {
        warn!(trip = %trip.id, overrun = %w.overrun(), "expense puts trip over budget");
    }
    info!(id, trip = %trip.id, "expense added");
    Ok((id, accepted))
}

pub fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<AcceptedExpense> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let current =
        db::get_expense(conn, id)?.with_context(|| format!("Expense #{} not found", id))?;
    let trip = db::get_trip(conn, &current.trip_id)?
        .with_context(|| format!("Trip '{}' of expense #{} is gone", current.trip_id, id))?;

    let draft = ExpenseDraft {
        category: sub
            .get_one::<String>("category")
            .cloned()
            .unwrap_or_else(|| current.category.clone()),
        amount: sub
            .get_one::<String>("amount")
            .cloned()
            .unwrap_or_else(|| current.amount.to_string()),
        // an explicit empty note clears it
        note: match sub.get_one::<String>("note") {
            Some(n) => Some(n.clone()),
            None => current.note.clone(),
        },
        date: match sub.get_one::<String>("date") {
            Some(s) => parse_date(s)?,
            None => current.date,
        },
    };
    let others: Vec<Expense> = db::load_expenses(conn, &trip.id)?
        .into_iter()
        .filter(|e| e.id != id)
        .collect();
    let accepted = validate_new_expense(&trip, &others, &draft)?;
    db::update_expense(
        conn,
        &Expense {
            id,
            trip_id: current.trip_id,
            category: accepted.category.clone(),
            amount: accepted.amount,
            note: accepted.note.clone(),
            date: accepted.date,
        },
    )?;
    info!(id, "expense edited");
    Ok(accepted)
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub amount: String,
    pub note: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRow>> {
    let trip = resolve_trip(conn, sub.get_one::<String>("trip").unwrap())?;
    Ok(db::load_expenses(conn, &trip.id)?
        .into_iter()
        .map(|e| ExpenseRow {
            id: e.id,
            date: e.date.to_string(),
            category: e.category,
            amount: fmt_money(&e.amount),
            note: e.note.unwrap_or_default(),
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["#", "Date", "Category", "Amount", "Note"], rows)
        );
    }
    Ok(())
}
