// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::utils::{find_trip, fmt_money, maybe_print_json, pretty_table};
use crate::validator::total_expenses;
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("overview", sub)) = m.subcommand() {
        overview(conn, sub)?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BudgetRow {
    pub destination: String,
    pub budget: String,
    pub spent: String,
    pub remaining: String,
    pub status: &'static str,
}

pub fn query_rows(conn: &Connection, trip: Option<&str>) -> Result<Vec<BudgetRow>> {
    let mut trips = db::load_trips(conn)?;
    if let Some(key) = trip {
        trips = vec![find_trip(&trips, key)?];
    }
    let mut data = Vec::with_capacity(trips.len());
    for t in &trips {
        // fresh read per trip, never cached
        let expenses = db::load_expenses(conn, &t.id)?;
        let spent = total_expenses(t, &expenses);
        data.push(BudgetRow {
            destination: t.destination.clone(),
            budget: fmt_money(&t.budget),
            spent: fmt_money(&spent),
            remaining: fmt_money(&t.budget.saturating_sub(spent)),
            status: if spent > t.budget { "over" } else { "ok" },
        });
    }
    Ok(data)
}

fn overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub.get_one::<String>("trip").map(String::as_str))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.destination,
                    r.budget,
                    r.spent,
                    r.remaining,
                    r.status.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Trip", "Planned Budget", "Actual Spending", "Remaining", "Status"],
                rows,
            )
        );
    }
    Ok(())
}
