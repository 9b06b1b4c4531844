// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{Trip, TripDraft};
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, resolve_trip, today};
use crate::validator::{total_expenses, validate_new_trip, validate_trip_edit};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let trip = add(conn, sub)?;
            println!(
                "Added trip to {} ({} to {}), id {}",
                trip.destination, trip.start_date, trip.end_date, trip.id
            );
        }
        Some(("edit", sub)) => {
            let trip = edit(conn, sub)?;
            println!("Updated trip to {} ({})", trip.destination, trip.id);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("rm", sub)) => {
            let trip = resolve_trip(conn, sub.get_one::<String>("trip").unwrap())?;
            db::delete_trip(conn, &trip.id)?;
            info!(id = %trip.id, "trip removed");
            println!("Removed trip to {} and its expenses", trip.destination);
        }
        _ => {}
    }
    Ok(())
}

pub fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<Trip> {
    let draft = TripDraft::new(
        sub.get_one::<String>("destination").unwrap().as_str(),
        parse_date(sub.get_one::<String>("start").unwrap())?,
        parse_date(sub.get_one::<String>("end").unwrap())?,
        sub.get_one::<String>("budget").unwrap().as_str(),
        sub.get_one::<String>("notes").cloned().unwrap_or_default(),
    );
    let existing = db::load_trips(conn)?;
    let trip = validate_new_trip(&draft, &existing, today())?;
    db::insert_trip(conn, &trip)?;
    info!(id = %trip.id, destination = %trip.destination, "trip added");
    Ok(trip)
}

pub fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<Trip> {
    let current = resolve_trip(conn, sub.get_one::<String>("trip").unwrap())?;
    let mut draft = TripDraft::from_trip(&current);
    if let Some(d) = sub.get_one::<String>("destination") {
        draft.destination = d.clone();
    }
    if let Some(s) = sub.get_one::<String>("start") {
        draft.start_date = parse_date(s)?;
    }
    if let Some(e) = sub.get_one::<String>("end") {
        draft.end_date = parse_date(e)?;
    }
    if let Some(b) = sub.get_one::<String>("budget") {
        draft.budget = b.clone();
    }
    if let Some(n) = sub.get_one::<String>("notes") {
        draft.notes = n.clone();
    }

    let others: Vec<Trip> = db::load_trips(conn)?
        .into_iter()
        .filter(|t| t.id != current.id)
        .collect();
    let trip = validate_trip_edit(&current, &draft, &others, today())?;
    db::update_trip(conn, &trip)?;
    info!(id = %trip.id, "trip edited");
    Ok(trip)
}

#[derive(Serialize)]
pub struct TripRow {
    pub id: String,
    pub destination: String,
    pub start: String,
    pub end: String,
    pub budget: String,
    pub spent: String,
    pub remaining: String,
    pub notes: String,
}

pub fn query_rows(conn: &Connection) -> Result<Vec<TripRow>> {
    let trips = db::load_trips(conn)?;
    let expenses = db::load_all_expenses(conn)?;
    Ok(trips
        .iter()
        .map(|t| {
            let spent = total_expenses(t, &expenses);
            TripRow {
                id: t.id.clone(),
                destination: t.destination.clone(),
                start: t.start_date.to_string(),
                end: t.end_date.to_string(),
                budget: fmt_money(&t.budget),
                spent: fmt_money(&spent),
                remaining: fmt_money(&t.budget.saturating_sub(spent)),
                notes: t.notes.clone(),
            }
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No trips added yet. Add one with `wanderly trip add`.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .into_iter()
        .map(|r| {
            vec![
                short_id(&r.id).to_string(),
                r.destination,
                r.start,
                r.end,
                r.budget,
                r.spent,
                r.remaining,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Destination", "Start", "End", "Budget", "Spent", "Remaining"],
            rows,
        )
    );
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let trip = resolve_trip(conn, sub.get_one::<String>("trip").unwrap())?;
    let expenses = db::load_expenses(conn, &trip.id)?;
    let spent = total_expenses(&trip, &expenses);

    println!("{} ({})", trip.destination, trip.id);
    println!("  {} to {}", trip.start_date, trip.end_date);
    println!(
        "  Budget {}  Spent {}  Remaining {}",
        fmt_money(&trip.budget),
        fmt_money(&spent),
        fmt_money(&trip.budget.saturating_sub(spent))
    );
    if !trip.notes.is_empty() {
        println!("  Notes: {}", trip.notes);
    }
    if !expenses.is_empty() {
        let rows = expenses
            .into_iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.to_string(),
                    e.category,
                    fmt_money(&e.amount),
                    e.note.unwrap_or_default(),
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

pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
