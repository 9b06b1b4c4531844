// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::Trip;
use crate::utils::{month_end, parse_date, parse_month, pretty_table, today};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("day", sub)) => {
            let date = match sub.get_one::<String>("date") {
                Some(s) => parse_date(s)?,
                None => today(),
            };
            day(conn, date)?;
        }
        Some(("month", sub)) => {
            let first = match sub.get_one::<String>("month") {
                Some(s) => parse_month(s)?,
                None => today().with_day(1).unwrap_or_else(today),
            };
            month(conn, first)?;
        }
        _ => {}
    }
    Ok(())
}

/// Every day from `start` to `end` inclusive; empty when the range is inverted.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

pub fn trips_on(date: NaiveDate, trips: &[Trip]) -> Vec<&Trip> {
    trips
        .iter()
        .filter(|t| t.start_date <= date && date <= t.end_date)
        .collect()
}

/// `A`..`Z`, then `A1`..`Z1` and so on.
pub fn tag(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    match index / 26 {
        0 => letter.to_string(),
        n => format!("{letter}{n}"),
    }
}

/// Monday-first weeks of the month. Each cell holds the day number followed
/// by the tags of the trips covering it; days outside the month are blank.
pub fn month_grid(first: NaiveDate, trips: &[Trip]) -> Result<Vec<Vec<String>>> {
    let last = month_end(first)?;
    let lead = first.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<String> = vec![String::new(); lead];
    for d in dates_between(first, last) {
        let tags: Vec<String> = trips
            .iter()
            .enumerate()
            .filter(|(_, t)| t.start_date <= d && d <= t.end_date)
            .map(|(i, _)| tag(i))
            .collect();
        if tags.is_empty() {
            cells.push(d.day().to_string());
        } else {
            cells.push(format!("{} {}", d.day(), tags.join(",")));
        }
    }
    while cells.len() % 7 != 0 {
        cells.push(String::new());
    }
    Ok(cells.chunks(7).map(|w| w.to_vec()).collect())
}

fn day(conn: &Connection, date: NaiveDate) -> Result<()> {
    let trips = db::load_trips(conn)?;
    let on = trips_on(date, &trips);
    if on.is_empty() {
        println!("No trips on {}", date);
        return Ok(());
    }
    let rows = on
        .into_iter()
        .map(|t| {
            vec![
                t.destination.clone(),
                t.start_date.format("%b %-d, %Y").to_string(),
                t.end_date.format("%b %-d, %Y").to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Destination", "From", "To"], rows));
    Ok(())
}

fn month(conn: &Connection, first: NaiveDate) -> Result<()> {
    let trips = db::load_trips(conn)?;
    println!("{}", first.format("%B %Y"));
    println!(
        "{}",
        pretty_table(
            &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
            month_grid(first, &trips)?,
        )
    );

    let last = month_end(first)?;
    let legend: Vec<Vec<String>> = trips
        .iter()
        .enumerate()
        .filter(|(_, t)| t.start_date <= last && t.end_date >= first)
        .map(|(i, t)| {
            vec![
                tag(i),
                t.destination.clone(),
                format!("{} to {}", t.start_date, t.end_date),
            ]
        })
        .collect();
    if legend.is_empty() {
        println!("No trips this month.");
    } else {
        println!("{}", pretty_table(&["Tag", "Destination", "Dates"], legend));
    }
    Ok(())
}
