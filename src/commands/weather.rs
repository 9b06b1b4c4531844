// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::utils::{http_client, maybe_print_json, pretty_table};
use crate::weather::{api_key, fetch_current};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let arg = m.get_one::<String>("location").unwrap();
    let location = location_for(conn, arg)?;
    let key = api_key(conn)?;
    let client = http_client()?;
    let c = fetch_current(&client, &key, &location)?;

    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &c)? {
        let rows = vec![vec![
            format!("{}, {}", c.location, c.country),
            format!("{:.4}, {:.4}", c.latitude, c.longitude),
            format!("{:.1}°C", c.temp_c),
            c.condition,
        ]];
        println!(
            "{}",
            pretty_table(&["Location", "Coordinates", "Temperature", "Condition"], rows)
        );
    }
    Ok(())
}

/// A stored trip's destination when `arg` is a trip's exact id or
/// destination, otherwise `arg` itself. Id prefixes are not matched so that
/// place names are never swapped for a trip.
pub fn location_for(conn: &Connection, arg: &str) -> Result<String> {
    let arg = arg.trim();
    let lower = arg.to_lowercase();
    Ok(db::load_trips(conn)?
        .into_iter()
        .find(|t| t.id == arg || t.destination.to_lowercase() == lower)
        .map(|t| t.destination)
        .unwrap_or_else(|| arg.to_string()))
}
