// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_setting, list_settings, pretty_table, set_setting};
use crate::weather::API_KEY_SETTING;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap();
            set_setting(conn, key, value)?;
            println!("{} set", key);
        }
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            match get_setting(conn, key)? {
                Some(v) => println!("{}", display_value(key, &v)),
                None => println!("{} is not set", key),
            }
        }
        Some(("list", _)) => {
            let rows = list_settings(conn)?
                .into_iter()
                .map(|(k, v)| {
                    let shown = display_value(&k, &v);
                    vec![k, shown]
                })
                .collect();
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}

// API keys are masked on output.
fn display_value(key: &str, value: &str) -> String {
    if key == API_KEY_SETTING && value.chars().count() > 4 {
        let cut = value.char_indices().rev().nth(3).map_or(0, |(i, _)| i);
        format!("****{}", &value[cut..])
    } else {
        value.to_string()
    }
}
