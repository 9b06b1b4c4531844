// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn trip_arg() -> Arg {
    Arg::new("trip")
        .required(true)
        .help("Trip id, id prefix or destination")
}

pub fn build_cli() -> Command {
    Command::new("wanderly")
        .about("Plan trips, track expenses against budgets, check the weather")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("trip")
                .about("Manage trips")
                .subcommand(
                    Command::new("add")
                        .about("Add a trip")
                        .arg(Arg::new("destination").long("destination").short('d').required(true))
                        .arg(Arg::new("start").long("start").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("end").long("end").required(true).help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("budget")
                                .long("budget")
                                .short('b')
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of a trip")
                        .arg(trip_arg())
                        .arg(Arg::new("destination").long("destination").short('d'))
                        .arg(Arg::new("start").long("start").help("YYYY-MM-DD"))
                        .arg(Arg::new("end").long("end").help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("budget")
                                .long("budget")
                                .short('b')
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(Command::new("list").about("List trips")))
                .subcommand(
                    Command::new("show")
                        .about("Show a trip and its expenses")
                        .arg(trip_arg()),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a trip and its expenses")
                        .arg(trip_arg()),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Manage expenses of a trip")
                .subcommand(
                    Command::new("add")
                        .about("Log an expense")
                        .arg(trip_arg())
                        .arg(Arg::new("category").long("category").short('c').required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .short('a')
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change an expense")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .short('a')
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List expenses of a trip").arg(trip_arg()),
                ))
                .subcommand(
                    Command::new("rm").about("Delete an expense").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("budget").about("Budget vs. spending").subcommand(json_flags(
                Command::new("overview")
                    .about("Planned budget and actual spending per trip")
                    .arg(Arg::new("trip").help("Limit to one trip")),
            )),
        )
        .subcommand(
            Command::new("calendar")
                .about("Trips on the calendar")
                .subcommand(
                    Command::new("day")
                        .about("Trips covering a date")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
                )
                .subcommand(
                    Command::new("month")
                        .about("Month grid with trip days marked")
                        .arg(Arg::new("month").long("month").help("YYYY-MM, defaults to this month")),
                ),
        )
        .subcommand(json_flags(
            Command::new("weather")
                .about("Current weather and coordinates for a place or trip")
                .arg(Arg::new("location").required(true)),
        ))
        .subcommand(
            Command::new("config")
                .about("Stored settings")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(Command::new("list")),
        )
        .subcommand(Command::new("doctor").about("Check stored trips for inconsistencies"))
}
