// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use wanderly::models::Trip;
use wanderly::{commands::budgets, db, utils};

fn trip(id: &str, dest: &str, start: &str, end: &str, budget: &str) -> Trip {
    Trip {
        id: id.into(),
        destination: dest.into(),
        start_date: utils::parse_date(start).unwrap(),
        end_date: utils::parse_date(end).unwrap(),
        budget: budget.parse().unwrap(),
        notes: String::new(),
    }
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let a = trip("t-a", "Reykjavik", "2099-07-01", "2099-07-05", "50.00");
    let b = trip("t-b", "Tallinn", "2099-08-01", "2099-08-03", "100");
    db::insert_trip(&conn, &a).unwrap();
    db::insert_trip(&conn, &b).unwrap();
    for amt in ["12.50", "7.25", "0"] {
        db::insert_expense(&conn, "t-b", "Misc", amt.parse().unwrap(), None, b.start_date).unwrap();
    }
    db::insert_expense(&conn, "t-a", "Tour", "60".parse().unwrap(), None, a.start_date).unwrap();
    conn
}

#[test]
fn overview_reports_spending_against_budget() {
    let conn = setup();
    let rows = budgets::query_rows(&conn, None).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].destination, "Reykjavik");
    assert_eq!(rows[0].spent, "60.00");
    assert_eq!(rows[0].remaining, "-10.00");
    assert_eq!(rows[0].status, "over");

    assert_eq!(rows[1].destination, "Tallinn");
    assert_eq!(rows[1].spent, "19.75");
    assert_eq!(rows[1].status, "ok");
}

#[test]
fn overview_follows_expense_changes() {
    let conn = setup();
    let before = budgets::query_rows(&conn, Some("tallinn")).unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].spent, "19.75");

    let first = db::load_expenses(&conn, "t-b").unwrap()[0].id;
    db::delete_expense(&conn, first).unwrap();
    let after = budgets::query_rows(&conn, Some("tallinn")).unwrap();
    assert_eq!(after[0].spent, "7.25");
}
