// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tempfile::tempdir;
use wanderly::models::Trip;
use wanderly::{commands::doctor, db, utils};

fn trip(id: &str, start: &str, end: &str) -> Trip {
    Trip {
        id: id.into(),
        destination: format!("Trip {id}"),
        start_date: utils::parse_date(start).unwrap(),
        end_date: utils::parse_date(end).unwrap(),
        budget: "250".parse().unwrap(),
        notes: "window seat".into(),
    }
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wanderly.sqlite");
    {
        let conn = db::open_at(&path).unwrap();
        db::insert_trip(&conn, &trip("a", "2099-09-01", "2099-09-04")).unwrap();
        utils::set_setting(&conn, "weather_api_key", "k-123").unwrap();
    }
    let conn = db::open_at(&path).unwrap();
    let trips = db::load_trips(&conn).unwrap();
    assert_eq!(trips, vec![trip("a", "2099-09-01", "2099-09-04")]);
    assert_eq!(
        utils::get_setting(&conn, "weather_api_key").unwrap().as_deref(),
        Some("k-123")
    );
}

#[test]
fn expenses_need_an_existing_trip() {
    let dir = tempdir().unwrap();
    let conn = db::open_at(&dir.path().join("w.sqlite")).unwrap();
    let res = db::insert_expense(
        &conn,
        "missing",
        "Food",
        "3".parse().unwrap(),
        None,
        utils::parse_date("2099-01-01").unwrap(),
    );
    assert!(res.is_err());
}

#[test]
fn doctor_flags_rows_written_around_the_validator() {
    let dir = tempdir().unwrap();
    let conn = db::open_at(&dir.path().join("w.sqlite")).unwrap();
    assert!(doctor::find_issues(&conn).unwrap().is_empty());

    db::insert_trip(&conn, &trip("a", "2099-01-10", "2099-01-15")).unwrap();
    db::insert_trip(&conn, &trip("b", "2099-01-15", "2099-01-18")).unwrap();
    conn.execute(
        "INSERT INTO trips(id, destination, start_date, end_date, budget) VALUES ('c','Oops','2099-03-05','2099-03-01','-1')",
        [],
    )
    .unwrap();

    let issues = doctor::find_issues(&conn).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert!(kinds.contains(&"negative_budget"));
    assert!(kinds.contains(&"inverted_dates"));
    assert!(kinds.contains(&"overlapping_trips"));
}
