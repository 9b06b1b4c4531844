// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Decimal,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub trip_id: String,
    pub category: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub date: NaiveDate,
}

/// Unvalidated trip input as typed by the user. `budget` is kept as raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDraft {
    pub id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: String,
    pub notes: String,
}

impl TripDraft {
    /// Draft for a brand new trip with a fresh id.
    pub fn new(
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            destination: destination.into(),
            start_date,
            end_date,
            budget: budget.into(),
            notes: notes.into(),
        }
    }

    /// Draft pre-filled from a stored trip, keeping its id.
    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            destination: trip.destination.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            budget: trip.budget.to_string(),
            notes: trip.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub category: String,
    pub amount: String, // raw decimal text
    pub note: Option<String>,
    pub date: NaiveDate,
}
