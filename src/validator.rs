// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Trip scheduling validity and budget aggregation.
//!
//! Everything here is a pure function over snapshots handed in by the caller.
//! Nothing reads the store, nothing is cached.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Expense, ExpenseDraft, Trip, TripDraft};

/// Why a trip or expense candidate may not be saved.
///
/// The `Display` text is the one message shown to the user for each reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("Destination cannot be empty")]
    EmptyDestination,
    #[error("End date must be on or after the start date")]
    InvertedDateRange,
    #[error("Budget must be a non-negative number")]
    InvalidBudget,
    #[error("Start date cannot be in the past")]
    PastStartDate,
    #[error("Trip overlaps with '{destination}' ({start} to {end})")]
    OverlappingTrip {
        destination: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("Category cannot be empty")]
    EmptyCategory,
    #[error("Amount must be a positive number")]
    InvalidAmount,
}

/// Non-blocking warning attached to an accepted expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetExceeded {
    pub budget: Decimal,
    pub projected_total: Decimal,
}

impl BudgetExceeded {
    pub fn overrun(&self) -> Decimal {
        self.projected_total.saturating_sub(self.budget)
    }
}

impl fmt::Display for BudgetExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Budget exceeded: spending would reach {:.2} against a budget of {:.2} ({:.2} over)",
            self.projected_total,
            self.budget,
            self.overrun()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedExpense {
    pub category: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub date: NaiveDate,
    pub warning: Option<BudgetExceeded>,
}

/// Inclusive on both ends: trips sharing a boundary day overlap.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Largest budget or expense amount accepted. Sums of capped amounts stay
/// far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Plain decimal text: optional sign, digits, optional fraction. No digit
/// separators, no exponent.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.contains('_') {
        return None;
    }
    raw.parse::<Decimal>().ok().filter(|v| *v <= MAX_AMOUNT)
}

/// Checks a trip candidate against the stored trips. The order of checks
/// decides which single reason is reported.
///
/// A stored trip sharing the candidate's id is ignored by the overlap scan.
pub fn validate_new_trip(
    candidate: &TripDraft,
    existing: &[Trip],
    today: NaiveDate,
) -> Result<Trip, RejectionReason> {
    check_trip(candidate, existing, Some(today))
}

/// Same checks as [`validate_new_trip`] for a change to `original`, except
/// that a start date left untouched is not held to the past-date rule.
pub fn validate_trip_edit(
    original: &Trip,
    candidate: &TripDraft,
    existing: &[Trip],
    today: NaiveDate,
) -> Result<Trip, RejectionReason> {
    let today = (candidate.start_date != original.start_date).then_some(today);
    check_trip(candidate, existing, today)
}

fn check_trip(
    candidate: &TripDraft,
    existing: &[Trip],
    today: Option<NaiveDate>,
) -> Result<Trip, RejectionReason> {
    let destination = candidate.destination.trim();
    if destination.is_empty() {
        return Err(RejectionReason::EmptyDestination);
    }
    if candidate.end_date < candidate.start_date {
        return Err(RejectionReason::InvertedDateRange);
    }
    let budget = match parse_amount(&candidate.budget) {
        Some(b) if b >= Decimal::ZERO => b,
        _ => return Err(RejectionReason::InvalidBudget),
    };
    if today.is_some_and(|today| candidate.start_date < today) {
        return Err(RejectionReason::PastStartDate);
    }
    if let Some(other) = existing.iter().find(|t| {
        t.id != candidate.id
            && ranges_overlap(
                candidate.start_date,
                candidate.end_date,
                t.start_date,
                t.end_date,
            )
    }) {
        return Err(RejectionReason::OverlappingTrip {
            destination: other.destination.clone(),
            start: other.start_date,
            end: other.end_date,
        });
    }

    Ok(Trip {
        id: candidate.id.clone(),
        destination: destination.to_string(),
        start_date: candidate.start_date,
        end_date: candidate.end_date,
        budget,
        notes: candidate.notes.clone(),
    })
}

/// Sum of the amounts of `expenses` attached to `trip`. Zero when none are.
///
/// Saturates at the `Decimal` bounds; rows written outside the validator may
/// carry amounts above [`MAX_AMOUNT`].
pub fn total_expenses(trip: &Trip, expenses: &[Expense]) -> Decimal {
    expenses
        .iter()
        .filter(|e| e.trip_id == trip.id)
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
}

/// Checks an expense candidate. Going over budget only attaches a warning;
/// the expense is still accepted.
///
/// For edits pass `expenses` without the expense being edited.
pub fn validate_new_expense(
    trip: &Trip,
    expenses: &[Expense],
    candidate: &ExpenseDraft,
) -> Result<AcceptedExpense, RejectionReason> {
    let category = candidate.category.trim();
    if category.is_empty() {
        return Err(RejectionReason::EmptyCategory);
    }
    let amount = match parse_amount(&candidate.amount) {
        Some(a) if a > Decimal::ZERO => a,
        _ => return Err(RejectionReason::InvalidAmount),
    };

    let projected_total = total_expenses(trip, expenses)
        .checked_add(amount)
        .ok_or(RejectionReason::InvalidAmount)?;
    let warning = (projected_total > trip.budget).then(|| BudgetExceeded {
        budget: trip.budget,
        projected_total,
    });

    Ok(AcceptedExpense {
        category: category.to_string(),
        amount,
        note: candidate
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        date: candidate.date,
        warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn today() -> NaiveDate {
        d("2025-01-01")
    }

    fn draft(dest: &str, start: &str, end: &str, budget: &str) -> TripDraft {
        TripDraft {
            id: "candidate".into(),
            destination: dest.into(),
            start_date: d(start),
            end_date: d(end),
            budget: budget.into(),
            notes: String::new(),
        }
    }

    fn stored(id: &str, start: &str, end: &str, budget: &str) -> Trip {
        Trip {
            id: id.into(),
            destination: format!("Trip {id}"),
            start_date: d(start),
            end_date: d(end),
            budget: dec(budget),
            notes: String::new(),
        }
    }

    fn expense(id: i64, trip_id: &str, amount: &str) -> Expense {
        Expense {
            id,
            trip_id: trip_id.into(),
            category: "Food".into(),
            amount: dec(amount),
            note: None,
            date: d("2025-01-11"),
        }
    }

    fn expense_draft(category: &str, amount: &str) -> ExpenseDraft {
        ExpenseDraft {
            category: category.into(),
            amount: amount.into(),
            note: None,
            date: d("2025-01-12"),
        }
    }

    #[test]
    fn empty_destination_is_checked_first() {
        let c = draft("   ", "2025-02-10", "2025-02-01", "abc");
        assert_eq!(
            validate_new_trip(&c, &[], today()),
            Err(RejectionReason::EmptyDestination)
        );
    }

    #[test]
    fn inverted_range_wins_over_other_failures() {
        let existing = vec![stored("a", "2024-12-01", "2025-03-01", "10")];
        let c = draft("Paris", "2024-12-10", "2024-12-05", "-5");
        assert_eq!(
            validate_new_trip(&c, &existing, today()),
            Err(RejectionReason::InvertedDateRange)
        );
    }

    #[test]
    fn budget_must_parse_and_be_non_negative() {
        for raw in ["abc", "-5", "", "  ", "NaN", "inf"] {
            let c = draft("Paris", "2025-02-01", "2025-02-03", raw);
            assert_eq!(
                validate_new_trip(&c, &[], today()),
                Err(RejectionReason::InvalidBudget),
                "budget {raw:?}"
            );
        }
        let c = draft("Paris", "2025-02-01", "2025-02-03", "0");
        let trip = validate_new_trip(&c, &[], today()).unwrap();
        assert_eq!(trip.budget, Decimal::ZERO);
    }

    #[test]
    fn past_start_date_is_rejected_but_today_is_fine() {
        let c = draft("Rome", "2024-12-31", "2025-01-05", "100");
        assert_eq!(
            validate_new_trip(&c, &[], today()),
            Err(RejectionReason::PastStartDate)
        );
        let c = draft("Rome", "2025-01-01", "2025-01-01", "100");
        assert!(validate_new_trip(&c, &[], today()).is_ok());
    }

    #[test]
    fn shared_boundary_day_counts_as_overlap() {
        let existing = vec![stored("a", "2025-01-10", "2025-01-15", "500")];
        let c = draft("Oslo", "2025-01-15", "2025-01-20", "100");
        assert!(matches!(
            validate_new_trip(&c, &existing, today()),
            Err(RejectionReason::OverlappingTrip { .. })
        ));

        let c = draft("Oslo", "2025-01-16", "2025-01-20", "100");
        let trip = validate_new_trip(&c, &existing, today()).unwrap();
        assert_eq!(trip.destination, "Oslo");
        assert_eq!(trip.budget, dec("100"));
    }

    #[test]
    fn candidate_enclosing_an_existing_trip_overlaps() {
        let existing = vec![stored("a", "2025-01-10", "2025-01-15", "500")];
        let c = draft("Oslo", "2025-01-01", "2025-01-31", "100");
        let err = validate_new_trip(&c, &existing, today()).unwrap_err();
        assert_eq!(
            err,
            RejectionReason::OverlappingTrip {
                destination: "Trip a".into(),
                start: d("2025-01-10"),
                end: d("2025-01-15"),
            }
        );
    }

    #[test]
    fn editing_does_not_collide_with_its_own_row() {
        let existing = vec![stored("a", "2025-01-10", "2025-01-15", "500")];
        let mut c = TripDraft::from_trip(&existing[0]);
        c.end_date = d("2025-01-17");
        let trip = validate_new_trip(&c, &existing, today()).unwrap();
        assert_eq!(trip.id, "a");
        assert_eq!(trip.end_date, d("2025-01-17"));
    }

    #[test]
    fn validation_is_idempotent() {
        let existing = vec![stored("a", "2025-01-10", "2025-01-15", "500")];
        for c in [
            draft("Oslo", "2025-01-12", "2025-01-20", "100"),
            draft("Oslo", "2025-01-16", "2025-01-20", "100"),
        ] {
            let first = validate_new_trip(&c, &existing, today());
            let second = validate_new_trip(&c, &existing, today());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn total_expenses_sums_only_the_trips_own_expenses() {
        let trip = stored("a", "2025-01-10", "2025-01-15", "1000");
        assert_eq!(total_expenses(&trip, &[]), Decimal::ZERO);

        let expenses = vec![
            expense(1, "a", "12.50"),
            expense(2, "a", "7.25"),
            expense(3, "a", "0"),
            expense(4, "b", "99"),
        ];
        assert_eq!(total_expenses(&trip, &expenses), dec("19.75"));
    }

    #[test]
    fn expense_requires_category_then_positive_amount() {
        let trip = stored("a", "2025-01-10", "2025-01-15", "1000");
        assert_eq!(
            validate_new_expense(&trip, &[], &expense_draft("", "x")),
            Err(RejectionReason::EmptyCategory)
        );
        for raw in ["x", "0", "-1", ""] {
            assert_eq!(
                validate_new_expense(&trip, &[], &expense_draft("Food", raw)),
                Err(RejectionReason::InvalidAmount),
                "amount {raw:?}"
            );
        }
    }

    #[test]
    fn over_budget_expense_is_accepted_with_warning() {
        let trip = stored("a", "2025-01-10", "2025-01-15", "1000");
        let expenses = vec![expense(1, "a", "600")];
        let accepted =
            validate_new_expense(&trip, &expenses, &expense_draft("Hotel", "500")).unwrap();
        assert_eq!(accepted.amount, dec("500"));
        let warning = accepted.warning.expect("budget warning");
        assert_eq!(warning.projected_total, dec("1100"));
        assert_eq!(warning.overrun(), dec("100"));
    }

    #[test]
    fn amounts_above_the_cap_are_rejected() {
        let huge = "79228162514264337593543950335";
        let c = draft("Paris", "2025-02-01", "2025-02-03", huge);
        assert_eq!(
            validate_new_trip(&c, &[], today()),
            Err(RejectionReason::InvalidBudget)
        );
        let trip = stored("a", "2025-01-10", "2025-01-15", "1000");
        assert_eq!(
            validate_new_expense(&trip, &[], &expense_draft("Yacht", huge)),
            Err(RejectionReason::InvalidAmount)
        );
        assert_eq!(MAX_AMOUNT, dec("1000000000000"));
        assert!(validate_new_expense(&trip, &[], &expense_draft("Yacht", "1000000000000")).is_ok());
    }

    #[test]
    fn oversized_stored_rows_do_not_panic() {
        let trip = stored("a", "2025-01-10", "2025-01-15", "1000");
        let expenses = vec![
            Expense { amount: Decimal::MAX, ..expense(1, "a", "0") },
            Expense { amount: Decimal::MAX, ..expense(2, "a", "0") },
        ];
        assert_eq!(total_expenses(&trip, &expenses), Decimal::MAX);
        assert_eq!(
            validate_new_expense(&trip, &expenses, &expense_draft("Food", "5")),
            Err(RejectionReason::InvalidAmount)
        );
    }

    #[test]
    fn digit_separators_are_not_numbers() {
        let c = draft("Paris", "2025-02-01", "2025-02-03", "1_000");
        assert_eq!(
            validate_new_trip(&c, &[], today()),
            Err(RejectionReason::InvalidBudget)
        );
        let trip = stored("a", "2025-01-10", "2025-01-15", "1000");
        assert_eq!(
            validate_new_expense(&trip, &[], &expense_draft("Food", "1_0")),
            Err(RejectionReason::InvalidAmount)
        );
    }

    #[test]
    fn edit_keeps_past_start_when_unchanged() {
        let started = stored("a", "2024-12-28", "2025-01-05", "500");
        let mut c = TripDraft::from_trip(&started);
        c.budget = "650".into();
        let trip = validate_trip_edit(&started, &c, &[], today()).unwrap();
        assert_eq!(trip.budget, dec("650"));

        c.start_date = d("2024-12-29");
        assert_eq!(
            validate_trip_edit(&started, &c, &[], today()),
            Err(RejectionReason::PastStartDate)
        );
    }

    #[test]
    fn reaching_the_budget_exactly_is_not_a_warning() {
        let trip = stored("a", "2025-01-10", "2025-01-15", "1000");
        let expenses = vec![expense(1, "a", "600")];
        let accepted =
            validate_new_expense(&trip, &expenses, &expense_draft("Hotel", "400")).unwrap();
        assert!(accepted.warning.is_none());
    }
}
