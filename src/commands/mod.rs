// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod trips;
pub mod expenses;
pub mod budgets;
pub mod calendar;
pub mod weather;
pub mod config;
pub mod doctor;
