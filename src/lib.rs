//! Hospital Payroll Engine
//!
//! This crate computes monthly pay for hospital staff from daily attendance
//! marks and recovers salary advances from pay through a loan ledger.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod runner;
