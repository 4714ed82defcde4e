//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API for collaborators: roster and
//! attendance entry, payroll preview and finalization, single-employee
//! recalculation, loan management and advance reporting.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceRequest, CalculationRequest, CreateLoanRequest, MonthQuery, RecalculateRequest,
    RosterRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, AttendanceResponse, IntegrityResponse, LoanActionResponse,
    RosterResponse,
};
pub use state::AppState;
