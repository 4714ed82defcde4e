//! Response types for the payroll API.
//!
//! This module defines the response bodies and the error handling for the
//! HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;
use crate::models::{Loan, PayrollMonth};
use crate::runner::IntegrityIssue;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            PayrollError::ConfigNotFound { .. } | PayrollError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            PayrollError::InvalidMonth { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_MONTH", message),
            ),
            PayrollError::AttendanceLengthMismatch { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_ATTENDANCE",
                    message,
                    "Attendance must have exactly one mark per calendar day",
                ),
            ),
            PayrollError::AttendanceMismatch { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("ATTENDANCE_MISMATCH", message),
            ),
            PayrollError::AttendanceMissing { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "ATTENDANCE_MISSING",
                    message,
                    "Record attendance for every active employee before running payroll",
                ),
            ),
            PayrollError::EmployeeNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("EMPLOYEE_NOT_FOUND", message),
            ),
            PayrollError::DuplicateEmployee { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "DUPLICATE_EMPLOYEE",
                    message,
                    "Each employee id may appear on the roster once",
                ),
            ),
            PayrollError::EmployeeInactive { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("EMPLOYEE_INACTIVE", message),
            ),
            PayrollError::LoanNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("LOAN_NOT_FOUND", message),
            ),
            PayrollError::InvalidLoan { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_LOAN", message),
            ),
            PayrollError::AdvanceManagedByLedger { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "ADVANCE_MANAGED_BY_LEDGER",
                    message,
                    "Change the employee's loans through /loans/:loan_id/actions",
                ),
            ),
            PayrollError::LedgerNotConfigured => (
                StatusCode::CONFLICT,
                ApiError::new("LEDGER_NOT_CONFIGURED", message),
            ),
            PayrollError::RunNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("RUN_NOT_FOUND", message),
            ),
            PayrollError::Persistence { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::with_details(
                    "PERSISTENCE_ERROR",
                    "Loan store unavailable",
                    message,
                ),
            ),
            PayrollError::CalculationError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

/// Response body for `PUT /roster`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResponse {
    /// Employees now on the roster.
    pub employees: usize,
    /// Of those, how many are active.
    pub active: usize,
}

/// Response body for `PUT /attendance/:month/:employee_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    /// The employee the marks were stored for.
    pub employee_id: String,
    /// The month the marks cover.
    pub month: PayrollMonth,
    /// Number of marks stored.
    pub days: usize,
}

/// Response body for `GET /payroll/:month/integrity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityResponse {
    /// The month checked.
    pub month: PayrollMonth,
    /// Problems found; empty when the data is consistent.
    pub issues: Vec<IntegrityIssue>,
}

/// Response body for `POST /loans/:loan_id/actions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanActionResponse {
    /// False when the action did not apply to the loan's current state.
    pub changed: bool,
    /// The loan after the action.
    pub loan: Loan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_employee_not_found_maps_to_404() {
        let api_error: ApiErrorResponse = PayrollError::EmployeeNotFound {
            employee_id: "EMP404".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "EMPLOYEE_NOT_FOUND");
        assert!(api_error.error.message.contains("EMP404"));
    }

    #[test]
    fn test_advance_managed_by_ledger_maps_to_conflict() {
        let api_error: ApiErrorResponse = PayrollError::AdvanceManagedByLedger {
            employee_id: "EMP001".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
        assert_eq!(api_error.error.code, "ADVANCE_MANAGED_BY_LEDGER");
    }

    #[test]
    fn test_persistence_maps_to_service_unavailable() {
        let api_error: ApiErrorResponse = PayrollError::Persistence {
            employee_id: "EMP001".to_string(),
            message: "disk full".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(api_error.error.details.unwrap().contains("disk full"));
    }

    #[test]
    fn test_roster_errors_map_to_client_statuses() {
        let duplicate: ApiErrorResponse = PayrollError::DuplicateEmployee {
            employee_id: "EMP001".to_string(),
        }
        .into();
        assert_eq!(duplicate.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(duplicate.error.code, "DUPLICATE_EMPLOYEE");

        let inactive: ApiErrorResponse = PayrollError::EmployeeInactive {
            employee_id: "EMP002".to_string(),
        }
        .into();
        assert_eq!(inactive.status, StatusCode::CONFLICT);
        assert_eq!(inactive.error.code, "EMPLOYEE_INACTIVE");
    }
}
