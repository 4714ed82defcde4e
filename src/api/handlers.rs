//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::PayrollError;
use crate::ledger::{AdvanceReport, LoanAction, LoanSummary};
use crate::models::{AttendanceRecord, Loan, PayrollLine, PayrollMonth};
use crate::runner::PayrollRun;

use super::request::{
    AttendanceRequest, CalculationRequest, CreateLoanRequest, MonthQuery, RecalculateRequest,
    RosterRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, AttendanceResponse, IntegrityResponse, LoanActionResponse,
    RosterResponse,
};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/roster", put(put_roster_handler))
        .route(
            "/attendance/:month/:employee_id",
            put(put_attendance_handler),
        )
        .route("/payroll/calculate", post(calculate_handler))
        .route("/payroll/:month/preview", post(preview_handler))
        .route("/payroll/:month/finalize", post(finalize_handler))
        .route(
            "/payroll/:month/employees/:employee_id/recalculate",
            post(recalculate_handler),
        )
        .route("/payroll/:month/integrity", get(integrity_handler))
        .route("/loans", post(create_loan_handler))
        .route("/loans/:loan_id/actions", post(loan_action_handler))
        .route("/employees/:employee_id/loans", get(loan_summary_handler))
        .route("/reports/advances", get(advance_report_handler))
        .with_state(state)
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(ApiErrorResponse::bad_request(error))
        }
    }
}

fn parse_month(value: &str) -> ApiResult<PayrollMonth> {
    Ok(value.parse::<PayrollMonth>()?)
}

fn month_from_query(query: &MonthQuery) -> ApiResult<PayrollMonth> {
    match query.month.as_deref() {
        Some(value) => parse_month(value),
        None => Err(ApiErrorResponse::bad_request(ApiError::validation_error(
            "missing query parameter: month",
        ))),
    }
}

fn log_failure(correlation_id: Uuid, error: &PayrollError) {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
}

/// Handler for PUT /roster.
async fn put_roster_handler(
    State(state): State<AppState>,
    payload: Result<Json<RosterRequest>, JsonRejection>,
) -> ApiResult<Json<RosterResponse>> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;

    let employees = request.employees.len();
    let active = request.employees.iter().filter(|e| e.is_active()).count();
    state.runner().lock().await.set_roster(request.employees);

    info!(correlation_id = %correlation_id, employees, active, "Roster updated");
    Ok(Json(RosterResponse { employees, active }))
}

/// Handler for PUT /attendance/:month/:employee_id.
async fn put_attendance_handler(
    State(state): State<AppState>,
    Path((month, employee_id)): Path<(String, String)>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> ApiResult<Json<AttendanceResponse>> {
    let correlation_id = Uuid::new_v4();
    let month = parse_month(&month)?;
    let request = json_body(correlation_id, payload)?;

    let days = request.marks.len();
    let record = AttendanceRecord::new(employee_id.clone(), month, request.marks);
    state
        .runner()
        .lock()
        .await
        .record_attendance(record)
        .inspect_err(|e| log_failure(correlation_id, e))?;

    Ok(Json(AttendanceResponse {
        employee_id,
        month,
        days,
    }))
}

/// Handler for POST /payroll/calculate.
///
/// Calculates a line for the posted employee and marks without storing
/// anything.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> ApiResult<Json<PayrollLine>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");
    let request = json_body(correlation_id, payload)?;

    let record = AttendanceRecord::new(request.employee.id.clone(), request.month, request.marks);
    let line = state
        .runner()
        .lock()
        .await
        .calculate_payroll(&request.employee, &record, request.month)
        .inspect_err(|e| log_failure(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %line.employee_id,
        gross_salary = %line.earnings.gross_salary,
        net_pay = %line.net_pay,
        "Calculation completed successfully"
    );
    Ok(Json(line))
}

/// Handler for POST /payroll/:month/preview.
async fn preview_handler(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> ApiResult<Json<PayrollRun>> {
    let correlation_id = Uuid::new_v4();
    let month = parse_month(&month)?;

    let run = state
        .runner()
        .lock()
        .await
        .preview_run(month)
        .inspect_err(|e| log_failure(correlation_id, e))?;
    Ok(Json(run))
}

/// Handler for POST /payroll/:month/finalize.
async fn finalize_handler(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> ApiResult<Json<PayrollRun>> {
    let correlation_id = Uuid::new_v4();
    let month = parse_month(&month)?;

    let run = state
        .runner()
        .lock()
        .await
        .finalize_run(month)
        .inspect_err(|e| log_failure(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        month = %month,
        currency = %state.config().company().currency_code,
        total_net = %run.totals.total_net,
        "Payroll run finalized"
    );
    Ok(Json(run))
}

/// Handler for POST /payroll/:month/employees/:employee_id/recalculate.
async fn recalculate_handler(
    State(state): State<AppState>,
    Path((month, employee_id)): Path<(String, String)>,
    payload: Result<Json<RecalculateRequest>, JsonRejection>,
) -> ApiResult<Json<PayrollLine>> {
    let correlation_id = Uuid::new_v4();
    let month = parse_month(&month)?;
    let request = json_body(correlation_id, payload)?;

    let line = state
        .runner()
        .lock()
        .await
        .recalculate_one(month, &employee_id, request.advance_override)
        .inspect_err(|e| log_failure(correlation_id, e))?;
    Ok(Json(line))
}

/// Handler for GET /payroll/:month/integrity.
async fn integrity_handler(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> ApiResult<Json<IntegrityResponse>> {
    let month = parse_month(&month)?;
    let issues = state.runner().lock().await.check_data_integrity(month);
    Ok(Json(IntegrityResponse { month, issues }))
}

/// Handler for POST /loans.
async fn create_loan_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLoanRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;

    let loan: Loan = state
        .runner()
        .lock()
        .await
        .create_loan(
            &request.employee_id,
            request.principal,
            request.installment_count,
            request.start_month,
        )
        .inspect_err(|e| log_failure(correlation_id, e))?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Handler for POST /loans/:loan_id/actions.
async fn loan_action_handler(
    State(state): State<AppState>,
    Path(loan_id): Path<String>,
    payload: Result<Json<LoanAction>, JsonRejection>,
) -> ApiResult<Json<LoanActionResponse>> {
    let correlation_id = Uuid::new_v4();
    let action = json_body(correlation_id, payload)?;

    let mut runner = state.runner().lock().await;
    let changed = runner
        .modify_loan(&loan_id, action)
        .inspect_err(|e| log_failure(correlation_id, e))?;
    let loan = runner
        .ledger()
        .and_then(|ledger| ledger.find_loan(&loan_id))
        .cloned()
        .ok_or_else(|| PayrollError::LoanNotFound {
            loan_id: loan_id.clone(),
        })?;

    Ok(Json(LoanActionResponse { changed, loan }))
}

/// Handler for GET /employees/:employee_id/loans?month=YYYY-MM.
async fn loan_summary_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<LoanSummary>> {
    let month = month_from_query(&query)?;
    let summary = state
        .runner()
        .lock()
        .await
        .loan_summary(&employee_id, month)?;
    Ok(Json(summary))
}

/// Handler for GET /reports/advances?month=YYYY-MM.
async fn advance_report_handler(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<AdvanceReport>> {
    let month = month_from_query(&query)?;
    let report = state.runner().lock().await.advance_report(month)?;
    Ok(Json(report))
}
