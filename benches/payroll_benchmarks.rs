//! Performance benchmarks for the hospital payroll engine.
//!
//! Covers a single employee calculation through the library and the API,
//! a draft run over rosters of increasing size, and a month of loan
//! recovery across many loans.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use hospital_payroll::api::{AppState, create_router};
use hospital_payroll::calculation::calculate_payroll;
use hospital_payroll::config::{ConfigLoader, PayrollPolicy};
use hospital_payroll::ledger::LoanLedger;
use hospital_payroll::models::{AttendanceRecord, Employee, EmployeeStatus, PayrollMonth};
use hospital_payroll::runner::{AdvanceSource, PayrollRunner};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn june() -> PayrollMonth {
    "2025-06".parse().expect("valid month")
}

fn create_employee(index: usize) -> Employee {
    Employee {
        id: format!("EMP{:04}", index),
        name: format!("Staff {}", index),
        department: (if index % 2 == 0 { "Nursing" } else { "Laboratory" }).to_string(),
        basic_salary: Decimal::from(12000 + (index as i64 % 20) * 1000),
        hra: Decimal::ZERO,
        conveyance: Decimal::ZERO,
        other_allowances: Decimal::ZERO,
        has_pf: true,
        has_esic: true,
        has_pt: true,
        advance: Decimal::ZERO,
        status: EmployeeStatus::Active,
    }
}

/// A June with offs, an absence and overtime.
fn june_marks() -> Vec<String> {
    let mut marks = vec!["OFF"; 4];
    marks.push("A");
    marks.extend(vec!["P+OT"; 3]);
    marks.extend(vec!["P"; 22]);
    marks.into_iter().map(String::from).collect()
}

fn create_runner(employee_count: usize) -> PayrollRunner {
    let mut runner = PayrollRunner::new(
        PayrollPolicy::default(),
        AdvanceSource::Ledger(LoanLedger::in_memory()),
    );
    let roster: Vec<Employee> = (0..employee_count).map(create_employee).collect();
    runner.set_roster(roster.clone());
    for (i, employee) in roster.iter().enumerate() {
        runner
            .record_attendance(AttendanceRecord::new(employee.id.clone(), june(), june_marks()))
            .expect("valid attendance");
        if i % 3 == 0 {
            runner
                .create_loan(&employee.id, Decimal::from(6000), 6, june())
                .expect("valid loan");
        }
    }
    runner
}

/// Benchmark: one employee through the calculation pipeline.
fn bench_single_employee(c: &mut Criterion) {
    let employee = create_employee(1);
    let record = AttendanceRecord::new(employee.id.clone(), june(), june_marks());
    let policy = PayrollPolicy::default();

    c.bench_function("single_employee", |b| {
        b.iter(|| {
            black_box(calculate_payroll(
                black_box(&employee),
                black_box(&record),
                Decimal::from(500),
                &policy,
            ))
        })
    });
}

/// Benchmark: the calculate endpoint, including JSON handling.
fn bench_calculate_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let config = ConfigLoader::load("./config/hospital").expect("Failed to load config");
    let router = create_router(AppState::new(
        config,
        AdvanceSource::Ledger(LoanLedger::in_memory()),
    ));
    let body = serde_json::json!({
        "employee": create_employee(1),
        "month": "2025-06",
        "marks": june_marks()
    })
    .to_string();

    c.bench_function("calculate_endpoint", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/payroll/calculate")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .expect("request"),
                )
                .await
                .expect("response");
            black_box(response)
        })
    });
}

/// Benchmark: draft runs over growing rosters.
fn bench_preview_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("preview_run");

    for size in [10usize, 100, 1000] {
        let mut runner = create_runner(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(runner.preview_run(june()).expect("preview")))
        });
    }

    group.finish();
}

/// Benchmark: one month of loan recovery for 1000 employees.
fn bench_ledger_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("apply_1000_employees", |b| {
        b.iter_batched(
            || {
                let mut ledger = LoanLedger::in_memory();
                for i in 0..1000 {
                    ledger
                        .create_loan(&format!("EMP{:04}", i), Decimal::from(12000), 12, june())
                        .expect("valid loan");
                }
                ledger
            },
            |mut ledger| {
                for i in 0..1000 {
                    black_box(
                        ledger
                            .apply_deduction(&format!("EMP{:04}", i), june())
                            .expect("apply"),
                    );
                }
            },
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_employee,
    bench_calculate_endpoint,
    bench_preview_run,
    bench_ledger_apply
);
criterion_main!(benches);
