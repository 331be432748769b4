//! Performance benchmarks for the payroll engine.
//!
//! Covers the pure statutory calculation, deduction validation, and the
//! HTTP round trip through the router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use kenya_payroll_engine::api::{create_router, AppState};
use kenya_payroll_engine::calculation::{
    compute_all_statutory_deductions, validate_deduction_amount, DeductionContext,
};
use kenya_payroll_engine::config::{ConfigLoader, RateProvider};
use kenya_payroll_engine::repository::MemoryStore;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/kenya").expect("Failed to load config")
}

fn pay_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
}

/// Gross salaries spread across every PAYE band and NHIF row.
fn salary_range(count: usize) -> Vec<Decimal> {
    (0..count)
        .map(|i| Decimal::from(5_000 + (i as i64 * 7_919) % 995_000))
        .collect()
}

fn bench_statutory_single(c: &mut Criterion) {
    let config = load_config();
    let rates = config.rates_for(pay_date()).unwrap();
    let gross = Decimal::from_str("150000").unwrap();

    c.bench_function("statutory_single_150k", |b| {
        b.iter(|| compute_all_statutory_deductions(black_box(gross), black_box(gross), rates))
    });
}

fn bench_statutory_batch(c: &mut Criterion) {
    let config = load_config();
    let rates = config.rates_for(pay_date()).unwrap();

    let mut group = c.benchmark_group("statutory_batch");
    for size in [10usize, 100, 1000] {
        let salaries = salary_range(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &salaries, |b, salaries| {
            b.iter(|| {
                for gross in salaries {
                    let _ = black_box(compute_all_statutory_deductions(*gross, *gross, rates));
                }
            })
        });
    }
    group.finish();
}

fn bench_deduction_validation(c: &mut Criterion) {
    let config = load_config();
    let rates = config.rates_for(pay_date()).unwrap();
    let context = DeductionContext {
        gross_salary: Decimal::from(85_000),
        basic_salary: Decimal::from(70_000),
        rates,
        catalog: config.deductions(),
    };

    let mut group = c.benchmark_group("deduction_validation");
    for (deduction_type, amount) in [("sacco", 12_000), ("paye", 15_000), ("nhif", 1_300)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(deduction_type),
            &Decimal::from(amount),
            |b, amount| b.iter(|| validate_deduction_amount(deduction_type, black_box(*amount), &context)),
        );
    }
    group.finish();
}

fn bench_http_statutory(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(AppState::new(load_config(), MemoryStore::default()));
    let body = serde_json::json!({
        "gross_salary": "150000",
        "basic_salary": "150000",
        "pay_date": "2024-03-31"
    })
    .to_string();

    c.bench_function("http_statutory_150k", |b| {
        b.to_async(&rt).iter(|| {
            let router = router.clone();
            let body = body.clone();
            async move {
                let response = router
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/deductions/statutory")
                            .header("Content-Type", "application/json")
                            .body(Body::from(body))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                black_box(axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap())
            }
        })
    });
}

criterion_group!(
    benches,
    bench_statutory_single,
    bench_statutory_batch,
    bench_deduction_validation,
    bench_http_statutory
);
criterion_main!(benches);
