//! Benchmarks for the projection and valuation hot path.

#![allow(missing_docs)]

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fd_valuation::{
    ProjectionMode, ScenarioSet, ValuationInputs, project, projection::Endpoints, value_company,
};

fn inputs(years: usize) -> ValuationInputs {
    let mode = ProjectionMode::Simple {
        growth_rate: Endpoints::new(0.12, 0.03),
        ebit_margin: Endpoints::new(0.15, 0.22),
        reinvestment_rate: Endpoints::new(0.40, 0.25),
    };
    let assumptions = project(1000.0, &mode, years).expect("valid projection");

    ValuationInputs {
        starting_revenue: 1000.0,
        assumptions,
        wacc: ScenarioSet::new(0.07, 0.08, 0.095),
        terminal_growth_rate: 0.025,
        tax_rate: 0.21,
        net_debt: 150.0,
        shares_outstanding: 100.0,
    }
}

fn bench_project(c: &mut Criterion) {
    let mode = ProjectionMode::Simple {
        growth_rate: Endpoints::new(0.12, 0.03),
        ebit_margin: Endpoints::new(0.15, 0.22),
        reinvestment_rate: Endpoints::new(0.40, 0.25),
    };
    c.bench_function("project_15y", |b| {
        b.iter(|| project(black_box(1000.0), black_box(&mode), 15))
    });
}

fn bench_value_company(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_company");
    for years in [5, 10, 15] {
        let inputs = inputs(years);
        group.bench_function(format!("{years}y"), |b| {
            b.iter(|| value_company(black_box(&inputs)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_project, bench_value_company);
criterion_main!(benches);
