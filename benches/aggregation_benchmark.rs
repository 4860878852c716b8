use criterion::{criterion_group, criterion_main, Criterion as Bench};
use std::hint::black_box;
use tooleval::{
    aggregate, render_human, render_structured, CriteriaSet, Criterion, HumanFormat, Scale,
    ScoreTable, StructuredFormat, ToolScores,
};

fn create_inputs(tools: usize, criteria: usize) -> (CriteriaSet, ScoreTable) {
    let criteria_set = CriteriaSet::new(
        Scale::default(),
        (0..criteria)
            .map(|c| Criterion::new(format!("criterion_{c}"), (c + 1) as f64))
            .collect(),
    )
    .unwrap();

    let table = ScoreTable::new(
        (0..tools)
            .map(|t| {
                (0..criteria).fold(ToolScores::new(format!("tool_{t}")), |entry, c| {
                    entry.with_score(format!("criterion_{c}"), ((t + c) % 5 + 1) as f64)
                })
            })
            .collect(),
    );
    (criteria_set, table)
}

fn benchmark_aggregate(c: &mut Bench) {
    let (criteria, table) = create_inputs(200, 12);
    c.bench_function("aggregate_200_tools", |b| {
        b.iter(|| aggregate(black_box(&criteria), black_box(&table)).unwrap())
    });
}

fn benchmark_render(c: &mut Bench) {
    let (criteria, table) = create_inputs(200, 12);
    let evaluation = aggregate(&criteria, &table).unwrap();

    c.bench_function("render_json", |b| {
        b.iter(|| render_structured(black_box(&evaluation), StructuredFormat::Json, 3).unwrap())
    });
    c.bench_function("render_markdown", |b| {
        b.iter(|| render_human(black_box(&evaluation), HumanFormat::Markdown, 3).unwrap())
    });
}

criterion_group!(benches, benchmark_aggregate, benchmark_render);
criterion_main!(benches);
