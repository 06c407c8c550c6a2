// Performance benchmarks for likeday ranking over realistic pool sizes
use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use likeday::prelude::*;
use likeday::{DayRecordSet, HourlyRecord};
use likeday_similarity::{CandidatePool, SimilarityRanker};
use rand::prelude::*;

const POOL_SIZES: [usize; 3] = [300, 1000, 3000];

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
}

fn generate_random_profile(rng: &mut impl Rng) -> [f64; 24] {
    let level: f64 = rng.random_range(15_000.0..45_000.0);
    let mut profile = [0.0; 24];
    for (h, v) in profile.iter_mut().enumerate() {
        let x = (h as f64 - 16.0) / 5.0;
        *v = level * (0.7 + 0.3 * (-x * x).exp()) + rng.random_range(-500.0..500.0);
    }
    profile
}

fn generate_pool(size: usize) -> (DayVector, CandidatePool) {
    let mut rng = rand::rng();
    let vectors: Vec<DayVector> = (0..size)
        .map(|i| {
            let day = start_date() + Days::new(i as u64);
            DayVector::new(day, MatchVariable::RtLoad, generate_random_profile(&mut rng))
        })
        .collect();
    let reference_day = start_date() + Days::new(size as u64);
    let reference = DayVector::new(reference_day, MatchVariable::RtLoad, generate_random_profile(&mut rng));
    let pool = CandidatePool::from_vectors(MatchVariable::RtLoad, reference_day, vectors);
    (reference, pool)
}

fn generate_records(size: usize) -> DayRecordSet {
    let mut rng = rand::rng();
    let mut set = DayRecordSet::new();
    for i in 0..=size {
        let day = start_date() + Days::new(i as u64);
        let load = generate_random_profile(&mut rng);
        let lmp = generate_random_profile(&mut rng);
        for h in 0..24 {
            set.push(
                day,
                HourlyRecord::new(h as u8 + 1)
                    .with_field("CAISO_RTLOAD_MW", load[h])
                    .with_field("SP15_RTLMP", lmp[h] / 1_000.0),
            );
        }
    }
    set
}

fn benchmark_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for size in POOL_SIZES.iter() {
        let (reference, pool) = generate_pool(*size);

        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
            let ranker = SimilarityRanker::new(10, 0.5).unwrap().with_parallel_threshold(usize::MAX);
            b.iter(|| black_box(ranker.rank(&reference, &pool).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), size, |b, _| {
            let ranker = SimilarityRanker::new(10, 0.5).unwrap().with_parallel_threshold(1);
            b.iter(|| black_box(ranker.rank(&reference, &pool).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for size in POOL_SIZES.iter() {
        let engine = LikedayEngine::new(InMemorySource::new(generate_records(*size)));
        let end = start_date() + Days::new(*size as u64 - 1);
        let reference = start_date() + Days::new(*size as u64);
        let request = AnalysisRequest::new(reference, start_date(), end, MatchVariable::RtLoad);

        group.bench_with_input(BenchmarkId::new("likeday", size), size, |b, _| {
            b.iter(|| black_box(engine.analyze(&request).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");

    let size = 1000;
    let engine = LikedayEngine::new(InMemorySource::new(generate_records(size)));
    let reference = start_date() + Days::new(size as u64);
    let end = start_date() + Days::new(size as u64 - 1);
    let request = AnalysisRequest::new(reference, start_date(), end, MatchVariable::RtLoad).with_top_n(30);
    let result = engine.analyze(&request).unwrap();

    group.bench_function("cached_rt_load", |b| {
        b.iter(|| black_box(engine.project(&result, &MatchVariable::RtLoad).unwrap()));
    });
    group.bench_function("rt_lmp_from_chart_rows", |b| {
        b.iter(|| black_box(engine.project(&result, &MatchVariable::RtLmp).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, benchmark_rank, benchmark_analyze, benchmark_project);
criterion_main!(benches);
