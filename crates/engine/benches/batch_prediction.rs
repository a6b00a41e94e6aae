//! Benchmarks for single versus batch prediction
//!
//! Run with: cargo bench --package engine
//!
//! Uses a synthetic catalog: 2,000 movies and a user with 400 ratings and
//! 200 watch signals. Profile caching is off so every single-item call
//! pays for aggregation, as a cold caller would.

use catalog::{CatalogIndex, CatalogItem, ExplicitRating, HistoryAccessor, ImplicitSignal, MediaType};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::{build_taste_profile, EngineConfig, PreferencePredictor};
use std::sync::Arc;

const ITEMS: u32 = 2_000;
const CANDIDATES: usize = 100;

fn build_test_index() -> Arc<CatalogIndex> {
    let genres = [28, 12, 16, 35, 80, 18, 14, 27, 9648, 10749, 878, 53];
    let mut index = CatalogIndex::new();

    for id in 1..=ITEMS {
        let g = id as usize;
        index.insert_item(
            CatalogItem::new(id, MediaType::Movie, format!("Movie {id}"))
                .with_genres([genres[g % genres.len()], genres[(g * 7) % genres.len()]])
                .with_talent([
                    format!("director:Director {}", id % 150),
                    format!("actor:Actor {}", id % 400),
                    format!("actor:Actor {}", (id * 3) % 400),
                ])
                .with_release_year(1960 + (id % 65) as u16)
                .with_runtime(80 + id % 90)
                .with_keywords([format!("theme{}", id % 60), format!("theme{}", id % 17)])
                .with_language(if id % 5 == 0 { "fr" } else { "en" })
                .with_countries([if id % 5 == 0 { "FR" } else { "US" }])
                .with_popularity((id % 200) as f32)
                .with_votes(5.0 + (id % 40) as f32 / 10.0, 100 + id)
                .with_critics(Some("7.1"), Some("68"), None),
        );
    }

    for id in 1..=400 {
        let value = 20.0 + ((id * 37) % 80) as f32;
        index.insert_rating(ExplicitRating::new("bench", id * 3, value));
    }
    for id in 1..=200 {
        index.insert_signal(ImplicitSignal::new("bench", id * 5 + 1, id as i64));
    }

    Arc::new(index)
}

fn uncached_predictor(index: &Arc<CatalogIndex>) -> PreferencePredictor {
    PreferencePredictor::new(
        index.clone(),
        index.clone(),
        EngineConfig::new(2025).with_cache_capacity(0),
    )
}

fn bench_single_predictions(c: &mut Criterion) {
    let index = build_test_index();
    let predictor = uncached_predictor(&index);
    let candidates: Vec<&CatalogItem> = index.items().into_iter().take(CANDIDATES).collect();

    c.bench_function("predict_single_x100", |b| {
        b.iter(|| {
            for item in &candidates {
                black_box(predictor.predict(black_box(item), "bench"));
            }
        })
    });
}

fn bench_batch_prediction(c: &mut Criterion) {
    let index = build_test_index();
    let predictor = uncached_predictor(&index);
    let candidates: Vec<&CatalogItem> = index.items().into_iter().take(CANDIDATES).collect();

    c.bench_function("predict_batch_x100", |b| {
        b.iter(|| black_box(predictor.predict_batch(black_box(&candidates), "bench")))
    });
}

fn bench_build_taste_profile(c: &mut Criterion) {
    let index = build_test_index();
    let config = EngineConfig::new(2025);
    let history = index.history("bench");

    c.bench_function("build_taste_profile", |b| {
        b.iter(|| {
            let profile = build_taste_profile("bench", black_box(&history), &*index, &config);
            black_box(profile)
        })
    });
}

criterion_group!(
    benches,
    bench_single_predictions,
    bench_batch_prediction,
    bench_build_taste_profile
);
criterion_main!(benches);
