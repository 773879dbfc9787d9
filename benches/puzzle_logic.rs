use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use guesseries::catalog::Catalog;
use guesseries::core::{ManualClock, Puzzle, PuzzleConfig};
use guesseries::types::{Episode, LocalizedString, Season, Series};

fn pool(n: u32) -> Vec<Episode> {
    (1..=n)
        .map(|k| Episode::new(format!("ep-{}", k), k, format!("Episode {}", k)))
        .collect()
}

fn puzzle(n: u32) -> Puzzle<StdRng, ManualClock> {
    Puzzle::with_sources(
        pool(n),
        PuzzleConfig::default(),
        StdRng::seed_from_u64(12345),
        ManualClock::new(0),
    )
    .unwrap()
}

fn bench_browse(c: &mut Criterion) {
    let mut p = puzzle(24);
    // Half the deck placed so browsing has to skip.
    for k in (1..=24).step_by(2) {
        p.place_in_slot(&format!("ep-{}", k), (k - 1) as usize);
    }

    c.bench_function("browse_next_24", |b| {
        b.iter(|| {
            p.browse_next();
        })
    });
}

fn bench_swap(c: &mut Criterion) {
    let mut p = puzzle(24);
    for k in 1..=24 {
        p.place_in_slot(&format!("ep-{}", k), (k - 1) as usize);
    }

    c.bench_function("swap_slots_24", |b| {
        b.iter(|| {
            p.place_in_slot(black_box("ep-1"), black_box(23));
        })
    });
}

fn bench_full_round(c: &mut Criterion) {
    c.bench_function("place_check_reveal_24", |b| {
        b.iter(|| {
            let mut p = puzzle(24);
            for k in 1..=24u32 {
                p.place_in_slot(&format!("ep-{}", k), (k - 1) as usize);
            }
            p.begin_check();
            p.tick(black_box(24 * 250));
            p.final_score()
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let p = puzzle(24);
    c.bench_function("snapshot_24", |b| b.iter(|| black_box(p.snapshot())));
}

fn bench_catalog_parse(c: &mut Criterion) {
    let series: Vec<Series> = (0..50)
        .map(|i| Series {
            id: format!("tt{:07}", i),
            title: LocalizedString::from(format!("Series {}", i)),
            year: Some("2010".to_string()),
            poster: String::new(),
            plot: LocalizedString::default(),
            seasons: (1..=5)
                .map(|s| Season {
                    season_number: s,
                    episodes: pool(12),
                })
                .collect(),
        })
        .collect();
    let json = Catalog::new(series).to_json_pretty().unwrap();

    c.bench_function("catalog_parse_lenient_50x5x12", |b| {
        b.iter(|| Catalog::from_json_lenient(black_box(&json)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_browse,
    bench_swap,
    bench_full_round,
    bench_snapshot,
    bench_catalog_parse
);
criterion_main!(benches);
