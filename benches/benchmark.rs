use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use season_core::config::SimulationConfig;
use season_core::game::{GameRecord, Phase, ResultKind};
use season_core::league::{nhl_divisions, League};
use season_core::prior::PriorRatings;
use season_core::rating::{update_rating, win_expectation};
use season_core::simulator::SeasonSimulator;
use std::sync::atomic::AtomicBool;

/// Every team hosts every other team once; the first half of the dates are
/// played with the home side winning by one.
fn create_nhl_season(league: &League) -> Vec<GameRecord> {
    let start = NaiveDate::from_ymd_opt(2017, 10, 4).unwrap();
    let mut records = Vec::new();

    for (i, home) in league.team_ids().enumerate() {
        for away in league.team_ids().filter(|&t| t != home) {
            let played = i < league.len() / 2;
            records.push(GameRecord {
                date: start + Days::new((i * 5) as u64),
                phase: Phase::Regular,
                result: if played { ResultKind::Regulation } else { ResultKind::NotPlayed },
                home_team: league.name(home).to_string(),
                away_team: league.name(away).to_string(),
                home_goals: if played { 3 } else { 0 },
                away_goals: if played { 2 } else { 0 },
            });
        }
    }

    records
}

fn create_simulator(trials: usize) -> SeasonSimulator {
    let league = League::new(nhl_divisions()).unwrap();
    let records = create_nhl_season(&league);
    let config = SimulationConfig {
        trials,
        seed: Some(42),
        today: NaiveDate::from_ymd_opt(2018, 1, 1),
        ..SimulationConfig::default()
    };
    SeasonSimulator::new(league, &records, &PriorRatings::new(), config).unwrap()
}

fn bench_rating_model(c: &mut Criterion) {
    c.bench_function("win_expectation", |b| {
        b.iter(|| win_expectation(black_box(1550.0), black_box(1450.0)))
    });

    c.bench_function("update_rating", |b| {
        b.iter(|| {
            update_rating(
                black_box(1550.0),
                black_box(1450.0),
                1.0,
                0.64,
                3,
                Phase::Regular,
            )
        })
    });
}

fn bench_trials(c: &mut Criterion) {
    let simulator = create_simulator(1000);

    c.bench_function("season_single_trial", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        b.iter(|| black_box(&simulator).run_trial(&mut rng).unwrap())
    });

    c.bench_function("season_1000_trials_parallel", |b| {
        let cancel = AtomicBool::new(false);
        b.iter(|| black_box(&simulator).run_trials(1000, &cancel).unwrap())
    });
}

criterion_group!(benches, bench_rating_model, bench_trials);
criterion_main!(benches);
