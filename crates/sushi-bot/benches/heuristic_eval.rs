use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sushi_bot::heuristic::{StateHeuristic, SushiHeuristic};
use sushi_core::game::{ApplyAction, Determinize, PlayCard, TableState};
use sushi_core::model::player::PlayerId;

fn played_table(seed: u64) -> TableState {
    let mut table = TableState::with_seed(4, seed).expect("four seats");
    for player in PlayerId::all(4) {
        let cards: Vec<_> = table
            .hand(player)
            .map(|hand| hand.iter().copied().take(4).collect())
            .unwrap_or_default();
        for card in cards {
            let _ = PlayCard::new(player, card).apply_to(&mut table);
        }
    }
    table
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristic_eval");
    let heuristic = SushiHeuristic::default();
    let me = PlayerId::new(0);

    for seed in [7u64, 42, 8675309] {
        let table = played_table(seed);
        group.bench_function(format!("evaluate_seed{seed}"), |b| {
            b.iter(|| heuristic.evaluate(black_box(&table), black_box(me)))
        });
    }

    let table = played_table(42);
    group.bench_function("determinize_then_evaluate", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter_batched(
            || table.determinize(me, &mut rng),
            |world| {
                if let Ok(world) = world {
                    black_box(heuristic.evaluate(&world, me));
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
