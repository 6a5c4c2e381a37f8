//! Benchmarks for the per-turn hot path: world advance and order handling.

#![allow(missing_docs)]

use std::fmt::Write as _;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use planetwars::game::{apply_orders, Fleet, Planet, Side, World};
use planetwars::protocol::{parse_orders, serialize_state};

/// A ring of planets split between the players, with fleets criss-crossing it.
fn create_busy_world(planets: usize, fleets: usize) -> World {
    let ring: Vec<Planet> = (0..planets)
        .map(|id| {
            let angle = id as f64 / planets as f64 * std::f64::consts::TAU;
            let owner = match id % 3 {
                0 => Side::Neutral,
                1 => Side::PlayerA,
                _ => Side::PlayerB,
            };
            Planet::new(id, 20.0 * angle.cos(), 20.0 * angle.sin(), owner, 100, 1 + (id as u32 % 5))
        })
        .collect();
    let in_flight = (0..fleets)
        .map(|i| {
            let source = &ring[i % planets];
            let destination = &ring[(i * 7 + 3) % planets];
            let owner = if i % 2 == 0 { Side::PlayerA } else { Side::PlayerB };
            Fleet::launch(owner, 5 + (i as u32 % 20), source, destination)
        })
        .collect();
    World::new(ring, in_flight)
}

fn bench_world_advance(c: &mut Criterion) {
    let world = create_busy_world(30, 200);

    c.bench_function("world_advance_30p_200f", |b| {
        b.iter(|| {
            let mut world = world.clone();
            for _ in 0..10 {
                world.advance();
            }
            black_box(world)
        });
    });
}

fn bench_serialize_state(c: &mut Criterion) {
    let world = create_busy_world(30, 200);

    c.bench_function("serialize_state_30p_200f", |b| {
        b.iter(|| black_box(serialize_state(black_box(&world), Side::PlayerB)));
    });
}

fn bench_parse_and_apply(c: &mut Criterion) {
    let world = create_busy_world(30, 0);
    let mut text = String::new();
    for source in (1..30).step_by(3) {
        for destination in [0, 2, 3] {
            let _ = writeln!(text, "{source} {destination} 3");
        }
    }
    text.push_str("go\n");

    c.bench_function("parse_and_apply_orders", |b| {
        b.iter(|| {
            let output = parse_orders(black_box(&text));
            let mut world = world.clone();
            let launched = apply_orders(&mut world, Side::PlayerA, &output.orders);
            black_box(launched)
        });
    });
}

criterion_group!(benches, bench_world_advance, bench_serialize_state, bench_parse_and_apply);
criterion_main!(benches);
