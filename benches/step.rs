use criterion::*;
use std::hint::black_box;

use particula_rigid::domain::{Constraint, Sleep};
use particula_rigid::{PhysicsWorld, Vector};

const DT: f64 = 1.0 / 60.0;

fn pile(columns: usize, rows: usize) -> PhysicsWorld {
    let width = columns as f64 * 2.2 + 2.0;
    let mut world = PhysicsWorld::new(width, rows as f64 * 2.2 + 10.0);
    for x in 0..columns {
        for y in 0..rows {
            let id = world
                .spawn_circle(1.5 + x as f64 * 2.2, 1.0 + y as f64 * 2.05, 1.0, 1.0)
                .unwrap();
            world.set_velocity(id, Vector::new(0.0, -1.0));
        }
    }
    world
}

fn chain(links: usize) -> PhysicsWorld {
    let mut world = PhysicsWorld::new(links as f64 + 10.0, 50.0);
    let mut prev = world.spawn_circle(5.0, 40.0, 0.25, 0.0).unwrap();
    for i in 1..=links {
        let id = world.spawn_circle(5.0 + i as f64, 40.0, 0.25, 1.0).unwrap();
        let store = world.store_mut();
        store.remove::<Sleep>(id);
        let link = store.create();
        store.add(link, Constraint::rope(prev, id, 1.0)).unwrap();
        prev = id;
    }
    world
}

fn step_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for (columns, rows) in [(10, 10), (30, 30)] {
        group.bench_function(format!("pile_{columns}x{rows}"), |b| {
            b.iter_batched(
                || pile(columns, rows),
                |mut world| {
                    for _ in 0..10 {
                        world.step(DT);
                    }
                    black_box(world);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.bench_function("rope_chain_200", |b| {
        b.iter_batched(
            || chain(200),
            |mut world| {
                for _ in 0..10 {
                    world.step(DT);
                }
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, step_benchmark);
criterion_main!(benches);
