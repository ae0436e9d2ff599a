//! Simulation Benchmark Suite
//!
//! # Scenarios
//!
//! 1. **Independent tasks**: ample capacity, no blocking
//!    - Measures raw dispatch overhead per row
//!
//! 2. **Dining philosophers**: N tasks, N single-unit resources
//!    - Every task blocks on row 2, one abort breaks the cycle
//!
//! 3. **Sequential bottleneck**: all tasks compete for one unit
//!    - Long blocked sets, repeated deadlock detection

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rmsim_engine::domain::{Schedule, ScheduleBuilder, Simulator};
use rmsim_engine::{ResourceId, TaskId};

fn independent(tasks: usize) -> Schedule {
    let r0 = ResourceId::new(0);
    let capacity = u32::try_from(tasks).unwrap();
    (0..tasks)
        .fold(ScheduleBuilder::new(tasks, vec![capacity]), |builder, i| {
            builder.group(TaskId::new(i), |g| {
                g.initiate(r0, 1)
                    .request(r0, 1)
                    .compute(2)
                    .release(r0, 1)
                    .terminate()
            })
        })
        .build()
}

fn dining_philosophers(tasks: usize) -> Schedule {
    (0..tasks)
        .fold(ScheduleBuilder::new(tasks, vec![1; tasks]), |builder, i| {
            let left = ResourceId::new(i);
            let right = ResourceId::new((i + 1) % tasks);
            builder.group(TaskId::new(i), |g| {
                g.initiate(left, 1)
                    .request(left, 1)
                    .request(right, 1)
                    .compute(1)
                    .terminate()
            })
        })
        .build()
}

fn bottleneck(tasks: usize) -> Schedule {
    let r0 = ResourceId::new(0);
    (0..tasks)
        .fold(ScheduleBuilder::new(tasks, vec![1]), |builder, i| {
            builder.group(TaskId::new(i), |g| {
                g.initiate(r0, 1).request(r0, 1).request(r0, 1).terminate()
            })
        })
        .build()
}

fn run(schedule: &Schedule) -> usize {
    let mut sim = Simulator::new(schedule.clone()).unwrap();
    sim.run().unwrap().aborted_tasks
}

fn bench_scenarios(c: &mut Criterion) {
    let scenarios: [(&str, fn(usize) -> Schedule); 3] = [
        ("independent", independent),
        ("dining_philosophers", dining_philosophers),
        ("bottleneck", bottleneck),
    ];

    for (name, build) in scenarios {
        let mut group = c.benchmark_group(name);
        for tasks in [10, 50, 100] {
            let schedule = build(tasks);
            group.bench_with_input(BenchmarkId::from_parameter(tasks), &schedule, |b, s| {
                b.iter(|| run(black_box(s)));
            });
        }
        group.finish();
    }
}

fn bench_reset_and_rerun(c: &mut Criterion) {
    let mut sim = Simulator::new(dining_philosophers(50)).unwrap();
    c.bench_function("reset_and_rerun/dining_philosophers_50", |b| {
        b.iter(|| {
            sim.reset();
            black_box(sim.run().unwrap());
        });
    });
}

criterion_group!(benches, bench_scenarios, bench_reset_and_rerun);
criterion_main!(benches);
