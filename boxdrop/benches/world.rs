// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for the per-frame work
//!
//! These benchmarks measure:
//! - Stepping a world with many resting and falling boxes
//! - Body creation cost
//! - Rendering a full frame into the software framebuffer

use boxdrop::config::WorldConfig;
use boxdrop::coords::ScreenState;
use boxdrop::render::{render_frame, Framebuffer};
use boxdrop::world::{BodyKind, WorldManager};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Fill the world with a grid of boxes above the platform
fn populated_world(count: usize) -> WorldManager {
    let mut world = WorldManager::initialize(&WorldConfig::default());
    for i in 0..count {
        let x = 1.0 + (i % 50) as f32 * 0.6;
        let y = 3.0 + (i / 50) as f32 * 0.6;
        world.spawn_rectangle(x, y, 0.5, 0.5, BodyKind::Dynamic);
    }
    world
}

/// Benchmark: One fixed step with N boxes
fn bench_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");

    for body_count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*body_count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(body_count), body_count, |b, &count| {
            let mut world = populated_world(count);
            // let the pile settle so steady-state contact solving is measured
            for _ in 0..120 {
                world.step();
            }
            b.iter(|| world.step());
        });
    }

    group.finish();
}

/// Benchmark: Spawning boxes into a fresh world
fn bench_spawn(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_rectangle");

    for body_count in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*body_count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(body_count), body_count, |b, &count| {
            b.iter(|| black_box(populated_world(count)));
        });
    }

    group.finish();
}

/// Benchmark: Clear, draw every body, present
fn bench_render_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_frame");
    let screen = ScreenState::new(1280, 1024, 40.0);

    for body_count in [10, 100, 1000].iter() {
        let world = populated_world(*body_count);
        let mut canvas = Framebuffer::new(1280, 1024);
        group.bench_with_input(BenchmarkId::from_parameter(body_count), body_count, |b, _| {
            b.iter(|| render_frame(black_box(&world), &screen, &mut canvas));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_world_step, bench_spawn, bench_render_frame);
criterion_main!(benches);
