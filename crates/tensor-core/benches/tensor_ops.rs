// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for tensor relayout operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tensor_core::{permute, split_blocks, Shape, Tensor};

fn bench_permute(c: &mut Criterion) {
    let mut group = c.benchmark_group("permute_conv_kernel");
    for &(k, cin, cout) in &[(3usize, 16usize, 32usize), (3, 64, 64), (5, 128, 128)] {
        let t = Tensor::from_fn(Shape::new(vec![k, k, cin, cout]), |i| i as f32);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{k}x{k}x{cin}x{cout}")),
            &t,
            |b, t| b.iter(|| permute(black_box(&t.view()), &[3, 2, 0, 1])),
        );
    }
    group.finish();
}

fn bench_split_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_lstm_gates");
    for &(hidden, input) in &[(64usize, 64usize), (256, 128), (512, 512)] {
        let t = Tensor::from_fn(Shape::matrix(4 * hidden, input), |i| i as f32);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("h{hidden}_x{input}")),
            &t,
            |b, t| b.iter(|| split_blocks(black_box(&t.view()), 4, hidden)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_permute, bench_split_blocks);
criterion_main!(benches);
