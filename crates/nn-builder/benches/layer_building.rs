// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for adding weight-carrying layers and encoding the document.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use model_spec::Message;
use nn_builder::{
    BorderMode, ConvolutionParams, DenseParams, LstmWeights, NetworkMode, NeuralNetworkBuilder,
    UniLstmParams,
};
use tensor_core::{Shape, Tensor};

fn builder() -> NeuralNetworkBuilder {
    NeuralNetworkBuilder::new(
        &[("x", Shape::new(vec![3, 32, 32]))],
        &[("y", Shape::vector(10))],
        NetworkMode::Plain,
    )
    .unwrap()
}

fn bench_add_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_convolution");
    for &(k, cin, cout) in &[(3usize, 16usize, 32usize), (3, 64, 64), (5, 128, 128)] {
        let kernel = Tensor::from_fn(Shape::new(vec![k, k, cin, cout]), |i| i as f32);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{k}x{k}x{cin}x{cout}")),
            &kernel,
            |b, kernel| {
                b.iter(|| {
                    let mut nn = builder();
                    let params = ConvolutionParams {
                        kernel_channels: cin,
                        output_channels: cout,
                        height: k,
                        width: k,
                        stride_height: 1,
                        stride_width: 1,
                        border_mode: BorderMode::Same,
                        groups: 1,
                        weights: black_box(kernel),
                        bias: None,
                        is_deconv: false,
                        output_shape: None,
                    };
                    nn.add_convolution("conv", params, "x", "y").unwrap();
                    nn
                })
            },
        );
    }
    group.finish();
}

fn bench_add_unilstm(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_unilstm");
    for &(hidden, input) in &[(64usize, 64usize), (256, 128)] {
        let w_x = Tensor::from_fn(Shape::matrix(4 * hidden, input), |i| i as f32);
        let w_h = Tensor::from_fn(Shape::matrix(4 * hidden, hidden), |i| i as f32);
        let bias = Tensor::vector(&vec![0.1; 4 * hidden]);
        group.bench_function(BenchmarkId::from_parameter(format!("h{hidden}_x{input}")), |b| {
            b.iter(|| {
                let mut nn = builder();
                let weights = LstmWeights {
                    bias: Some(&bias),
                    ..LstmWeights::new(black_box(&w_h), black_box(&w_x))
                };
                nn.add_unilstm("lstm", UniLstmParams::new(hidden, input, weights), &["x"], &["y"])
                    .unwrap();
                nn
            })
        });
    }
    group.finish();
}

fn bench_encode_document(c: &mut Criterion) {
    let mut nn = builder();
    let w = Tensor::from_fn(Shape::matrix(3072, 10), |i| i as f32);
    nn.add_inner_product("fc", DenseParams::new(3072, 10, &w, None), "x", "y")
        .unwrap();
    let model = nn.finish();
    c.bench_function("encode_document", |b| {
        b.iter(|| black_box(&model).encode_to_vec())
    });
}

criterion_group!(
    benches,
    bench_add_convolution,
    bench_add_unilstm,
    bench_encode_document
);
criterion_main!(benches);
