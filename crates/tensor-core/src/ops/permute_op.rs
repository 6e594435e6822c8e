// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Axis permutation (generalised transpose).

use crate::{shape::is_permutation, Tensor, TensorError, TensorView};

/// Reorders the axes of `input`: output axis `i` is input axis `axes[i]`.
///
/// The result is materialised in row-major order, so flattening it yields
/// the element sequence of the transposed tensor. For example a convolution
/// kernel stored as `(H, W, Cin, Cout)` becomes `(Cout, Cin, H, W)` with
/// `axes = [3, 2, 0, 1]`.
///
/// # Errors
/// Returns [`TensorError::InvalidPermutation`] if `axes` is not a
/// permutation of `0..rank`.
///
/// # Examples
/// ```
/// use tensor_core::{permute, Shape, Tensor};
/// let t = Tensor::from_f32(Shape::matrix(2, 3), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// let tt = permute(&t.view(), &[1, 0]).unwrap();
/// assert_eq!(tt.shape(), &Shape::matrix(3, 2));
/// assert_eq!(tt.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
/// ```
pub fn permute(input: &TensorView<'_>, axes: &[usize]) -> Result<Tensor, TensorError> {
    let rank = input.shape().rank();
    if !is_permutation(axes, rank) {
        return Err(TensorError::InvalidPermutation {
            axes: axes.to_vec(),
            rank,
        });
    }

    let in_dims = input.shape().dims();
    let in_strides = input.shape().strides();
    let out_dims: Vec<usize> = axes.iter().map(|&a| in_dims[a]).collect();
    // Source stride to advance one step along each *output* axis.
    let src_strides: Vec<usize> = axes.iter().map(|&a| in_strides[a]).collect();

    let out_shape = crate::Shape::new(out_dims.clone());
    let n = out_shape.num_elements();
    let src = input.as_slice();
    let mut out = Vec::with_capacity(n);

    if n > 0 {
        // Odometer over output coordinates, tracking the matching source offset.
        let mut index = vec![0usize; rank];
        let mut offset = 0usize;
        for _ in 0..n {
            out.push(src[offset]);
            for axis in (0..rank).rev() {
                index[axis] += 1;
                offset += src_strides[axis];
                if index[axis] < out_dims[axis] {
                    break;
                }
                offset -= src_strides[axis] * out_dims[axis];
                index[axis] = 0;
            }
        }
    }

    Tensor::from_vec(out_shape, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    /// Reference implementation: element at output coordinate `c` is the
    /// input element at the coordinate obtained by scattering `c` through `axes`.
    fn reference(input: &Tensor, axes: &[usize]) -> Vec<f32> {
        let dims = input.shape().dims();
        let out_shape = input.shape().permuted(axes).unwrap();
        let out_dims = out_shape.dims().to_vec();
        let strides = input.shape().strides();
        let mut result = Vec::new();
        for flat in 0..out_shape.num_elements() {
            let mut rem = flat;
            let mut coord = vec![0; out_dims.len()];
            for i in (0..out_dims.len()).rev() {
                coord[i] = rem % out_dims[i];
                rem /= out_dims[i];
            }
            let mut src = vec![0; dims.len()];
            for (i, &a) in axes.iter().enumerate() {
                src[a] = coord[i];
            }
            let offset: usize = src.iter().zip(&strides).map(|(c, s)| c * s).sum();
            result.push(input.as_slice()[offset]);
        }
        result
    }

    #[test]
    fn test_transpose_2d() {
        let t = Tensor::from_f32(Shape::matrix(2, 3), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let out = permute(&t.view(), &[1, 0]).unwrap();
        assert_eq!(out.shape(), &Shape::matrix(3, 2));
        assert_eq!(out.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_identity_permutation() {
        let t = Tensor::from_fn(Shape::new(vec![2, 3, 4]), |i| i as f32);
        let out = permute(&t.view(), &[0, 1, 2]).unwrap();
        assert_eq!(out, t);
    }

    #[test]
    fn test_conv_kernel_layouts_match_reference() {
        for &(h, w, cin, cout) in &[(1, 1, 1, 1), (3, 3, 2, 4), (2, 5, 3, 1), (1, 2, 1, 3)] {
            let t = Tensor::from_fn(Shape::new(vec![h, w, cin, cout]), |i| i as f32);
            for axes in [[3, 2, 0, 1], [2, 3, 0, 1]] {
                let out = permute(&t.view(), &axes).unwrap();
                assert_eq!(out.as_slice(), reference(&t, &axes).as_slice());
            }
        }
    }

    #[test]
    fn test_scalar() {
        let t = Tensor::from_f32(Shape::scalar(), &[4.0]).unwrap();
        let out = permute(&t.view(), &[]).unwrap();
        assert_eq!(out.as_slice(), &[4.0]);
    }

    #[test]
    fn test_zero_extent() {
        let t = Tensor::zeros(Shape::new(vec![2, 0, 3]));
        let out = permute(&t.view(), &[2, 1, 0]).unwrap();
        assert_eq!(out.shape(), &Shape::new(vec![3, 0, 2]));
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_axes() {
        let t = Tensor::zeros(Shape::matrix(2, 2));
        assert!(matches!(
            permute(&t.view(), &[0, 0]),
            Err(TensorError::InvalidPermutation { rank: 2, .. })
        ));
        assert!(permute(&t.view(), &[0, 1, 2]).is_err());
    }
}
