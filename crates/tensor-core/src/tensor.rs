// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type and view abstractions.

use crate::{Shape, TensorError};

/// An owned, n-dimensional `f32` tensor stored in contiguous memory.
///
/// `Tensor` is how callers hand parameter data (weights, biases, per-channel
/// vectors) to the model builder, in the caller's native layout.
///
/// # Memory Layout
/// Data is stored in row-major (C) order: the last axis varies fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::zeros(Shape::matrix(2, 3));
    /// assert_eq!(t.len(), 6);
    /// ```
    pub fn zeros(shape: Shape) -> Self {
        let n = shape.num_elements();
        Self {
            shape,
            data: vec![0.0; n],
        }
    }

    /// Creates a tensor that takes ownership of `data`.
    ///
    /// Returns an error if `data.len()` does not match `shape.num_elements()`.
    pub fn from_vec(shape: Shape, data: Vec<f32>) -> Result<Self, TensorError> {
        let expected = shape.num_elements();
        if data.len() != expected {
            return Err(TensorError::ElementCountMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Creates a tensor from a slice of `f32` values.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::from_f32(Shape::matrix(3, 2), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    /// assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// ```
    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self, TensorError> {
        Self::from_vec(shape, values.to_vec())
    }

    /// Creates a 1-D tensor holding `values`.
    pub fn vector(values: &[f32]) -> Self {
        Self {
            shape: Shape::vector(values.len()),
            data: values.to_vec(),
        }
    }

    /// Creates a tensor whose element at flat index `i` is `f(i)`.
    pub fn from_fn(shape: Shape, f: impl FnMut(usize) -> f32) -> Self {
        let data = (0..shape.num_elements()).map(f).collect();
        Self { shape, data }
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns an immutable view over this tensor's data.
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            shape: self.shape.clone(),
            data: &self.data,
        }
    }

    /// Returns the flat, row-major element slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the flat, row-major element slice mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the tensor and returns its flat element buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Returns `true` if at least one element is non-zero.
    pub fn any_nonzero(&self) -> bool {
        self.data.iter().any(|&x| x != 0.0)
    }

    /// Fills the tensor with a constant value.
    pub fn fill(&mut self, value: f32) {
        self.data.iter_mut().for_each(|x| *x = value);
    }
}

/// A borrowed, read-only view over a [`Tensor`]'s data.
///
/// The view carries its own [`Shape`], so the same buffer can be looked at
/// with a different (element-count-preserving) shape via
/// [`reshape`](TensorView::reshape) or [`flatten`](TensorView::flatten).
#[derive(Debug, Clone)]
pub struct TensorView<'a> {
    shape: Shape,
    data: &'a [f32],
}

impl<'a> TensorView<'a> {
    /// Creates a view from raw parts.
    ///
    /// Returns an error if `data.len()` does not match the shape.
    pub fn from_parts(shape: Shape, data: &'a [f32]) -> Result<Self, TensorError> {
        let expected = shape.num_elements();
        if data.len() != expected {
            return Err(TensorError::ElementCountMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Returns the shape of the view.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the flat element slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the same data seen with a different shape.
    pub fn reshape(&self, shape: Shape) -> Result<TensorView<'a>, TensorError> {
        TensorView::from_parts(shape, self.data)
    }

    /// Returns the same data seen as a 1-D vector.
    pub fn flatten(&self) -> TensorView<'a> {
        TensorView {
            shape: Shape::vector(self.data.len()),
            data: self.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let t = Tensor::zeros(Shape::matrix(2, 3));
        assert_eq!(t.len(), 6);
        assert_eq!(t.shape(), &Shape::matrix(2, 3));
        assert!(!t.any_nonzero());
    }

    #[test]
    fn test_from_f32() {
        let data = vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let t = Tensor::from_f32(Shape::matrix(2, 3), &data).unwrap();
        assert_eq!(t.as_slice(), &data);
    }

    #[test]
    fn test_from_vec_count_mismatch() {
        let result = Tensor::from_vec(Shape::matrix(2, 3), vec![0.0; 5]);
        assert!(matches!(
            result,
            Err(TensorError::ElementCountMismatch {
                expected: 6,
                actual: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_from_fn() {
        let t = Tensor::from_fn(Shape::vector(4), |i| i as f32 * 2.0);
        assert_eq!(t.as_slice(), &[0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_any_nonzero() {
        let mut t = Tensor::zeros(Shape::vector(3));
        assert!(!t.any_nonzero());
        t.as_mut_slice()[2] = -0.5;
        assert!(t.any_nonzero());
    }

    #[test]
    fn test_view_flatten_and_reshape() {
        let t = Tensor::from_f32(Shape::new(vec![1, 2, 3]), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        let v = t.view();
        assert_eq!(v.flatten().shape(), &Shape::vector(6));

        let m = v.reshape(Shape::matrix(3, 2)).unwrap();
        assert_eq!(m.shape(), &Shape::matrix(3, 2));
        assert_eq!(m.as_slice(), t.as_slice());

        assert!(v.reshape(Shape::matrix(4, 2)).is_err());
    }

    #[test]
    fn test_fill() {
        let mut t = Tensor::zeros(Shape::vector(5));
        t.fill(3.5);
        assert!(t.as_slice().iter().all(|&x| x == 3.5));
    }

    #[test]
    fn test_into_vec() {
        let t = Tensor::vector(&[7.0, 8.0]);
        assert_eq!(t.into_vec(), vec![7.0, 8.0]);
    }
}
