use crate::error::{Error, Result};
use crate::shape::Shape;
use crate::tensor::Tensor;

// Elementwise, matrix, and reduction arithmetic.
//
// Binary tensor-tensor operations broadcast both operands to a common shape
// first (see `Tensor::broadcast`), then combine element-by-element; the
// output shape is the broadcast shape. Scalar variants apply the scalar to
// every element without reshaping. All accumulation orders are fixed so
// results are bit-reproducible.

impl Tensor {
    /// Broadcast both operands and combine them elementwise with `f`.
    ///
    /// Equal shapes take a fast path that skips the broadcast copies.
    fn binary_op(&self, rhs: &Tensor, f: impl Fn(f32, f32) -> f32) -> Result<Tensor> {
        if self.shape == rhs.shape {
            let data = self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect();
            return Ok(Tensor {
                data,
                shape: self.shape.clone(),
            });
        }
        let (a, b) = Tensor::broadcast(self, rhs)?;
        let data = a
            .data
            .iter()
            .zip(b.data.iter())
            .map(|(&x, &y)| f(x, y))
            .collect();
        Ok(Tensor {
            data,
            shape: a.shape,
        })
    }

    /// Apply `f` to every element, preserving the shape.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Tensor {
        Tensor {
            data: self.data.iter().map(|&v| f(v)).collect(),
            shape: self.shape.clone(),
        }
    }

    // Elementwise arithmetic

    /// Elementwise negation.
    pub fn neg(&self) -> Tensor {
        self.map(|v| -v)
    }

    /// Elementwise addition with broadcasting.
    pub fn add(&self, rhs: &Tensor) -> Result<Tensor> {
        self.binary_op(rhs, |a, b| a + b)
    }

    /// Elementwise subtraction, defined as `add(self, neg(rhs))`.
    pub fn sub(&self, rhs: &Tensor) -> Result<Tensor> {
        self.add(&rhs.neg())
    }

    /// Elementwise multiplication with broadcasting.
    pub fn mul(&self, rhs: &Tensor) -> Result<Tensor> {
        self.binary_op(rhs, |a, b| a * b)
    }

    /// Elementwise division with broadcasting.
    pub fn div(&self, rhs: &Tensor) -> Result<Tensor> {
        self.binary_op(rhs, |a, b| a / b)
    }

    /// Elementwise `>=`, producing 1.0 or 0.0 per position.
    pub fn gte(&self, rhs: &Tensor) -> Result<Tensor> {
        self.binary_op(rhs, |a, b| if a >= b { 1.0 } else { 0.0 })
    }

    /// Elementwise `==`, producing 1.0 or 0.0 per position.
    pub fn eq(&self, rhs: &Tensor) -> Result<Tensor> {
        self.binary_op(rhs, |a, b| if a == b { 1.0 } else { 0.0 })
    }

    // Scalar variants

    /// Add a scalar to every element.
    pub fn add_scalar(&self, scalar: f32) -> Tensor {
        self.map(|v| v + scalar)
    }

    /// Subtract a scalar from every element.
    pub fn sub_scalar(&self, scalar: f32) -> Tensor {
        self.add_scalar(-scalar)
    }

    /// Multiply every element by a scalar.
    pub fn mul_scalar(&self, scalar: f32) -> Tensor {
        self.map(|v| v * scalar)
    }

    /// Divide every element by a scalar.
    pub fn div_scalar(&self, scalar: f32) -> Tensor {
        self.map(|v| v / scalar)
    }

    // Matrix multiplication

    /// Matrix product of two rank-2 tensors.
    ///
    /// Fails with `RankMismatch` unless both operands are matrices and with
    /// `ShapeMismatch` unless the inner dimensions agree. Accumulation order
    /// is the fixed row / column / contraction triple loop.
    pub fn matmul(&self, rhs: &Tensor) -> Result<Tensor> {
        if self.rank() != 2 {
            return Err(Error::RankMismatch {
                expected: 2,
                got: self.rank(),
            });
        }
        if rhs.rank() != 2 {
            return Err(Error::RankMismatch {
                expected: 2,
                got: rhs.rank(),
            });
        }
        let (m, k) = (self.dims()[0], self.dims()[1]);
        let (k2, n) = (rhs.dims()[0], rhs.dims()[1]);
        if k != k2 {
            return Err(Error::ShapeMismatch {
                expected: self.shape.clone(),
                got: rhs.shape.clone(),
            });
        }

        let mut data = vec![0.0f32; m * n];
        for row in 0..m {
            for col in 0..n {
                let mut acc = 0.0f32;
                for i in 0..k {
                    acc += self.data[row * k + i] * rhs.data[i * n + col];
                }
                data[row * n + col] = acc;
            }
        }
        Ok(Tensor {
            data,
            shape: Shape::from((m, n)),
        })
    }

    // Reductions

    /// Shape with `axis` dropped, plus the stride arithmetic shared by the
    /// axis reductions: (reduced shape, extent of the collapsed axis, pitch
    /// between consecutive elements along it).
    fn reduce_layout(&self, axis: usize) -> Result<(Shape, usize, usize)> {
        if axis >= self.rank() {
            return Err(Error::AxisOutOfRange {
                axis,
                rank: self.rank(),
            });
        }
        let dims = self.dims();
        let mut reduced = dims.to_vec();
        reduced.remove(axis);
        let pitch: usize = dims[axis + 1..].iter().product();
        Ok((Shape::new(reduced), dims[axis], pitch))
    }

    /// Sum along `axis`, dropping it from the shape.
    /// Fails with `AxisOutOfRange` when `axis >= rank`.
    pub fn reduce_sum(&self, axis: usize) -> Result<Tensor> {
        let (shape, extent, pitch) = self.reduce_layout(axis)?;
        let mut data = vec![0.0f32; shape.elem_count()];
        for (i, out) in data.iter_mut().enumerate() {
            let base = (i / pitch) * extent * pitch + i % pitch;
            let mut acc = 0.0f32;
            for j in 0..extent {
                acc += self.data[base + j * pitch];
            }
            *out = acc;
        }
        Ok(Tensor { data, shape })
    }

    /// Index of the maximum along `axis`, dropping it from the shape.
    ///
    /// Ties break toward the lowest index (stable scan order). Fails with
    /// `AxisOutOfRange` when `axis >= rank`.
    pub fn argmax(&self, axis: usize) -> Result<Tensor> {
        let (shape, extent, pitch) = self.reduce_layout(axis)?;
        let mut data = vec![0.0f32; shape.elem_count()];
        for (i, out) in data.iter_mut().enumerate() {
            let base = (i / pitch) * extent * pitch + i % pitch;
            let mut best = f32::NEG_INFINITY;
            let mut best_idx = 0usize;
            for j in 0..extent {
                let v = self.data[base + j * pitch];
                if v > best {
                    best = v;
                    best_idx = j;
                }
            }
            *out = best_idx as f32;
        }
        Ok(Tensor { data, shape })
    }
}
