use rand::Rng;

use crate::error::{Error, Result};
use crate::shape::Shape;

// Tensor — the fundamental data structure
//
// A Tensor is an n-dimensional array of f32 values stored flat in row-major
// order (the last dimension varies fastest).
//
// MEMORY MODEL:
//
//   Every tensor exclusively owns both its value buffer and its shape.
//   Nothing is shared: `Clone` deep-copies, every operation allocates a
//   fresh result, and shape-producing operations always build a new Shape
//   rather than handing over an existing one. Dropping a tensor releases
//   both buffers together.
//
//   This makes the aliasing bugs of pointer-based designs unrepresentable:
//   there is no way for two live tensors to disagree about who frees a
//   buffer.

/// An n-dimensional array of f32 values in row-major order.
///
/// Invariant: `data.len() == shape.elem_count()` for every constructed
/// tensor (empty shape product = 1, the scalar case).
#[derive(Clone, PartialEq)]
pub struct Tensor {
    pub(crate) data: Vec<f32>,
    pub(crate) shape: Shape,
}

impl Tensor {
    // Construction

    /// Wrap a flat value buffer in a shape.
    ///
    /// Fails with `ShapeMismatch` when the buffer length does not equal the
    /// shape's element count.
    pub fn from_vec(values: Vec<f32>, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if values.len() != shape.elem_count() {
            return Err(Error::ShapeMismatch {
                expected: shape,
                got: Shape::from(values.len()),
            });
        }
        Ok(Tensor {
            data: values,
            shape,
        })
    }

    /// Ascending values `start, start+step, ...` below `end`, bound to `shape`.
    ///
    /// Generates `ceil((end - start) / step)` values and fails eagerly with
    /// `ShapeMismatch` when that count disagrees with the shape's element
    /// count. `step` must be positive.
    pub fn arange(start: f32, end: f32, step: f32, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        let count = if step > 0.0 && end > start {
            ((end - start) / step).ceil() as usize
        } else {
            0
        };
        if count != shape.elem_count() {
            return Err(Error::ShapeMismatch {
                expected: shape,
                got: Shape::from(count),
            });
        }
        let data = (0..count).map(|i| start + i as f32 * step).collect();
        Ok(Tensor { data, shape })
    }

    /// A tensor filled with zeros.
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        Tensor {
            data: vec![0.0; shape.elem_count()],
            shape,
        }
    }

    /// A tensor filled with ones.
    pub fn ones(shape: impl Into<Shape>) -> Self {
        Self::full(shape, 1.0)
    }

    /// A tensor filled with a constant value.
    pub fn full(shape: impl Into<Shape>, val: f32) -> Self {
        let shape = shape.into();
        Tensor {
            data: vec![val; shape.elem_count()],
            shape,
        }
    }

    /// A rank-0 tensor holding a single value.
    pub fn scalar(val: f32) -> Self {
        Tensor {
            data: vec![val],
            shape: Shape::from(()),
        }
    }

    /// A tensor with values drawn uniformly from `[min, max)`.
    pub fn uniform(min: f32, max: f32, shape: impl Into<Shape>) -> Self {
        Self::uniform_with(&mut rand::thread_rng(), min, max, shape)
    }

    /// Like [`uniform`](Self::uniform) with a caller-supplied generator, for
    /// reproducible initialization.
    pub fn uniform_with(rng: &mut impl Rng, min: f32, max: f32, shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        let data = (0..shape.elem_count())
            .map(|_| rng.gen_range(min..max))
            .collect();
        Tensor { data, shape }
    }

    // Accessors

    /// The shape of this tensor.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The dimension sizes as a slice (shortcut for `shape().dims()`).
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of dimensions (rank).
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Total number of elements.
    pub fn elem_count(&self) -> usize {
        self.data.len()
    }

    /// The flat row-major value buffer.
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Extract the value of a rank-0 tensor.
    ///
    /// Fails with `RankMismatch` on anything but a scalar.
    pub fn item(&self) -> Result<f32> {
        if self.rank() != 0 {
            return Err(Error::RankMismatch {
                expected: 0,
                got: self.rank(),
            });
        }
        Ok(self.data[0])
    }

    // Shape algebra

    /// Narrow the tensor by one rank per supplied index.
    ///
    /// Each index selects the contiguous row-major sub-block at that
    /// position along the leading axis; supplying `rank` indices yields a
    /// scalar. Fails with `RankMismatch` when more indices than dimensions
    /// are given, and with `IndexOutOfRange` when an index exceeds its
    /// dimension's extent.
    ///
    /// `index(arange(0, 9, 1, (3, 3)), &[1])` yields `[3, 4, 5]` with
    /// shape `[3]`.
    pub fn index(&self, indices: &[usize]) -> Result<Tensor> {
        let dims = self.dims();
        if indices.len() > self.rank() {
            return Err(Error::RankMismatch {
                expected: self.rank(),
                got: indices.len(),
            });
        }

        let strides = self.shape.stride_contiguous();
        let mut offset = 0;
        for (axis, (&index, &size)) in indices.iter().zip(dims.iter()).enumerate() {
            if index >= size {
                return Err(Error::IndexOutOfRange { index, axis, size });
            }
            offset += index * strides[axis];
        }

        let sub_shape = Shape::from(&dims[indices.len()..]);
        let block = sub_shape.elem_count();
        Ok(Tensor {
            data: self.data[offset..offset + block].to_vec(),
            shape: sub_shape,
        })
    }

    /// A copy of this tensor bound to a new shape with the same element
    /// count. Fails with `ShapeMismatch` when the counts disagree.
    pub fn reshape(&self, shape: impl Into<Shape>) -> Result<Tensor> {
        let shape = shape.into();
        if shape.elem_count() != self.elem_count() {
            return Err(Error::ShapeMismatch {
                expected: shape,
                got: self.shape.clone(),
            });
        }
        Ok(Tensor {
            data: self.data.clone(),
            shape,
        })
    }

    /// The matrix transpose. Rank 2 only; fails with `RankMismatch`
    /// otherwise.
    pub fn transpose(&self) -> Result<Tensor> {
        if self.rank() != 2 {
            return Err(Error::RankMismatch {
                expected: 2,
                got: self.rank(),
            });
        }
        let (rows, cols) = (self.dims()[0], self.dims()[1]);
        let mut data = vec![0.0; self.elem_count()];
        for i in 0..rows {
            for j in 0..cols {
                data[j * rows + i] = self.data[i * cols + j];
            }
        }
        Ok(Tensor {
            data,
            shape: Shape::from((cols, rows)),
        })
    }

    /// Insert a length-1 dimension at `axis`. `axis` may equal the rank
    /// (append); beyond that fails with `AxisOutOfRange`.
    pub fn unsqueeze(&self, axis: usize) -> Result<Tensor> {
        if axis > self.rank() {
            return Err(Error::AxisOutOfRange {
                axis,
                rank: self.rank(),
            });
        }
        let mut dims = self.dims().to_vec();
        dims.insert(axis, 1);
        Ok(Tensor {
            data: self.data.clone(),
            shape: Shape::new(dims),
        })
    }

    /// Tile the tensor `repeats` times along `axis` by duplicating each
    /// contiguous group (numpy `repeat` semantics: groups stay adjacent, so
    /// `[r0, r1]` repeated twice along axis 0 becomes `[r0, r0, r1, r1]`).
    /// Fails with `AxisOutOfRange` when `axis >= rank`.
    pub fn repeat(&self, repeats: usize, axis: usize) -> Result<Tensor> {
        if axis >= self.rank() {
            return Err(Error::AxisOutOfRange {
                axis,
                rank: self.rank(),
            });
        }
        let mut dims = self.dims().to_vec();
        dims[axis] *= repeats;
        let shape = Shape::new(dims);

        if self.data.is_empty() {
            return Ok(Tensor { data: vec![], shape });
        }

        // One group = everything below `axis` for a fixed index along it.
        let group: usize = self.dims()[axis + 1..].iter().product();
        let mut data = Vec::with_capacity(self.elem_count() * repeats);
        for chunk in self.data.chunks(group) {
            for _ in 0..repeats {
                data.extend_from_slice(chunk);
            }
        }
        Ok(Tensor { data, shape })
    }

    /// Materialize two tensors at their common broadcast shape.
    ///
    /// Shapes are right-aligned to the larger rank (missing leading
    /// dimensions count as 1); each aligned pair must be equal or have one
    /// side of 1, else `BroadcastError`. Wherever one side is 1 and the
    /// other is not, the smaller side is repeated along that axis.
    pub fn broadcast(lhs: &Tensor, rhs: &Tensor) -> Result<(Tensor, Tensor)> {
        let target = Shape::broadcast_shape(&lhs.shape, &rhs.shape)?;
        let a = lhs.broadcast_to(&target)?;
        let b = rhs.broadcast_to(&target)?;
        Ok((a, b))
    }

    /// Expand this tensor to `target`, which must be a valid broadcast
    /// result for its shape.
    fn broadcast_to(&self, target: &Shape) -> Result<Tensor> {
        let padded = self.shape.pad_left(target.rank());
        let mut out = self.reshape(padded.clone())?;
        for axis in 0..target.rank() {
            let have = padded.dims()[axis];
            let want = target.dims()[axis];
            if have == 1 && want != 1 {
                out = out.repeat(want, axis)?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_shape_invariant() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], (2, 2)).unwrap();
        assert_eq!(t.elem_count(), 4);
        assert_eq!(t.rank(), 2);

        let err = Tensor::from_vec(vec![1.0, 2.0, 3.0], (2, 2)).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_scalar_numel() {
        let t = Tensor::scalar(7.0);
        assert_eq!(t.rank(), 0);
        assert_eq!(t.elem_count(), 1);
        assert_eq!(t.item().unwrap(), 7.0);
    }

    #[test]
    fn test_item_requires_scalar() {
        let t = Tensor::zeros(3);
        assert!(matches!(
            t.item().unwrap_err(),
            Error::RankMismatch { expected: 0, got: 1 }
        ));
    }

    #[test]
    fn test_arange() {
        let t = Tensor::arange(0.0, 9.0, 1.0, (3, 3)).unwrap();
        assert_eq!(t.values(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        // ceil count: (0..5) step 2 → 0, 2, 4
        let t = Tensor::arange(0.0, 5.0, 2.0, 3).unwrap();
        assert_eq!(t.values(), &[0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_arange_eager_shape_check() {
        let err = Tensor::arange(0.0, 9.0, 1.0, (2, 2)).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_fills() {
        let z = Tensor::zeros((2, 3));
        assert!(z.values().iter().all(|&v| v == 0.0));
        let o = Tensor::ones((2, 3));
        assert!(o.values().iter().all(|&v| v == 1.0));
        let f = Tensor::full(4, 2.5);
        assert!(f.values().iter().all(|&v| v == 2.5));
    }

    #[test]
    fn test_uniform_range() {
        let t = Tensor::uniform(-0.5, 0.5, (8, 8));
        assert_eq!(t.elem_count(), 64);
        assert!(t.values().iter().all(|&v| (-0.5..0.5).contains(&v)));
    }

    #[test]
    fn test_clone_is_independent() {
        let a = Tensor::from_vec(vec![1.0, 2.0], 2).unwrap();
        let mut b = a.clone();
        b.data[0] = 99.0;
        assert_eq!(a.values(), &[1.0, 2.0]);
        assert_eq!(b.values(), &[99.0, 2.0]);
    }

    #[test]
    fn test_index_narrows_rank() {
        let t = Tensor::arange(0.0, 9.0, 1.0, (3, 3)).unwrap();
        let row = t.index(&[1]).unwrap();
        assert_eq!(row.dims(), &[3]);
        assert_eq!(row.values(), &[3.0, 4.0, 5.0]);

        let cell = t.index(&[2, 0]).unwrap();
        assert_eq!(cell.rank(), 0);
        assert_eq!(cell.item().unwrap(), 6.0);
    }

    #[test]
    fn test_index_errors() {
        let t = Tensor::zeros((2, 2));
        assert!(matches!(
            t.index(&[0, 0, 0]).unwrap_err(),
            Error::RankMismatch { .. }
        ));
        assert!(matches!(
            t.index(&[2]).unwrap_err(),
            Error::IndexOutOfRange {
                index: 2,
                axis: 0,
                size: 2
            }
        ));
    }

    #[test]
    fn test_reshape_roundtrip() {
        let t = Tensor::arange(0.0, 6.0, 1.0, (2, 3)).unwrap();
        let r = t.reshape((3, 2)).unwrap();
        assert_eq!(r.dims(), &[3, 2]);
        let back = r.reshape((2, 3)).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_reshape_rejects_bad_count() {
        let t = Tensor::zeros((2, 3));
        assert!(matches!(
            t.reshape((4, 2)).unwrap_err(),
            Error::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn test_transpose() {
        let t = Tensor::arange(0.0, 6.0, 1.0, (2, 3)).unwrap();
        let tt = t.transpose().unwrap();
        assert_eq!(tt.dims(), &[3, 2]);
        assert_eq!(tt.values(), &[0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
        assert_eq!(tt.transpose().unwrap(), t);
    }

    #[test]
    fn test_transpose_requires_rank_2() {
        let t = Tensor::zeros((2, 2, 2));
        assert!(matches!(
            t.transpose().unwrap_err(),
            Error::RankMismatch { expected: 2, got: 3 }
        ));
    }

    #[test]
    fn test_unsqueeze() {
        let t = Tensor::zeros((2, 3));
        assert_eq!(t.unsqueeze(0).unwrap().dims(), &[1, 2, 3]);
        assert_eq!(t.unsqueeze(1).unwrap().dims(), &[2, 1, 3]);
        assert_eq!(t.unsqueeze(2).unwrap().dims(), &[2, 3, 1]);
        assert!(matches!(
            t.unsqueeze(3).unwrap_err(),
            Error::AxisOutOfRange { axis: 3, rank: 2 }
        ));
    }

    #[test]
    fn test_repeat_axis0() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], (2, 2)).unwrap();
        let r = t.repeat(2, 0).unwrap();
        assert_eq!(r.dims(), &[4, 2]);
        // Rows duplicated adjacently, not interleaved.
        assert_eq!(r.values(), &[1.0, 2.0, 1.0, 2.0, 3.0, 4.0, 3.0, 4.0]);
    }

    #[test]
    fn test_repeat_axis1() {
        let t = Tensor::from_vec(vec![1.0, 2.0], (2, 1)).unwrap();
        let r = t.repeat(3, 1).unwrap();
        assert_eq!(r.dims(), &[2, 3]);
        assert_eq!(r.values(), &[1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_repeat_axis_bounds() {
        let t = Tensor::zeros(3);
        assert!(matches!(
            t.repeat(2, 1).unwrap_err(),
            Error::AxisOutOfRange { axis: 1, rank: 1 }
        ));
    }

    #[test]
    fn test_broadcast_pair() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], (3, 1)).unwrap();
        let b = Tensor::from_vec(vec![10.0, 20.0, 30.0, 40.0], (1, 4)).unwrap();
        let (ba, bb) = Tensor::broadcast(&a, &b).unwrap();
        assert_eq!(ba.dims(), &[3, 4]);
        assert_eq!(bb.dims(), &[3, 4]);
        assert_eq!(
            ba.values(),
            &[1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0]
        );
        assert_eq!(
            bb.values(),
            &[10.0, 20.0, 30.0, 40.0, 10.0, 20.0, 30.0, 40.0, 10.0, 20.0, 30.0, 40.0]
        );
    }

    #[test]
    fn test_broadcast_scalar_with_matrix() {
        let s = Tensor::scalar(5.0);
        let m = Tensor::zeros((2, 2));
        let (bs, bm) = Tensor::broadcast(&s, &m).unwrap();
        assert_eq!(bs.dims(), &[2, 2]);
        assert_eq!(bm.dims(), &[2, 2]);
        assert!(bs.values().iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_broadcast_incompatible() {
        let a = Tensor::zeros(3);
        let b = Tensor::zeros(4);
        assert!(matches!(
            Tensor::broadcast(&a, &b).unwrap_err(),
            Error::BroadcastError { .. }
        ));
    }
}
