use tensile_core::{Error, Result, Tensor};

// Sparse cross-entropy: the classification loss for integer class labels.
//
// "Sparse" means targets are class indices (one float-encoded integer per
// example), not one-hot rows — the convention of the dataset boundary,
// where labels arrive as a rank-1 `(batch,)` tensor.

/// Expand rank-1 class indices into a `(batch, classes)` one-hot matrix.
///
/// Fails with `RankMismatch` unless `y` is rank 1 and with
/// `IndexOutOfRange` when a label is not below `classes`.
pub fn one_hot(y: &Tensor, classes: usize) -> Result<Tensor> {
    if y.rank() != 1 {
        return Err(Error::RankMismatch {
            expected: 1,
            got: y.rank(),
        });
    }
    let batch = y.dims()[0];
    let mut data = vec![0.0f32; batch * classes];
    for (row, &label) in y.values().iter().enumerate() {
        let class = label as usize;
        if class >= classes {
            return Err(Error::IndexOutOfRange {
                index: class,
                axis: 1,
                size: classes,
            });
        }
        data[row * classes + class] = 1.0;
    }
    Tensor::from_vec(data, (batch, classes))
}

/// Mean negative log-probability of the true class over the batch.
///
/// `y_true` must be rank 1 (one class index per example, stored as float)
/// and `y_pred` rank 2 `(batch, classes)` of probabilities; their leading
/// dimensions must match. Rank violations fail with `RankMismatch`, a
/// batch-size disagreement with `ShapeMismatch`, and an out-of-range label
/// with `IndexOutOfRange`.
pub fn sparse_cross_entropy(y_true: &Tensor, y_pred: &Tensor) -> Result<f32> {
    if y_true.rank() != 1 {
        return Err(Error::RankMismatch {
            expected: 1,
            got: y_true.rank(),
        });
    }
    if y_pred.rank() != 2 {
        return Err(Error::RankMismatch {
            expected: 2,
            got: y_pred.rank(),
        });
    }
    let (batch, classes) = (y_pred.dims()[0], y_pred.dims()[1]);
    if y_true.dims()[0] != batch {
        return Err(Error::ShapeMismatch {
            expected: y_pred.shape().clone(),
            got: y_true.shape().clone(),
        });
    }

    let mut loss = 0.0f32;
    for (row, &label) in y_true.values().iter().enumerate() {
        let class = label as usize;
        if class >= classes {
            return Err(Error::IndexOutOfRange {
                index: class,
                axis: 1,
                size: classes,
            });
        }
        loss -= y_pred.values()[row * classes + class].ln();
    }
    Ok(loss / batch as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_one_hot() {
        let y = Tensor::from_vec(vec![0.0, 2.0, 1.0], 3).unwrap();
        let oh = one_hot(&y, 3).unwrap();
        assert_eq!(oh.dims(), &[3, 3]);
        assert_eq!(
            oh.values(),
            &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_one_hot_label_out_of_range() {
        let y = Tensor::from_vec(vec![3.0], 1).unwrap();
        assert!(matches!(
            one_hot(&y, 3).unwrap_err(),
            Error::IndexOutOfRange { index: 3, .. }
        ));
    }

    #[test]
    fn test_perfect_prediction_has_zero_loss() {
        // Probability 1.0 on every true class → loss 0.
        let y_true = Tensor::from_vec(vec![1.0, 0.0], 2).unwrap();
        let y_pred = Tensor::from_vec(vec![0.0, 1.0, 1.0, 0.0], (2, 2)).unwrap();
        let loss = sparse_cross_entropy(&y_true, &y_pred).unwrap();
        assert_relative_eq!(loss, 0.0, epsilon = 1e-7);
    }

    #[test]
    fn test_uniform_prediction_loss() {
        // Uniform over 4 classes → loss = ln(4) regardless of the labels.
        let y_true = Tensor::from_vec(vec![0.0, 3.0], 2).unwrap();
        let y_pred = Tensor::full((2, 4), 0.25);
        let loss = sparse_cross_entropy(&y_true, &y_pred).unwrap();
        assert_relative_eq!(loss, 4.0f32.ln(), epsilon = 1e-6);
    }

    #[test]
    fn test_rank_violations() {
        let ok_true = Tensor::zeros(2);
        let ok_pred = Tensor::full((2, 2), 0.5);
        assert!(matches!(
            sparse_cross_entropy(&Tensor::zeros((2, 1)), &ok_pred).unwrap_err(),
            Error::RankMismatch { expected: 1, .. }
        ));
        assert!(matches!(
            sparse_cross_entropy(&ok_true, &Tensor::zeros(4)).unwrap_err(),
            Error::RankMismatch { expected: 2, .. }
        ));
    }

    #[test]
    fn test_batch_size_disagreement() {
        let y_true = Tensor::zeros(3);
        let y_pred = Tensor::full((2, 2), 0.5);
        assert!(matches!(
            sparse_cross_entropy(&y_true, &y_pred).unwrap_err(),
            Error::ShapeMismatch { .. }
        ));
    }
}
