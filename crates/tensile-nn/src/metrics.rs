use tensile_core::{Result, Tensor};

/// Fraction of positions where `y_true` and `y_pred` agree exactly.
///
/// Both are class-index tensors (targets and `argmax` of the
/// probabilities); they are broadcast if needed and the match count is
/// divided by the number of examples.
pub fn accuracy(y_true: &Tensor, y_pred: &Tensor) -> Result<f32> {
    let hits = y_true.eq(y_pred)?;
    let total: f32 = hits.values().iter().sum();
    Ok(total / hits.elem_count() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_accuracy_fraction() {
        let y_true = Tensor::from_vec(vec![0.0, 1.0, 2.0, 1.0], 4).unwrap();
        let y_pred = Tensor::from_vec(vec![0.0, 2.0, 2.0, 1.0], 4).unwrap();
        assert_relative_eq!(accuracy(&y_true, &y_pred).unwrap(), 0.75);
    }

    #[test]
    fn test_accuracy_all_wrong() {
        let y_true = Tensor::zeros(3);
        let y_pred = Tensor::ones(3);
        assert_relative_eq!(accuracy(&y_true, &y_pred).unwrap(), 0.0);
    }

    #[test]
    fn test_accuracy_shape_mismatch() {
        let y_true = Tensor::zeros(3);
        let y_pred = Tensor::zeros(4);
        assert!(accuracy(&y_true, &y_pred).is_err());
    }
}
