use tensile_core::{Result, Tensor};

/// ReLU activation: elementwise `max(x, 0)`.
pub fn relu(t: &Tensor) -> Tensor {
    t.map(|v| v.max(0.0))
}

/// Softmax along `axis`: exponentiate, sum along the axis, divide.
///
/// Every slice along `axis` sums to 1. Fails with `AxisOutOfRange` when
/// `axis >= rank`.
///
/// Logits are exponentiated as-is, without subtracting the per-slice
/// maximum first; inputs much above ~88 overflow f32 `exp` to infinity and
/// the slice degenerates to NaN.
pub fn softmax(t: &Tensor, axis: usize) -> Result<Tensor> {
    let exp = t.map(f32::exp);
    let denom = exp.reduce_sum(axis)?.unsqueeze(axis)?;
    exp.div(&denom)
}
