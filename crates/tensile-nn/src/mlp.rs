use rand::Rng;
use tensile_core::{Error, Result, Tensor};

use crate::activation::{relu, softmax};
use crate::loss::{one_hot, sparse_cross_entropy};

// Two-layer perceptron with a hand-derived backward pass.
//
//   z1 = x·W1 + b1      a1 = relu(z1)
//   z2 = a1·W2 + b2     probs = softmax(z2, axis=1)
//
// Gradients use the closed-form softmax-cross-entropy simplification:
//
//   dz2 = (probs − one_hot(y)) / batch
//   dW2 = a1ᵀ·dz2            db2 = Σ_batch dz2
//   dz1 = (dz2·W2ᵀ) ⊙ [z1 ≥ 0]
//   dW1 = xᵀ·dz1             db1 = Σ_batch dz1
//
// The ReLU mask is the `gte`-against-zero comparison, so the z1 == 0
// boundary passes gradient through.

/// One SGD step for a single parameter: `param − grad·lr`.
pub fn update_parameter(param: &Tensor, grad: &Tensor, learning_rate: f32) -> Result<Tensor> {
    param.sub(&grad.mul_scalar(learning_rate))
}

/// Per-parameter gradients of one forward/backward pass.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub w1: Tensor,
    pub b1: Tensor,
    pub w2: Tensor,
    pub b2: Tensor,
}

/// Everything a training step needs from one pass: class probabilities,
/// the batch loss, and the parameter gradients.
#[derive(Debug)]
pub struct BackwardPass {
    pub probs: Tensor,
    pub loss: f32,
    pub grads: Gradients,
}

/// A two-layer perceptron classifier.
///
/// Parameters are long-lived tensors owned by the model; they are never
/// enrolled in a step arena. Shapes: `w1 (inputs, hidden)`, `b1 (hidden,)`,
/// `w2 (hidden, classes)`, `b2 (classes,)`.
#[derive(Debug, Clone)]
pub struct Mlp {
    pub w1: Tensor,
    pub b1: Tensor,
    pub w2: Tensor,
    pub b2: Tensor,
}

impl Mlp {
    /// Fresh model with weights drawn uniformly from ±1/sqrt(fan_in) and
    /// zero biases.
    pub fn new(n_inputs: usize, n_hidden: usize, n_classes: usize) -> Self {
        Self::new_with(&mut rand::thread_rng(), n_inputs, n_hidden, n_classes)
    }

    /// Like [`new`](Self::new) with a caller-supplied generator, for
    /// reproducible initialization.
    pub fn new_with(rng: &mut impl Rng, n_inputs: usize, n_hidden: usize, n_classes: usize) -> Self {
        let bound1 = 1.0 / (n_inputs as f32).sqrt();
        let bound2 = 1.0 / (n_hidden as f32).sqrt();
        Mlp {
            w1: Tensor::uniform_with(rng, -bound1, bound1, (n_inputs, n_hidden)),
            b1: Tensor::zeros(n_hidden),
            w2: Tensor::uniform_with(rng, -bound2, bound2, (n_hidden, n_classes)),
            b2: Tensor::zeros(n_classes),
        }
    }

    /// Build a model from explicit parameter tensors (tests, checkpoints).
    pub fn from_tensors(w1: Tensor, b1: Tensor, w2: Tensor, b2: Tensor) -> Self {
        Mlp { w1, b1, w2, b2 }
    }

    /// Number of output classes.
    pub fn n_classes(&self) -> usize {
        self.b2.dims()[0]
    }

    /// Forward pass: `(batch, inputs)` features to `(batch, classes)`
    /// class probabilities.
    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let z1 = x.matmul(&self.w1)?.add(&self.b1)?;
        let a1 = relu(&z1);
        let z2 = a1.matmul(&self.w2)?.add(&self.b2)?;
        softmax(&z2, 1)
    }

    /// Forward pass plus hand-derived gradients for every parameter.
    ///
    /// `x` is `(batch, inputs)`, `y` is rank-1 `(batch,)` class indices.
    /// Intermediate activations live only for the duration of the call.
    pub fn forward_backward(&self, x: &Tensor, y: &Tensor) -> Result<BackwardPass> {
        if x.rank() != 2 {
            return Err(Error::RankMismatch {
                expected: 2,
                got: x.rank(),
            });
        }
        let batch = x.dims()[0] as f32;

        let z1 = x.matmul(&self.w1)?.add(&self.b1)?;
        let a1 = relu(&z1);
        let z2 = a1.matmul(&self.w2)?.add(&self.b2)?;
        let probs = softmax(&z2, 1)?;

        let loss = sparse_cross_entropy(y, &probs)?;

        let targets = one_hot(y, self.n_classes())?;
        let dz2 = probs.sub(&targets)?.div_scalar(batch);
        let dw2 = a1.transpose()?.matmul(&dz2)?;
        let db2 = dz2.reduce_sum(0)?;

        let da1 = dz2.matmul(&self.w2.transpose()?)?;
        let mask = z1.gte(&Tensor::scalar(0.0))?;
        let dz1 = da1.mul(&mask)?;
        let dw1 = x.transpose()?.matmul(&dz1)?;
        let db1 = dz1.reduce_sum(0)?;

        Ok(BackwardPass {
            probs,
            loss,
            grads: Gradients {
                w1: dw1,
                b1: db1,
                w2: dw2,
                b2: db2,
            },
        })
    }

    /// Apply one SGD update to every parameter.
    pub fn apply_gradients(&mut self, grads: &Gradients, learning_rate: f32) -> Result<()> {
        self.w1 = update_parameter(&self.w1, &grads.w1, learning_rate)?;
        self.b1 = update_parameter(&self.b1, &grads.b1, learning_rate)?;
        self.w2 = update_parameter(&self.w2, &grads.w2, learning_rate)?;
        self.b2 = update_parameter(&self.b2, &grads.b2, learning_rate)?;
        Ok(())
    }
}
