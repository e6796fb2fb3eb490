//! # tensile-nn
//!
//! Neural-network primitives built purely on the tensile-core tensor engine:
//!
//! - [`relu`] / [`softmax`] — activations
//! - [`one_hot`] / [`sparse_cross_entropy`] — classification loss
//! - [`accuracy`] — evaluation metric
//! - [`Mlp`] — a two-layer perceptron with a hand-derived backward pass and
//!   plain SGD parameter updates
//!
//! Gradients are closed-form formulas specific to the two-layer
//! architecture (softmax-cross-entropy simplification, ReLU mask), not a
//! general autodiff graph.

pub mod activation;
pub mod loss;
pub mod metrics;
pub mod mlp;

pub use activation::{relu, softmax};
pub use loss::{one_hot, sparse_cross_entropy};
pub use metrics::accuracy;
pub use mlp::{update_parameter, BackwardPass, Gradients, Mlp};
