//! # tensile-core
//!
//! Core tensor primitives for tensile.
//!
//! This crate provides:
//! - [`Tensor`] — n-dimensional array of f32 values, row-major, exclusively owned
//! - [`Shape`] — dimension sizes, strides, and broadcasting rules
//! - [`TensorPool`] — a bulk-release arena bounding the lifetime of
//!   intermediate tensors during a computation phase
//! - [`Error`] / [`Result`] — the typed failure surface of every operation
//!
//! Every operation returns a fresh tensor; nothing is mutated in place and no
//! buffer is ever shared between two live tensors. Shape disagreements, bad
//! axes, and incompatible broadcasts are detected at operation entry and
//! surface as typed errors rather than partial results.

pub mod display;
pub mod error;
pub mod ops;
pub mod pool;
pub mod shape;
pub mod tensor;

pub use error::{Error, Result};
pub use pool::{PoolId, TensorPool};
pub use shape::Shape;
pub use tensor::Tensor;
