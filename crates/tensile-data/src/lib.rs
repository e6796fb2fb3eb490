//! # tensile-data
//!
//! Dataset loading and batching for tensile.
//!
//! This crate provides:
//! - [`MnistDataset`] — IDX file format parser holding images and labels
//!   in memory
//! - [`Batch`] — image/label tensor pairs sampled from a dataset
//!
//! The dataset boundary hands the tensor engine flat f32 pixel buffers
//! (raw 0–255 values; scale them yourself) shaped `(batch, rows*cols)` or
//! `(rows, cols)`, and `(batch,)` float-encoded integer labels.

pub mod batch;
pub mod mnist;

pub use batch::Batch;
pub use mnist::{MnistDataset, MnistError, MnistSplit};
