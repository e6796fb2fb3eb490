// MNIST dataset — IDX file format parser
//
// The MNIST database consists of 4 files:
//   - train-images-idx3-ubyte  (60,000  28×28 images)
//   - train-labels-idx1-ubyte  (60,000  labels 0-9)
//   - t10k-images-idx3-ubyte   (10,000  28×28 images)
//   - t10k-labels-idx1-ubyte   (10,000  labels 0-9)
//
// IDX format (all values big-endian):
//   images: magic(2051) | count(u32) | rows(u32) | cols(u32) | pixel_data(u8...)
//   labels: magic(2049) | count(u32) | label_data(u8...)
//
// Files must be decompressed (gunzip) before loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for MNIST loading.
#[derive(Debug)]
pub enum MnistError {
    Io(io::Error),
    InvalidMagic { expected: u32, got: u32 },
    CountMismatch { images: usize, labels: usize },
    MissingFile(PathBuf),
}

impl std::fmt::Display for MnistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MnistError::Io(e) => write!(f, "MNIST I/O error: {e}"),
            MnistError::InvalidMagic { expected, got } => write!(
                f,
                "MNIST invalid magic: expected {expected:#06x}, got {got:#06x}"
            ),
            MnistError::CountMismatch { images, labels } => write!(
                f,
                "MNIST count mismatch: {images} images vs {labels} labels"
            ),
            MnistError::MissingFile(p) => write!(f, "MNIST file not found: {}", p.display()),
        }
    }
}

impl std::error::Error for MnistError {}

impl From<io::Error> for MnistError {
    fn from(e: io::Error) -> Self {
        MnistError::Io(e)
    }
}

/// Which split of MNIST to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnistSplit {
    Train,
    Test,
}

/// A loaded MNIST dataset stored entirely in memory.
///
/// Pixels live in one flat `Vec<u8>` (`rows*cols` bytes per image, 0–255);
/// labels are `u8` values 0–9.
#[derive(Debug)]
pub struct MnistDataset {
    pixels: Vec<u8>,
    labels: Vec<u8>,
    rows: usize,
    cols: usize,
    split: MnistSplit,
}

impl MnistDataset {
    /// Load MNIST from the given directory, expecting the standard
    /// filenames for the chosen split.
    pub fn load(dir: impl AsRef<Path>, split: MnistSplit) -> Result<Self, MnistError> {
        let dir = dir.as_ref();
        let (img_name, lbl_name) = match split {
            MnistSplit::Train => ("train-images-idx3-ubyte", "train-labels-idx1-ubyte"),
            MnistSplit::Test => ("t10k-images-idx3-ubyte", "t10k-labels-idx1-ubyte"),
        };

        let img_path = dir.join(img_name);
        if !img_path.exists() {
            return Err(MnistError::MissingFile(img_path));
        }
        let lbl_path = dir.join(lbl_name);
        if !lbl_path.exists() {
            return Err(MnistError::MissingFile(lbl_path));
        }

        Self::from_raw(&fs::read(&img_path)?, &fs::read(&lbl_path)?, split)
    }

    /// Load from raw IDX bytes (useful for embedded data and tests).
    pub fn from_raw(
        image_bytes: &[u8],
        label_bytes: &[u8],
        split: MnistSplit,
    ) -> Result<Self, MnistError> {
        let (pixels, count, rows, cols) = parse_idx3_images(image_bytes)?;
        let labels = parse_idx1_labels(label_bytes)?;

        if count != labels.len() {
            return Err(MnistError::CountMismatch {
                images: count,
                labels: labels.len(),
            });
        }

        Ok(Self {
            pixels,
            labels,
            rows,
            cols,
            split,
        })
    }

    /// A small random MNIST-like dataset for quick experiments and tests.
    pub fn synthetic(n: usize, split: MnistSplit) -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let rows = 28;
        let cols = 28;
        let mut pixels = vec![0u8; n * rows * cols];
        rng.fill(pixels.as_mut_slice());
        let labels = (0..n).map(|_| rng.gen_range(0..10u8)).collect();

        Self {
            pixels,
            labels,
            rows,
            cols,
            split,
        }
    }

    /// Total number of samples.
    pub fn num_samples(&self) -> usize {
        self.labels.len()
    }

    /// Image dimensions: (rows, cols).
    pub fn image_dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Raw pixel bytes of sample `i`.
    pub fn image_u8(&self, i: usize) -> &[u8] {
        let n = self.rows * self.cols;
        &self.pixels[i * n..(i + 1) * n]
    }

    /// Label of sample `i`.
    pub fn label(&self, i: usize) -> u8 {
        self.labels[i]
    }

    /// Which split this dataset represents.
    pub fn split(&self) -> MnistSplit {
        self.split
    }

    /// Keep only the first `n` samples (quick experiments).
    pub fn take(mut self, n: usize) -> Self {
        let n = n.min(self.labels.len());
        self.pixels.truncate(n * self.rows * self.cols);
        self.labels.truncate(n);
        self
    }
}

// IDX file format parsing

fn io_err(msg: &str) -> MnistError {
    MnistError::Io(io::Error::new(io::ErrorKind::InvalidData, msg))
}

/// Parse an IDX3 file (images): magic=2051, count, rows, cols, data.
/// Returns the flat pixel buffer plus (count, rows, cols).
fn parse_idx3_images(data: &[u8]) -> Result<(Vec<u8>, usize, usize, usize), MnistError> {
    if data.len() < 16 {
        return Err(io_err("IDX3 file too short"));
    }

    let magic = read_u32_be(data, 0);
    if magic != 2051 {
        return Err(MnistError::InvalidMagic {
            expected: 2051,
            got: magic,
        });
    }

    let count = read_u32_be(data, 4) as usize;
    let rows = read_u32_be(data, 8) as usize;
    let cols = read_u32_be(data, 12) as usize;

    // Header fields come straight from the file, so the product must not
    // be allowed to wrap on 32-bit hosts or with garbage dimensions.
    let expected_len = count
        .checked_mul(rows)
        .and_then(|v| v.checked_mul(cols))
        .and_then(|v| v.checked_add(16))
        .ok_or_else(|| io_err("IDX3 header dimensions overflow"))?;
    if data.len() < expected_len {
        return Err(io_err("IDX3 file truncated"));
    }

    Ok((data[16..expected_len].to_vec(), count, rows, cols))
}

/// Parse an IDX1 file (labels): magic=2049, count, data.
fn parse_idx1_labels(data: &[u8]) -> Result<Vec<u8>, MnistError> {
    if data.len() < 8 {
        return Err(io_err("IDX1 file too short"));
    }

    let magic = read_u32_be(data, 0);
    if magic != 2049 {
        return Err(MnistError::InvalidMagic {
            expected: 2049,
            got: magic,
        });
    }

    let count = read_u32_be(data, 4) as usize;
    if data.len() < 8 + count {
        return Err(io_err("IDX1 file truncated"));
    }

    Ok(data[8..8 + count].to_vec())
}

/// Read a big-endian u32 from `data` at byte offset `off`.
fn read_u32_be(data: &[u8], off: usize) -> u32 {
    u32::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

// Builder helpers

/// Build IDX3 image bytes from raw image data (useful for tests).
pub fn build_idx3_bytes(images: &[&[u8]], rows: u32, cols: u32) -> Vec<u8> {
    let count = images.len() as u32;
    let mut buf = Vec::new();
    buf.extend_from_slice(&2051u32.to_be_bytes());
    buf.extend_from_slice(&count.to_be_bytes());
    buf.extend_from_slice(&rows.to_be_bytes());
    buf.extend_from_slice(&cols.to_be_bytes());
    for img in images {
        buf.extend_from_slice(img);
    }
    buf
}

/// Build IDX1 label bytes (useful for tests).
pub fn build_idx1_bytes(labels: &[u8]) -> Vec<u8> {
    let count = labels.len() as u32;
    let mut buf = Vec::new();
    buf.extend_from_slice(&2049u32.to_be_bytes());
    buf.extend_from_slice(&count.to_be_bytes());
    buf.extend_from_slice(labels);
    buf
}
