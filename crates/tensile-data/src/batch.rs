use rand::Rng;
use tensile_core::Tensor;

use crate::mnist::MnistDataset;

// Batch sampling — the bridge from raw dataset bytes to engine tensors.
//
// Pixels are handed over as raw 0–255 f32 values; the training driver
// decides on scaling. Labels are float-encoded integer class indices,
// shaped `(batch,)` as the sparse cross-entropy loss expects.

/// A sampled mini-batch of image and label tensors.
///
/// `images` is `(n, rows*cols)` when flattened, `(n, rows, cols)`
/// otherwise; `labels` is `(n,)`.
#[derive(Debug)]
pub struct Batch {
    pub images: Tensor,
    pub labels: Tensor,
}

impl MnistDataset {
    /// Tensors for sample `i`: image `(rows*cols,)` flattened or
    /// `(rows, cols)` unflattened (rank 2, the shape a grayscale display
    /// consumer accepts), label as a rank-0 scalar.
    pub fn example(&self, i: usize, flat: bool) -> (Tensor, Tensor) {
        let (rows, cols) = self.image_dims();
        let values: Vec<f32> = self.image_u8(i).iter().map(|&p| p as f32).collect();
        let image = if flat {
            Tensor::from_vec(values, rows * cols)
        } else {
            Tensor::from_vec(values, (rows, cols))
        }
        .expect("image buffer matches its dimensions");
        (image, Tensor::scalar(self.label(i) as f32))
    }

    /// A random mini-batch of `n` samples drawn with replacement.
    pub fn batch(&self, rng: &mut impl Rng, n: usize, flat: bool) -> Batch {
        let (rows, cols) = self.image_dims();
        let mut pixels = Vec::with_capacity(n * rows * cols);
        let mut labels = Vec::with_capacity(n);

        for _ in 0..n {
            let i = rng.gen_range(0..self.num_samples());
            pixels.extend(self.image_u8(i).iter().map(|&p| p as f32));
            labels.push(self.label(i) as f32);
        }

        let images = if flat {
            Tensor::from_vec(pixels, (n, rows * cols))
        } else {
            Tensor::from_vec(pixels, (n, rows, cols))
        }
        .expect("batch buffer matches its dimensions");
        let labels = Tensor::from_vec(labels, n).expect("one label per sample");

        Batch { images, labels }
    }

    /// Every sample exactly once, in dataset order. The evaluation
    /// counterpart of [`batch`](Self::batch), which draws with replacement
    /// and must not be used to report held-out metrics.
    pub fn batch_all(&self, flat: bool) -> Batch {
        let (rows, cols) = self.image_dims();
        let n = self.num_samples();
        let pixels = (0..n)
            .flat_map(|i| self.image_u8(i).iter().map(|&p| p as f32))
            .collect();
        let labels = (0..n).map(|i| self.label(i) as f32).collect();

        let images = if flat {
            Tensor::from_vec(pixels, (n, rows * cols))
        } else {
            Tensor::from_vec(pixels, (n, rows, cols))
        }
        .expect("pixel buffer matches the dataset dimensions");
        let labels = Tensor::from_vec(labels, n).expect("one label per sample");

        Batch { images, labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnist::{build_idx1_bytes, build_idx3_bytes, MnistSplit};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tiny_dataset() -> MnistDataset {
        // Two 2×2 images with recognizable fill values.
        let img_bytes = build_idx3_bytes(&[&[10u8; 4], &[200u8; 4]], 2, 2);
        let lbl_bytes = build_idx1_bytes(&[1, 9]);
        MnistDataset::from_raw(&img_bytes, &lbl_bytes, MnistSplit::Train).unwrap()
    }

    #[test]
    fn test_example_flat() {
        let ds = tiny_dataset();
        let (image, label) = ds.example(0, true);
        assert_eq!(image.dims(), &[4]);
        assert_eq!(image.values(), &[10.0, 10.0, 10.0, 10.0]);
        assert_eq!(label.rank(), 0);
        assert_eq!(label.item().unwrap(), 1.0);
    }

    #[test]
    fn test_example_unflattened() {
        let ds = tiny_dataset();
        let (image, label) = ds.example(1, false);
        assert_eq!(image.dims(), &[2, 2]);
        assert_eq!(image.values(), &[200.0; 4]);
        assert_eq!(label.item().unwrap(), 9.0);
    }

    #[test]
    fn test_batch_shapes() {
        let ds = tiny_dataset();
        let mut rng = StdRng::seed_from_u64(1);

        let batch = ds.batch(&mut rng, 8, true);
        assert_eq!(batch.images.dims(), &[8, 4]);
        assert_eq!(batch.labels.dims(), &[8]);

        let batch = ds.batch(&mut rng, 3, false);
        assert_eq!(batch.images.dims(), &[3, 2, 2]);
    }

    #[test]
    fn test_batch_labels_match_images() {
        let ds = tiny_dataset();
        let mut rng = StdRng::seed_from_u64(2);
        let batch = ds.batch(&mut rng, 16, true);

        // Image fill values identify the source sample, so each row's
        // pixels must agree with its label.
        for i in 0..16 {
            let pixel = batch.images.index(&[i, 0]).unwrap().item().unwrap();
            let label = batch.labels.index(&[i]).unwrap().item().unwrap();
            match pixel as u8 {
                10 => assert_eq!(label, 1.0),
                200 => assert_eq!(label, 9.0),
                other => panic!("unexpected pixel value {other}"),
            }
        }
    }

    #[test]
    fn test_batch_all_covers_each_sample_once() {
        let ds = tiny_dataset();
        let batch = ds.batch_all(true);

        assert_eq!(batch.images.dims(), &[2, 4]);
        assert_eq!(batch.labels.values(), &[1.0, 9.0]);
        assert_eq!(
            batch.images.values(),
            &[10.0, 10.0, 10.0, 10.0, 200.0, 200.0, 200.0, 200.0]
        );
    }

    #[test]
    fn test_batch_all_unflattened() {
        let ds = tiny_dataset();
        let batch = ds.batch_all(false);
        assert_eq!(batch.images.dims(), &[2, 2, 2]);
        assert_eq!(batch.labels.dims(), &[2]);
    }
}
