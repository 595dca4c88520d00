// ============================================================
// Layer 4 — Batch Generator
// ============================================================
// An infinite, restartable producer of shuffled batches.
//
// State carried between calls:
//   (dataset, indices, cursor, batch_size, rng)
//
//   pass 1:  shuffle → [i3 i0 i7 | i5 i1 i2 | i6 i4]
//                       batch 1    batch 2   batch 3 (short)
//   pass 2:  shuffle again, cursor back to 0, ...
//
// Each call to next() decodes the images of the next slice of
// indices, pairs them with their angles in DrivingSamples, and
// shuffles that batch once more before returning it. Because
// image and angle travel together in one struct the pairing
// can never be broken by the shuffle.
//
// The generator never ends on its own for a non-empty index
// set; the trainer decides how many batches to pull. An empty
// index set yields None straight away.
//
// The dataset is an explicit Arc'd dependency so the train and
// validation generators share one read-only table.

use std::sync::Arc;

use burn::data::dataset::Dataset;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::{frames::load_frame, DataError};
use crate::domain::{frame::DrivingSample, record::DrivingRecord};

pub const DEFAULT_BATCH_SIZE: usize = 128;
pub const FRAME_HEIGHT: usize = 160;
pub const FRAME_WIDTH: usize = 320;

pub struct BatchGenerator<D> {
    dataset:      Arc<D>,
    indices:      Vec<usize>,
    cursor:       usize,
    batch_size:   usize,
    frame_height: usize,
    frame_width:  usize,
    passes:       usize,
    rng:          StdRng,
}

impl<D: Dataset<DrivingRecord>> BatchGenerator<D> {
    /// A batch size of 0 is treated as 1.
    pub fn new(dataset: Arc<D>, indices: Vec<usize>, batch_size: usize) -> Self {
        Self {
            dataset,
            indices,
            cursor: 0,
            batch_size: batch_size.max(1),
            frame_height: FRAME_HEIGHT,
            frame_width: FRAME_WIDTH,
            passes: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Decode frames to `height × width` instead of 160×320.
    pub fn with_frame_size(mut self, height: usize, width: usize) -> Self {
        self.frame_height = height;
        self.frame_width  = width;
        self
    }

    pub fn num_samples(&self) -> usize {
        self.indices.len()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Batches needed to visit every index once.
    pub fn batches_per_pass(&self) -> usize {
        self.indices.len().div_ceil(self.batch_size)
    }

    /// Completed passes over the index set.
    pub fn passes(&self) -> usize {
        self.passes
    }

    fn next_slice(&mut self) -> Option<Vec<usize>> {
        if self.indices.is_empty() {
            return None;
        }
        if self.cursor == 0 {
            self.indices.shuffle(&mut self.rng);
        }

        let end   = (self.cursor + self.batch_size).min(self.indices.len());
        let slice = self.indices[self.cursor..end].to_vec();

        if end == self.indices.len() {
            self.cursor  = 0;
            self.passes += 1;
        } else {
            self.cursor = end;
        }
        Some(slice)
    }

    fn load_sample(&self, index: usize) -> Result<DrivingSample, DataError> {
        let record = self.dataset.get(index).ok_or(DataError::MissingRow(index))?;
        let frame  = load_frame(&record.image_path, self.frame_height, self.frame_width)?;
        Ok(DrivingSample { frame, steering_angle: record.steering_angle })
    }
}

impl<D: Dataset<DrivingRecord>> Iterator for BatchGenerator<D> {
    type Item = Result<Vec<DrivingSample>, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        let slice = self.next_slice()?;

        let mut batch = match slice
            .into_iter()
            .map(|i| self.load_sample(i))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(batch) => batch,
            Err(e) => return Some(Err(e)),
        };

        batch.shuffle(&mut self.rng);
        Some(Ok(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::DrivingDataset;
    use image::{Rgb, RgbImage};
    use std::collections::HashMap;

    /// Writes `n` 1×1 PNGs whose red channel is the row index
    /// and whose angle is index / 10.
    fn fixture(n: usize) -> (tempfile::TempDir, Arc<DrivingDataset>) {
        let dir = tempfile::tempdir().unwrap();
        let records = (0..n)
            .map(|i| {
                let path = dir.path().join(format!("{i}.png"));
                RgbImage::from_pixel(1, 1, Rgb([i as u8, 0, 0])).save(&path).unwrap();
                DrivingRecord::new(path, i as f32 / 10.0)
            })
            .collect();
        (dir, Arc::new(DrivingDataset::new(records)))
    }

    fn generator(ds: &Arc<DrivingDataset>, indices: Vec<usize>, batch_size: usize) -> BatchGenerator<DrivingDataset> {
        BatchGenerator::new(Arc::clone(ds), indices, batch_size).with_frame_size(1, 1)
    }

    fn index_of(sample: &DrivingSample) -> usize {
        sample.frame.pixels[0] as usize
    }

    #[test]
    fn test_batches_respect_batch_size() {
        let (_dir, ds) = fixture(10);
        let mut gen    = generator(&ds, (0..10).collect(), 4);
        let sizes: Vec<usize> = (0..3).map(|_| gen.next().unwrap().unwrap().len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(gen.batches_per_pass(), 3);
        assert_eq!(gen.passes(), 1);
    }

    #[test]
    fn test_every_index_once_per_pass() {
        let (_dir, ds) = fixture(10);
        let indices    = vec![0, 2, 3, 5, 7, 8, 9];
        let mut gen    = generator(&ds, indices.clone(), 3);

        for _pass in 0..3 {
            let mut seen: HashMap<usize, usize> = HashMap::new();
            for _ in 0..gen.batches_per_pass() {
                for s in gen.next().unwrap().unwrap() {
                    *seen.entry(index_of(&s)).or_default() += 1;
                }
            }
            let mut keys: Vec<usize> = seen.keys().copied().collect();
            keys.sort_unstable();
            assert_eq!(keys, indices);
            assert!(seen.values().all(|&c| c == 1));
        }
        assert_eq!(gen.passes(), 3);
    }

    #[test]
    fn test_image_angle_pairing_survives_shuffle() {
        let (_dir, ds) = fixture(16);
        let mut gen    = generator(&ds, (0..16).collect(), 5);
        for _ in 0..20 {
            for s in gen.next().unwrap().unwrap() {
                let expected = index_of(&s) as f32 / 10.0;
                assert!((s.steering_angle - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_never_terminates() {
        let (_dir, ds) = fixture(1);
        let mut gen    = generator(&ds, vec![0], 128);
        for _ in 0..50 {
            assert_eq!(gen.next().unwrap().unwrap().len(), 1);
        }
        assert_eq!(gen.passes(), 50);
    }

    #[test]
    fn test_empty_index_set_yields_nothing() {
        let (_dir, ds) = fixture(1);
        let mut gen    = generator(&ds, Vec::new(), 4);
        assert_eq!(gen.batches_per_pass(), 0);
        assert!(gen.next().is_none());
    }

    #[test]
    fn test_unreadable_image_is_error() {
        let ds = Arc::new(DrivingDataset::new(vec![DrivingRecord::new("/no/such/frame.png", 0.0)]));
        let mut gen = generator(&ds, vec![0], 4);
        assert!(matches!(gen.next(), Some(Err(DataError::ImageRead { .. }))));
    }

    #[test]
    fn test_out_of_range_index_is_error() {
        let (_dir, ds) = fixture(2);
        let mut gen    = generator(&ds, vec![5], 4);
        assert!(matches!(gen.next(), Some(Err(DataError::MissingRow(5)))));
    }
}
