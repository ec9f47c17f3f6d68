use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// One second of precomputed white noise shared by every noise burst.
#[derive(Debug, Clone)]
pub struct NoiseTable {
    samples: Arc<[f32]>,
}

impl NoiseTable {
    pub fn generate(sample_rate: f32, seed: u64) -> Self {
        let len = sample_rate.max(1.0) as usize;
        let mut rng = StdRng::seed_from_u64(seed);
        let samples: Vec<f32> = (0..len).map(|_| rng.gen::<f32>() * 2.0 - 1.0).collect();
        Self {
            samples: samples.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Linear read at a fractional position. Past the end reads as silence.
    #[inline]
    pub fn read(&self, position: f64) -> f32 {
        if position < 0.0 {
            return 0.0;
        }
        let index = position as usize;
        if index + 1 >= self.samples.len() {
            return self.samples.get(index).copied().unwrap_or(0.0);
        }
        let frac = (position - index as f64) as f32;
        let a = self.samples[index];
        a + (self.samples[index + 1] - a) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_one_second_in_range() {
        let table = NoiseTable::generate(48_000.0, 7);
        assert_eq!(table.len(), 48_000);
        assert!((0..48_000).all(|i| (-1.0..1.0).contains(&table.read(i as f64))));
    }

    #[test]
    fn same_seed_same_noise() {
        let a = NoiseTable::generate(8_000.0, 42);
        let b = NoiseTable::generate(8_000.0, 42);
        assert_eq!(a.read(1234.0), b.read(1234.0));
    }

    #[test]
    fn reading_past_end_is_silent() {
        let table = NoiseTable::generate(1_000.0, 1);
        assert_eq!(table.read(5_000.0), 0.0);
        assert_eq!(table.read(-1.0), 0.0);
    }
}
