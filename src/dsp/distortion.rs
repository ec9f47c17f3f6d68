//! Drive / Waveshaping
//!
//! Each voice saturates through a lookup-table waveshaper. The table is built
//! once per hit from the drive amount and read with linear interpolation, the
//! same way a hardware-style curve shaper works.
//!
//! # Curve Shape
//!
//! The shaped half of the curve is an asymmetric tanh:
//!
//!   x >= 0:  tanh(k * x) / tanh(k)
//!   x <  0:  tanh(0.82 * k * x) / tanh(0.82 * k) * 0.94
//!
//! The negative lobe saturates later and lands lower, which adds even
//! harmonics on top of the odd ones plain tanh gives.
//!
//! The table stores a blend of the dry input and the shaped value, with the
//! wet share `0.6 + amount * 0.28`, then runs one 1-2-1 smoothing pass so the
//! knee stays soft at high drive.
//!
//! # Amount
//!
//!   0.0        identity (no table work)
//!   0.05-0.2   barely audible warmth
//!   0.5+       obvious saturation
//!   1.0        hard, fuzzy

/// Number of points in a drive table.
pub const CURVE_POINTS: usize = 1024;

const NEGATIVE_SLOPE: f32 = 0.82;
const NEGATIVE_CEILING: f32 = 0.94;

/// Asymmetric tanh transfer for a single sample.
#[inline]
pub fn asymmetric_tanh(x: f32, k: f32) -> f32 {
    if x >= 0.0 {
        (k * x).tanh() / k.tanh()
    } else {
        let kn = k * NEGATIVE_SLOPE;
        (kn * x).tanh() / kn.tanh() * NEGATIVE_CEILING
    }
}

/// Soft clipping using x / (1 + |x|). Used as the master bus limiter.
#[inline]
pub fn soft_clip(sample: f32, drive: f32) -> f32 {
    let x = sample * drive;
    x / (1.0 + x.abs())
}

/// Lookup-table waveshaper built from a drive amount in [0, 1].
#[derive(Debug, Clone)]
pub struct DriveCurve {
    table: Option<Box<[f32]>>,
    amount: f32,
}

impl DriveCurve {
    pub fn new(amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        if amount <= 0.001 {
            return Self::identity();
        }

        let k = 1.0 + amount * 11.0;
        let wet = 0.6 + amount * 0.28;
        let last = (CURVE_POINTS - 1) as f32;

        let raw: Vec<f32> = (0..CURVE_POINTS)
            .map(|i| {
                let x = i as f32 * 2.0 / last - 1.0;
                x * (1.0 - wet) + asymmetric_tanh(x, k) * wet
            })
            .collect();

        let mut smoothed = raw.clone();
        for i in 1..CURVE_POINTS - 1 {
            smoothed[i] = (raw[i - 1] + 2.0 * raw[i] + raw[i + 1]) * 0.25;
        }

        Self {
            table: Some(smoothed.into_boxed_slice()),
            amount,
        }
    }

    pub fn identity() -> Self {
        Self {
            table: None,
            amount: 0.0,
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn is_identity(&self) -> bool {
        self.table.is_none()
    }

    /// Input outside [-1, 1] reads the table ends.
    #[inline]
    pub fn shape(&self, x: f32) -> f32 {
        let Some(table) = &self.table else {
            return x;
        };
        let last = (CURVE_POINTS - 1) as f32;
        let position = (x.clamp(-1.0, 1.0) + 1.0) * 0.5 * last;
        let index = (position as usize).min(CURVE_POINTS - 2);
        let frac = position - index as f32;
        table[index] + (table[index + 1] - table[index]) * frac
    }

    pub fn render(&self, buffer: &mut [f32]) {
        if self.table.is_none() {
            return;
        }
        for sample in buffer.iter_mut() {
            *sample = self.shape(*sample);
        }
    }
}
