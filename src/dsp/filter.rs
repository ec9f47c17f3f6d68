use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type      | passes          | rejects      | used for                         |
| --------- | --------------- | ------------ | -------------------------------- |
| low-pass  | below cutoff    | above cutoff | tone cascade, noise band top     |
| high-pass | above cutoff    | below cutoff | noise band bottom                |
| peaking   | everything      | nothing      | resonance emphasis at cutoff     |

All three responses come out of the same topology-preserving state-variable
core. `k` is the damping term (1/Q). The peaking response reuses the bandpass
tap: out = in + k * (A^2 - 1) * bandpass, with k = 1 / (Q * A).
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterType {
    LowPass,
    HighPass,
    Peaking { gain_db: f32 },
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: q.max(0.01),
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, std::f32::consts::FRAC_1_SQRT_2)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, std::f32::consts::FRAC_1_SQRT_2)
    }

    pub fn peaking(center_hz: f32, q: f32, gain_db: f32) -> Self {
        Self::new(FilterType::Peaking { gain_db }, center_hz, q)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.q = q.max(0.01);
        self
    }

    /// Prewarped integrator gain. Cutoff is kept under Nyquist so `tan` stays finite.
    #[inline]
    fn compute_g(&self, sample_rate: f32) -> f32 {
        let cutoff = self.cutoff_hz.clamp(10.0, sample_rate * 0.49);
        (PI * cutoff / sample_rate).tan()
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = self.compute_g(sample_rate);

        match self.filter_type {
            FilterType::LowPass => {
                let k = 1.0 / self.q;
                for sample in buffer.iter_mut() {
                    *sample = self.next_sample(*sample, k, g).lowpass;
                }
            }
            FilterType::HighPass => {
                let k = 1.0 / self.q;
                for sample in buffer.iter_mut() {
                    *sample = self.next_sample(*sample, k, g).highpass;
                }
            }
            FilterType::Peaking { gain_db } => {
                let a = 10.0_f32.powf(gain_db / 40.0);
                let k = 1.0 / (self.q * a);
                let boost = k * (a * a - 1.0);
                for sample in buffer.iter_mut() {
                    let input = *sample;
                    let outputs = self.next_sample(input, k, g);
                    *sample = input + boost * outputs.bandpass;
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q.max(0.01);
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}
