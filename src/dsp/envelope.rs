/*
Percussive Envelope
===================

Every drum hit uses the same two-stage amplitude shape:

  Level
   peak ┐ ╱╲
        │╱  ╲
        │    ╲__
        │       ╲____
  floor └────────────╲___→ Time
        A      D

  attack   linear ramp from the floor up to `peak`, ~1.6-2ms
  decay    exponential fall from `peak` to the floor (0.0001) over the
           decay time, after which the envelope is finished

The exponential stage is a per-frame multiplier:

    ratio = (floor / peak) ^ (1 / decay_frames)

so after `decay_frames` multiplications the level lands exactly on the floor.
A peak at or below the floor never sounds.
*/

pub const ENVELOPE_FLOOR: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Attack,
    Decay,
    Finished,
}

#[derive(Debug, Clone)]
pub struct PercEnvelope {
    peak: f32,
    attack_frames: u32,
    decay_frames: u32,
    position: u32,
    level: f32,
    ratio: f32,
    stage: EnvelopeStage,
}

impl PercEnvelope {
    pub fn new(peak: f32, attack: f32, decay: f32, sample_rate: f32) -> Self {
        let attack_frames = (attack.max(0.0) * sample_rate).round() as u32;
        let decay_frames = ((decay.max(0.0) * sample_rate).round() as u32).max(1);

        let stage = if peak <= ENVELOPE_FLOOR {
            EnvelopeStage::Finished
        } else if attack_frames == 0 {
            EnvelopeStage::Decay
        } else {
            EnvelopeStage::Attack
        };

        let ratio = if peak > ENVELOPE_FLOOR {
            (ENVELOPE_FLOOR / peak).powf(1.0 / decay_frames as f32)
        } else {
            0.0
        };

        Self {
            peak,
            attack_frames,
            decay_frames,
            position: 0,
            level: if attack_frames == 0 { peak } else { ENVELOPE_FLOOR },
            ratio,
            stage,
        }
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn is_finished(&self) -> bool {
        self.stage == EnvelopeStage::Finished
    }

    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Total length in frames, attack plus decay.
    pub fn length_frames(&self) -> u32 {
        self.attack_frames + self.decay_frames
    }

    #[inline]
    pub fn next_level(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Attack => {
                let t = self.position as f32 / self.attack_frames as f32;
                let value = ENVELOPE_FLOOR + (self.peak - ENVELOPE_FLOOR) * t;
                self.position += 1;
                if self.position >= self.attack_frames {
                    self.position = 0;
                    self.level = self.peak;
                    self.stage = EnvelopeStage::Decay;
                }
                value
            }
            EnvelopeStage::Decay => {
                let value = self.level;
                self.level *= self.ratio;
                self.position += 1;
                if self.position >= self.decay_frames {
                    self.stage = EnvelopeStage::Finished;
                }
                value
            }
            EnvelopeStage::Finished => 0.0,
        }
    }

    /// Multiply a block in place by the envelope.
    pub fn apply(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample *= self.next_level();
        }
    }
}
