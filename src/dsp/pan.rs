use std::f32::consts::FRAC_PI_2;

/// Left/right gains for a mono source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoGains {
    pub left: f32,
    pub right: f32,
}

/// Equal-power pan law for a mono input, pan in [-1, 1].
#[inline]
pub fn equal_power(pan: f32) -> StereoGains {
    let x = (pan.clamp(-1.0, 1.0) + 1.0) * 0.5;
    StereoGains {
        left: (x * FRAC_PI_2).cos(),
        right: (x * FRAC_PI_2).sin(),
    }
}
