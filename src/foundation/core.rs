use crate::foundation::error::{LapseError, LapseResult};

/// 0-based position of a frame in the output sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> LapseResult<Self> {
        if den == 0 {
            return Err(LapseError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LapseError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Rational form of a fractional rate, exact to a thousandth of a frame per second.
    pub fn from_f64(fps: f64) -> LapseResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(LapseError::validation(format!(
                "fps must be finite and > 0, got {fps}"
            )));
        }
        let millis = (fps * 1000.0).round();
        if !(1.0..=f64::from(u32::MAX)).contains(&millis) {
            return Err(LapseError::validation(format!(
                "fps {fps} is outside 0.001..={}",
                u32::MAX / 1000
            )));
        }
        let num = millis as u32;
        let g = gcd(num, 1000);
        Self::new(num / g, 1000 / g)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Frame delay as a `(numerator, denominator)` pair of milliseconds.
    pub fn frame_delay_ms_ratio(self) -> (u32, u32) {
        (self.den.saturating_mul(1000), self.num)
    }

    /// Frame delay in whole milliseconds (truncating).
    pub fn frame_delay_ms(self) -> u32 {
        let (n, d) = self.frame_delay_ms_ratio();
        n / d
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    pub fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    pub fn byte_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Straight-alpha RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
