//! The EAGLE `rot` attribute.

use std::fmt;
use std::str::FromStr;

/// Orientation of an EAGLE element, parsed from the `rot` attribute.
///
/// EAGLE spells rotations as `[M][S]R<degrees>`: `M` mirrors the element to
/// the opposite side, `S` ("spin") keeps text readable from the wrong side,
/// and the angle is counter-clockwise in degrees. `R90`, `MR180` and `SR0`
/// are all valid. A bare number is read as an angle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    degrees: f64,
    mirrored: bool,
    spin: bool,
}

impl Rotation {
    pub fn new(degrees: f64) -> Self {
        Self {
            degrees,
            mirrored: false,
            spin: false,
        }
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn is_spin(&self) -> bool {
        self.spin
    }

    /// Angle rounded to the nearest multiple of 90 degrees, as 0..=3.
    pub fn quarter_turns(&self) -> u8 {
        ((self.degrees / 90.0).round() as i64).rem_euclid(4) as u8
    }

    /// Whether the angle is a whole multiple of 90 degrees.
    pub fn is_axis_aligned(&self) -> bool {
        let turns = self.degrees / 90.0;
        (turns - turns.round()).abs() < 1e-9
    }
}

impl FromStr for Rotation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rest = s.trim();
        let mut mirrored = false;
        let mut spin = false;
        loop {
            if let Some(tail) = rest.strip_prefix('M') {
                mirrored = true;
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix('S') {
                spin = true;
                rest = tail;
            } else {
                break;
            }
        }

        match rest.strip_prefix('R') {
            Some(angle) => rest = angle,
            None if mirrored || spin => return Err("expected 'R' before the angle"),
            None => {}
        }

        let degrees: f64 = rest.parse().map_err(|_| "expected an angle in degrees")?;
        if !degrees.is_finite() {
            return Err("angle is not finite");
        }

        Ok(Self {
            degrees,
            mirrored,
            spin,
        })
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mirrored {
            f.write_str("M")?;
        }
        if self.spin {
            f.write_str("S")?;
        }
        write!(f, "R{}", self.degrees)
    }
}
