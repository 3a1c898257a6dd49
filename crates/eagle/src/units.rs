//! Typed lengths.
//!
//! EAGLE writes coordinates as millimeters, while gEDA `pcb` counts in
//! centimils (1/100 mil). Every length read from a document is converted to
//! [`Centimils`] as soon as it is parsed, so the rest of the model only ever
//! deals with integer centimils.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use thiserror::Error;

const MM_PER_INCH: f64 = 25.4;
const MILS_PER_INCH: f64 = 1000.0;
const CENTIMILS_PER_MIL: f64 = 100.0;

/// A length in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Millimeters(f64);

impl Millimeters {
    /// Panics if `value` is NaN or infinite.
    pub fn new(value: f64) -> Self {
        Self::try_new(value).unwrap_or_else(|| panic!("non-finite length: {value} mm"))
    }

    pub fn try_new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// A length in mils (1/1000 inch).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Mils(f64);

impl Mils {
    /// Panics if `value` is NaN or infinite.
    pub fn new(value: f64) -> Self {
        Self::try_new(value).unwrap_or_else(|| panic!("non-finite length: {value} mil"))
    }

    pub fn try_new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// A length in centimils, the native integer unit of gEDA `pcb`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Centimils(i64);

impl Centimils {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Rounds to the nearest centimil, half away from zero.
    fn round(centimils: f64) -> Result<Self, OutOfRange> {
        let rounded = centimils.round();
        // `i64::MAX as f64` is 2^63, one past the largest value.
        if rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
            Ok(Self(rounded as i64))
        } else {
            Err(OutOfRange(centimils))
        }
    }
}

/// A length too large to be held in integer centimils.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{0} centimils is out of range")]
pub struct OutOfRange(pub f64);

impl TryFrom<Millimeters> for Centimils {
    type Error = OutOfRange;

    fn try_from(mm: Millimeters) -> Result<Self, OutOfRange> {
        Self::round(mm.0 / MM_PER_INCH * MILS_PER_INCH * CENTIMILS_PER_MIL)
    }
}

impl TryFrom<Mils> for Centimils {
    type Error = OutOfRange;

    fn try_from(mils: Mils) -> Result<Self, OutOfRange> {
        Self::round(mils.0 * CENTIMILS_PER_MIL)
    }
}

// Arithmetic saturates at the ends of the range.

impl Add for Centimils {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Centimils {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Centimils {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl fmt::Display for Centimils {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Linear unit in which a source document's coordinates are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LengthUnit {
    /// EAGLE's XML unit.
    #[default]
    Millimeter,
    Mil,
}

impl LengthUnit {
    /// Convert a raw document scalar, or `None` if it is not finite or does
    /// not fit in centimils.
    pub fn centimils(self, raw: f64) -> Option<Centimils> {
        match self {
            LengthUnit::Millimeter => Centimils::try_from(Millimeters::try_new(raw)?).ok(),
            LengthUnit::Mil => Centimils::try_from(Mils::try_new(raw)?).ok(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Mil => "mil",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
