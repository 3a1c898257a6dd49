//! Typed access to element attributes.

use std::borrow::Cow;
use std::str::FromStr;

use crate::rotation::Rotation;
use crate::units::{Centimils, LengthUnit};
use crate::{EagleError, Result};

/// One `name="value"` pair from an element's start tag.
///
/// quick-xml hands out attributes as raw bytes tied to the reader's buffer;
/// this wrapper owns (or borrows) the unescaped text and knows the document's
/// linear unit, so length-valued attributes can be read directly as
/// [`Centimils`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'a> {
    name: Cow<'a, str>,
    value: Cow<'a, str>,
    units: LengthUnit,
}

impl<'a> Attribute<'a> {
    pub fn new(
        name: impl Into<Cow<'a, str>>,
        value: impl Into<Cow<'a, str>>,
        units: LengthUnit,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            units,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn units(&self) -> LengthUnit {
        self.units
    }

    /// A length in the document's unit, converted to centimils.
    pub fn length(&self) -> Result<Centimils> {
        let raw = self.float()?;
        self.units
            .centimils(raw)
            .ok_or_else(|| self.invalid("length is not finite or out of range"))
    }

    /// A finite floating point number.
    pub fn float(&self) -> Result<f64> {
        let value: f64 = self
            .value
            .trim()
            .parse()
            .map_err(|_| self.invalid("expected a number"))?;
        if !value.is_finite() {
            return Err(self.invalid("number is not finite"));
        }
        Ok(value)
    }

    pub fn integer<T: FromStr>(&self) -> Result<T> {
        self.value
            .trim()
            .parse()
            .map_err(|_| self.invalid("expected an integer"))
    }

    pub fn rotation(&self) -> Result<Rotation> {
        self.value.parse().map_err(|reason| self.invalid(reason))
    }

    /// EAGLE booleans are spelled `yes`/`no`.
    pub fn flag(&self) -> Result<bool> {
        match self.value.trim() {
            "yes" => Ok(true),
            "no" => Ok(false),
            _ => Err(self.invalid("expected 'yes' or 'no'")),
        }
    }

    pub(crate) fn invalid(&self, reason: &'static str) -> EagleError {
        EagleError::InvalidAttribute {
            attr: self.name.to_string(),
            value: self.value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &'static str, value: &'static str) -> Attribute<'static> {
        Attribute::new(name, value, LengthUnit::Millimeter)
    }

    #[test]
    fn test_length_uses_document_unit() {
        assert_eq!(attr("x", "2.54").length().unwrap(), Centimils::new(10_000));
        let mil = Attribute::new("x", "25", LengthUnit::Mil);
        assert_eq!(mil.length().unwrap(), Centimils::new(2500));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = attr("width", "wide").length().unwrap_err();
        assert!(matches!(
            err,
            EagleError::InvalidAttribute { ref attr, ref value, .. } if attr == "width" && value == "wide"
        ));
        assert!(attr("width", "inf").float().is_err());
        assert!(attr("width", "NaN").length().is_err());
    }

    #[test]
    fn test_integer_and_flag() {
        assert_eq!(attr("layer", "16").integer::<u8>().unwrap(), 16);
        assert!(attr("layer", "300").integer::<u8>().is_err());
        assert!(attr("active", "yes").flag().unwrap());
        assert!(!attr("active", "no").flag().unwrap());
        assert!(attr("active", "maybe").flag().is_err());
    }

    #[test]
    fn test_rotation() {
        let rot = attr("rot", "MR90").rotation().unwrap();
        assert_eq!(rot.degrees(), 90.0);
        assert!(rot.is_mirrored());
        assert!(attr("rot", "sideways").rotation().is_err());
    }

    #[test]
    fn test_owned_values() {
        let owned = Attribute::new(String::from("name"), String::from("R1"), LengthUnit::Mil);
        assert_eq!(owned.name(), "name");
        assert_eq!(owned.value(), "R1");
        assert_eq!(owned.units(), LengthUnit::Mil);
    }
}
