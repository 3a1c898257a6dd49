//! Reusable attribute-consuming behaviors shared by several element kinds.
//!
//! Each capability owns a handful of optional fields and recognizes the
//! attribute names that fill them. Element builders hold capabilities as
//! named fields and try them in a fixed order, falling back to their own
//! element-specific attributes.

use crate::attribute::Attribute;
use crate::rotation::Rotation;
use crate::units::Centimils;
use crate::{EagleError, Result};

/// Something that can absorb attributes from a start tag.
pub trait ConsumeAttribute {
    /// Record `attr` if its name is recognized.
    ///
    /// Returns `Ok(false)` and leaves `self` untouched when the name is not
    /// recognized. A recognized name that was already recorded is a
    /// [`EagleError::DuplicateAttribute`].
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool>;
}

/// Store `value` in an empty slot.
pub(crate) fn set_once<T>(slot: &mut Option<T>, attr: &Attribute<'_>, value: T) -> Result<bool> {
    if slot.is_some() {
        return Err(EagleError::DuplicateAttribute {
            attr: attr.name().to_string(),
        });
    }
    *slot = Some(value);
    Ok(true)
}

/// Read back a field that the element cannot do without.
pub(crate) fn required<T: Clone>(
    slot: &Option<T>,
    element: &'static str,
    attr: &'static str,
) -> Result<T> {
    slot.clone().ok_or(EagleError::MissingAttribute { element, attr })
}

/// Fails with a duplicate error before the value is parsed.
fn ensure_unset<T>(slot: &Option<T>, attr: &Attribute<'_>) -> Result<()> {
    match slot {
        Some(_) => Err(EagleError::DuplicateAttribute {
            attr: attr.name().to_string(),
        }),
        None => Ok(()),
    }
}

/// Consume a length-valued attribute into `slot`.
pub(crate) fn length_into(slot: &mut Option<Centimils>, attr: &Attribute<'_>) -> Result<bool> {
    ensure_unset(slot, attr)?;
    set_once(slot, attr, attr.length()?)
}

/// Consume a float-valued attribute into `slot`.
pub(crate) fn float_into(slot: &mut Option<f64>, attr: &Attribute<'_>) -> Result<bool> {
    ensure_unset(slot, attr)?;
    set_once(slot, attr, attr.float()?)
}

/// Consume a rotation attribute into `slot`.
pub(crate) fn rotation_into(slot: &mut Option<Rotation>, attr: &Attribute<'_>) -> Result<bool> {
    ensure_unset(slot, attr)?;
    set_once(slot, attr, attr.rotation()?)
}

/// The EAGLE layer number an element is drawn on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InLayer {
    layer: Option<u8>,
}

impl InLayer {
    pub fn layer(&self) -> Option<u8> {
        self.layer
    }

    pub(crate) fn require(&self, element: &'static str) -> Result<u8> {
        required(&self.layer, element, "layer")
    }
}

impl ConsumeAttribute for InLayer {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        match attr.name() {
            "layer" => {
                ensure_unset(&self.layer, attr)?;
                set_once(&mut self.layer, attr, attr.integer()?)
            }
            _ => Ok(false),
        }
    }
}

/// Stroke width of a drawn element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HasWidth {
    width: Option<Centimils>,
}

impl HasWidth {
    pub fn width(&self) -> Option<Centimils> {
        self.width
    }

    pub(crate) fn require(&self, element: &'static str) -> Result<Centimils> {
        required(&self.width, element, "width")
    }
}

impl ConsumeAttribute for HasWidth {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        match attr.name() {
            "width" => length_into(&mut self.width, attr),
            _ => Ok(false),
        }
    }
}

/// Position plus optional rotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    x: Option<Centimils>,
    y: Option<Centimils>,
    rotation: Option<Rotation>,
}

impl Pose {
    pub fn x(&self) -> Option<Centimils> {
        self.x
    }

    pub fn y(&self) -> Option<Centimils> {
        self.y
    }

    pub fn rotation(&self) -> Option<Rotation> {
        self.rotation
    }

    pub(crate) fn require_position(&self, element: &'static str) -> Result<(Centimils, Centimils)> {
        Ok((
            required(&self.x, element, "x")?,
            required(&self.y, element, "y")?,
        ))
    }
}

impl ConsumeAttribute for Pose {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        match attr.name() {
            "x" => length_into(&mut self.x, attr),
            "y" => length_into(&mut self.y, attr),
            "rot" => rotation_into(&mut self.rotation, attr),
            _ => Ok(false),
        }
    }
}

/// Two corner or end points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndPoints {
    x1: Option<Centimils>,
    y1: Option<Centimils>,
    x2: Option<Centimils>,
    y2: Option<Centimils>,
}

impl EndPoints {
    pub fn x1(&self) -> Option<Centimils> {
        self.x1
    }

    pub fn y1(&self) -> Option<Centimils> {
        self.y1
    }

    pub fn x2(&self) -> Option<Centimils> {
        self.x2
    }

    pub fn y2(&self) -> Option<Centimils> {
        self.y2
    }

    #[allow(clippy::type_complexity)]
    pub(crate) fn require(
        &self,
        element: &'static str,
    ) -> Result<((Centimils, Centimils), (Centimils, Centimils))> {
        Ok((
            (
                required(&self.x1, element, "x1")?,
                required(&self.y1, element, "y1")?,
            ),
            (
                required(&self.x2, element, "x2")?,
                required(&self.y2, element, "y2")?,
            ),
        ))
    }
}

impl ConsumeAttribute for EndPoints {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        match attr.name() {
            "x1" => length_into(&mut self.x1, attr),
            "y1" => length_into(&mut self.y1, attr),
            "x2" => length_into(&mut self.x2, attr),
            "y2" => length_into(&mut self.y2, attr),
            _ => Ok(false),
        }
    }
}
