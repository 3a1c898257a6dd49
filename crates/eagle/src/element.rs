//! Board element kinds and the builders that assemble them from attributes.
//!
//! A builder collects attributes from one start tag (and, for text, the
//! character data that follows) and `finish()`es into an immutable element.
//! Required attributes are checked at that point.

use std::str::FromStr;

use crate::attribute::Attribute;
use crate::capability::{
    ConsumeAttribute, EndPoints, HasWidth, InLayer, Pose, float_into, length_into, required,
    rotation_into, set_once,
};
use crate::rotation::Rotation;
use crate::units::Centimils;
use crate::{EagleError, Result};

/// An element builder that can be driven from a start tag.
pub trait ElementBuilder: ConsumeAttribute {
    type Output;

    /// Element name, used in diagnostics.
    fn element(&self) -> &'static str;

    fn finish(self) -> Result<Self::Output>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: Centimils,
    pub y: Centimils,
}

impl Point {
    pub fn new(x: Centimils, y: Centimils) -> Self {
        Self { x, y }
    }
}

impl From<(Centimils, Centimils)> for Point {
    fn from((x, y): (Centimils, Centimils)) -> Self {
        Self { x, y }
    }
}

/// Language tag of a text or description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    German,
}

impl Language {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "en" => Some(Language::English),
            "de" => Some(Language::German),
            _ => None,
        }
    }
}

/// A text label.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub position: Point,
    pub rotation: Rotation,
    pub layer: u8,
    pub size: Centimils,
    /// Stroke width as a percentage of the size.
    pub ratio: Option<f64>,
    pub language: Language,
    pub value: String,
}

/// Free text attached to a package.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub language: Language,
    pub text: String,
}

/// Collects a `<text>` or `<description>` element.
///
/// The string value arrives as character data after the start tag, so it is
/// set separately through [`TextBuilder::set_value`].
#[derive(Debug, Clone)]
pub struct TextBuilder {
    element: &'static str,
    pose: Pose,
    layer: InLayer,
    size: Option<Centimils>,
    ratio: Option<f64>,
    language: Option<Language>,
    value: Option<String>,
}

impl TextBuilder {
    pub fn text() -> Self {
        Self::for_element("text")
    }

    pub fn description() -> Self {
        Self::for_element("description")
    }

    fn for_element(element: &'static str) -> Self {
        Self {
            element,
            pose: Pose::default(),
            layer: InLayer::default(),
            size: None,
            ratio: None,
            language: None,
            value: None,
        }
    }

    pub fn language(&self) -> Language {
        self.language.unwrap_or_default()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Record the character data of the element. Only one value is allowed.
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        if self.value.is_some() {
            return Err(EagleError::DuplicateText {
                element: self.element,
            });
        }
        self.value = Some(value.into());
        Ok(())
    }

    /// Finish as a package description. Position and size are not needed.
    pub fn finish_description(self) -> Description {
        Description {
            language: self.language(),
            text: self.value.unwrap_or_default(),
        }
    }
}

impl ConsumeAttribute for TextBuilder {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        if self.pose.try_consume(attr)? || self.layer.try_consume(attr)? {
            return Ok(true);
        }
        match attr.name() {
            "size" => length_into(&mut self.size, attr),
            "ratio" => float_into(&mut self.ratio, attr),
            "language" => match Language::from_tag(attr.value()) {
                Some(language) => set_once(&mut self.language, attr, language),
                None => {
                    log::warn!("unknown language type '{}'", attr.value());
                    Ok(true)
                }
            },
            // Font and alignment only affect how EAGLE draws the glyphs.
            "font" | "align" | "distance" => Ok(true),
            _ => Ok(false),
        }
    }
}

impl ElementBuilder for TextBuilder {
    type Output = Text;

    fn element(&self) -> &'static str {
        self.element
    }

    fn finish(self) -> Result<Text> {
        let element = self.element;
        let language = self.language();
        Ok(Text {
            position: self.pose.require_position(element)?.into(),
            rotation: self.pose.rotation().unwrap_or_default(),
            layer: self.layer.require(element)?,
            size: required(&self.size, element, "size")?,
            ratio: self.ratio,
            language,
            value: self.value.ok_or(EagleError::MissingAttribute {
                element,
                attr: "#text",
            })?,
        })
    }
}

/// A drilled hole, or a plated via when `is_via` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    pub position: Point,
    pub drill: Centimils,
    /// Outer copper diameter of a via, when given.
    pub diameter: Option<Centimils>,
    pub layer: Option<u8>,
    pub is_via: bool,
}

#[derive(Debug, Clone)]
pub struct HoleBuilder {
    is_via: bool,
    pose: Pose,
    layer: InLayer,
    drill: Option<Centimils>,
    diameter: Option<Centimils>,
}

impl HoleBuilder {
    pub fn hole() -> Self {
        Self::new(false)
    }

    pub fn via() -> Self {
        Self::new(true)
    }

    fn new(is_via: bool) -> Self {
        Self {
            is_via,
            pose: Pose::default(),
            layer: InLayer::default(),
            drill: None,
            diameter: None,
        }
    }
}

impl ConsumeAttribute for HoleBuilder {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        if self.pose.try_consume(attr)? || self.layer.try_consume(attr)? {
            return Ok(true);
        }
        match attr.name() {
            "drill" => length_into(&mut self.drill, attr),
            "diameter" if self.is_via => length_into(&mut self.diameter, attr),
            // Layer span and pad shape of a via are not carried over.
            "extent" | "shape" if self.is_via => Ok(true),
            _ => Ok(false),
        }
    }
}

impl ElementBuilder for HoleBuilder {
    type Output = Hole;

    fn element(&self) -> &'static str {
        if self.is_via { "via" } else { "hole" }
    }

    fn finish(self) -> Result<Hole> {
        let element = self.element();
        Ok(Hole {
            position: self.pose.require_position(element)?.into(),
            drill: required(&self.drill, element, "drill")?,
            diameter: self.diameter,
            layer: self.layer.layer(),
            is_via: self.is_via,
        })
    }
}

/// A straight or curved line segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub start: Point,
    pub end: Point,
    pub layer: u8,
    pub width: Centimils,
    /// Arc angle in degrees; zero for a straight segment.
    pub curve: f64,
}

#[derive(Debug, Clone, Default)]
pub struct WireBuilder {
    endpoints: EndPoints,
    layer: InLayer,
    width: HasWidth,
    curve: Option<f64>,
}

impl ConsumeAttribute for WireBuilder {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        if self.endpoints.try_consume(attr)?
            || self.layer.try_consume(attr)?
            || self.width.try_consume(attr)?
        {
            return Ok(true);
        }
        match attr.name() {
            "curve" => float_into(&mut self.curve, attr),
            _ => Ok(false),
        }
    }
}

impl ElementBuilder for WireBuilder {
    type Output = Wire;

    fn element(&self) -> &'static str {
        "wire"
    }

    fn finish(self) -> Result<Wire> {
        let (start, end) = self.endpoints.require("wire")?;
        Ok(Wire {
            start: start.into(),
            end: end.into(),
            layer: self.layer.require("wire")?,
            width: self.width.require("wire")?,
            curve: self.curve.unwrap_or(0.0),
        })
    }
}

/// A filled rectangle given by two opposite corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub corner1: Point,
    pub corner2: Point,
    pub layer: u8,
    pub width: Option<Centimils>,
    pub rotation: Rotation,
}

#[derive(Debug, Clone, Default)]
pub struct RectangleBuilder {
    endpoints: EndPoints,
    layer: InLayer,
    width: HasWidth,
    rotation: Option<Rotation>,
}

impl ConsumeAttribute for RectangleBuilder {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        if self.endpoints.try_consume(attr)?
            || self.layer.try_consume(attr)?
            || self.width.try_consume(attr)?
        {
            return Ok(true);
        }
        match attr.name() {
            "rot" => rotation_into(&mut self.rotation, attr),
            _ => Ok(false),
        }
    }
}

impl ElementBuilder for RectangleBuilder {
    type Output = Rectangle;

    fn element(&self) -> &'static str {
        "rectangle"
    }

    fn finish(self) -> Result<Rectangle> {
        let (corner1, corner2) = self.endpoints.require("rectangle")?;
        Ok(Rectangle {
            corner1: corner1.into(),
            corner2: corner2.into(),
            layer: self.layer.require("rectangle")?,
            width: self.width.width(),
            rotation: self.rotation.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub layer: u8,
    pub width: Centimils,
    pub radius: Centimils,
}

#[derive(Debug, Clone, Default)]
pub struct CircleBuilder {
    pose: Pose,
    layer: InLayer,
    width: HasWidth,
    radius: Option<Centimils>,
}

impl ConsumeAttribute for CircleBuilder {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        if self.pose.try_consume(attr)?
            || self.layer.try_consume(attr)?
            || self.width.try_consume(attr)?
        {
            return Ok(true);
        }
        match attr.name() {
            "radius" => length_into(&mut self.radius, attr),
            _ => Ok(false),
        }
    }
}

impl ElementBuilder for CircleBuilder {
    type Output = Circle;

    fn element(&self) -> &'static str {
        "circle"
    }

    fn finish(self) -> Result<Circle> {
        Ok(Circle {
            center: self.pose.require_position("circle")?.into(),
            layer: self.layer.require("circle")?,
            width: self.width.require("circle")?,
            radius: required(&self.radius, "circle", "radius")?,
        })
    }
}

/// Copper shape of a through-hole pad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PadShape {
    #[default]
    Round,
    Square,
    Octagon,
    Long,
    Offset,
}

impl FromStr for PadShape {
    type Err = &'static str;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "round" => Ok(PadShape::Round),
            "square" => Ok(PadShape::Square),
            "octagon" => Ok(PadShape::Octagon),
            "long" => Ok(PadShape::Long),
            "offset" => Ok(PadShape::Offset),
            _ => Err("expected round, square, octagon, long or offset"),
        }
    }
}

/// A through-hole pad of a package.
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    pub name: String,
    pub position: Point,
    pub rotation: Rotation,
    pub drill: Centimils,
    pub diameter: Option<Centimils>,
    pub shape: PadShape,
}

#[derive(Debug, Clone, Default)]
pub struct PadBuilder {
    name: Option<String>,
    pose: Pose,
    drill: Option<Centimils>,
    diameter: Option<Centimils>,
    shape: Option<PadShape>,
}

impl ConsumeAttribute for PadBuilder {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        if self.pose.try_consume(attr)? {
            return Ok(true);
        }
        match attr.name() {
            "name" => set_once(&mut self.name, attr, attr.value().to_string()),
            "drill" => length_into(&mut self.drill, attr),
            "diameter" => length_into(&mut self.diameter, attr),
            "shape" => {
                let shape = attr
                    .value()
                    .parse::<PadShape>()
                    .map_err(|reason| attr.invalid(reason))?;
                set_once(&mut self.shape, attr, shape)
            }
            // Solder stop, thermal relief and first-pad marking.
            "stop" | "thermals" | "first" => Ok(true),
            _ => Ok(false),
        }
    }
}

impl ElementBuilder for PadBuilder {
    type Output = Pad;

    fn element(&self) -> &'static str {
        "pad"
    }

    fn finish(self) -> Result<Pad> {
        Ok(Pad {
            position: self.pose.require_position("pad")?.into(),
            rotation: self.pose.rotation().unwrap_or_default(),
            name: required(&self.name, "pad", "name")?,
            drill: required(&self.drill, "pad", "drill")?,
            diameter: self.diameter,
            shape: self.shape.unwrap_or_default(),
        })
    }
}

/// A surface-mount pad of a package.
#[derive(Debug, Clone, PartialEq)]
pub struct Smd {
    pub name: String,
    pub position: Point,
    pub rotation: Rotation,
    pub dx: Centimils,
    pub dy: Centimils,
    pub layer: u8,
    /// Corner rounding in percent, 100 being fully round.
    pub roundness: u8,
}

#[derive(Debug, Clone, Default)]
pub struct SmdBuilder {
    name: Option<String>,
    pose: Pose,
    layer: InLayer,
    dx: Option<Centimils>,
    dy: Option<Centimils>,
    roundness: Option<u8>,
}

impl ConsumeAttribute for SmdBuilder {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        if self.pose.try_consume(attr)? || self.layer.try_consume(attr)? {
            return Ok(true);
        }
        match attr.name() {
            "name" => set_once(&mut self.name, attr, attr.value().to_string()),
            "dx" => length_into(&mut self.dx, attr),
            "dy" => length_into(&mut self.dy, attr),
            "roundness" => {
                let roundness: u8 = attr.integer()?;
                if roundness > 100 {
                    return Err(attr.invalid("roundness is a percentage"));
                }
                set_once(&mut self.roundness, attr, roundness)
            }
            "stop" | "thermals" | "cream" => Ok(true),
            _ => Ok(false),
        }
    }
}

impl ElementBuilder for SmdBuilder {
    type Output = Smd;

    fn element(&self) -> &'static str {
        "smd"
    }

    fn finish(self) -> Result<Smd> {
        Ok(Smd {
            position: self.pose.require_position("smd")?.into(),
            rotation: self.pose.rotation().unwrap_or_default(),
            name: required(&self.name, "smd", "name")?,
            dx: required(&self.dx, "smd", "dx")?,
            dy: required(&self.dy, "smd", "dy")?,
            layer: self.layer.require("smd")?,
            roundness: self.roundness.unwrap_or(0),
        })
    }
}
