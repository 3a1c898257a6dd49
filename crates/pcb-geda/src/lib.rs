//! Record model for gEDA `pcb` layout files.
//!
//! Each record type renders as one bracketed line via [`std::fmt::Display`];
//! [`Layout`] ties them together into a complete file (see [`render`]).
//! All coordinates are integer centimils (1/100 mil).

mod render;

pub use render::{FILE_VERSION, FLAGS, GROUPS, THERMAL, render};

use std::fmt;

/// A length in centimils.
pub type Coord = i64;

/// Flag list used on lines and arcs that keep a clearance to polygons.
pub const CLEARLINE: &str = "clearline";
/// Flag list used on polygons that clear around other objects.
pub const CLEARPOLY: &str = "clearpoly";

/// A complete layout file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// Leading `#` comment lines.
    pub comments: Vec<String>,
    pub name: String,
    pub width: Coord,
    pub height: Coord,
    pub vias: Vec<Via>,
    pub elements: Vec<Element>,
    pub layers: Vec<Layer>,
}

/// `Via[X Y Thickness Clearance Mask Drill "Name" "Flags"]`
#[derive(Debug, Clone, PartialEq)]
pub struct Via {
    pub x: Coord,
    pub y: Coord,
    pub thickness: Coord,
    pub clearance: Coord,
    pub mask: Coord,
    pub drill: Coord,
    pub name: String,
    pub flags: String,
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Via[{} {} {} {} {} {} {} {}]",
            self.x,
            self.y,
            self.thickness,
            self.clearance,
            self.mask,
            self.drill,
            Quoted(&self.name),
            Quoted(&self.flags)
        )
    }
}

/// A placed footprint with its pins, pads and silkscreen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub flags: String,
    pub description: String,
    pub name: String,
    pub value: String,
    pub mark_x: Coord,
    pub mark_y: Coord,
    pub text_x: Coord,
    pub text_y: Coord,
    /// Label direction in quarter turns, 0..=3.
    pub text_direction: u8,
    /// Label size in percent of the default font.
    pub text_scale: u32,
    pub text_flags: String,
    pub items: Vec<ElementItem>,
}

impl Element {
    /// The header line, without the body.
    pub fn header(&self) -> String {
        format!(
            "Element[{} {} {} {} {} {} {} {} {} {} {}]",
            Quoted(&self.flags),
            Quoted(&self.description),
            Quoted(&self.name),
            Quoted(&self.value),
            self.mark_x,
            self.mark_y,
            self.text_x,
            self.text_y,
            self.text_direction,
            self.text_scale,
            Quoted(&self.text_flags)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementItem {
    Pin(Pin),
    Pad(Pad),
    Line(ElementLine),
    Arc(ElementArc),
}

impl fmt::Display for ElementItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementItem::Pin(pin) => pin.fmt(f),
            ElementItem::Pad(pad) => pad.fmt(f),
            ElementItem::Line(line) => line.fmt(f),
            ElementItem::Arc(arc) => arc.fmt(f),
        }
    }
}

/// Through-hole pin, relative to the element mark.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub x: Coord,
    pub y: Coord,
    pub thickness: Coord,
    pub clearance: Coord,
    pub mask: Coord,
    pub drill: Coord,
    pub name: String,
    pub number: String,
    pub flags: String,
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pin[{} {} {} {} {} {} {} {} {}]",
            self.x,
            self.y,
            self.thickness,
            self.clearance,
            self.mask,
            self.drill,
            Quoted(&self.name),
            Quoted(&self.number),
            Quoted(&self.flags)
        )
    }
}

/// Surface pad drawn as a thick line between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    pub x1: Coord,
    pub y1: Coord,
    pub x2: Coord,
    pub y2: Coord,
    pub thickness: Coord,
    pub clearance: Coord,
    pub mask: Coord,
    pub name: String,
    pub number: String,
    pub flags: String,
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pad[{} {} {} {} {} {} {} {} {} {}]",
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.thickness,
            self.clearance,
            self.mask,
            Quoted(&self.name),
            Quoted(&self.number),
            Quoted(&self.flags)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementLine {
    pub x1: Coord,
    pub y1: Coord,
    pub x2: Coord,
    pub y2: Coord,
    pub thickness: Coord,
}

impl fmt::Display for ElementLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ElementLine[{} {} {} {} {}]",
            self.x1, self.y1, self.x2, self.y2, self.thickness
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementArc {
    pub x: Coord,
    pub y: Coord,
    pub width: Coord,
    pub height: Coord,
    pub start_angle: i32,
    pub delta_angle: i32,
    pub thickness: Coord,
}

impl fmt::Display for ElementArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ElementArc[{} {} {} {} {} {} {}]",
            self.x,
            self.y,
            self.width,
            self.height,
            self.start_angle,
            self.delta_angle,
            self.thickness
        )
    }
}

/// A copper or documentation layer and the objects drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub number: u8,
    pub name: String,
    pub objects: Vec<LayerObject>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerObject {
    Line(Line),
    Arc(Arc),
    Text(Text),
    Polygon(Polygon),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: Coord,
    pub y1: Coord,
    pub x2: Coord,
    pub y2: Coord,
    pub thickness: Coord,
    pub clearance: Coord,
    pub flags: String,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line[{} {} {} {} {} {} {}]",
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.thickness,
            self.clearance,
            Quoted(&self.flags)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub x: Coord,
    pub y: Coord,
    pub width: Coord,
    pub height: Coord,
    pub thickness: Coord,
    pub clearance: Coord,
    pub start_angle: i32,
    pub delta_angle: i32,
    pub flags: String,
}

impl fmt::Display for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arc[{} {} {} {} {} {} {} {} {}]",
            self.x,
            self.y,
            self.width,
            self.height,
            self.thickness,
            self.clearance,
            self.start_angle,
            self.delta_angle,
            Quoted(&self.flags)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: Coord,
    pub y: Coord,
    /// Quarter turns, 0..=3.
    pub direction: u8,
    /// Percent of the default font size.
    pub scale: u32,
    pub string: String,
    pub flags: String,
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Text[{} {} {} {} {} {}]",
            self.x,
            self.y,
            self.direction,
            self.scale,
            Quoted(&self.string),
            Quoted(&self.flags)
        )
    }
}

/// A filled polygon. Rendered over several lines by [`render`].
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub flags: String,
    pub points: Vec<(Coord, Coord)>,
}

/// Writes a string as a gEDA quoted field.
///
/// The format has no escape for line breaks, so they become spaces.
pub struct Quoted<'a>(pub &'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for ch in self.0.chars() {
            match ch {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' | '\r' | '\t' => f.write_str(" ")?,
                _ => write!(f, "{ch}")?,
            }
        }
        f.write_str("\"")
    }
}
