//! Layout file writer.

use std::fmt;

use crate::{Element, Layer, LayerObject, Layout, Polygon, Quoted};

pub const FILE_VERSION: u32 = 20070407;
pub const THERMAL: f64 = 0.5;
pub const FLAGS: &str = "nameonpcb,uniquename,clearnew,snappin";
pub const GROUPS: &str = "1,c:2:3:4:5:6,s:7:8";

/// Render a complete layout file.
pub fn render(layout: &Layout) -> String {
    log::debug!(
        "rendering {} vias, {} elements, {} layers",
        layout.vias.len(),
        layout.elements.len(),
        layout.layers.len()
    );
    layout.to_string()
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for comment in &self.comments {
            writeln!(f, "# {comment}")?;
        }
        writeln!(f, "FileVersion[{FILE_VERSION}]")?;
        writeln!(f)?;
        writeln!(f, "PCB[{} {} {}]", Quoted(&self.name), self.width, self.height)?;
        writeln!(f)?;
        writeln!(f, "Thermal[{THERMAL:.6}]")?;
        writeln!(f, "Flags({})", Quoted(FLAGS))?;
        writeln!(f, "Groups({})", Quoted(GROUPS))?;

        if !self.vias.is_empty() {
            writeln!(f)?;
            for via in &self.vias {
                writeln!(f, "{via}")?;
            }
        }
        for element in &self.elements {
            writeln!(f)?;
            write_element(f, element)?;
        }
        for layer in &self.layers {
            writeln!(f)?;
            write_layer(f, layer)?;
        }
        Ok(())
    }
}

fn write_element(f: &mut fmt::Formatter<'_>, element: &Element) -> fmt::Result {
    writeln!(f, "{}", element.header())?;
    writeln!(f, "(")?;
    for item in &element.items {
        writeln!(f, "\t{item}")?;
    }
    writeln!(f, ")")
}

fn write_layer(f: &mut fmt::Formatter<'_>, layer: &Layer) -> fmt::Result {
    writeln!(f, "Layer({} {})", layer.number, Quoted(&layer.name))?;
    writeln!(f, "(")?;
    for object in &layer.objects {
        match object {
            LayerObject::Line(line) => writeln!(f, "\t{line}")?,
            LayerObject::Arc(arc) => writeln!(f, "\t{arc}")?,
            LayerObject::Text(text) => writeln!(f, "\t{text}")?,
            LayerObject::Polygon(polygon) => write_polygon(f, polygon)?,
        }
    }
    writeln!(f, ")")
}

fn write_polygon(f: &mut fmt::Formatter<'_>, polygon: &Polygon) -> fmt::Result {
    writeln!(f, "\tPolygon({})", Quoted(&polygon.flags))?;
    writeln!(f, "\t(")?;
    write!(f, "\t\t")?;
    for (idx, (x, y)) in polygon.points.iter().enumerate() {
        if idx > 0 {
            write!(f, " ")?;
        }
        write!(f, "[{x} {y}]")?;
    }
    writeln!(f)?;
    writeln!(f, "\t)")
}
