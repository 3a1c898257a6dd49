//! Containers: the board, library packages and the layer table.

use std::collections::BTreeMap;

use crate::Result;
use crate::attribute::Attribute;
use crate::capability::{ConsumeAttribute, required, set_once};
use crate::element::{
    Circle, Description, ElementBuilder, Hole, Language, Pad, Rectangle, Smd, Text, Wire,
};

/// A finished element on its way into a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text(Text),
    Hole(Hole),
    Wire(Wire),
    Rectangle(Rectangle),
    Circle(Circle),
    Pad(Pad),
    Smd(Smd),
}

macro_rules! impl_from_item {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<$kind> for Item {
                fn from(value: $kind) -> Self {
                    Item::$kind(value)
                }
            }
        )*
    };
}

impl_from_item!(Text, Hole, Wire, Rectangle, Circle, Pad, Smd);

/// Element collections, one ordered list per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub texts: Vec<Text>,
    pub holes: Vec<Hole>,
    pub wires: Vec<Wire>,
    pub rectangles: Vec<Rectangle>,
    pub circles: Vec<Circle>,
    pub pads: Vec<Pad>,
    pub smds: Vec<Smd>,
}

impl Board {
    pub fn push(&mut self, item: impl Into<Item>) {
        match item.into() {
            Item::Text(text) => self.texts.push(text),
            Item::Hole(hole) => self.holes.push(hole),
            Item::Wire(wire) => self.wires.push(wire),
            Item::Rectangle(rect) => self.rectangles.push(rect),
            Item::Circle(circle) => self.circles.push(circle),
            Item::Pad(pad) => self.pads.push(pad),
            Item::Smd(smd) => self.smds.push(smd),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of elements across all kinds.
    pub fn len(&self) -> usize {
        self.texts.len()
            + self.holes.len()
            + self.wires.len()
            + self.rectangles.len()
            + self.circles.len()
            + self.pads.len()
            + self.smds.len()
    }
}

/// A footprint from a library.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    pub name: String,
    pub description: Option<String>,
    pub board: Board,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Keep the description if it is the English variant; others are dropped.
    pub fn set_description(&mut self, description: Description) {
        match description.language {
            Language::English if description.text.is_empty() => {
                log::debug!("ignoring empty description of package '{}'", self.name)
            }
            Language::English => self.description = Some(description.text),
            other => log::debug!(
                "dropping {other:?} description of package '{}'",
                self.name
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackageBuilder {
    name: Option<String>,
}

impl ConsumeAttribute for PackageBuilder {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        match attr.name() {
            "name" => set_once(&mut self.name, attr, attr.value().to_string()),
            _ => Ok(false),
        }
    }
}

impl ElementBuilder for PackageBuilder {
    type Output = Package;

    fn element(&self) -> &'static str {
        "package"
    }

    fn finish(self) -> Result<Package> {
        Ok(Package::new(required(&self.name, "package", "name")?))
    }
}

/// One entry of the `<layers>` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDef {
    pub number: u8,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LayerDefBuilder {
    number: Option<u8>,
    name: Option<String>,
    active: Option<bool>,
}

impl ConsumeAttribute for LayerDefBuilder {
    fn try_consume(&mut self, attr: &Attribute<'_>) -> Result<bool> {
        match attr.name() {
            "number" => set_once(&mut self.number, attr, attr.integer()?),
            "name" => set_once(&mut self.name, attr, attr.value().to_string()),
            "active" => set_once(&mut self.active, attr, attr.flag()?),
            // Display settings.
            "color" | "fill" | "visible" => Ok(true),
            _ => Ok(false),
        }
    }
}

impl ElementBuilder for LayerDefBuilder {
    type Output = LayerDef;

    fn element(&self) -> &'static str {
        "layer"
    }

    fn finish(self) -> Result<LayerDef> {
        Ok(LayerDef {
            number: required(&self.number, "layer", "number")?,
            name: required(&self.name, "layer", "name")?,
            active: self.active.unwrap_or(true),
        })
    }
}

/// Everything read from one EAGLE file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub layers: BTreeMap<u8, LayerDef>,
    pub board: Board,
    pub packages: Vec<Package>,
}

impl Document {
    pub fn layer_name(&self, number: u8) -> Option<&str> {
        self.layers.get(&number).map(|layer| layer.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Point;
    use crate::units::{Centimils, LengthUnit};

    fn hole() -> Hole {
        Hole {
            position: Point::default(),
            drill: Centimils::new(3000),
            diameter: None,
            layer: None,
            is_via: false,
        }
    }

    #[test]
    fn test_push_keeps_order() {
        let mut board = Board::default();
        assert!(board.is_empty());
        let mut second = hole();
        second.drill = Centimils::new(4000);
        board.push(hole());
        board.push(second);
        assert_eq!(board.len(), 2);
        assert_eq!(board.holes[0].drill, Centimils::new(3000));
        assert_eq!(board.holes[1].drill, Centimils::new(4000));
    }

    #[test]
    fn test_english_description_wins() {
        let mut package = Package::new("R0805");
        package.set_description(Description {
            language: Language::English,
            text: "Resistor".to_string(),
        });
        package.set_description(Description {
            language: Language::German,
            text: "Widerstand".to_string(),
        });
        assert_eq!(package.description.as_deref(), Some("Resistor"));
    }

    #[test]
    fn test_empty_description_keeps_earlier_one() {
        let mut package = Package::new("R0805");
        package.set_description(Description {
            language: Language::English,
            text: "Resistor".to_string(),
        });
        package.set_description(Description {
            language: Language::English,
            text: String::new(),
        });
        assert_eq!(package.description.as_deref(), Some("Resistor"));
    }

    #[test]
    fn test_package_name_is_attribute_value() {
        let mut builder = PackageBuilder::default();
        let attr = Attribute::new("name", "SOT23", LengthUnit::Millimeter);
        assert!(builder.try_consume(&attr).unwrap());
        assert_eq!(builder.finish().unwrap().name, "SOT23");
        assert!(PackageBuilder::default().finish().is_err());
    }

    #[test]
    fn test_layer_def() {
        let mut builder = LayerDefBuilder::default();
        for (name, value) in [
            ("number", "21"),
            ("name", "tPlace"),
            ("color", "7"),
            ("active", "no"),
        ] {
            let attr = Attribute::new(name, value, LengthUnit::Millimeter);
            assert!(builder.try_consume(&attr).unwrap());
        }
        let layer = builder.finish().unwrap();
        assert_eq!(layer.number, 21);
        assert_eq!(layer.name, "tPlace");
        assert!(!layer.active);
    }
}
