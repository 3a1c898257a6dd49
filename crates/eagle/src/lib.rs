//! Streaming parser for EAGLE XML board and library files.
//!
//! The parser is event driven: [`reader::drive`] walks a quick-xml event
//! stream and feeds a [`ContentHandler`]. [`DocumentHandler`] is the handler
//! that enforces EAGLE's nesting grammar and builds the [`Document`] model
//! (board geometry plus library packages), with every length already
//! converted to [`Centimils`].
//!
//! ```
//! use eagle::{LengthUnit, parse};
//!
//! let xml = r#"<eagle><drawing><board><plain>
//!   <wire x1="0" y1="0" x2="10" y2="0" width="10" layer="21"/>
//! </plain></board></drawing></eagle>"#;
//! let document = parse(xml, LengthUnit::Mil).unwrap();
//! assert_eq!(document.board.wires[0].end.x.value(), 1000);
//! ```

pub mod attribute;
pub mod board;
pub mod capability;
pub mod element;
pub mod handler;
pub mod reader;
pub mod rotation;
pub mod units;

pub use attribute::Attribute;
pub use board::{Board, Document, Item, LayerDef, Package};
pub use capability::ConsumeAttribute;
pub use element::{
    Circle, Description, Hole, Language, Pad, PadShape, Point, Rectangle, Smd, Text, Wire,
};
pub use handler::DocumentHandler;
pub use reader::ContentHandler;
pub use rotation::Rotation;
pub use units::{Centimils, LengthUnit, Millimeters, Mils, OutOfRange};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EagleError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("Unknown entity reference '&{0};'")]
    UnknownEntity(String),

    #[error("Attribute '{attr}' is set more than once")]
    DuplicateAttribute { attr: String },

    #[error("Invalid value '{value}' for attribute '{attr}': {reason}")]
    InvalidAttribute {
        attr: String,
        value: String,
        reason: &'static str,
    },

    #[error("Missing required attribute '{attr}' on element '{element}'")]
    MissingAttribute {
        element: &'static str,
        attr: &'static str,
    },

    #[error("Text of <{element}> is given more than once")]
    DuplicateText { element: &'static str },

    #[error("Unexpected <{element}> inside {context}")]
    UnexpectedElement { element: String, context: String },

    #[error("Unexpected </{element}> inside {context}")]
    UnexpectedEnd { element: String, context: String },

    #[error("<{element}> is never closed")]
    UnclosedElement { element: String },

    #[error("line {line}, column {column}: {source}")]
    Malformed {
        line: usize,
        column: usize,
        source: Box<EagleError>,
    },
}

pub type Result<T> = std::result::Result<T, EagleError>;

/// Parse a complete EAGLE document whose coordinates are written in `units`.
pub fn parse(xml: &str, units: LengthUnit) -> Result<Document> {
    let mut handler = DocumentHandler::new();
    reader::drive(xml, units, &mut handler)?;
    handler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = EagleError::MissingAttribute {
            element: "wire",
            attr: "width",
        };
        assert_eq!(
            err.to_string(),
            "Missing required attribute 'width' on element 'wire'"
        );

        let err = EagleError::Malformed {
            line: 3,
            column: 7,
            source: Box::new(EagleError::UnclosedElement {
                element: "board".to_string(),
            }),
        };
        assert_eq!(err.to_string(), "line 3, column 7: <board> is never closed");
    }

    #[test]
    fn parse_empty_drawing() {
        let document = parse("<eagle><drawing/></eagle>", LengthUnit::Millimeter).unwrap();
        assert!(document.board.is_empty());
        assert!(document.packages.is_empty());
        assert!(document.layers.is_empty());
    }
}
