//! Convert EAGLE XML boards into gEDA `pcb` layouts.
//!
//! ```
//! use eagle::LengthUnit;
//!
//! let xml = r#"<board><wire x1="0" y1="0" x2="10" y2="0" width="10" layer="1"/></board>"#;
//! let layout = eagle2geda::translate(xml, LengthUnit::Mil, "demo").unwrap();
//! assert!(layout.contains("Line[0 0 1000 0 1000 2000 \"clearline\"]"));
//! ```

pub mod convert;

pub use convert::to_layout;

use eagle::LengthUnit;

/// Parse an EAGLE document and render it as a gEDA layout file.
pub fn translate(xml: &str, units: LengthUnit, name: &str) -> eagle::Result<String> {
    let document = eagle::parse(xml, units)?;
    log::info!(
        "{} board elements, {} packages",
        document.board.len(),
        document.packages.len()
    );
    Ok(pcb_geda::render(&to_layout(&document, name)))
}
