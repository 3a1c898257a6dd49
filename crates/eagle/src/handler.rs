//! The EAGLE nesting grammar.
//!
//! [`DocumentHandler`] receives flat start/end/character events and keeps a
//! stack of open structural regions plus at most one open leaf (a text,
//! description or note whose character data is still to come). Which element
//! may start where is decided in [`may_start`]; everything else follows from
//! the stack.

use std::collections::BTreeMap;

use crate::attribute::Attribute;
use crate::board::{Document, Item, LayerDefBuilder, Package, PackageBuilder};
use crate::element::{
    CircleBuilder, ElementBuilder, HoleBuilder, PadBuilder, RectangleBuilder, SmdBuilder,
    TextBuilder, WireBuilder,
};
use crate::reader::ContentHandler;
use crate::{EagleError, Result};

/// Structural elements that contain other elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Layers,
    Board,
    Plain,
    Libraries,
    Library,
    Packages,
    Package,
}

impl Region {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "layers" => Some(Region::Layers),
            "board" => Some(Region::Board),
            "plain" => Some(Region::Plain),
            "libraries" => Some(Region::Libraries),
            "library" => Some(Region::Library),
            "packages" => Some(Region::Packages),
            "package" => Some(Region::Package),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Region::Layers => "layers",
            Region::Board => "board",
            Region::Plain => "plain",
            Region::Libraries => "libraries",
            Region::Library => "library",
            Region::Packages => "packages",
            Region::Package => "package",
        }
    }
}

/// An element waiting for its character data.
#[derive(Debug)]
enum Leaf {
    Text(TextBuilder),
    Description(TextBuilder),
    Note,
    /// A description that does not belong to a package.
    DiscardedDescription,
}

impl Leaf {
    fn name(&self) -> &'static str {
        match self {
            Leaf::Text(_) => "text",
            Leaf::Description(_) | Leaf::DiscardedDescription => "description",
            Leaf::Note => "note",
        }
    }
}

/// Whether `element` may open given the innermost open region.
///
/// Returns `None` for element names the grammar does not know about.
fn may_start(element: &str, inner: Option<Region>, leaf_open: bool) -> Option<bool> {
    let allowed = match element {
        "layers" | "board" => inner.is_none(),
        "layer" => inner == Some(Region::Layers),
        "plain" => inner == Some(Region::Board),
        "libraries" => matches!(inner, None | Some(Region::Board)),
        "library" => matches!(inner, None | Some(Region::Libraries)),
        "packages" => matches!(inner, None | Some(Region::Board) | Some(Region::Library)),
        "package" => inner == Some(Region::Packages),
        "pad" | "smd" => inner == Some(Region::Package),
        "text" | "description" | "note" | "wire" | "hole" | "via" | "rectangle" | "circle" => {
            inner != Some(Region::Layers)
        }
        _ => return None,
    };
    Some(allowed && !leaf_open)
}

/// Builds a [`Document`] from parser events.
#[derive(Debug, Default)]
pub struct DocumentHandler {
    regions: Vec<Region>,
    leaf: Option<Leaf>,
    package: Option<Package>,
    document: Document,
    element_counts: BTreeMap<String, usize>,
    warnings: Vec<String>,
}

impl DocumentHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of start tags seen per element name.
    pub fn element_counts(&self) -> &BTreeMap<String, usize> {
        &self.element_counts
    }

    /// Non-fatal diagnostics, in the order they were logged.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The finished document. Fails if any element is still open.
    pub fn finish(self) -> Result<Document> {
        if let Some(leaf) = &self.leaf {
            return Err(EagleError::UnclosedElement {
                element: leaf.name().to_string(),
            });
        }
        if let Some(region) = self.regions.last() {
            return Err(EagleError::UnclosedElement {
                element: region.name().to_string(),
            });
        }

        for (element, count) in &self.element_counts {
            log::info!("{element}: {count}");
        }
        Ok(self.document)
    }

    fn warn(&mut self, message: String) {
        log::warn!("{message}");
        self.warnings.push(message);
    }

    fn context(&self) -> String {
        match (&self.leaf, self.regions.last()) {
            (Some(leaf), _) => format!("<{}>", leaf.name()),
            (None, Some(region)) => format!("<{}>", region.name()),
            (None, None) => "the document root".to_string(),
        }
    }

    fn unexpected_start(&self, element: &str) -> EagleError {
        EagleError::UnexpectedElement {
            element: element.to_string(),
            context: self.context(),
        }
    }

    fn unexpected_end(&self, element: &str) -> EagleError {
        EagleError::UnexpectedEnd {
            element: element.to_string(),
            context: self.context(),
        }
    }

    fn consume_attributes<B: ElementBuilder>(
        &mut self,
        builder: &mut B,
        attributes: &[Attribute<'_>],
    ) -> Result<()> {
        for attr in attributes {
            if !builder.try_consume(attr)? {
                self.warn(format!(
                    "unexpected attribute '{}' in {} definition",
                    attr.name(),
                    builder.element()
                ));
            }
        }
        Ok(())
    }

    fn build<B: ElementBuilder>(
        &mut self,
        mut builder: B,
        attributes: &[Attribute<'_>],
    ) -> Result<B::Output> {
        self.consume_attributes(&mut builder, attributes)?;
        builder.finish()
    }

    /// Hand a finished element to the open package, or to the board.
    fn route(&mut self, item: impl Into<Item>) {
        match &mut self.package {
            Some(package) => package.board.push(item),
            None => self.document.board.push(item),
        }
    }

    fn open_text(&mut self, attributes: &[Attribute<'_>]) -> Result<()> {
        let mut builder = TextBuilder::text();
        self.consume_attributes(&mut builder, attributes)?;
        self.leaf = Some(Leaf::Text(builder));
        Ok(())
    }

    fn open_description(&mut self, attributes: &[Attribute<'_>]) -> Result<()> {
        if self.regions.last() != Some(&Region::Package) {
            log::debug!("ignoring description inside {}", self.context());
            self.leaf = Some(Leaf::DiscardedDescription);
            return Ok(());
        }
        let mut builder = TextBuilder::description();
        self.consume_attributes(&mut builder, attributes)?;
        self.leaf = Some(Leaf::Description(builder));
        Ok(())
    }

    fn close_leaf(&mut self, element: &str) -> Result<()> {
        match self.leaf.take() {
            Some(Leaf::Text(builder)) if element == "text" => {
                let text = builder.finish()?;
                self.route(text);
            }
            Some(Leaf::Description(builder)) if element == "description" => {
                let description = builder.finish_description();
                if let Some(package) = &mut self.package {
                    package.set_description(description);
                }
            }
            Some(Leaf::DiscardedDescription) if element == "description" => {}
            Some(Leaf::Note) if element == "note" => {}
            other => {
                self.leaf = other;
                return Err(self.unexpected_end(element));
            }
        }
        Ok(())
    }

    fn close_region(&mut self, element: &str, region: Region) -> Result<()> {
        if self.leaf.is_some() || self.regions.last() != Some(&region) {
            return Err(self.unexpected_end(element));
        }
        self.regions.pop();

        if region == Region::Package
            && let Some(package) = self.package.take()
        {
            log::debug!(
                "package '{}' with {} elements",
                package.name,
                package.board.len()
            );
            self.document.packages.push(package);
        }
        Ok(())
    }
}

impl ContentHandler for DocumentHandler {
    fn start_element(&mut self, element: &str, attributes: &[Attribute<'_>]) -> Result<()> {
        *self
            .element_counts
            .entry(element.to_string())
            .or_default() += 1;

        let inner = self.regions.last().copied();
        match may_start(element, inner, self.leaf.is_some()) {
            None => return Ok(()),
            Some(false) => return Err(self.unexpected_start(element)),
            Some(true) => {}
        }

        match element {
            "layer" => {
                let layer = self.build(LayerDefBuilder::default(), attributes)?;
                self.document.layers.insert(layer.number, layer);
            }
            "package" => {
                self.package = Some(self.build(PackageBuilder::default(), attributes)?);
                self.regions.push(Region::Package);
            }
            "text" => self.open_text(attributes)?,
            "description" => self.open_description(attributes)?,
            "note" => self.leaf = Some(Leaf::Note),
            "wire" => {
                let wire = self.build(WireBuilder::default(), attributes)?;
                self.route(wire);
            }
            "hole" => {
                let hole = self.build(HoleBuilder::hole(), attributes)?;
                self.route(hole);
            }
            "via" => {
                let via = self.build(HoleBuilder::via(), attributes)?;
                self.route(via);
            }
            "rectangle" => {
                let rect = self.build(RectangleBuilder::default(), attributes)?;
                self.route(rect);
            }
            "circle" => {
                let circle = self.build(CircleBuilder::default(), attributes)?;
                self.route(circle);
            }
            "pad" => {
                let pad = self.build(PadBuilder::default(), attributes)?;
                self.route(pad);
            }
            "smd" => {
                let smd = self.build(SmdBuilder::default(), attributes)?;
                self.route(smd);
            }
            _ => {
                if let Some(region) = Region::from_name(element) {
                    self.regions.push(region);
                }
            }
        }
        Ok(())
    }

    fn end_element(&mut self, element: &str) -> Result<()> {
        match element {
            "text" | "description" | "note" => self.close_leaf(element),
            _ => match Region::from_name(element) {
                Some(region) => self.close_region(element, region),
                None => Ok(()),
            },
        }
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        match &mut self.leaf {
            Some(Leaf::Text(builder)) | Some(Leaf::Description(builder)) => builder.set_value(text),
            Some(Leaf::Note) | Some(Leaf::DiscardedDescription) => Ok(()),
            None => {
                let message = format!("unexpected characters '{text}' inside {}", self.context());
                self.warn(message);
                Ok(())
            }
        }
    }
}
