//! quick-xml event driver.
//!
//! Turns the pull-style quick-xml event stream into push-style callbacks on a
//! [`ContentHandler`]. Adjacent text, CDATA and entity-reference events are
//! joined into one character run, trimmed, and delivered only if something
//! other than whitespace remains. Every error leaving [`drive`] is wrapped in
//! [`EagleError::Malformed`] with the line and column where it happened.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::attribute::Attribute;
use crate::units::LengthUnit;
use crate::{EagleError, Result};

/// Receives document events in order.
pub trait ContentHandler {
    fn start_element(&mut self, element: &str, attributes: &[Attribute<'_>]) -> Result<()>;

    fn end_element(&mut self, element: &str) -> Result<()>;

    fn characters(&mut self, text: &str) -> Result<()>;
}

/// Feed every event of `xml` to `handler`.
pub fn drive<H: ContentHandler>(xml: &str, units: LengthUnit, handler: &mut H) -> Result<()> {
    let mut driver = Driver {
        reader: Reader::from_str(xml),
        units,
        text: String::new(),
        open: Vec::new(),
    };
    let mut buf = Vec::new();

    loop {
        let offset = to_offset(driver.reader.buffer_position());
        match driver.step(&mut buf, handler) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(err @ EagleError::Xml(_)) => {
                let offset = to_offset(driver.reader.error_position());
                return Err(locate(xml, offset, err));
            }
            Err(err) => return Err(locate(xml, offset, err)),
        }
        buf.clear();
    }
}

struct Driver<'a> {
    reader: Reader<&'a [u8]>,
    units: LengthUnit,
    /// Character data not yet delivered.
    text: String,
    /// Names of the elements currently open.
    open: Vec<String>,
}

impl Driver<'_> {
    /// Process one event. Returns `false` at end of input.
    fn step<H: ContentHandler>(&mut self, buf: &mut Vec<u8>, handler: &mut H) -> Result<bool> {
        match self.reader.read_event_into(buf)? {
            Event::Start(start) => {
                self.flush(handler)?;
                let name = element_name(start.name().as_ref());
                let attributes = self.attributes(&start)?;
                handler.start_element(&name, &attributes)?;
                self.open.push(name);
            }
            Event::Empty(start) => {
                self.flush(handler)?;
                let name = element_name(start.name().as_ref());
                let attributes = self.attributes(&start)?;
                handler.start_element(&name, &attributes)?;
                handler.end_element(&name)?;
            }
            Event::End(end) => {
                self.flush(handler)?;
                let name = element_name(end.name().as_ref());
                self.open.pop();
                handler.end_element(&name)?;
            }
            // References arrive as separate `GeneralRef` events.
            Event::Text(text) => self.text.push_str(&String::from_utf8_lossy(&text)),
            Event::CData(cdata) => self.text.push_str(&String::from_utf8_lossy(&cdata)),
            Event::GeneralRef(reference) => self.push_reference(&reference)?,
            Event::Eof => {
                self.flush(handler)?;
                if let Some(element) = self.open.pop() {
                    return Err(EagleError::UnclosedElement { element });
                }
                return Ok(false);
            }
            // Declarations, comments, processing instructions and doctype.
            _ => {}
        }
        Ok(true)
    }

    fn flush<H: ContentHandler>(&mut self, handler: &mut H) -> Result<()> {
        let trimmed = self.text.trim();
        if !trimmed.is_empty() {
            handler.characters(trimmed)?;
        }
        self.text.clear();
        Ok(())
    }

    fn push_reference(&mut self, reference: &BytesRef<'_>) -> Result<()> {
        if let Some(ch) = reference.resolve_char_ref().map_err(escape_error)? {
            self.text.push(ch);
            return Ok(());
        }
        let name = String::from_utf8_lossy(reference);
        match resolve_predefined_entity(&name) {
            Some(value) => {
                self.text.push_str(value);
                Ok(())
            }
            None => Err(EagleError::UnknownEntity(name.into_owned())),
        }
    }

    fn attributes(&self, start: &BytesStart<'_>) -> Result<Vec<Attribute<'static>>> {
        start
            .attributes()
            .map(|attr| {
                let attr = attr?;
                let name = element_name(attr.key.as_ref());
                let value = attr.unescape_value().map_err(escape_error)?.into_owned();
                Ok(Attribute::new(name, value, self.units))
            })
            .collect()
    }
}

/// Escape failures get their own variant. `Xml` errors are located at the
/// reader's error position.
fn escape_error(err: impl Into<quick_xml::Error>) -> EagleError {
    match err.into() {
        quick_xml::Error::Escape(err) => EagleError::Escape(err),
        err => EagleError::Xml(err),
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn to_offset(position: u64) -> usize {
    usize::try_from(position).unwrap_or(usize::MAX)
}

/// Attach a 1-based line and column to an error at byte `offset` of `xml`.
fn locate(xml: &str, offset: usize, source: EagleError) -> EagleError {
    let prefix = &xml.as_bytes()[..offset.min(xml.len())];
    let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = prefix
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |newline| newline + 1);
    EagleError::Malformed {
        line,
        column: prefix.len() - line_start + 1,
        source: Box::new(source),
    }
}
