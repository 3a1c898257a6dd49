//! Mapping from the EAGLE model onto gEDA records.
//!
//! Coordinates are copied through unchanged apart from the unit conversion
//! the parser already did. Board holes become vias, board graphics are
//! grouped per EAGLE layer, and every library package becomes one element.

use std::collections::BTreeMap;

use eagle::{
    Board, Centimils, Circle, Document, Hole, Package, Pad, PadShape, Rectangle, Smd, Text, Wire,
};
use pcb_geda::{self as geda, CLEARLINE, CLEARPOLY, Coord, ElementItem, Layer, LayerObject, Layout};

pub const COMMENT: &str = "Output generated from EAGLE board automatically by eagle2geda.";

/// Copper clearance kept around lines, vias and pads.
pub const CLEARANCE: Coord = 2000;
/// Solder mask opening beyond the copper.
pub const MASK_MARGIN: Coord = 600;
/// Copper ring width around a drill when EAGLE leaves the diameter automatic.
pub const ANNULUS: Coord = 1000;
/// Glyph height of the gEDA default font at 100% scale.
pub const FONT_HEIGHT: Coord = 4000;
/// Space added beyond the furthest board object.
pub const BOARD_MARGIN: Coord = 10000;
pub const DEFAULT_WIDTH: Coord = 600000;
pub const DEFAULT_HEIGHT: Coord = 500000;

/// EAGLE's bottom copper layer.
const BOTTOM_LAYER: u8 = 16;

/// Build the gEDA layout for a parsed document.
pub fn to_layout(document: &Document, name: &str) -> Layout {
    let (width, height) = board_size(&document.board);
    Layout {
        comments: vec![COMMENT.to_string()],
        name: name.to_string(),
        width,
        height,
        vias: document.board.holes.iter().map(via).collect(),
        elements: document.packages.iter().map(element).collect(),
        layers: layers(document),
    }
}

/// Width and height that hold every board object, or the default size.
fn board_size(board: &Board) -> (Coord, Coord) {
    let points = board
        .wires
        .iter()
        .flat_map(|wire| [wire.start, wire.end])
        .chain(board.holes.iter().map(|hole| hole.position))
        .chain(board.texts.iter().map(|text| text.position))
        .chain(
            board
                .rectangles
                .iter()
                .flat_map(|rect| [rect.corner1, rect.corner2]),
        )
        .chain(board.circles.iter().map(|circle| {
            eagle::Point::new(circle.center.x + circle.radius, circle.center.y + circle.radius)
        }));

    let extent = points.fold(None, |extent: Option<(Coord, Coord)>, point| {
        let (x, y) = (point.x.value(), point.y.value());
        Some(match extent {
            Some((max_x, max_y)) => (max_x.max(x), max_y.max(y)),
            None => (x, y),
        })
    });

    match extent {
        Some((x, y)) => (
            x.saturating_add(BOARD_MARGIN).max(BOARD_MARGIN),
            y.saturating_add(BOARD_MARGIN).max(BOARD_MARGIN),
        ),
        None => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
    }
}

/// Copper diameter for a drill whose diameter EAGLE leaves automatic.
fn ring(drill: Coord) -> Coord {
    drill.saturating_add(2 * ANNULUS)
}

fn via(hole: &Hole) -> geda::Via {
    let drill = hole.drill.value();
    let (thickness, flags) = if hole.is_via {
        (hole.diameter.map_or(ring(drill), Centimils::value), "")
    } else {
        (drill, "hole")
    };
    geda::Via {
        x: hole.position.x.value(),
        y: hole.position.y.value(),
        thickness,
        clearance: CLEARANCE,
        mask: thickness.saturating_add(MASK_MARGIN),
        drill,
        name: String::new(),
        flags: flags.to_string(),
    }
}

/// Board graphics grouped by EAGLE layer, in ascending layer number.
fn layers(document: &Document) -> Vec<Layer> {
    let board = &document.board;
    let mut objects: BTreeMap<u8, Vec<LayerObject>> = BTreeMap::new();

    for wire in &board.wires {
        objects
            .entry(wire.layer)
            .or_default()
            .push(LayerObject::Line(line(wire)));
    }
    for circle in &board.circles {
        objects
            .entry(circle.layer)
            .or_default()
            .push(LayerObject::Arc(arc(circle)));
    }
    for text in &board.texts {
        objects
            .entry(text.layer)
            .or_default()
            .push(LayerObject::Text(label(text)));
    }
    for rect in &board.rectangles {
        objects
            .entry(rect.layer)
            .or_default()
            .push(LayerObject::Polygon(polygon(rect)));
    }

    objects
        .into_iter()
        .map(|(number, objects)| Layer {
            number,
            name: document
                .layer_name(number)
                .map_or_else(|| format!("layer {number}"), str::to_string),
            objects,
        })
        .collect()
}

fn line(wire: &Wire) -> geda::Line {
    if wire.curve != 0.0 {
        log::warn!(
            "curved wire ({} degrees) on layer {} is drawn straight",
            wire.curve,
            wire.layer
        );
    }
    geda::Line {
        x1: wire.start.x.value(),
        y1: wire.start.y.value(),
        x2: wire.end.x.value(),
        y2: wire.end.y.value(),
        thickness: wire.width.value(),
        clearance: CLEARANCE,
        flags: CLEARLINE.to_string(),
    }
}

fn arc(circle: &Circle) -> geda::Arc {
    let radius = circle.radius.value();
    geda::Arc {
        x: circle.center.x.value(),
        y: circle.center.y.value(),
        width: radius,
        height: radius,
        thickness: circle.width.value(),
        clearance: CLEARANCE,
        start_angle: 0,
        delta_angle: 360,
        flags: CLEARLINE.to_string(),
    }
}

/// Text size as a percentage of the gEDA default font.
fn text_scale(size: Centimils) -> u32 {
    let percent = (size.value() as f64 * 100.0 / FONT_HEIGHT as f64).round();
    percent.clamp(1.0, u32::MAX as f64) as u32
}

fn label(text: &Text) -> geda::Text {
    if !text.rotation.is_axis_aligned() {
        log::warn!(
            "text '{}' rotated by {} degrees is snapped to a quarter turn",
            text.value,
            text.rotation.degrees()
        );
    }
    geda::Text {
        x: text.position.x.value(),
        y: text.position.y.value(),
        direction: text.rotation.quarter_turns(),
        scale: text_scale(text.size),
        string: text.value.clone(),
        flags: CLEARLINE.to_string(),
    }
}

fn polygon(rect: &Rectangle) -> geda::Polygon {
    if rect.rotation.degrees() != 0.0 {
        log::warn!(
            "rectangle on layer {} rotated by {} degrees is drawn unrotated",
            rect.layer,
            rect.rotation.degrees()
        );
    }
    let (x1, y1) = (rect.corner1.x.value(), rect.corner1.y.value());
    let (x2, y2) = (rect.corner2.x.value(), rect.corner2.y.value());
    geda::Polygon {
        flags: CLEARPOLY.to_string(),
        points: vec![(x1, y1), (x2, y1), (x2, y2), (x1, y2)],
    }
}

/// One footprint element. The first package text supplies the value label.
fn element(package: &Package) -> geda::Element {
    let board = &package.board;
    let first_text = board.texts.first();
    if board.texts.len() > 1 {
        log::debug!(
            "package '{}': only the first of {} texts is kept",
            package.name,
            board.texts.len()
        );
    }
    if !board.rectangles.is_empty() {
        log::debug!(
            "package '{}': {} rectangles are not converted",
            package.name,
            board.rectangles.len()
        );
    }

    let mut items = Vec::with_capacity(board.len());
    items.extend(board.pads.iter().map(|pad| ElementItem::Pin(pin(pad))));
    items.extend(board.holes.iter().map(|hole| ElementItem::Pin(mounting_hole(hole))));
    items.extend(board.smds.iter().map(|smd| ElementItem::Pad(smd_pad(smd))));
    items.extend(board.wires.iter().map(|wire| {
        ElementItem::Line(geda::ElementLine {
            x1: wire.start.x.value(),
            y1: wire.start.y.value(),
            x2: wire.end.x.value(),
            y2: wire.end.y.value(),
            thickness: wire.width.value(),
        })
    }));
    items.extend(board.circles.iter().map(|circle| {
        let radius = circle.radius.value();
        ElementItem::Arc(geda::ElementArc {
            x: circle.center.x.value(),
            y: circle.center.y.value(),
            width: radius,
            height: radius,
            start_angle: 0,
            delta_angle: 360,
            thickness: circle.width.value(),
        })
    }));

    geda::Element {
        flags: String::new(),
        description: package.description.clone().unwrap_or_default(),
        name: package.name.clone(),
        value: first_text.map(|text| text.value.clone()).unwrap_or_default(),
        mark_x: 0,
        mark_y: 0,
        text_x: first_text.map_or(0, |text| text.position.x.value()),
        text_y: first_text.map_or(0, |text| text.position.y.value()),
        text_direction: first_text.map_or(0, |text| text.rotation.quarter_turns()),
        text_scale: first_text.map_or(100, |text| text_scale(text.size)),
        text_flags: String::new(),
        items,
    }
}

fn pin(pad: &Pad) -> geda::Pin {
    let drill = pad.drill.value();
    let thickness = pad.diameter.map_or(ring(drill), Centimils::value);
    let flags = match pad.shape {
        PadShape::Square => "square",
        PadShape::Octagon => "octagon",
        PadShape::Round => "",
        PadShape::Long | PadShape::Offset => {
            log::debug!("pad '{}' with {:?} shape is drawn round", pad.name, pad.shape);
            ""
        }
    };
    geda::Pin {
        x: pad.position.x.value(),
        y: pad.position.y.value(),
        thickness,
        clearance: CLEARANCE,
        mask: thickness.saturating_add(MASK_MARGIN),
        drill,
        name: pad.name.clone(),
        number: pad.name.clone(),
        flags: flags.to_string(),
    }
}

fn mounting_hole(hole: &Hole) -> geda::Pin {
    let drill = hole.drill.value();
    geda::Pin {
        x: hole.position.x.value(),
        y: hole.position.y.value(),
        thickness: drill,
        clearance: CLEARANCE,
        mask: drill.saturating_add(MASK_MARGIN),
        drill,
        name: String::new(),
        number: String::new(),
        flags: "hole".to_string(),
    }
}

/// A surface pad as a line along its long axis, as thick as the short one.
fn smd_pad(smd: &Smd) -> geda::Pad {
    let (mut dx, mut dy) = (smd.dx.value(), smd.dy.value());
    if smd.rotation.quarter_turns() % 2 == 1 {
        std::mem::swap(&mut dx, &mut dy);
    }
    let (x, y) = (smd.position.x.value(), smd.position.y.value());
    let thickness = dx.min(dy);
    let half = dx.max(dy).saturating_sub(thickness) / 2;
    let (x1, y1, x2, y2) = if dx >= dy {
        (x.saturating_sub(half), y, x.saturating_add(half), y)
    } else {
        (x, y.saturating_sub(half), x, y.saturating_add(half))
    };

    let mut flags = Vec::new();
    if smd.roundness < 100 {
        flags.push("square");
    }
    if smd.layer == BOTTOM_LAYER {
        flags.push("onsolder");
    }

    geda::Pad {
        x1,
        y1,
        x2,
        y2,
        thickness,
        clearance: CLEARANCE,
        mask: thickness.saturating_add(MASK_MARGIN),
        name: smd.name.clone(),
        number: smd.name.clone(),
        flags: flags.join(","),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eagle::{LengthUnit, parse};

    fn convert(xml: &str) -> Layout {
        to_layout(&parse(xml, LengthUnit::Mil).unwrap(), "test")
    }

    #[test]
    fn test_empty_board_uses_default_size() {
        let layout = convert("<eagle><drawing><board/></drawing></eagle>");
        assert_eq!((layout.width, layout.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert!(layout.vias.is_empty());
        assert!(layout.layers.is_empty());
        assert_eq!(layout.comments, [COMMENT]);
    }

    #[test]
    fn test_board_size_covers_objects() {
        let layout = convert(
            r#"<board><plain>
                <wire x1="0" y1="0" x2="100" y2="0" width="1" layer="20"/>
                <circle x="50" y="50" radius="20" width="1" layer="21"/>
            </plain></board>"#,
        );
        assert_eq!(layout.width, 10000 + BOARD_MARGIN);
        assert_eq!(layout.height, 7000 + BOARD_MARGIN);
    }

    #[test]
    fn test_holes_and_vias() {
        let layout = convert(
            r#"<board>
                <hole x="10" y="10" drill="120"/>
                <via x="20" y="20" drill="12"/>
                <via x="30" y="30" drill="12" diameter="40"/>
            </board>"#,
        );
        let vias = &layout.vias;
        assert_eq!(vias.len(), 3);
        assert_eq!((vias[0].thickness, vias[0].flags.as_str()), (12000, "hole"));
        assert_eq!(vias[0].mask, 12000 + MASK_MARGIN);
        assert_eq!(vias[1].thickness, 1200 + 2 * ANNULUS);
        assert_eq!(vias[1].flags, "");
        assert_eq!(vias[2].thickness, 4000);
    }

    #[test]
    fn test_lengths_near_the_limit_saturate() {
        let layout = convert(r#"<board><via x="9.2e16" y="0" drill="9.2e16"/></board>"#);
        let via = &layout.vias[0];
        assert_eq!(via.drill, 9_200_000_000_000_000_000);
        assert_eq!((via.thickness, via.mask), (i64::MAX, i64::MAX));
        assert_eq!(layout.width, i64::MAX);
    }

    #[test]
    fn test_layers_are_sorted_and_named() {
        let layout = convert(
            r#"<eagle><drawing>
            <layers><layer number="21" name="tPlace"/></layers>
            <board><plain>
                <wire x1="0" y1="0" x2="1" y2="0" width="1" layer="21"/>
                <wire x1="0" y1="0" x2="1" y2="0" width="1" layer="1"/>
                <rectangle x1="0" y1="0" x2="2" y2="3" layer="21"/>
                <text x="5" y="5" size="70" layer="21" rot="R90">Hi</text>
            </plain></board></drawing></eagle>"#,
        );
        let numbers: Vec<_> = layout.layers.iter().map(|layer| layer.number).collect();
        assert_eq!(numbers, [1, 21]);
        assert_eq!(layout.layers[0].name, "layer 1");
        assert_eq!(layout.layers[1].name, "tPlace");

        let objects = &layout.layers[1].objects;
        assert!(matches!(objects[0], LayerObject::Line(_)));
        let LayerObject::Text(text) = &objects[1] else {
            panic!("expected text, got {:?}", objects[1]);
        };
        assert_eq!((text.direction, text.scale), (1, 175));
        let LayerObject::Polygon(polygon) = &objects[2] else {
            panic!("expected polygon, got {:?}", objects[2]);
        };
        assert_eq!(polygon.points, [(0, 0), (200, 0), (200, 300), (0, 300)]);
    }

    #[test]
    fn test_package_element() {
        let layout = convert(
            r#"<packages><package name="SOT23">
                <description>Small transistor</description>
                <smd name="1" x="-37" y="-40" dx="30" dy="40" layer="1"/>
                <smd name="2" x="37" y="-40" dx="30" dy="40" layer="1" rot="R90" roundness="100"/>
                <smd name="3" x="0" y="40" dx="30" dy="40" layer="16"/>
                <pad name="4" x="0" y="0" drill="30" shape="square"/>
                <wire x1="-50" y1="20" x2="50" y2="20" width="6" layer="21"/>
                <text x="-50" y="60" size="40" layer="25">&gt;NAME</text>
                <text x="-50" y="-90" size="40" layer="27">&gt;VALUE</text>
            </package></packages>"#,
        );
        let element = &layout.elements[0];
        assert_eq!(element.description, "Small transistor");
        assert_eq!(element.name, "SOT23");
        assert_eq!(element.value, ">NAME");
        assert_eq!((element.text_x, element.text_y), (-5000, 6000));
        assert_eq!(element.text_scale, 100);
        assert_eq!(element.items.len(), 5);

        let ElementItem::Pin(pin) = &element.items[0] else {
            panic!("expected the pin first, got {:?}", element.items[0]);
        };
        assert_eq!((pin.thickness, pin.flags.as_str()), (3000 + 2 * ANNULUS, "square"));

        let pads: Vec<_> = element
            .items
            .iter()
            .filter_map(|item| match item {
                ElementItem::Pad(pad) => Some(pad),
                _ => None,
            })
            .collect();
        // Taller than wide: vertical line, 3000 thick.
        assert_eq!(
            (pads[0].x1, pads[0].y1, pads[0].x2, pads[0].y2),
            (-3700, -4500, -3700, -3500)
        );
        assert_eq!((pads[0].thickness, pads[0].flags.as_str()), (3000, "square"));
        // Quarter turn swaps the axes.
        assert_eq!(
            (pads[1].x1, pads[1].y1, pads[1].x2, pads[1].y2),
            (3200, -4000, 4200, -4000)
        );
        assert_eq!(pads[1].flags, "");
        assert_eq!(pads[2].flags, "square,onsolder");
    }

    #[test]
    fn test_text_scale() {
        assert_eq!(text_scale(Centimils::new(FONT_HEIGHT)), 100);
        assert_eq!(text_scale(Centimils::new(5000)), 125);
        assert_eq!(text_scale(Centimils::ZERO), 1);
    }
}
