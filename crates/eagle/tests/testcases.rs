use eagle::reader::drive;
use eagle::{Centimils, DocumentHandler, EagleError, LengthUnit, PadShape, Point, parse};

const DIVIDER: &str = include_str!("data/divider.brd");

fn mm(value: f64) -> Centimils {
    Centimils::try_from(eagle::Millimeters::new(value)).unwrap()
}

#[test]
fn divider_board_geometry() {
    let document = parse(DIVIDER, LengthUnit::Millimeter).unwrap();
    let board = &document.board;

    // Four outline segments in <plain> plus one routed signal wire.
    assert_eq!(board.wires.len(), 5);
    assert_eq!(board.wires[0].end, Point::new(Centimils::new(200_000), Centimils::ZERO));
    assert_eq!(board.wires[0].width, Centimils::new(1000));
    assert_eq!(board.wires[4].layer, 1);

    assert_eq!(board.texts.len(), 1);
    assert_eq!(board.texts[0].value, "Divider & Co.");
    assert_eq!(board.texts[0].ratio, Some(12.0));

    assert_eq!(board.holes.len(), 2);
    assert!(!board.holes[0].is_via);
    assert_eq!(board.holes[0].drill, Centimils::new(12_598));
    assert!(board.holes[1].is_via);

    assert_eq!(board.circles[0].radius, mm(5.08));
    assert_eq!(board.rectangles[0].width, None);
    assert!(board.pads.is_empty());
    assert!(board.smds.is_empty());
}

#[test]
fn divider_layers() {
    let document = parse(DIVIDER, LengthUnit::Millimeter).unwrap();
    assert_eq!(
        document.layers.keys().copied().collect::<Vec<_>>(),
        [1, 16, 20, 21, 25, 51]
    );
    assert_eq!(document.layer_name(21), Some("tPlace"));
    assert!(!document.layers[&51].active);
    assert_eq!(document.layer_name(2), None);
}

#[test]
fn divider_packages_in_document_order() {
    let document = parse(DIVIDER, LengthUnit::Millimeter).unwrap();
    let names: Vec<_> = document.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["R0805", "0207/10"]);

    let r0805 = &document.packages[0];
    assert_eq!(r0805.description.as_deref(), Some("<b>RESISTOR</b>"));
    assert_eq!(r0805.board.smds.len(), 2);
    assert_eq!(r0805.board.smds[1].dx, Centimils::new(5118));
    assert_eq!(r0805.board.smds[1].dy, Centimils::new(5906));
    assert_eq!(r0805.board.wires.len(), 1);
    assert_eq!(r0805.board.texts[0].value, ">NAME");

    let tht = &document.packages[1];
    assert_eq!(
        tht.description.as_deref(),
        Some("<b>RESISTOR</b><p>\ntype 0207, grid 10 mm")
    );
    assert_eq!(tht.board.pads.len(), 2);
    assert_eq!(tht.board.pads[0].drill, Centimils::new(3200));
    assert_eq!(tht.board.pads[0].position.x, Centimils::new(-20_000));
    assert_eq!(tht.board.pads[0].shape, PadShape::Octagon);
}

#[test]
fn divider_has_no_warnings() {
    let mut handler = DocumentHandler::new();
    drive(DIVIDER, LengthUnit::Millimeter, &mut handler).unwrap();
    assert!(handler.warnings().is_empty(), "{:?}", handler.warnings());
    assert_eq!(handler.element_counts().get("via"), Some(&1));
    assert_eq!(handler.element_counts().get("vertex"), Some(&3));
    handler.finish().unwrap();
}

#[test]
fn wire_in_mils() {
    let xml = r#"<eagle><drawing><board><plain>
        <wire x1="0" y1="0" x2="10" y2="0" width="10" layer="1"/>
    </plain></board></drawing></eagle>"#;
    let document = parse(xml, LengthUnit::Mil).unwrap();
    let wire = &document.board.wires[0];
    assert_eq!(wire.start, Point::default());
    assert_eq!(wire.end.x, Centimils::new(1000));
    assert_eq!(wire.width, Centimils::new(1000));
}

#[test]
fn english_description_is_kept() {
    let xml = r#"<packages><package name="SO8">
        <description language="en">Small outline</description>
        <description language="de">Kleines Gehaeuse</description>
    </package></packages>"#;
    let document = parse(xml, LengthUnit::Millimeter).unwrap();
    assert_eq!(
        document.packages[0].description.as_deref(),
        Some("Small outline")
    );
}

#[test]
fn empty_description_does_not_replace_text() {
    let xml = r#"<packages><package name="SO8">
        <description>Small outline</description>
        <description language="en"/>
    </package></packages>"#;
    let document = parse(xml, LengthUnit::Millimeter).unwrap();
    assert_eq!(
        document.packages[0].description.as_deref(),
        Some("Small outline")
    );
}

#[test]
fn unknown_wire_attribute_is_warned() {
    let xml = r#"<board><plain>
        <wire x1="0" y1="0" x2="1" y2="1" width="0.2" layer="21" cap="flat" style="dashed"/>
    </plain></board>"#;
    let mut handler = DocumentHandler::new();
    drive(xml, LengthUnit::Millimeter, &mut handler).unwrap();
    assert_eq!(
        handler.warnings(),
        [
            "unexpected attribute 'cap' in wire definition",
            "unexpected attribute 'style' in wire definition",
        ]
    );
    let document = handler.finish().unwrap();
    assert_eq!(document.board.wires.len(), 1);
}

#[test]
fn text_end_without_start_is_rejected() {
    let err = parse("<board>\n  <plain></text></plain>\n</board>", LengthUnit::Mil).unwrap_err();
    // quick-xml may catch the mismatched tag before the grammar does.
    let EagleError::Malformed { line, .. } = err else {
        panic!("expected a located error, got {err:?}");
    };
    assert_eq!(line, 2);
}

#[test]
fn package_end_without_package_is_rejected() {
    let xml = "<library><packages><package name=\"A\"/></package></packages></library>";
    assert!(matches!(
        parse(xml, LengthUnit::Mil),
        Err(EagleError::Malformed { .. })
    ));
}

#[test]
fn element_outside_its_region_is_rejected() {
    let xml = r#"<board><smd name="1" x="0" y="0" dx="1" dy="1" layer="1"/></board>"#;
    let err = parse(xml, LengthUnit::Mil).unwrap_err();
    assert!(
        err.to_string().ends_with("Unexpected <smd> inside <board>"),
        "{err}"
    );

    let xml = r#"<layers><text x="0" y="0" size="1" layer="1">x</text></layers>"#;
    assert!(parse(xml, LengthUnit::Mil).is_err());
}

#[test]
fn missing_attribute_is_located() {
    let xml = "<board>\n<plain>\n<wire x1=\"0\" y1=\"0\" x2=\"1\" y2=\"1\" layer=\"1\"/>\n</plain>\n</board>";
    let err = parse(xml, LengthUnit::Mil).unwrap_err();
    let EagleError::Malformed { line, source, .. } = err else {
        panic!("expected a located error, got {err:?}");
    };
    assert_eq!(line, 3);
    assert!(matches!(
        *source,
        EagleError::MissingAttribute {
            element: "wire",
            attr: "width"
        }
    ));
}

#[test]
fn duplicate_text_value_is_rejected() {
    // The unknown child element splits the character data into two runs.
    let xml = r#"<board><text x="0" y="0" size="1" layer="25">A<b/>B</text></board>"#;
    let err = parse(xml, LengthUnit::Mil).unwrap_err();
    let EagleError::Malformed { source, .. } = err else {
        panic!("expected a located error, got {err:?}");
    };
    assert!(matches!(*source, EagleError::DuplicateText { element: "text" }));
}

#[test]
fn oversized_length_is_rejected() {
    let xml = r#"<board><wire x1="0" y1="0" x2="1e300" y2="0" width="0.2" layer="21"/></board>"#;
    let err = parse(xml, LengthUnit::Millimeter).unwrap_err();
    let EagleError::Malformed { source, .. } = err else {
        panic!("expected a located error, got {err:?}");
    };
    assert!(
        matches!(*source, EagleError::InvalidAttribute { ref attr, .. } if attr == "x2"),
        "{source:?}"
    );
}
