use super::*;
use crate::foundation::core::MmSize;

fn doc() -> VectorDocument {
    VectorDocument::new(MmSize {
        width: 34.5,
        height: 10.5,
    })
}

#[test]
fn svg_header_carries_mm_units_and_viewbox() {
    let svg = doc().to_svg();
    assert!(svg.contains("width=\"34.5mm\""));
    assert!(svg.contains("height=\"10.5mm\""));
    assert!(svg.contains("viewBox=\"0 0 34.5 10.5\""));
    assert!(svg.contains("</svg>"));
}

#[test]
fn background_covers_the_full_footprint() {
    let mut d = doc();
    d.push(Primitive::Background {
        fill: "#123456".to_string(),
    });
    let svg = d.to_svg();
    assert!(svg.contains(
        "<rect x=\"0\" y=\"0\" width=\"34.5\" height=\"10.5\" fill=\"#123456\" />"
    ));
}

#[test]
fn text_runs_emit_a_stroke_floor() {
    let mut d = doc();
    d.push(Primitive::TextRun {
        x: 5.0,
        y: 5.25,
        font_size: 0.5, // 0.5 * 0.04 = 0.02, below the floor
        anchor: TextAnchor::Middle,
        fill: "black".to_string(),
        content: "HI".to_string(),
    });
    let svg = d.to_svg();
    assert!(svg.contains("stroke-width=\"0.04\""));
    assert!(svg.contains("text-anchor=\"middle\""));
    assert!(svg.contains("dominant-baseline=\"central\""));
    assert!(svg.contains("paint-order=\"stroke fill\""));
}

#[test]
fn text_content_is_escaped() {
    let mut d = doc();
    d.push(Primitive::TextRun {
        x: 0.0,
        y: 0.0,
        font_size: 4.0,
        anchor: TextAnchor::Start,
        fill: "black".to_string(),
        content: "<A & B>".to_string(),
    });
    let svg = d.to_svg();
    assert!(svg.contains("&lt;A &amp; B&gt;"));
    assert!(!svg.contains("<A & B>"));
}

#[test]
fn contour_rects_serialize_as_closed_paths() {
    let mut d = doc();
    d.push(Primitive::ContourRect {
        x: 1.0,
        y: 2.0,
        width: 3.0,
        height: 0.5,
    });
    let svg = d.to_svg();
    assert!(svg.contains("<path fill=\"black\" d=\"M 1 2 L 4 2 L 4 2.5 L 1 2.5 Z\" />"));
}

#[test]
fn icon_groups_nest_a_sub_svg() {
    let mut d = doc();
    d.push(Primitive::IconGroup {
        x: 0.6,
        y: 0.6,
        width: 9.3,
        height: 9.3,
        view_box: "0 0 24 24".to_string(),
        markup: "<circle cx=\"12\" cy=\"12\" r=\"10\"/>".to_string(),
    });
    let svg = d.to_svg();
    assert!(svg.contains("viewBox=\"0 0 24 24\""));
    assert!(svg.contains("overflow=\"hidden\""));
    assert!(svg.contains("<circle cx=\"12\" cy=\"12\" r=\"10\"/>"));
}

#[test]
fn escape_xml_covers_all_five_entities() {
    assert_eq!(escape_xml("&<>\"'"), "&amp;&lt;&gt;&quot;&apos;");
    assert_eq!(escape_xml("plain"), "plain");
}

#[test]
fn text_runs_iterator_skips_other_primitives() {
    let mut d = doc();
    d.push(Primitive::Background {
        fill: "white".to_string(),
    });
    d.push(Primitive::TextRun {
        x: 0.0,
        y: 0.0,
        font_size: 4.0,
        anchor: TextAnchor::Middle,
        fill: "black".to_string(),
        content: "ONE".to_string(),
    });
    assert_eq!(d.text_runs().count(), 1);
}
