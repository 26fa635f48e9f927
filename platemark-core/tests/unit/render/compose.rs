use super::*;
use crate::{
    config::model::{LeftLayout, RightLayout, SizeClass},
    foundation::error::PlatemarkError,
    layout::zones::compute_zones,
    text::fit::{FIT_HEIGHT_CAP, TextMetrics},
};

struct LinearMeasure;

impl fit::TextMeasure for LinearMeasure {
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics {
        TextMetrics {
            ink_width: text.chars().count() as f64 * font_size * 0.6,
            left_bearing: 0.0,
        }
    }
}

/// Lookup fake that serves one marked-up circle, fails, or knows nothing.
enum FakeLookup {
    Found,
    Missing,
    Broken,
}

impl IconLookup for FakeLookup {
    fn lookup(&self, _icon: &IconRef) -> PlatemarkResult<Option<IconArtwork>> {
        match self {
            Self::Found => Ok(Some(IconArtwork {
                markup: "<defs><linearGradient id=\"g\"/></defs>\
                         <circle fill=\"url(#g)\" cx=\"12\" cy=\"12\" r=\"10\"/>"
                    .to_string(),
                view_box: "0 0 24 24".to_string(),
            })),
            Self::Missing => Ok(None),
            Self::Broken => Err(PlatemarkError::content("catalog unavailable")),
        }
    }
}

fn hello_config() -> TagConfig {
    let mut config = TagConfig {
        size: SizeClass::U1,
        left: LeftLayout::Single,
        right: RightLayout::OneLine,
        ..TagConfig::default()
    };
    config.texts[0] = "HELLO".to_string();
    config
}

#[test]
fn unset_icon_zone_renders_nothing_but_text_still_fits() {
    let config = hello_config();
    let ctx = RenderContext::new();
    let zones = compute_zones(&config);
    let doc = compose(&config, &zones, &ctx, &FakeLookup::Found, &LinearMeasure, false).unwrap();

    // Exactly one background and one text run; the empty icon zone is skipped.
    assert!(matches!(doc.primitives[0], Primitive::Background { .. }));
    assert_eq!(doc.primitives.len(), 2);

    let Primitive::TextRun {
        font_size, content, ..
    } = &doc.primitives[1]
    else {
        panic!("expected a text run");
    };
    assert_eq!(content, "HELLO");

    // The emitted size carries the render scale; the fitted size stays
    // strictly under the zone-height cap.
    let text_zone = zones.iter().find(|z| z.slot == SlotKind::Text).unwrap();
    let zone_h = text_zone.rect_mm(config.size.dimensions_mm()).height();
    assert!(font_size / fit::SVG_TEXT_SCALE <= zone_h * FIT_HEIGHT_CAP + 1e-9);
}

#[test]
fn resolved_icons_embed_with_prefixed_ids() {
    let mut config = hello_config();
    config.icons[0] = Some(IconRef {
        category: "Electrical".to_string(),
        subcategory: "General".to_string(),
        name: "fuse".to_string(),
    });
    let ctx = RenderContext::new();
    let doc = render_tag(&config, &ctx, &FakeLookup::Found, &LinearMeasure, false).unwrap();

    let Some(Primitive::IconGroup { markup, .. }) = doc
        .primitives
        .iter()
        .find(|p| matches!(p, Primitive::IconGroup { .. }))
    else {
        panic!("expected an icon group");
    };
    assert!(markup.contains("id=\"ic1_g\""));
    assert!(markup.contains("url(#ic1_g)"));
    assert!(!markup.contains("id=\"g\""));
}

#[test]
fn missing_or_failing_lookup_degrades_to_a_placeholder() {
    let mut config = hello_config();
    config.icons[0] = Some(IconRef {
        category: "Electrical".to_string(),
        subcategory: "General".to_string(),
        name: "fuse".to_string(),
    });
    let ctx = RenderContext::new();

    for lookup in [FakeLookup::Missing, FakeLookup::Broken] {
        let doc = render_tag(&config, &ctx, &lookup, &LinearMeasure, false).unwrap();
        assert!(
            doc.primitives
                .iter()
                .any(|p| matches!(p, Primitive::Placeholder { .. })),
            "expected a placeholder"
        );
        assert!(
            !doc.primitives
                .iter()
                .any(|p| matches!(p, Primitive::IconGroup { .. }))
        );
    }
}

#[test]
fn monochrome_forces_black_on_white() {
    let mut config = hello_config();
    config.foreground = "#ff0000".to_string();
    config.background = "#0000ff".to_string();
    let ctx = RenderContext::new();
    let doc = render_tag(&config, &ctx, &FakeLookup::Found, &LinearMeasure, true).unwrap();

    let Primitive::Background { fill } = &doc.primitives[0] else {
        panic!("expected background first");
    };
    assert_eq!(fill, "white");
    let Primitive::TextRun { fill, .. } = &doc.primitives[1] else {
        panic!("expected a text run");
    };
    assert_eq!(fill, "black");
}

#[test]
fn left_alignment_anchors_at_start() {
    let mut config = hello_config();
    config.text_align = TextAlign::Left;
    let ctx = RenderContext::new();
    let doc = render_tag(&config, &ctx, &FakeLookup::Found, &LinearMeasure, false).unwrap();
    let Primitive::TextRun { anchor, .. } = &doc.primitives[1] else {
        panic!("expected a text run");
    };
    assert_eq!(*anchor, TextAnchor::Start);
}

#[test]
fn two_icons_get_distinct_prefixes() {
    let mut config = TagConfig {
        size: SizeClass::U2,
        left: LeftLayout::DoubleSide,
        right: RightLayout::None,
        ..TagConfig::default()
    };
    config.icons = [
        Some(IconRef {
            category: "A".to_string(),
            subcategory: "General".to_string(),
            name: "one".to_string(),
        }),
        Some(IconRef {
            category: "A".to_string(),
            subcategory: "General".to_string(),
            name: "two".to_string(),
        }),
    ];
    let ctx = RenderContext::new();
    let doc = render_tag(&config, &ctx, &FakeLookup::Found, &LinearMeasure, false).unwrap();

    let markups: Vec<&String> = doc
        .primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::IconGroup { markup, .. } => Some(markup),
            _ => None,
        })
        .collect();
    assert_eq!(markups.len(), 2);
    assert!(markups[0].contains("ic1_g"));
    assert!(markups[1].contains("ic2_g"));
}

#[test]
fn prefixing_rewrites_ids_urls_and_hrefs() {
    let markup = "<defs><clipPath id=\"c\"/></defs>\
                  <g clip-path=\"url(#c)\"><use href=\"#c\"/></g>";
    let out = prefix_fragment_ids(markup, "ic9");
    assert_eq!(
        out,
        "<defs><clipPath id=\"ic9_c\"/></defs>\
         <g clip-path=\"url(#ic9_c)\"><use href=\"#ic9_c\"/></g>"
    );
}

#[test]
fn invalid_config_fails_composition() {
    let mut config = hello_config();
    config.icon_scale = 0;
    let ctx = RenderContext::new();
    assert!(render_tag(&config, &ctx, &FakeLookup::Found, &LinearMeasure, false).is_err());
}
