use super::*;

#[test]
fn size_classes_share_the_plate_height() {
    assert_eq!(SizeClass::U1.dimensions_mm().width, 34.5);
    assert_eq!(SizeClass::U2.dimensions_mm().width, 76.5);
    assert_eq!(SizeClass::U3.dimensions_mm().width, 118.5);
    for size in [SizeClass::U1, SizeClass::U2, SizeClass::U3] {
        assert_eq!(size.dimensions_mm().height, 10.5);
    }
}

#[test]
fn size_class_parses_its_labels() {
    for size in [SizeClass::U1, SizeClass::U2, SizeClass::U3] {
        assert_eq!(size.label().parse::<SizeClass>().unwrap(), size);
    }
    assert!("4u".parse::<SizeClass>().is_err());
}

#[test]
fn layout_keys_serialize_to_compact_codes() {
    assert_eq!(serde_json::to_string(&LeftLayout::TopBand).unwrap(), "\"2t\"");
    assert_eq!(serde_json::to_string(&LeftLayout::DoubleStack).unwrap(), "\"2v\"");
    assert_eq!(serde_json::to_string(&RightLayout::TwoLine).unwrap(), "\"2\"");
    assert_eq!(
        serde_json::from_str::<LeftLayout>("\"2h\"").unwrap(),
        LeftLayout::DoubleSide
    );
}

#[test]
fn validate_rejects_out_of_range_scales() {
    let mut config = TagConfig::default();
    config.icon_scale = 5;
    assert!(config.validate().is_err());
    config.icon_scale = 100;
    config.text_scale = 101;
    assert!(config.validate().is_err());
    config.text_scale = 10;
    assert!(config.validate().is_ok());
}

#[test]
fn normalize_clamps_scales_and_clears_inactive_slots() {
    let mut config = TagConfig {
        left: LeftLayout::Single,
        right: RightLayout::OneLine,
        icons: [
            Some(IconRef {
                category: "Electrical".to_string(),
                subcategory: "General".to_string(),
                name: "fuse".to_string(),
            }),
            Some(IconRef {
                category: "Electrical".to_string(),
                subcategory: "General".to_string(),
                name: "relay".to_string(),
            }),
        ],
        texts: ["KEEP".to_string(), "DROP".to_string()],
        icon_scale: 3,
        text_scale: 250,
        ..TagConfig::default()
    };
    config.normalize();
    assert_eq!(config.icon_scale, MIN_SCALE_PERCENT);
    assert_eq!(config.text_scale, MAX_SCALE_PERCENT);
    assert!(config.icons[0].is_some());
    assert!(config.icons[1].is_none());
    assert_eq!(config.texts[0], "KEEP");
    assert!(config.texts[1].is_empty());
}

#[test]
fn icon_ref_parses_two_and_three_part_names() {
    let two = IconRef::from_file_name("electrical_fuse.svg").unwrap();
    assert_eq!(two.category, "Electrical");
    assert_eq!(two.subcategory, "General");
    assert_eq!(two.name, "fuse");

    let three = IconRef::from_file_name("electrical_connector_jst_xh.svg").unwrap();
    assert_eq!(three.category, "Electrical");
    assert_eq!(three.subcategory, "Connector");
    assert_eq!(three.name, "jst-xh");
    assert_eq!(three.display_name(), "JST XH");

    assert!(IconRef::from_file_name("plain.svg").is_none());
    assert!(IconRef::from_file_name("electrical_fuse.png").is_none());
}

#[test]
fn icon_ref_candidates_roundtrip_both_forms() {
    let three = IconRef::from_file_name("electrical_connector_jst_xh.svg").unwrap();
    assert_eq!(
        three.file_name_candidates(),
        vec!["electrical_connector_jst_xh.svg".to_string()]
    );

    let two = IconRef::from_file_name("electrical_fuse.svg").unwrap();
    assert_eq!(
        two.file_name_candidates(),
        vec![
            "electrical_general_fuse.svg".to_string(),
            "electrical_fuse.svg".to_string()
        ]
    );
}

#[test]
fn edit_session_commit_and_cancel() {
    let mut base = TagConfig::default();
    base.texts[0] = "ORIGINAL".to_string();

    let session = EditSession::begin(base.clone());
    assert!(!session.is_dirty());
    assert_eq!(session.cancel(), base);

    let mut session = EditSession::begin(base.clone());
    session.config_mut().texts[0] = "EDITED".to_string();
    assert!(session.is_dirty());
    let committed = session.commit().unwrap();
    assert_eq!(committed.texts[0], "EDITED");

    let mut session = EditSession::begin(base.clone());
    session.config_mut().texts[0] = "DISCARDED".to_string();
    assert_eq!(session.cancel().texts[0], "ORIGINAL");
}

#[test]
fn has_content_ignores_inactive_slots() {
    let mut config = TagConfig::default();
    assert!(!config.has_content());
    config.texts[0] = "  ".to_string();
    assert!(!config.has_content());
    config.texts[0] = "X".to_string();
    assert!(config.has_content());

    let mut config = TagConfig {
        left: LeftLayout::None,
        right: RightLayout::None,
        ..TagConfig::default()
    };
    config.texts[0] = "HIDDEN".to_string();
    assert!(!config.has_content());
}
