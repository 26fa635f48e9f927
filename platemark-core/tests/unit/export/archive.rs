use super::*;
use std::io::Read as _;

#[test]
fn batch_names_carry_a_one_based_ordinal() {
    assert_eq!(
        batch_file_name(0, "Spice Rack", ExportFormat::Svg),
        "1_Spice_Rack.svg"
    );
    assert_eq!(
        batch_file_name(2, "", ExportFormat::Step),
        "3_tag_3.step"
    );
    assert_eq!(
        batch_file_name(9, "  Label #7  ", ExportFormat::ThreeMf),
        "10_Label__7.3mf"
    );
}

#[test]
fn package_preserves_order_and_contents() {
    let artifacts = vec![
        ExportArtifact {
            file_name: "1_a.svg".to_string(),
            bytes: b"alpha".to_vec(),
        },
        ExportArtifact {
            file_name: "2_b.svg".to_string(),
            bytes: b"beta".to_vec(),
        },
    ];
    let zip_bytes = package(&artifacts).unwrap();

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut first = String::new();
    archive
        .by_index(0)
        .unwrap()
        .read_to_string(&mut first)
        .unwrap();
    assert_eq!(archive.by_index(0).unwrap().name(), "1_a.svg");
    assert_eq!(first, "alpha");

    let mut second = String::new();
    archive
        .by_index(1)
        .unwrap()
        .read_to_string(&mut second)
        .unwrap();
    assert_eq!(second, "beta");
}

#[test]
fn empty_artifact_lists_package_to_an_empty_archive() {
    let zip_bytes = package(&[]).unwrap();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
    assert_eq!(archive.len(), 0);
}
