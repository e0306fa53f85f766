//! Integration tests for NC1 to DXF conversion.
//!
//! These tests check the structure of generated drawings (entities, layers,
//! coordinates) rather than whole files, and run batches in temporary
//! directories.

use nc1_dxf::{
    convert_file, convert_text, run_batch, BatchConfig, DrawingMetadata, FailureStage,
    FileLicenseGate, LicensePayload, OpenGate, Primitive, Vertex,
};
use pretty_assertions::assert_eq;
use std::fs;

/// Plate with an arc-edged outline, one inner cutout, a slot and a hole.
const PLATE: &str = "ST
** CAM export
  ORDER-1
  6
  P7
  A2
  S235JR
  3
  BL12
B
  10.00
  10.00
  12.00
AK
  v     0.00      0.00   0.00
        10.00     0.00   5.00
        10.00    10.00   0.00
         0.00    10.00  -5.00
IK
  v     2.00      2.00   0.00
        4.00      2.00   0.00
        4.00      4.00   0.00
BO
  v   100.00    50.00  20.00   0.00 l  40.00   0.00
        5.00     5.00  12.00
EN
";

// ==================== DXF Structure Parsing ====================

/// Entity of a generated DXF file.
#[derive(Debug, PartialEq)]
enum Entity {
    Polyline { layer: String, vertices: Vec<Vertex> },
    Circle { layer: String, x: f64, y: f64, r: f64 },
}

/// Read the entities section back from DXF text.
fn parse_entities(dxf: &str) -> Vec<Entity> {
    let lines: Vec<&str> = dxf.lines().collect();
    let groups: Vec<(i32, &str)> = lines
        .chunks(2)
        .map(|pair| (pair[0].trim().parse().unwrap(), pair[1].trim()))
        .collect();

    let start = groups
        .iter()
        .position(|g| *g == (2, "ENTITIES"))
        .expect("entities section");

    let mut entities = Vec::new();
    let mut i = start + 1;
    while i < groups.len() {
        match groups[i] {
            (0, "POLYLINE") => {
                let layer = groups[i + 1].1.to_string();
                let mut vertices = Vec::new();
                i += 1;
                while groups[i] != (0, "SEQEND") {
                    if groups[i] == (0, "VERTEX") {
                        vertices.push(Vertex::new(0.0, 0.0, 0.0));
                    }
                    if let Some(v) = vertices.last_mut() {
                        let value = groups[i].1;
                        match groups[i].0 {
                            10 => v.x = value.parse().unwrap(),
                            20 => v.y = value.parse().unwrap(),
                            42 => v.bulge = value.parse().unwrap(),
                            _ => {}
                        }
                    }
                    i += 1;
                }
                entities.push(Entity::Polyline { layer, vertices });
            }
            (0, "CIRCLE") => {
                let field = |code: i32| {
                    groups[i + 1..i + 7]
                        .iter()
                        .find(|g| g.0 == code)
                        .map(|g| g.1)
                        .unwrap()
                };
                entities.push(Entity::Circle {
                    layer: field(8).to_string(),
                    x: field(10).parse().unwrap(),
                    y: field(20).parse().unwrap(),
                    r: field(40).parse().unwrap(),
                });
            }
            (0, "ENDSEC") => break,
            _ => {}
        }
        i += 1;
    }
    entities
}

fn license() -> LicensePayload {
    LicensePayload {
        fp: "LIN|TEST".to_string(),
        name: "Test Shop".to_string(),
        expires: Some("2030-12-31".to_string()),
        features: vec!["DXF".to_string()],
    }
}

// ==================== Single File ====================

#[test]
fn test_arc_example_vertices() {
    let drawing = convert_text(PLATE);
    assert_eq!(
        drawing.outer,
        Some(vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(10.0, 0.0, 1.0),
            Vertex::new(10.0, 10.0, 0.0),
            Vertex::new(0.0, 10.0, -1.0),
        ])
    );
}

#[test]
fn test_cutout_order() {
    let drawing = convert_text(PLATE);
    assert_eq!(drawing.cutouts.len(), 3);
    assert!(matches!(&drawing.cutouts[0], Primitive::ClosedPolyline(v) if v.len() == 3));
    assert_eq!(
        drawing.cutouts[1],
        Primitive::ClosedPolyline(vec![
            Vertex::new(100.0, 40.0, 0.0),
            Vertex::new(140.0, 40.0, 1.0),
            Vertex::new(140.0, 60.0, 0.0),
            Vertex::new(100.0, 60.0, 1.0),
        ])
    );
    assert!(matches!(
        drawing.cutouts[2],
        Primitive::Circle { radius, .. } if radius == 6.0
    ));
}

#[test]
fn test_convert_file_writes_layers() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plate.nc1");
    let output = dir.path().join("plate.dxf");
    fs::write(&input, PLATE).unwrap();

    let metadata = DrawingMetadata::with_timestamp(&license(), "2026-10-19T08:00:00Z");
    convert_file(&input, &output, Some(&metadata)).unwrap();

    let dxf = fs::read_to_string(&output).unwrap();
    assert!(dxf.contains("license_to=Test Shop"));
    assert!(dxf.contains("license_expires=2030-12-31"));

    let entities = parse_entities(&dxf);
    assert_eq!(entities.len(), 4);
    match &entities[0] {
        Entity::Polyline { layer, vertices } => {
            assert_eq!(layer, "OUTER");
            assert_eq!(vertices[3], Vertex::new(0.0, 10.0, -1.0));
        }
        other => panic!("unexpected entity: {:?}", other),
    }
    assert_eq!(
        entities[3],
        Entity::Circle {
            layer: "cutout".to_string(),
            x: 5.0,
            y: 5.0,
            r: 6.0
        }
    );
}

#[test]
fn test_coordinates_survive_exactly() {
    let text = "AK\n0.1 0.2\n1234.5678901 0.3\n0.7 99.99999999\n";
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("exact.nc1");
    let output = dir.path().join("exact.dxf");
    fs::write(&input, text).unwrap();

    convert_file(&input, &output, None).unwrap();
    let entities = parse_entities(&fs::read_to_string(&output).unwrap());

    match &entities[0] {
        Entity::Polyline { vertices, .. } => {
            let xs: Vec<f64> = vertices.iter().map(|v| v.x).collect();
            assert_eq!(xs, vec![0.1, 1234.5678901, 0.7]);
            assert_eq!(vertices[2].y, 99.99999999);
        }
        other => panic!("unexpected entity: {:?}", other),
    }
}

#[test]
fn test_missing_outer_contour() {
    let drawing = convert_text("ST\n1\nBO\n5 5 12\nEN\n");
    assert!(drawing.outer.is_none());
    assert_eq!(drawing.cutouts.len(), 1);
}

#[test]
fn test_convert_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = convert_file(
        &dir.path().join("absent.nc1"),
        &dir.path().join("absent.dxf"),
        None,
    )
    .unwrap_err();
    assert_eq!(err.code_value(), -1);
}

// ==================== Batch ====================

#[test]
fn test_batch_renames_and_converts() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("export_01.nc"), PLATE).unwrap();
    fs::write(dir.path().join("readme.txt"), "not a part").unwrap();

    let report = run_batch(dir.path(), &BatchConfig::new(), &OpenGate).unwrap();
    assert_eq!(report.scanned, 1);
    assert_eq!(report.renamed, 1);
    assert_eq!(report.converted, 1);

    let renamed = dir.path().join("S235JR-12-(P7)-3.nc1");
    assert!(renamed.exists());
    assert!(dir.path().join("S235JR-12-(P7)-3.dxf").exists());
    assert!(!dir.path().join("export_01.nc").exists());
    assert_eq!(report.outputs, vec![renamed]);
}

#[test]
fn test_batch_lossy_input_converts() {
    let dir = tempfile::tempdir().unwrap();
    // Invalid UTF-8 is read lossily and yields an empty drawing.
    fs::write(dir.path().join("a.nc1"), [0xff, 0xfe, 0x00, 0x41]).unwrap();
    fs::write(dir.path().join("b.nc1"), PLATE).unwrap();
    fs::create_dir(dir.path().join("c.nc1")).unwrap();

    let mut config = BatchConfig::new();
    config.rename = false;
    let report = run_batch(dir.path(), &config, &OpenGate).unwrap();

    // Directories are not candidates.
    assert_eq!(report.scanned, 2);
    assert_eq!(report.converted, 2);
    assert!(!report.has_failures());
    assert!(dir.path().join("b.dxf").exists());
}

#[test]
fn test_batch_continues_after_failed_drawing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.nc1"), PLATE).unwrap();
    fs::write(dir.path().join("b.nc1"), PLATE).unwrap();
    // A directory in place of the drawing makes the write fail.
    fs::create_dir(dir.path().join("a.dxf")).unwrap();

    let mut config = BatchConfig::new();
    config.rename = false;
    let report = run_batch(dir.path(), &config, &OpenGate).unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.failed_at(FailureStage::Dxf), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.converted, 1);
    assert_eq!(report.failures[0].path, dir.path().join("a.nc1"));
    assert!(dir.path().join("a.dxf").is_dir());
    assert!(dir.path().join("b.dxf").is_file());
}

#[test]
fn test_batch_recursive_with_target_ext() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("lot-2");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("deep.dstv"), PLATE).unwrap();

    let shallow = run_batch(dir.path(), &BatchConfig::new(), &OpenGate).unwrap();
    assert_eq!(shallow.scanned, 0);

    let config = BatchConfig::new()
        .with_recursive(true)
        .with_target_ext("NC");
    let report = run_batch(dir.path(), &config, &OpenGate).unwrap();
    assert_eq!(report.renamed, 1);
    assert!(sub.join("S235JR-12-(P7)-3.NC").exists());
    assert!(sub.join("S235JR-12-(P7)-3.dxf").exists());
}

#[test]
fn test_batch_duplicate_targets() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("one.nc"), PLATE).unwrap();
    fs::write(dir.path().join("two.nc"), PLATE).unwrap();

    let report = run_batch(dir.path(), &BatchConfig::new(), &OpenGate).unwrap();
    assert_eq!(report.renamed, 1);
    assert_eq!(report.failed_at(FailureStage::Rename), 1);
    assert_eq!(report.failures[0].path, dir.path().join("two.nc"));
    assert!(dir.path().join("two.nc").exists());
}

#[test]
fn test_batch_with_license_file() {
    let dir = tempfile::tempdir().unwrap();
    let parts = dir.path().join("parts");
    fs::create_dir(&parts).unwrap();
    fs::write(parts.join("x.nc1"), PLATE).unwrap();

    let payload = serde_json::json!({"fp": "lin|test", "name": "Test Shop", "features": ["DXF"]});
    let sig = "signed";
    let lic_path = dir.path().join("program.lic");
    fs::write(
        &lic_path,
        serde_json::json!({"payload": payload, "sig": sig}).to_string(),
    )
    .unwrap();

    let verifier = |_message: &[u8], signature: &str| signature == "signed";
    let gate = FileLicenseGate::new(&lic_path, verifier)
        .with_fingerprint("LIN|TEST")
        .with_required_feature("DXF");

    let report = run_batch(&parts, &BatchConfig::new(), &gate).unwrap();
    assert_eq!(report.converted, 1);

    let dxf = fs::read_to_string(parts.join("S235JR-12-(P7)-3.dxf")).unwrap();
    assert!(dxf.contains("license_to=Test Shop"));
    assert!(dxf.contains("license_expires=unlimited"));
}

#[test]
fn test_batch_refused_license() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("x.nc1"), PLATE).unwrap();

    let gate = FileLicenseGate::new(dir.path().join("program.lic"), |_: &[u8], _: &str| true);
    let err = run_batch(dir.path(), &BatchConfig::new(), &gate).unwrap_err();
    assert!(err.is_license_error());
    assert!(dir.path().join("x.nc1").exists());
}
