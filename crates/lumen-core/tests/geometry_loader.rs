//! Integration tests for the geometry text loader

use lumen_core::geometry::{
    load_geometry, GeometryLoader, IndexPolicy, LoaderOptions, NumberPolicy, ParsedGeometry,
};
use lumen_core::GeometryError;
use pretty_assertions::assert_eq;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

const TRIANGLE: &str = "\
[points]
-0.5 -0.5 1.0 0.0 0.0
0.5 -0.5 0.0 1.0 0.0
0.5 0.5 0.0 0.0 1.0
[indices]
0 1 2
";

fn write_source(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

fn parse(text: &str) -> ParsedGeometry {
    GeometryLoader::new().parse_str(text).expect("parse geometry")
}

#[test]
fn test_triangle_from_file() {
    let file = write_source(TRIANGLE);
    let geometry = load_geometry(file.path()).unwrap();

    assert_eq!(
        geometry.points,
        vec![
            -0.5, -0.5, 1.0, 0.0, 0.0, //
            0.5, -0.5, 0.0, 1.0, 0.0, //
            0.5, 0.5, 0.0, 0.0, 1.0,
        ]
    );
    assert_eq!(geometry.indices, vec![0, 1, 2]);
    assert_eq!(geometry.vertex_count(), 3);
    assert_eq!(geometry.triangle_count(), 1);
}

#[test]
fn test_empty_file_is_success() {
    let file = write_source("");
    let geometry = load_geometry(file.path()).unwrap();

    assert!(geometry.points.is_empty());
    assert!(geometry.indices.is_empty());
}

#[test]
fn test_missing_file_is_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.txt");

    let err = load_geometry(&path).unwrap_err();
    match err {
        GeometryError::SourceUnavailable { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_no_markers_yields_empty_buffers() {
    let geometry = parse("1 2 3 4 5\n0 1 2\n# nothing here\n");
    assert!(geometry.is_empty());
}

#[test]
fn test_short_points_line_keeps_length_invariant() {
    let geometry = parse("[points]\n1.0 2.0 3.0 4.0\n");

    assert_eq!(geometry.points.len() % 5, 0);
    assert_eq!(&geometry.points[..4], &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_short_index_line_keeps_length_invariant() {
    let geometry = parse("[indices]\n4 5\n");
    assert_eq!(geometry.indices.len() % 3, 0);
    assert_eq!(&geometry.indices[..2], &[4, 5]);
}

#[test]
fn test_crlf_matches_lf() {
    let crlf = TRIANGLE.replace('\n', "\r\n");
    assert_eq!(parse(&crlf), parse(TRIANGLE));

    let file = write_source(&crlf);
    assert_eq!(load_geometry(file.path()).unwrap(), parse(TRIANGLE));
}

#[test]
fn test_comments_excluded_everywhere() {
    let text = "\
# header
[points]
# inside points
1 1 1 1 1

[indices]
# inside indices
0 0 0
";
    let geometry = parse(text);
    assert_eq!(geometry.points, vec![1.0; 5]);
    assert_eq!(geometry.indices, vec![0, 0, 0]);
}

#[test]
fn test_load_is_idempotent() {
    let file = write_source(TRIANGLE);
    let loader = GeometryLoader::new();

    let first = loader.load(file.path()).unwrap();
    let second = loader.load(file.path()).unwrap();

    let bits = |g: &ParsedGeometry| g.points.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&first), bits(&second));
    assert_eq!(first.indices, second.indices);
}

#[test]
fn test_reader_and_str_agree() {
    let from_reader = GeometryLoader::new()
        .load_from_reader(Cursor::new(TRIANGLE))
        .unwrap();
    assert_eq!(from_reader, parse(TRIANGLE));
}

#[test]
fn test_non_utf8_comment_is_skipped() {
    let source: &[u8] = b"# caf\xe9 logo\n[points]\n0 0 1 0 0\n[indices]\n0 0 0\n";

    let geometry = GeometryLoader::new()
        .load_from_reader(Cursor::new(source))
        .unwrap();
    assert_eq!(geometry.points, vec![0.0, 0.0, 1.0, 0.0, 0.0]);
    assert_eq!(geometry.indices, vec![0, 0, 0]);

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source).unwrap();
    file.flush().unwrap();
    assert_eq!(load_geometry(file.path()).unwrap(), geometry);
}

#[test]
fn test_whitespace_only_line_keeps_vertex_positions() {
    let geometry = parse("[points]\n0 0 1 0 0\n   \n1 1 0 1 0\n[indices]\n0 1 2\n");

    assert_eq!(geometry.vertex_count(), 3);
    let vertices: Vec<&[f32]> = geometry.vertices().collect();
    assert_eq!(vertices[1], &[0.0; 5]);
    assert_eq!(vertices[2], &[1.0, 1.0, 0.0, 1.0, 0.0]);
}

#[test]
fn test_strict_whitespace_only_line_is_missing_fields() {
    let loader = GeometryLoader::with_options(LoaderOptions {
        numbers: NumberPolicy::Strict,
        ..Default::default()
    });

    let err = loader.parse_str("[points]\n \t \n").unwrap_err();
    assert!(matches!(
        err,
        GeometryError::MissingFields {
            line: 2,
            expected: 5,
            found: 0
        }
    ));
}

#[test]
fn test_sections_can_reopen() {
    let text = "\
[points]
0 0 1 1 1
[indices]
0 1 2
[points]
1 0 1 1 1
2 1 1 1 1
";
    let geometry = parse(text);
    assert_eq!(geometry.vertex_count(), 3);
    assert_eq!(geometry.indices, vec![0, 1, 2]);
}

#[test]
fn test_fields_split_on_any_whitespace() {
    let geometry = parse("[points]\n  0.25\t-1   2\t\t3 4  \n");
    assert_eq!(geometry.points, vec![0.25, -1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_out_of_range_index_passes_through_by_default() {
    let geometry = parse("[points]\n0 0 0 0 0\n[indices]\n0 1 42\n");
    assert_eq!(geometry.indices, vec![0, 1, 42]);
}

#[test]
fn test_validate_reports_out_of_range_index() {
    let loader = GeometryLoader::with_options(LoaderOptions {
        indices: IndexPolicy::Validate,
        ..Default::default()
    });

    let err = loader
        .parse_str("[points]\n0 0 0 0 0\n[indices]\n0 0 3\n")
        .unwrap_err();
    assert!(matches!(
        err,
        GeometryError::IndexOutOfRange {
            index: 3,
            vertex_count: 1
        }
    ));

    assert!(loader.parse_str(TRIANGLE).is_ok());
}

#[test]
fn test_strict_numbers_report_line() {
    let loader = GeometryLoader::with_options(LoaderOptions {
        numbers: NumberPolicy::Strict,
        ..Default::default()
    });

    let err = loader
        .parse_str("# header\n[points]\n0 0 0 zero 0\n")
        .unwrap_err();
    assert!(matches!(err, GeometryError::MalformedNumber { line: 3, .. }));
}

#[test]
fn test_lenient_numbers_become_zero() {
    let geometry = parse("[points]\n1 nope 3 4 5\n[indices]\n1 -2 3\n");
    assert_eq!(geometry.points, vec![1.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(geometry.indices, vec![1, 0, 0]);
}

#[test]
fn test_resource_geometry_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../resources/webgpu.txt");
    let geometry = GeometryLoader::with_options(LoaderOptions {
        numbers: NumberPolicy::Strict,
        indices: IndexPolicy::Validate,
    })
    .load(path)
    .unwrap();

    assert!(geometry.vertex_count() > 0);
    assert_eq!(geometry.points.len() % 5, 0);
    assert_eq!(geometry.indices.len() % 3, 0);
}
