//! Main NC1 file parser.

use super::blocks::{split_lines, tokenize_blocks};
use super::header::parse_header;
use super::values::{parse_bores, parse_curvature_points};
use crate::error::{ConvertError, Result};
use crate::model::Part;
use std::path::Path;
use tracing::debug;

/// Parse NC1 text into a part.
///
/// Unknown blocks are ignored. Nothing here fails: lines without enough
/// numbers are skipped and missing blocks leave the matching field empty.
pub fn parse_nc1(text: &str, fallback_stem: &str) -> Part {
    let lines: Vec<&str> = split_lines(text).collect();
    let mut part = Part {
        header: parse_header(&lines, fallback_stem),
        ..Default::default()
    };

    for block in tokenize_blocks(text) {
        match block.tag {
            "AK" => {
                part.outer = Some(parse_curvature_points(&block.lines));
            }
            "IK" => {
                let points = parse_curvature_points(&block.lines);
                if !points.is_empty() {
                    part.inner.push(points);
                }
            }
            "BO" => {
                part.bores.extend(parse_bores(&block.lines));
            }
            _ => {}
        }
    }

    debug!(
        "Parsed part '{}': outer={} inner={} bores={}",
        part.header.name,
        part.outer.as_ref().map_or(0, |p| p.len()),
        part.inner.len(),
        part.bores.len()
    );

    part
}

/// Read an NC1 file as text, replacing invalid UTF-8 sequences.
pub fn read_nc1_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ConvertError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoreRecord, CurvaturePoint};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_part() {
        let text = "ST\r\n  1\r\n  6\r\n  P1\r\nAK\r\n  0 0\r\n  10 0 5\r\nIK\r\n  2 2\r\n  3 2\r\nIK\r\n\r\nIK\r\n  4 4\r\n  5 4\r\nBO\r\n  5 5 12\r\nEN\r\n";
        let part = parse_nc1(text, "stem");

        assert_eq!(part.header.name, "P1");
        assert_eq!(
            part.outer,
            Some(vec![
                CurvaturePoint::new(0.0, 0.0, 0.0),
                CurvaturePoint::new(10.0, 0.0, 5.0),
            ])
        );
        // The empty IK block is dropped.
        assert_eq!(part.inner.len(), 2);
        assert_eq!(part.inner[1][0], CurvaturePoint::straight(4.0, 4.0));
        assert_eq!(part.bores, vec![BoreRecord::hole(5.0, 5.0, 12.0)]);
        assert!(part.has_geometry());
    }

    #[test]
    fn test_parse_without_ak() {
        let part = parse_nc1("ST\nBO\n1 1 2\n", "stem");
        assert!(part.outer.is_none());
        assert_eq!(part.bores.len(), 1);
    }

    #[test]
    fn test_last_ak_wins() {
        let part = parse_nc1("AK\n0 0\n1 0\nAK\n5 5\n6 5\n7 7\n", "stem");
        assert_eq!(part.outer.map(|p| p.len()), Some(3));
    }

    #[test]
    fn test_blocks_after_end_ignored() {
        let part = parse_nc1("BO\n1 1 2\nEN\nBO\n3 3 4\n", "stem");
        assert_eq!(part.bores.len(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_nc1_file(Path::new("/nonexistent/part.nc1")).unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound { .. }));
    }
}
