//! Input-file parsing.
//!
//! One record per text line: integer id, four floats for the two
//! endpoints, two floats for the velocity, whitespace separated. Blank
//! lines and `#` comments are skipped. Records outside the unit square
//! are admitted; the index adapts its root to them.

use linescreen_core::error::{LineScreenError, Result};
use linescreen_physics::{Line, Point, Vector};
use std::fs;
use std::path::Path;

/// Parses a line set from file contents.
pub fn parse_lines(content: &str) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    let mut record = 0usize;

    for raw in content.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        record += 1;

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 7 {
            return Err(LineScreenError::parse(
                record,
                format!("expected 7 fields, found {}", fields.len()),
            ));
        }

        let id: u32 = fields[0]
            .parse()
            .map_err(|_| LineScreenError::parse(record, format!("invalid id '{}'", fields[0])))?;

        let mut nums = [0.0f64; 6];
        for (k, field) in fields[1..].iter().enumerate() {
            nums[k] = field.parse().map_err(|_| {
                LineScreenError::parse(record, format!("invalid number '{field}'"))
            })?;
        }

        lines.push(Line::new(
            id,
            Point::new(nums[0], nums[1]),
            Point::new(nums[2], nums[3]),
            Vector::new(nums[4], nums[5]),
        ));
    }

    Ok(lines)
}

/// Loads a line set from a file.
pub fn load_lines(path: &Path) -> Result<Vec<Line>> {
    let content = fs::read_to_string(path)?;
    parse_lines(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let content = "\
# sample world
1 0.2 0.5 0.3 0.5 0.5 0.0

2 0.7 0.5 0.8 0.5 -0.5 0.0
";
        let lines = parse_lines(content).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, 1);
        assert_eq!(lines[1].p1, Point::new(0.7, 0.5));
        assert_eq!(lines[1].velocity(), Vector::new(-0.5, 0.0));
    }

    #[test]
    fn test_wrong_field_count_reports_record() {
        let err = parse_lines("1 0.2 0.5 0.3\n").unwrap_err();
        assert_eq!(err.category(), "parse");
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_bad_number_rejected() {
        let content = "1 0.2 0.5 0.3 0.5 0.5 0.0\n2 a 0.5 0.8 0.5 0.0 0.0\n";
        let err = parse_lines(content).unwrap_err();
        assert!(err.to_string().contains("record 2"));
    }

    #[test]
    fn test_empty_input_is_empty_world() {
        assert!(parse_lines("# nothing here\n").unwrap().is_empty());
    }
}
