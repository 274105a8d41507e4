//! Plain-text point lists.
//!
//! One `x y` record per line. Parsing is lenient: blank lines are
//! ignored and malformed lines are skipped (and reported) rather than
//! failing the whole input.

use std::fmt::Write;

use gammahull_core::Point;

/// Errors from reading a point list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointsError {
    /// No line produced a valid point.
    #[error("input contains no valid points")]
    NoPoints,
}

/// Points read from text, with the lines that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPoints {
    /// Valid points in file order.
    pub points: Vec<Point>,
    /// 1-based line numbers of non-blank lines that could not be parsed.
    pub skipped_lines: Vec<usize>,
}

/// Parse whitespace-separated `x y` pairs, one per line.
///
/// Each line is trimmed; blank lines are ignored. The first two tokens
/// are the coordinates and any further tokens are ignored. A line with
/// fewer than two tokens, a token that is not a number, or a non-finite
/// value is skipped and its line number recorded.
///
/// # Errors
///
/// Returns [`PointsError::NoPoints`] if no line yields a point.
pub fn parse_points(input: &str) -> Result<ParsedPoints, PointsError> {
    let mut points = Vec::new();
    let mut skipped_lines = Vec::new();

    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(point) => points.push(point),
            None => skipped_lines.push(i + 1),
        }
    }

    if points.is_empty() {
        return Err(PointsError::NoPoints);
    }
    Ok(ParsedPoints {
        points,
        skipped_lines,
    })
}

fn parse_line(line: &str) -> Option<Point> {
    let mut tokens = line.split_whitespace();
    let x = parse_coordinate(tokens.next()?)?;
    let y = parse_coordinate(tokens.next()?)?;
    Some(Point::new(x, y))
}

fn parse_coordinate(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Serialize points as `x y` lines with six fractional digits.
///
/// Every line, including the last, ends with `\n`. An empty slice gives
/// an empty string.
#[must_use]
pub fn to_points_text(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 24);
    for p in points {
        let _ = writeln!(out, "{:.6} {:.6}", p.x, p.y);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_pairs() {
        let parsed = parse_points("0 0\n10 0\n10 10\n").unwrap();
        assert_eq!(
            parsed.points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
            ],
        );
        assert!(parsed.skipped_lines.is_empty());
    }

    #[test]
    fn trims_and_skips_blank_lines() {
        let parsed = parse_points("\n   1.5   2.5  \n\n\t-3 4e1\n").unwrap();
        assert_eq!(
            parsed.points,
            vec![Point::new(1.5, 2.5), Point::new(-3.0, 40.0)],
        );
        assert!(parsed.skipped_lines.is_empty());
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let parsed = parse_points("1 2 3 label\n").unwrap();
        assert_eq!(parsed.points, vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn malformed_lines_are_recorded() {
        let input = "1 1\nfoo bar\n7\n\n2 x\n3 3\nnan 1\n";
        let parsed = parse_points(input).unwrap();
        assert_eq!(parsed.points, vec![Point::new(1.0, 1.0), Point::new(3.0, 3.0)]);
        assert_eq!(parsed.skipped_lines, vec![2, 3, 5, 7]);
    }

    #[test]
    fn no_valid_points_is_an_error() {
        assert_eq!(parse_points(""), Err(PointsError::NoPoints));
        assert_eq!(parse_points("\n\n  \n"), Err(PointsError::NoPoints));
        assert_eq!(parse_points("x y\nhello\n"), Err(PointsError::NoPoints));
    }

    #[test]
    fn windows_line_endings() {
        let parsed = parse_points("1 2\r\n3 4\r\n").unwrap();
        assert_eq!(parsed.points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn text_uses_six_fixed_digits() {
        let text = to_points_text(&[Point::new(0.0, 0.0), Point::new(5.0, 1.0), Point::new(-0.25, 1e-7)]);
        assert_eq!(text, "0.000000 0.000000\n5.000000 1.000000\n-0.250000 0.000000\n");
    }

    #[test]
    fn empty_text_for_no_points() {
        assert_eq!(to_points_text(&[]), "");
    }

    #[test]
    fn text_parses_back() {
        let points = vec![Point::new(1.125, -2.5), Point::new(1000.0, 0.5)];
        let parsed = parse_points(&to_points_text(&points)).unwrap();
        assert_eq!(parsed.points, points);
    }
}
