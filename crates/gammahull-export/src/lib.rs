//! gammahull-export: Pure format serializers (sans-IO)
//!
//! Reads point lists from text and writes hulls back out as point lists
//! or as an SVG preview. Everything here takes and returns strings; file
//! handling lives in the caller.

pub mod points;
pub mod svg;

pub use points::{ParsedPoints, PointsError, parse_points, to_points_text};
pub use svg::{Canvas, SvgMetadata, info_line, to_svg};
