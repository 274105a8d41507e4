//! SVG preview of a hull result.
//!
//! Draws the input points as small black dots, the convex hull as a
//! gray dashed outline, and the concave hull as a blue outline, using
//! the [`svg`] crate for document construction, XML escaping, and path
//! data formatting.
//!
//! Coordinates are mapped into the canvas with a single uniform scale
//! and a fixed margin. The y axis is flipped so that +y points up, and
//! gray axis lines are drawn through the data origin.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use gammahull_core::{HullResult, Point, Polygon, ShapeParameter};
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Element, Line, Path, Title};
use svg::node::{Node, Text};

/// Margin around the plotted data, in canvas units.
const MARGIN: f64 = 50.0;

/// Coordinate ranges narrower than this are widened to [`FALLBACK_RANGE`].
const MIN_RANGE: f64 = 1e-9;

/// Range used for an axis along which all points coincide.
const FALLBACK_RANGE: f64 = 100.0;

/// Radius of the dot drawn for each input point.
const POINT_RADIUS: f64 = 1.0;

/// Metadata to embed in the SVG document.
///
/// Both fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the input file name.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,
}

/// Canvas size in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// Width of the document.
    pub width: f64,
    /// Height of the document.
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Maps data coordinates into canvas coordinates.
#[derive(Debug, Clone, Copy)]
struct Transform {
    min_x: f64,
    min_y: f64,
    scale: f64,
    height: f64,
}

impl Transform {
    /// Fit the bounding box of `points` into `canvas`.
    ///
    /// Returns `None` when there are no points.
    fn fit(points: &[Point], canvas: Canvas) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in rest {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        let range_x = widen(max_x - min_x);
        let range_y = widen(max_y - min_y);
        let scale_x = 2.0f64.mul_add(-MARGIN, canvas.width) / range_x;
        let scale_y = 2.0f64.mul_add(-MARGIN, canvas.height) / range_y;

        Some(Self {
            min_x,
            min_y,
            scale: scale_x.min(scale_y),
            height: canvas.height,
        })
    }

    fn apply(self, p: Point) -> (f64, f64) {
        (
            (p.x - self.min_x).mul_add(self.scale, MARGIN),
            self.height - MARGIN - (p.y - self.min_y) * self.scale,
        )
    }
}

fn widen(range: f64) -> f64 {
    if range < MIN_RANGE {
        FALLBACK_RANGE
    } else {
        range
    }
}

/// Closed outline path data for `polygon`, or `None` below 3 vertices.
fn outline_data(polygon: &Polygon, transform: Transform) -> Option<Data> {
    if polygon.is_degenerate() {
        return None;
    }
    let points = polygon.points();
    let mut data = Data::new().move_to(transform.apply(points[0]));
    for &p in &points[1..] {
        data = data.line_to(transform.apply(p));
    }
    Some(data.close())
}

/// The status line shown in the top-left corner.
#[must_use]
pub fn info_line(result: &HullResult, gamma: ShapeParameter) -> String {
    format!(
        "Points: {} | Convex hull: {} | Concave hull: {} | γ: {:.2}",
        result.points.len(),
        result.convex.len(),
        result.concave.len(),
        gamma.get(),
    )
}

/// Render `result` as an SVG document on `canvas`.
///
/// Hulls with fewer than 3 vertices are not drawn. An empty point set
/// produces a document holding only the metadata and the info line.
#[must_use]
pub fn to_svg(
    result: &HullResult,
    gamma: ShapeParameter,
    canvas: Canvas,
    metadata: &SvgMetadata<'_>,
) -> String {
    let mut doc = Document::new()
        .set("width", canvas.width)
        .set("height", canvas.height)
        .set("viewBox", (0.0, 0.0, canvas.width, canvas.height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(transform) = Transform::fit(&result.points, canvas) {
        let (origin_x, origin_y) = transform.apply(Point::new(0.0, 0.0));
        doc = doc
            .add(axis_line((0.0, origin_y), (canvas.width, origin_y)))
            .add(axis_line((origin_x, 0.0), (origin_x, canvas.height)));

        for &p in &result.points {
            let (cx, cy) = transform.apply(p);
            doc = doc.add(
                Circle::new()
                    .set("cx", cx)
                    .set("cy", cy)
                    .set("r", POINT_RADIUS)
                    .set("fill", "black"),
            );
        }

        if let Some(data) = outline_data(&result.convex, transform) {
            doc = doc.add(
                Path::new()
                    .set("class", "convex-hull")
                    .set("d", data)
                    .set("fill", "none")
                    .set("stroke", "gray")
                    .set("stroke-width", 2)
                    .set("stroke-dasharray", "8 4"),
            );
        }

        if let Some(data) = outline_data(&result.concave, transform) {
            doc = doc.add(
                Path::new()
                    .set("class", "concave-hull")
                    .set("d", data)
                    .set("fill", "none")
                    .set("stroke", "blue")
                    .set("stroke-width", 3),
            );
        }
    }

    let mut info = Element::new("text");
    info.assign("x", 10);
    info.assign("y", 20);
    info.assign("font-family", "sans-serif");
    info.assign("font-size", 14);
    info.append(Text::new(info_line(result, gamma)));
    doc = doc.add(info);

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

fn axis_line(from: (f64, f64), to: (f64, f64)) -> Line {
    Line::new()
        .set("x1", from.0)
        .set("y1", from.1)
        .set("x2", to.0)
        .set("y2", to.1)
        .set("stroke", "gray")
        .set("stroke-width", 1)
}
