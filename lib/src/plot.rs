use crate::error::Result;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::Mosaic;
use ::svg::node::element::path::Data;
use ::svg::node::element::Circle;
use ::svg::node::element::Path;
use ::svg::Document;
use image::Rgb;
use std::path;

fn hex(color: Rgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

fn draw_cell(document: Document, polygon: &Polygon, color: &str) -> Document {
    if polygon.is_empty() {
        return document;
    }

    let first = polygon.points[0];
    let mut data = Data::new().move_to((first.x, first.y));

    for point in polygon.points.iter().skip(1) {
        data = data.line_to((point.x, point.y));
    }

    let path = Path::new()
        .set("fill", "none")
        .set("stroke", color)
        .set("stroke-width", "1.0")
        .set("d", data.close());

    document.add(path)
}

fn draw_generators(document: Document, points: &[Point]) -> Document {
    let mut document = document;

    for point in points {
        document = document.add(
            Circle::new()
                .set("fill", "black")
                .set("cx", point.x)
                .set("cy", point.y)
                .set("r", 1.0),
        );
    }

    document
}

pub fn to_document(mosaic: &Mosaic) -> Document {
    let (width, height) = mosaic.canvas.dimensions();
    let mut document = Document::new().set("viewBox", (0, 0, width, height));

    for cell in &mosaic.cells {
        document = draw_cell(document, &cell.polygon, &hex(cell.color));
    }

    draw_generators(document, &mosaic.generators)
}

/// Plot cell outlines in their fill color together with the generators.
pub fn write_diagram(filename: &path::Path, mosaic: &Mosaic) -> Result<()> {
    ::svg::save(filename, &to_document(mosaic))?;

    Ok(())
}
