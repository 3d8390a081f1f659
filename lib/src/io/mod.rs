//! Plain-text dump formats.
//!
//! Line-oriented keyword records used to exchange island stacks and
//! printer geometry with external tooling. Heights are millimeters,
//! point coordinates scaled integers.

use crate::geometry::{Point, Polygon};
use crate::{Coord, CoordF};
use std::io::{BufRead, Write};
use thiserror::Error;

/// Failures while reading a dump.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

fn parse_error(line: usize, message: impl Into<String>) -> DumpError {
    DumpError::Parse {
        line,
        message: message.into(),
    }
}

/// A polygon recorded at the height it was sliced.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonAtHeight {
    pub height: CoordF,
    pub polygon: Polygon,
}

/// Exported island stack of one object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IslandDump {
    pub object_id: u64,
    pub total_height: CoordF,
    pub polygons: Vec<PolygonAtHeight>,
}

/// Exported printer geometry: sliced head shapes plus bed limits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrinterGeometryDump {
    pub convex_height: CoordF,
    pub box_height: CoordF,
    pub x_size: Coord,
    pub y_size: Coord,
    pub polygons: Vec<PolygonAtHeight>,
}

/// One line of an import dump: where a scheduled polygon was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledPolygon {
    pub original_index: usize,
    pub position: Point,
}

pub fn write_island_dump<W: Write>(writer: &mut W, dump: &IslandDump) -> std::io::Result<()> {
    writeln!(writer, "OBJECT_ID {}", dump.object_id)?;
    writeln!(writer, "TOTAL_HEIGHT {}", dump.total_height)?;
    for entry in &dump.polygons {
        writeln!(writer, "POLYGON_AT_HEIGHT {}", entry.height)?;
        for point in entry.polygon.points() {
            writeln!(writer, "POINT {} {}", point.x, point.y)?;
        }
    }
    Ok(())
}

pub fn read_island_dump<R: BufRead>(reader: R) -> Result<IslandDump, DumpError> {
    let mut dump = IslandDump::default();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = number + 1;
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };
        match keyword {
            "OBJECT_ID" => dump.object_id = parse_field(&mut fields, line_number, "object id")?,
            "TOTAL_HEIGHT" => {
                dump.total_height = parse_field(&mut fields, line_number, "height")?
            }
            "POLYGON_AT_HEIGHT" => dump.polygons.push(PolygonAtHeight {
                height: parse_field(&mut fields, line_number, "height")?,
                polygon: Polygon::new(),
            }),
            "POINT" => {
                let x = parse_field(&mut fields, line_number, "x coordinate")?;
                let y = parse_field(&mut fields, line_number, "y coordinate")?;
                let entry = dump.polygons.last_mut().ok_or_else(|| {
                    parse_error(line_number, "POINT before POLYGON_AT_HEIGHT")
                })?;
                entry.polygon.push(Point::new(x, y));
            }
            other => return Err(parse_error(line_number, format!("unknown record {other}"))),
        }
    }
    Ok(dump)
}

pub fn write_printer_geometry<W: Write>(
    writer: &mut W,
    dump: &PrinterGeometryDump,
) -> std::io::Result<()> {
    writeln!(writer, "CONVEX_HEIGHT {}", dump.convex_height)?;
    writeln!(writer, "BOX_HEIGHT {}", dump.box_height)?;
    writeln!(writer, "X_SIZE {}", dump.x_size)?;
    writeln!(writer, "Y_SIZE {}", dump.y_size)?;
    for entry in &dump.polygons {
        writeln!(writer, "POLYGON_AT_HEIGHT {}", entry.height)?;
        for point in entry.polygon.points() {
            writeln!(writer, "POINT {} {}", point.x, point.y)?;
        }
    }
    Ok(())
}

pub fn read_printer_geometry<R: BufRead>(reader: R) -> Result<PrinterGeometryDump, DumpError> {
    let mut dump = PrinterGeometryDump::default();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = number + 1;
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };
        match keyword {
            "CONVEX_HEIGHT" => {
                dump.convex_height = parse_field(&mut fields, line_number, "height")?
            }
            "BOX_HEIGHT" => dump.box_height = parse_field(&mut fields, line_number, "height")?,
            "X_SIZE" => dump.x_size = parse_field(&mut fields, line_number, "size")?,
            "Y_SIZE" => dump.y_size = parse_field(&mut fields, line_number, "size")?,
            "POLYGON_AT_HEIGHT" => dump.polygons.push(PolygonAtHeight {
                height: parse_field(&mut fields, line_number, "height")?,
                polygon: Polygon::new(),
            }),
            "POINT" => {
                let x = parse_field(&mut fields, line_number, "x coordinate")?;
                let y = parse_field(&mut fields, line_number, "y coordinate")?;
                let entry = dump.polygons.last_mut().ok_or_else(|| {
                    parse_error(line_number, "POINT before POLYGON_AT_HEIGHT")
                })?;
                entry.polygon.push(Point::new(x, y));
            }
            other => return Err(parse_error(line_number, format!("unknown record {other}"))),
        }
    }
    Ok(dump)
}

pub fn write_import_dump<W: Write>(
    writer: &mut W,
    scheduled: &[ScheduledPolygon],
) -> std::io::Result<()> {
    for entry in scheduled {
        writeln!(
            writer,
            "{} {} {}",
            entry.original_index, entry.position.x, entry.position.y
        )?;
    }
    Ok(())
}

pub fn read_import_dump<R: BufRead>(reader: R) -> Result<Vec<ScheduledPolygon>, DumpError> {
    let mut result = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = number + 1;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let original_index = parse_field(&mut fields, line_number, "original index")?;
        let x = parse_field(&mut fields, line_number, "x coordinate")?;
        let y = parse_field(&mut fields, line_number, "y coordinate")?;
        result.push(ScheduledPolygon {
            original_index,
            position: Point::new(x, y),
        });
    }
    Ok(result)
}

fn parse_field<'a, T: std::str::FromStr>(
    fields: &mut impl Iterator<Item = &'a str>,
    line: usize,
    what: &str,
) -> Result<T, DumpError> {
    let field = fields
        .next()
        .ok_or_else(|| parse_error(line, format!("missing {what}")))?;
    field
        .parse()
        .map_err(|_| parse_error(line, format!("invalid {what}: {field}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_island_dump_roundtrip() {
        let dump = IslandDump {
            object_id: 7,
            total_height: 12.5,
            polygons: vec![PolygonAtHeight {
                height: 0.05,
                polygon: Polygon::from_points(vec![
                    Point::new(0, 0),
                    Point::new(1_000_000, 0),
                    Point::new(0, 1_000_000),
                ]),
            }],
        };
        let mut buffer = Vec::new();
        write_island_dump(&mut buffer, &dump).unwrap();
        let parsed = read_island_dump(buffer.as_slice()).unwrap();
        assert_eq!(parsed, dump);
    }

    #[test]
    fn test_printer_geometry_roundtrip() {
        let dump = PrinterGeometryDump {
            convex_height: 3.0,
            box_height: 8.0,
            x_size: 120_000_000,
            y_size: 68_000_000,
            polygons: vec![],
        };
        let mut buffer = Vec::new();
        write_printer_geometry(&mut buffer, &dump).unwrap();
        let parsed = read_printer_geometry(buffer.as_slice()).unwrap();
        assert_eq!(parsed, dump);
    }

    #[test]
    fn test_import_dump_roundtrip() {
        let scheduled = vec![
            ScheduledPolygon {
                original_index: 0,
                position: Point::new(10, -20),
            },
            ScheduledPolygon {
                original_index: 3,
                position: Point::new(-5, 7),
            },
        ];
        let mut buffer = Vec::new();
        write_import_dump(&mut buffer, &scheduled).unwrap();
        let parsed = read_import_dump(buffer.as_slice()).unwrap();
        assert_eq!(parsed, scheduled);
    }

    #[test]
    fn test_point_before_polygon_is_rejected() {
        let text = "OBJECT_ID 1\nPOINT 0 0\n";
        let result = read_island_dump(text.as_bytes());
        assert!(matches!(result, Err(DumpError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_unknown_keyword_is_rejected() {
        let text = "WHATEVER 1\n";
        assert!(read_island_dump(text.as_bytes()).is_err());
    }
}
