//! Normalization of tabular imports.
//!
//! The import collaborator reads a spreadsheet and hands over its first sheet
//! as rows of [`Cell`]s. This module turns those rows into control points.
//! Distance tables are handled by [`Distances::from_table`](crate::Distances::from_table).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Pt2, Pt3, Real, round_to};

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(Real),
    Text(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<Real> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }

    fn label(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => v.to_string(),
        }
    }
}

impl From<Real> for Cell {
    fn from(value: Real) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointImportError {
    #[error("points table is empty")]
    Empty,
    #[error("row {row} has {columns} columns, need at least 4 (label, X, Y, Z)")]
    TooFewColumns { row: usize, columns: usize },
    #[error("row {row} has a non-numeric coordinate")]
    NotANumber { row: usize },
}

/// A control point as read from the import table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedPoint {
    pub label: String,
    /// Real-world coordinates, rounded to two decimals.
    pub world: Pt3,
    /// Pixel coordinates when the table already carries them (columns 5 and 6).
    pub pixel: Option<Pt2>,
}

/// Range of the imported Z values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZLimits {
    pub min: Real,
    pub max: Real,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedPoints {
    pub points: Vec<ImportedPoint>,
    pub z_limits: ZLimits,
}

fn is_header(row: &[Cell]) -> bool {
    row.len() >= 4
        && row[0]
            .as_text()
            .is_some_and(|label| label.trim().eq_ignore_ascii_case("label"))
        && row[1..4].iter().all(|cell| cell.as_text().is_some())
}

/// Parse control points from rows `[label, X, Y, Z, (x, y)]`.
///
/// A leading `LABEL, X, Y, Z` header row is skipped. Pixel columns are only
/// taken into account when both are numeric.
pub fn points_from_table(rows: &[Vec<Cell>]) -> Result<ImportedPoints, PointImportError> {
    if rows.is_empty() {
        return Err(PointImportError::Empty);
    }

    let mut points = Vec::with_capacity(rows.len());
    let mut z_limits = ZLimits {
        min: Real::INFINITY,
        max: Real::NEG_INFINITY,
    };

    for (row_idx, row) in rows.iter().enumerate() {
        if row.len() < 4 {
            return Err(PointImportError::TooFewColumns {
                row: row_idx,
                columns: row.len(),
            });
        }
        if is_header(row) {
            continue;
        }

        let coord = |i: usize| -> Result<Real, PointImportError> {
            row[i]
                .as_number()
                .filter(|v| v.is_finite())
                .map(|v| round_to(v, 2))
                .ok_or(PointImportError::NotANumber { row: row_idx })
        };
        let world = Pt3::new(coord(1)?, coord(2)?, coord(3)?);

        let pixel_x = row.get(4).and_then(Cell::as_number);
        let pixel_y = row.get(5).and_then(Cell::as_number);
        let pixel = match (pixel_x, pixel_y) {
            (Some(x), Some(y)) => Some(Pt2::new(round_to(x, 1), round_to(y, 1))),
            _ => None,
        };

        z_limits.min = z_limits.min.min(world.z);
        z_limits.max = z_limits.max.max(world.z);

        points.push(ImportedPoint {
            label: row[0].label(),
            world,
            pixel,
        });
    }

    if points.is_empty() {
        return Err(PointImportError::Empty);
    }

    Ok(ImportedPoints { points, z_limits })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[Cell]) -> Vec<Cell> {
        cells.to_vec()
    }

    #[test]
    fn header_is_skipped_and_values_rounded() {
        let rows = vec![
            row(&["Label".into(), "X".into(), "Y".into(), "Z".into()]),
            row(&["P1".into(), 1.234.into(), 2.0.into(), 10.25.into()]),
            row(&[
                "P2".into(),
                3.0.into(),
                4.0.into(),
                7.5.into(),
                120.44.into(),
                80.06.into(),
            ]),
        ];
        let imported = points_from_table(&rows).unwrap();
        assert_eq!(imported.points.len(), 2);
        assert_eq!(imported.points[0].label, "P1");
        assert_eq!(imported.points[0].world.x, 1.23);
        assert!(imported.points[0].pixel.is_none());
        assert_eq!(imported.points[1].pixel, Some(Pt2::new(120.4, 80.1)));
        assert_eq!(imported.z_limits.min, 7.5);
        assert_eq!(imported.z_limits.max, 10.25);
    }

    #[test]
    fn numeric_labels_are_kept_as_text() {
        let rows = vec![row(&[7.0.into(), 1.0.into(), 2.0.into(), 3.0.into()])];
        let imported = points_from_table(&rows).unwrap();
        assert_eq!(imported.points[0].label, "7");
    }

    #[test]
    fn rejects_short_rows_and_bad_numbers() {
        let short = vec![row(&["P1".into(), 1.0.into(), 2.0.into()])];
        assert_eq!(
            points_from_table(&short),
            Err(PointImportError::TooFewColumns { row: 0, columns: 3 })
        );

        let bad = vec![row(&["P1".into(), "east".into(), 2.0.into(), 3.0.into()])];
        assert_eq!(
            points_from_table(&bad),
            Err(PointImportError::NotANumber { row: 0 })
        );
    }

    #[test]
    fn cells_deserialize_untagged() {
        let rows: Vec<Vec<Cell>> = serde_json::from_str(r#"[["d12", 10.5], [3]]"#).unwrap();
        assert_eq!(rows[0][0], Cell::Text("d12".into()));
        assert_eq!(rows[0][1], Cell::Number(10.5));
        assert_eq!(rows[1][0], Cell::Number(3.0));
    }
}
