//! Pairwise distances among the four control corners of the oblique workflow.
//!
//! Corners are ordered P0..P3 (top-left, top-right, bottom-right,
//! bottom-left) and the six distances use 1-based names:
//!
//! ```text
//! d12 = |P0 P1|   d23 = |P1 P2|   d34 = |P2 P3|
//! d41 = |P0 P3|   d13 = |P0 P2|   d24 = |P1 P3|   (diagonals)
//! ```
//!
//! The same record is used in both directions: computed from edited
//! real-world corners to fill the distance form, and compared against the
//! submitted form values to detect drift before a solve.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Cell, Pt2, Real, distance};

/// One of the six named corner distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceKey {
    D12,
    D23,
    D34,
    D41,
    D13,
    D24,
}

impl DistanceKey {
    /// Canonical order, also the column order of value-only import tables.
    pub const ALL: [DistanceKey; 6] = [
        DistanceKey::D12,
        DistanceKey::D23,
        DistanceKey::D34,
        DistanceKey::D41,
        DistanceKey::D13,
        DistanceKey::D24,
    ];

    /// Zero-based corner indices joined by this distance.
    pub fn corners(self) -> (usize, usize) {
        match self {
            DistanceKey::D12 => (0, 1),
            DistanceKey::D23 => (1, 2),
            DistanceKey::D34 => (2, 3),
            DistanceKey::D41 => (0, 3),
            DistanceKey::D13 => (0, 2),
            DistanceKey::D24 => (1, 3),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DistanceKey::D12 => "d12",
            DistanceKey::D23 => "d23",
            DistanceKey::D34 => "d34",
            DistanceKey::D41 => "d41",
            DistanceKey::D13 => "d13",
            DistanceKey::D24 => "d24",
        }
    }

    /// Parse a free-form label such as `d12`, `D_21`, `1-3` or `14`.
    ///
    /// Separators and the `d` prefix are ignored and the two corner digits
    /// may come in either order.
    pub fn parse_label(label: &str) -> Option<Self> {
        let mut digits: Vec<char> = label
            .chars()
            .filter(|c| !matches!(c, 'd' | 'D' | '_' | '-') && !c.is_whitespace())
            .collect();
        if digits.len() != 2 {
            return None;
        }
        digits.sort_unstable();
        match (digits[0], digits[1]) {
            ('1', '2') => Some(DistanceKey::D12),
            ('2', '3') => Some(DistanceKey::D23),
            ('3', '4') => Some(DistanceKey::D34),
            ('1', '4') => Some(DistanceKey::D41),
            ('1', '3') => Some(DistanceKey::D13),
            ('2', '4') => Some(DistanceKey::D24),
            _ => None,
        }
    }
}

/// The six corner distances.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Distances {
    pub d12: Real,
    pub d23: Real,
    pub d34: Real,
    pub d41: Real,
    pub d13: Real,
    pub d24: Real,
}

impl Distances {
    /// Compute all six distances from four ordered corners.
    ///
    /// Coincident corners give zero; no validation happens here.
    pub fn from_corners(corners: &[Pt2; 4]) -> Self {
        let mut out = Self::default();
        for key in DistanceKey::ALL {
            let (i, j) = key.corners();
            out.set(key, distance(&corners[i], &corners[j]));
        }
        out
    }

    pub fn get(&self, key: DistanceKey) -> Real {
        match key {
            DistanceKey::D12 => self.d12,
            DistanceKey::D23 => self.d23,
            DistanceKey::D34 => self.d34,
            DistanceKey::D41 => self.d41,
            DistanceKey::D13 => self.d13,
            DistanceKey::D24 => self.d24,
        }
    }

    pub fn set(&mut self, key: DistanceKey, value: Real) {
        let slot = match key {
            DistanceKey::D12 => &mut self.d12,
            DistanceKey::D23 => &mut self.d23,
            DistanceKey::D34 => &mut self.d34,
            DistanceKey::D41 => &mut self.d41,
            DistanceKey::D13 => &mut self.d13,
            DistanceKey::D24 => &mut self.d24,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (DistanceKey, Real)> + '_ {
        DistanceKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    /// True when any of the six values is not exactly equal.
    pub fn differs_from(&self, other: &Distances) -> bool {
        DistanceKey::ALL
            .into_iter()
            .any(|key| self.get(key) != other.get(key))
    }

    /// First key whose value is negative or not finite.
    pub fn first_invalid(&self) -> Option<DistanceKey> {
        self.iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
            .map(|(key, _)| key)
    }

    /// Build the record from an imported distance table.
    ///
    /// Accepts exactly six data rows, optionally preceded by one header row.
    /// Each data row is either `[label, value]` or `[value]`; value-only
    /// rows follow the order of [`DistanceKey::ALL`].
    pub fn from_table(rows: &[Vec<Cell>]) -> Result<Self, DistanceImportError> {
        let rows = match rows.len() {
            6 => rows,
            7 => &rows[1..],
            n => return Err(DistanceImportError::RowCount(n)),
        };

        let labeled = rows[0].first().and_then(Cell::as_text).is_some();
        let mut out = Self::default();

        if labeled {
            let mut seen = [false; 6];
            for row in rows {
                let label = row
                    .first()
                    .and_then(Cell::as_text)
                    .ok_or(DistanceImportError::InvalidFormat)?;
                let key = DistanceKey::parse_label(label)
                    .ok_or_else(|| DistanceImportError::UnknownLabel(label.to_string()))?;
                let value = row
                    .get(1)
                    .and_then(Cell::as_number)
                    .ok_or(DistanceImportError::NotANumber(key))?;
                out.set(key, value);
                if let Some(pos) = DistanceKey::ALL.iter().position(|k| *k == key) {
                    seen[pos] = true;
                }
            }
            if let Some(pos) = seen.iter().position(|s| !s) {
                return Err(DistanceImportError::Missing(DistanceKey::ALL[pos]));
            }
        } else {
            for (key, row) in DistanceKey::ALL.into_iter().zip(rows) {
                let value = row
                    .first()
                    .and_then(Cell::as_number)
                    .ok_or(DistanceImportError::NotANumber(key))?;
                out.set(key, value);
            }
        }

        for (key, value) in out.iter() {
            if !value.is_finite() {
                return Err(DistanceImportError::NotANumber(key));
            }
            if value < 0.0 {
                return Err(DistanceImportError::Negative(key));
            }
        }

        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceImportError {
    #[error("expected 6 distance rows (or 7 with a header), got {0}")]
    RowCount(usize),
    #[error("distance table has an invalid format")]
    InvalidFormat,
    #[error("unrecognized distance label {0:?}")]
    UnknownLabel(String),
    #[error("distance {} is missing", .0.name())]
    Missing(DistanceKey),
    #[error("distance {} is not a number", .0.name())]
    NotANumber(DistanceKey),
    #[error("distance {} is negative", .0.name())]
    Negative(DistanceKey),
}
