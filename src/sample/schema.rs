use super::{Result, SampleError};
use std::collections::BTreeMap;

pub const X_COORDINATE: &str = "x-coordinate";
pub const Y_COORDINATE: &str = "y-coordinate";
pub const X_WALL_SHEAR: &str = "x-wall-shear";
pub const Y_WALL_SHEAR: &str = "y-wall-shear";
pub const PRESSURE_COEFFICIENT: &str = "pressure-coefficient";
pub const X_ROTATED: &str = "x-rotated";
pub const Y_ROTATED: &str = "y-rotated";
pub const CALCULATED_WALL_SHEAR: &str = "calculated-wallshear";

/// Splits a sample file line into its comma or whitespace separated fields
pub(crate) fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
}

/// Sample file column names
///
/// Names are normalized on parsing: underscores become hyphens,
/// so `x_wall_shear` and `x-wall-shear` designate the same column.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    names: Vec<String>,
    index: BTreeMap<String, usize>,
}
impl Schema {
    /// Parses the header line of a sample file
    pub fn parse(header: &str) -> Self {
        fields(header).map(|name| name.replace('_', "-")).collect()
    }
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    /// Column names in file order
    pub fn names(&self) -> &[String] {
        &self.names
    }
    /// Returns the index of column `name`
    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
    fn require(&self, name: &str) -> Result<usize> {
        self.column(name)
            .ok_or_else(|| SampleError::MissingColumn(name.to_string()))
    }
    /// Checks for the body frame columns appended by processing
    pub fn is_processed(&self) -> bool {
        self.index.contains_key(X_ROTATED)
    }
    /// Resolves the columns of the raw export
    ///
    /// The sample position falls back to the 2nd and 3rd columns
    /// if the coordinates are not named in the header.
    pub fn columns(&self) -> Result<Columns> {
        let x_wall_shear = self.require(X_WALL_SHEAR)?;
        let y_wall_shear = self.require(Y_WALL_SHEAR)?;
        let (x, y) = match (self.column(X_COORDINATE), self.column(Y_COORDINATE)) {
            (Some(x), Some(y)) => (x, y),
            _ if self.len() > 2 => {
                log::debug!("unnamed coordinates, using columns #1 and #2");
                (1, 2)
            }
            _ => return Err(SampleError::MissingColumn(X_COORDINATE.to_string())),
        };
        Ok(Columns {
            x,
            y,
            x_wall_shear,
            y_wall_shear,
            pressure: self.column(PRESSURE_COEFFICIENT),
        })
    }
    /// Resolves the body frame columns of a processed file
    pub fn derived_columns(&self) -> Result<DerivedColumns> {
        Ok(DerivedColumns {
            x_rotated: self.require(X_ROTATED)?,
            y_rotated: self.require(Y_ROTATED)?,
            wall_shear: self.require(CALCULATED_WALL_SHEAR)?,
        })
    }
    /// Returns the schema of the processed file
    pub fn with_derived(&self) -> Self {
        self.names
            .iter()
            .map(String::as_str)
            .chain([X_ROTATED, Y_ROTATED, CALCULATED_WALL_SHEAR])
            .map(String::from)
            .collect()
    }
}
impl FromIterator<String> for Schema {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let names: Vec<String> = iter.into_iter().collect();
        let mut index = BTreeMap::new();
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self { names, index }
    }
}

/// Raw export column indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Columns {
    pub x: usize,
    pub y: usize,
    pub x_wall_shear: usize,
    pub y_wall_shear: usize,
    pub pressure: Option<usize>,
}

/// Body frame column indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedColumns {
    pub x_rotated: usize,
    pub y_rotated: usize,
    pub wall_shear: usize,
}
