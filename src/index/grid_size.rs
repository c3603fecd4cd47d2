use crate::coord::validate_grid_size;
use crate::error::GeoGridError;
use crate::index::constants::DEFAULT_GRID_SIZE;

/// Edge length of a square grid cell in degrees.
///
/// Always positive and finite. Longitude cells narrow toward the poles,
/// so the ground size of a cell shrinks with latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSize(f64);

impl GridSize {
    pub fn new(degrees: f64) -> Result<Self, GeoGridError> {
        validate_grid_size(degrees)?;
        Ok(Self(degrees))
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    pub fn half(&self) -> f64 {
        self.0 / 2.0
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(DEFAULT_GRID_SIZE)
    }
}

impl TryFrom<f64> for GridSize {
    type Error = GeoGridError;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        Self::new(degrees)
    }
}
