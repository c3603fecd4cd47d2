use crate::cell::GridCell;
use crate::coord::GeoPoint;
use crate::error::GeoGridError;
use crate::geom::BoundingBox;
use crate::index::{CellKey, GridSize};
use geojson::{Feature, FeatureCollection, JsonObject};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Point count of one grid cell.
///
/// `lat`/`lon` is the cell's lower-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapBin {
    pub cell_id: String,
    pub lat: f64,
    pub lon: f64,
    pub density: u64,
}

/// Per-cell point counts over a lat/lon grid.
///
/// Points that are non-finite or outside WGS84 range are skipped, and
/// points outside the optional bounds are filtered out. Both are counted
/// rather than reported as errors.
///
/// ```
/// use geogrid::{GeoPoint, GridSize, Heatmap};
///
/// let mut heatmap = Heatmap::new(GridSize::default());
/// heatmap.add_points(&[
///     GeoPoint::new(12.9716, 77.5946),
///     GeoPoint::new(12.9751, 77.5990),
///     GeoPoint::new(28.6139, 77.2090),
/// ]);
///
/// assert_eq!(heatmap.density_at(12.97, 77.59), 2);
/// assert_eq!(heatmap.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Heatmap {
    grid_size: GridSize,
    bounds: Option<BoundingBox>,
    counts: HashMap<CellKey, u64>,
    skipped: u64,
    filtered: u64,
}

#[derive(Default)]
struct Partial {
    counts: HashMap<CellKey, u64>,
    skipped: u64,
    filtered: u64,
}

impl Partial {
    fn merge(mut self, other: Partial) -> Partial {
        for (key, n) in other.counts {
            *self.counts.entry(key).or_insert(0) += n;
        }
        self.skipped += other.skipped;
        self.filtered += other.filtered;
        self
    }
}

enum Outcome {
    Counted(CellKey),
    Skipped,
    Filtered,
}

impl Heatmap {
    pub fn new(grid_size: GridSize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Only count points inside `bounds` (edges included).
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    fn classify(&self, lat: f64, lon: f64) -> Outcome {
        if self.bounds.is_some_and(|b| !b.contains(lat, lon)) {
            return Outcome::Filtered;
        }
        match CellKey::from_lat_lon(lat, lon, self.grid_size) {
            Ok(key) => Outcome::Counted(key),
            Err(e) => {
                debug!("skipping point ({}, {}): {}", lat, lon, e);
                Outcome::Skipped
            }
        }
    }

    /// Counts one point. Returns whether it landed in a cell.
    pub fn add_point(&mut self, lat: f64, lon: f64) -> bool {
        match self.classify(lat, lon) {
            Outcome::Counted(key) => {
                *self.counts.entry(key).or_insert(0) += 1;
                true
            }
            Outcome::Skipped => {
                self.skipped += 1;
                false
            }
            Outcome::Filtered => {
                self.filtered += 1;
                false
            }
        }
    }

    /// Counts a batch of points in parallel.
    pub fn add_points(&mut self, points: &[GeoPoint]) {
        let partial = points
            .par_iter()
            .fold(Partial::default, |mut acc, p| {
                match self.classify(p.lat, p.lon) {
                    Outcome::Counted(key) => *acc.counts.entry(key).or_insert(0) += 1,
                    Outcome::Skipped => acc.skipped += 1,
                    Outcome::Filtered => acc.filtered += 1,
                }
                acc
            })
            .reduce(Partial::default, Partial::merge);

        debug!(
            "added {} points into {} cells ({} skipped, {} filtered)",
            points.len(),
            partial.counts.len(),
            partial.skipped,
            partial.filtered
        );

        self.absorb(partial);
    }

    fn absorb(&mut self, partial: Partial) {
        for (key, n) in partial.counts {
            *self.counts.entry(key).or_insert(0) += n;
        }
        self.skipped += partial.skipped;
        self.filtered += partial.filtered;
    }

    /// Adds the counts of `other`, which must share this grid size and bounds.
    pub fn merge(&mut self, other: Heatmap) -> Result<(), GeoGridError> {
        if other.grid_size != self.grid_size {
            return Err(GeoGridError::IncompatibleHeatmaps(format!(
                "grid size {} vs {}",
                self.grid_size.degrees(),
                other.grid_size.degrees()
            )));
        }
        if other.bounds != self.bounds {
            return Err(GeoGridError::IncompatibleHeatmaps(format!(
                "bounds {:?} vs {:?}",
                self.bounds, other.bounds
            )));
        }
        self.absorb(Partial {
            counts: other.counts,
            skipped: other.skipped,
            filtered: other.filtered,
        });
        Ok(())
    }

    /// Count of the cell containing `(lat, lon)`; zero for invalid points.
    pub fn density_at(&self, lat: f64, lon: f64) -> u64 {
        CellKey::from_lat_lon(lat, lon, self.grid_size)
            .ok()
            .and_then(|key| self.counts.get(&key).copied())
            .unwrap_or(0)
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total_points(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Points rejected as invalid coordinates.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Points dropped for falling outside the bounds.
    pub fn filtered(&self) -> u64 {
        self.filtered
    }

    pub fn max_density(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    fn sorted_counts(&self) -> Vec<(CellKey, u64)> {
        let mut entries: Vec<(CellKey, u64)> = self.counts.iter().map(|(k, n)| (*k, *n)).collect();
        entries.sort_unstable_by_key(|(key, _)| *key);
        entries
    }

    /// Non-empty cells sorted south to north, then west to east.
    pub fn bins(&self) -> Vec<HeatmapBin> {
        self.sorted_counts()
            .into_iter()
            .map(|(key, density)| {
                let corner = key.lower_left(self.grid_size);
                HeatmapBin {
                    cell_id: key.to_cell_id(self.grid_size),
                    lat: corner.lat,
                    lon: corner.lon,
                    density,
                }
            })
            .collect()
    }

    /// Non-empty cells with their counts, in [`bins`](Self::bins) order.
    pub fn cells(&self) -> Vec<(GridCell, u64)> {
        self.sorted_counts()
            .into_iter()
            .map(|(key, density)| (GridCell::from_key(key, self.grid_size), density))
            .collect()
    }

    /// Serializes [`bins`](Self::bins) as a JSON array of
    /// `{"cell_id", "lat", "lon", "density"}` objects.
    pub fn to_json(&self) -> Result<String, GeoGridError> {
        serde_json::to_string(&self.bins()).map_err(|e| GeoGridError::JsonError(e.to_string()))
    }

    /// One polygon feature per non-empty cell with `cell_id` and `density` properties.
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .cells()
            .into_iter()
            .map(|(cell, density)| {
                let mut properties = JsonObject::new();
                properties.insert("cell_id".to_string(), cell.id.clone().into());
                properties.insert("density".to_string(), density.into());
                Feature {
                    bbox: None,
                    geometry: Some(geojson::Geometry::from(&cell.to_polygon())),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}
