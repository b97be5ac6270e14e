//! Spatial density of accident locations.
//!
//! Filters normalized accidents down to rows with a coordinate pair and bins
//! them into a square 2D histogram for heatmap rendering.

use crash_stats_analytics_models::{DensityGrid, SpatialDensity};
use crash_stats_source_models::{Coordinates, NormalizedAccident};

/// Fewest valid coordinate rows for which a heatmap is produced.
pub const MIN_HEATMAP_POINTS: usize = 11;

/// Bins per axis of the heatmap grid.
pub const HEATMAP_BINS: usize = 50;

/// Coordinate pairs of every accident that has one, in record order.
#[must_use]
pub fn valid_coordinates(accidents: &[NormalizedAccident]) -> Vec<Coordinates> {
    accidents.iter().filter_map(|a| a.coordinates).collect()
}

/// Bins `points` into a `bins` x `bins` grid spanning their bounding box.
///
/// A degenerate axis (all points share one value) is widened by half a
/// degree on each side. Returns `None` for no points or zero bins.
#[must_use]
pub fn density_grid(points: &[Coordinates], bins: usize) -> Option<DensityGrid> {
    if points.is_empty() || bins == 0 {
        return None;
    }

    let (lon_min, lon_max) = widen(extent(points.iter().map(|p| p.longitude)));
    let (lat_min, lat_max) = widen(extent(points.iter().map(|p| p.latitude)));

    let mut counts = vec![vec![0u64; bins]; bins];
    for point in points {
        let row = bin_index(point.latitude, lat_min, lat_max, bins);
        let col = bin_index(point.longitude, lon_min, lon_max, bins);
        counts[row][col] += 1;
    }

    Some(DensityGrid {
        bins,
        min_longitude: lon_min,
        max_longitude: lon_max,
        min_latitude: lat_min,
        max_latitude: lat_max,
        counts,
    })
}

/// Computes the heatmap grid, or reports that there are too few valid
/// coordinates (fewer than [`MIN_HEATMAP_POINTS`]).
#[must_use]
pub fn spatial_density(accidents: &[NormalizedAccident]) -> SpatialDensity {
    let points = valid_coordinates(accidents);
    if points.len() < MIN_HEATMAP_POINTS {
        log::debug!(
            "Only {} valid coordinate rows (need {MIN_HEATMAP_POINTS}), skipping heatmap",
            points.len()
        );
        return SpatialDensity::Insufficient {
            valid: points.len(),
            required: MIN_HEATMAP_POINTS,
        };
    }

    density_grid(&points, HEATMAP_BINS).map_or(
        SpatialDensity::Insufficient {
            valid: points.len(),
            required: MIN_HEATMAP_POINTS,
        },
        SpatialDensity::Grid,
    )
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bin_index(value: f64, lo: f64, hi: f64, bins: usize) -> usize {
    let scaled = ((value - lo) / (hi - lo) * bins as f64).floor();
    (scaled.max(0.0) as usize).min(bins - 1)
}
