//! Batched matrix construction over a road-network table service.
//!
//! The service itself is an external collaborator reached through
//! [`TableSource`]. [`BatchedProvider`] splits the point set into chunks,
//! requests every (source chunk, destination chunk) block, and fills the
//! matrix. A failed block is replaced by a straight-line road estimate and
//! logged; it never aborts the run.

use rayon::prelude::*;

use crate::models::Point;

use super::provider::road_estimate;
use super::{DistanceError, DistanceMatrix, DistanceProvider, Leg};

/// Default number of points per request chunk.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default ratio of road distance to straight-line distance.
pub const DEFAULT_DETOUR_FACTOR: f64 = 1.3;

/// A road-network service answering rectangular distance tables.
///
/// `table(sources, destinations)` must return `sources.len()` rows of
/// `destinations.len()` legs each, where `rows[i][j]` is the leg from
/// `sources[i]` to `destinations[j]`.
pub trait TableSource: Sync {
    /// Fetches one block of the matrix.
    ///
    /// # Errors
    ///
    /// Any [`DistanceError`]; the caller falls back to an estimate for the
    /// whole block.
    fn table(&self, sources: &[&Point], destinations: &[&Point]) -> Result<Vec<Vec<Leg>>, DistanceError>;
}

/// Builds matrices from a [`TableSource`] in bounded blocks.
///
/// Blocks are fetched concurrently on the rayon pool and written to disjoint
/// cells.
///
/// # Examples
///
/// ```
/// use u_mdvrp::distance::{BatchedProvider, DistanceError, DistanceProvider, Leg, TableSource};
/// use u_mdvrp::models::Point;
///
/// struct Offline;
///
/// impl TableSource for Offline {
///     fn table(&self, _: &[&Point], _: &[&Point]) -> Result<Vec<Vec<Leg>>, DistanceError> {
///         Err(DistanceError::Table { message: "service unreachable".into() })
///     }
/// }
///
/// let points = [Point::new("a", 41.0, 29.0), Point::new("b", 41.1, 29.0)];
/// let refs: Vec<&Point> = points.iter().collect();
/// let dm = BatchedProvider::new(Offline).build_matrix(&refs)?;
/// // Falls back to 1.3 × straight-line distance.
/// assert!((dm.distance(0, 1) - 1.3 * points[0].distance_to(&points[1])).abs() < 1e-9);
/// # Ok::<(), DistanceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BatchedProvider<S> {
    source: S,
    batch_size: usize,
    detour_factor: f64,
    fallback_speed_kmh: f64,
}

impl<S: TableSource> BatchedProvider<S> {
    /// Wraps `source` with default batch size, detour factor and a 50 km/h
    /// fallback speed.
    pub fn new(source: S) -> Self {
        Self {
            source,
            batch_size: DEFAULT_BATCH_SIZE,
            detour_factor: DEFAULT_DETOUR_FACTOR,
            fallback_speed_kmh: 50.0,
        }
    }

    /// Sets the number of points per chunk (at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Sets the road/straight-line ratio used for failed blocks.
    pub fn with_detour_factor(mut self, factor: f64) -> Self {
        self.detour_factor = factor;
        self
    }

    /// Sets the speed used for failed blocks.
    pub fn with_fallback_speed(mut self, kmh: f64) -> Self {
        self.fallback_speed_kmh = kmh;
        self
    }

    /// The wrapped table source.
    pub fn source(&self) -> &S {
        &self.source
    }

    fn fetch_block(&self, sources: &[&Point], destinations: &[&Point]) -> Vec<Vec<Leg>> {
        match self
            .source
            .table(sources, destinations)
            .and_then(|rows| check_shape(rows, sources.len(), destinations.len()))
        {
            Ok(rows) => rows,
            Err(err) => {
                log::warn!(
                    "distance table block {}x{} degraded to straight-line estimate: {err}",
                    sources.len(),
                    destinations.len()
                );
                sources
                    .iter()
                    .map(|a| {
                        destinations
                            .iter()
                            .map(|b| road_estimate(a, b, self.detour_factor, self.fallback_speed_kmh))
                            .collect()
                    })
                    .collect()
            }
        }
    }
}

fn check_shape(
    rows: Vec<Vec<Leg>>,
    expected_rows: usize,
    expected_cols: usize,
) -> Result<Vec<Vec<Leg>>, DistanceError> {
    let bad_row = rows.iter().find(|row| row.len() != expected_cols);
    if rows.len() != expected_rows || bad_row.is_some() {
        return Err(DistanceError::MalformedTable {
            expected_rows,
            expected_cols,
            rows: rows.len(),
            cols: bad_row.map_or(expected_cols, Vec::len),
        });
    }
    Ok(rows)
}

impl<S: TableSource> DistanceProvider for BatchedProvider<S> {
    fn distance_duration(&self, a: &Point, b: &Point) -> Leg {
        if a.id() == b.id() {
            return Leg::default();
        }
        self.fetch_block(&[a], &[b])
            .first()
            .and_then(|row| row.first())
            .copied()
            .unwrap_or_default()
    }

    fn build_matrix(&self, points: &[&Point]) -> Result<DistanceMatrix, DistanceError> {
        let mut dm = DistanceMatrix::new(points.iter().map(|p| p.id()))?;
        let chunk_starts: Vec<usize> = (0..points.len()).step_by(self.batch_size).collect();
        let blocks: Vec<(usize, usize)> = chunk_starts
            .iter()
            .flat_map(|&row| chunk_starts.iter().map(move |&col| (row, col)))
            .collect();

        let fetched: Vec<(usize, usize, Vec<Vec<Leg>>)> = blocks
            .par_iter()
            .map(|&(row, col)| {
                let sources = &points[row..(row + self.batch_size).min(points.len())];
                let destinations = &points[col..(col + self.batch_size).min(points.len())];
                (row, col, self.fetch_block(sources, destinations))
            })
            .collect();

        for (row, col, legs) in fetched {
            for (i, line) in legs.into_iter().enumerate() {
                for (j, leg) in line.into_iter().enumerate() {
                    dm.set(row + i, col + j, leg);
                }
            }
        }
        for i in 0..dm.size() {
            dm.set(i, i, Leg::default());
        }
        log::debug!(
            "built {n}x{n} distance matrix from {} blocks",
            blocks.len(),
            n = dm.size()
        );
        Ok(dm)
    }
}
