//! Dense distance/duration matrix keyed by point id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::DistanceError;

/// Distance and travel time of one directed leg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Distance in kilometres.
    pub distance_km: f64,
    /// Travel time in minutes.
    pub duration_min: f64,
}

impl Leg {
    /// Creates a leg.
    pub fn new(distance_km: f64, duration_min: f64) -> Self {
        Self {
            distance_km,
            duration_min,
        }
    }
}

/// A dense n×n matrix of [`Leg`]s stored in row-major order.
///
/// Rows and columns are addressed by the index a point id received at
/// construction; [`index_of`](DistanceMatrix::index_of) maps ids to indices.
/// The matrix is built once per run and is read-only afterwards, so it can be
/// shared by reference across threads.
///
/// # Examples
///
/// ```
/// use u_mdvrp::distance::{DistanceMatrix, Leg};
///
/// let mut dm = DistanceMatrix::new(["depot", "c1"]).unwrap();
/// let c1 = dm.index_of("c1").unwrap();
/// dm.set(0, c1, Leg::new(12.0, 15.0));
/// assert_eq!(dm.distance(0, c1), 12.0);
/// assert_eq!(dm.leg("depot", "c1").unwrap().duration_min, 15.0);
/// assert_eq!(dm.distance(c1, c1), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    data: Vec<Leg>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a zero-filled matrix over the given point ids.
    ///
    /// # Errors
    ///
    /// [`DistanceError::DuplicatePoint`] if an id repeats.
    pub fn new<I, S>(ids: I) -> Result<Self, DistanceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(DistanceError::DuplicatePoint(id.clone()));
            }
        }
        let size = ids.len();
        Ok(Self {
            ids,
            index,
            data: vec![Leg::default(); size * size],
            size,
        })
    }

    /// Index assigned to `id`, if the matrix covers it.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Index assigned to `id`.
    ///
    /// # Errors
    ///
    /// [`DistanceError::UnknownPoint`] if the matrix does not cover `id`.
    pub fn require_index(&self, id: &str) -> Result<usize, DistanceError> {
        self.index_of(id)
            .ok_or_else(|| DistanceError::UnknownPoint(id.to_string()))
    }

    /// Point id at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn id(&self, index: usize) -> &str {
        &self.ids[index]
    }

    /// All point ids in index order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Leg from index `from` to index `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> Leg {
        self.data[from * self.size + to]
    }

    /// Distance in km from index `from` to index `to`.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.get(from, to).distance_km
    }

    /// Travel time in minutes from index `from` to index `to`.
    pub fn duration(&self, from: usize, to: usize) -> f64 {
        self.get(from, to).duration_min
    }

    /// Leg between two point ids.
    ///
    /// # Errors
    ///
    /// [`DistanceError::UnknownPoint`] if either id is not covered.
    pub fn leg(&self, from: &str, to: &str) -> Result<Leg, DistanceError> {
        Ok(self.get(self.require_index(from)?, self.require_index(to)?))
    }

    /// Sets the leg from index `from` to index `to`.
    pub fn set(&mut self, from: usize, to: usize, leg: Leg) {
        self.data[from * self.size + to] = leg;
    }

    /// Number of points in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if distances are symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.distance(i, j) - self.distance(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Total distance and travel time of `depot → stops… → depot`.
    ///
    /// An empty stop list yields a zero leg.
    pub fn round_trip(&self, depot: usize, stops: &[usize]) -> Leg {
        let Some((&first, rest)) = stops.split_first() else {
            return Leg::default();
        };
        let mut total = self.get(depot, first);
        let mut prev = first;
        for &next in rest {
            let leg = self.get(prev, next);
            total.distance_km += leg.distance_km;
            total.duration_min += leg.duration_min;
            prev = next;
        }
        let back = self.get(prev, depot);
        total.distance_km += back.distance_km;
        total.duration_min += back.duration_min;
        total
    }
}
