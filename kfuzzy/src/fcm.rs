use std::fmt;

use serde::{Deserialize, Serialize};

use crate::centers::{CenterSeedAdapter, CenterSeeder};
use crate::error::{KFuzzyError, Result};
use crate::numeric::{approx_eq, approx_zero};
use crate::vector::{check_dimensions, Vector};

/// Raw weight given to a cluster whose center coincides with the point.
/// Large but finite, so the point ends up with near-total membership.
const ZERO_DISTANCE_WEIGHT: f64 = f64::MAX;

/// Controls a clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Fuzziness exponent. Must be finite and greater than 1.
    /// Values close to 1 approach hard clustering; larger values blur
    /// memberships. Default: 2.0.
    pub blending: f64,

    /// Number of center/membership refinement rounds. Always run in full.
    /// Default: 10000.
    pub max_iterations: usize,
}

impl Options {
    pub const DEFAULT_BLENDING: f64 = 2.0;
    pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

    pub fn new(blending: f64, max_iterations: usize) -> Self {
        Self {
            blending,
            max_iterations,
        }
    }

    /// Checks that the memberships formula is defined for these options.
    pub fn validate(&self) -> Result<()> {
        let b = self.blending;
        if !b.is_finite() {
            return Err(KFuzzyError::InvalidConfiguration(format!(
                "blending must be finite, got {b}"
            )));
        }
        if approx_eq(b, 1.0) {
            return Err(KFuzzyError::InvalidConfiguration(
                "blending must not equal 1".into(),
            ));
        }
        if b < 1.0 {
            return Err(KFuzzyError::InvalidConfiguration(format!(
                "blending must be greater than 1, got {b}"
            )));
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BLENDING, Self::DEFAULT_MAX_ITERATIONS)
    }
}

/// Row-major `n × k` table of membership probabilities.
pub(crate) struct MembershipMatrix {
    clusters: usize,
    data: Vec<f64>,
}

impl MembershipMatrix {
    fn new(objects: usize, clusters: usize) -> Self {
        Self {
            clusters,
            data: vec![0.0; objects * clusters],
        }
    }

    pub(crate) fn objects(&self) -> usize {
        self.data.len() / self.clusters
    }

    pub(crate) fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.clusters..(i + 1) * self.clusters]
    }

    fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, f64> {
        self.data.chunks_exact_mut(self.clusters)
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.clusters + j]
    }

    /// Index of the most probable cluster for every object.
    /// Ties go to the lowest cluster index.
    pub(crate) fn assignment(&self) -> Vec<usize> {
        (0..self.objects())
            .map(|i| {
                let row = self.row(i);
                let mut best = 0;
                for (j, &p) in row.iter().enumerate() {
                    if p > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect()
    }
}

impl fmt::Debug for MembershipMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MembershipMatrix")
            .field("objects", &self.objects())
            .field("clusters", &self.clusters)
            .finish()
    }
}

/// Fuzzy c-means clustering.
///
/// Initial centers come from a [`CenterSeeder`] (farthest-point seeding by
/// default). Each round recomputes every center as the membership-weighted
/// centroid of all vectors and then recomputes the memberships. The number
/// of rounds is fixed by [`Options::max_iterations`]; there is no
/// convergence test, so the same input always does the same work and
/// produces the same result.
///
/// Holds no per-run state: one engine can serve concurrent calls.
pub struct FuzzyCMeans {
    seeder: Box<dyn CenterSeeder>,
}

impl FuzzyCMeans {
    /// Creates an engine seeded by [`CenterSeedAdapter`].
    pub fn new() -> Self {
        Self::with_seeder(Box::new(CenterSeedAdapter::new()))
    }

    pub fn with_seeder(seeder: Box<dyn CenterSeeder>) -> Self {
        Self { seeder }
    }

    /// Splits `vectors` into at most `k` fuzzy clusters and returns the
    /// most probable cluster of each vector, in input order.
    ///
    /// Empty input yields an empty assignment before the options are
    /// looked at. Otherwise `k` is clamped to the number of vectors and
    /// `k == 0` yields an empty assignment. All validation happens before
    /// any computation.
    pub fn clusterize(&self, vectors: &[Vector], k: usize, options: &Options) -> Result<Vec<usize>> {
        Ok(self
            .memberships(vectors, k, options)?
            .map(|m| m.assignment())
            .unwrap_or_default())
    }

    /// Runs the full refinement and returns the final membership matrix,
    /// or `None` when there is nothing to cluster.
    pub(crate) fn memberships(
        &self,
        vectors: &[Vector],
        k: usize,
        options: &Options,
    ) -> Result<Option<MembershipMatrix>> {
        if vectors.is_empty() {
            return Ok(None);
        }
        options.validate()?;
        let dim = check_dimensions(vectors)?.unwrap_or_default();
        if let Some(i) = vectors.iter().position(|v| !v.is_finite()) {
            return Err(KFuzzyError::InvalidInput(format!(
                "vector {i} has a non-finite component"
            )));
        }
        let n = vectors.len();
        let k = k.min(n);
        if k == 0 {
            return Ok(None);
        }

        tracing::debug!(
            objects = n,
            clusters = k,
            dim,
            blending = options.blending,
            max_iterations = options.max_iterations,
            "fuzzy c-means start"
        );

        let mut centers = self.seeder.select_centers(vectors, k)?;
        if centers.len() != k {
            return Err(KFuzzyError::InvalidInput(format!(
                "seeder returned {} centers, want {k}",
                centers.len()
            )));
        }
        if let Some(c) = centers.iter().find(|c| c.dim() != dim) {
            return Err(KFuzzyError::DimensionMismatch {
                expected: dim,
                got: c.dim(),
            });
        }

        let mut memberships = MembershipMatrix::new(n, k);
        update_memberships(vectors, &centers, options.blending, &mut memberships)?;

        for iteration in 0..options.max_iterations {
            update_centers(vectors, &memberships, options.blending, &mut centers)?;
            update_memberships(vectors, &centers, options.blending, &mut memberships)?;
            tracing::trace!(iteration, "fuzzy c-means round");
        }

        tracing::debug!(objects = n, clusters = k, "fuzzy c-means done");
        Ok(Some(memberships))
    }
}

impl Default for FuzzyCMeans {
    fn default() -> Self {
        Self::new()
    }
}

/// Recomputes every row of `memberships` against `centers`.
fn update_memberships(
    vectors: &[Vector],
    centers: &[Vector],
    blending: f64,
    memberships: &mut MembershipMatrix,
) -> Result<()> {
    let power = 1.0 / (blending - 1.0);
    for (x, row) in vectors.iter().zip(memberships.rows_mut()) {
        for (c, w) in centers.iter().zip(row.iter_mut()) {
            let d = x.distance(c)?;
            *w = if approx_zero(d) {
                ZERO_DISTANCE_WEIGHT
            } else {
                (1.0 / d).powf(power).min(ZERO_DISTANCE_WEIGHT)
            };
        }
        normalize(row);
    }
    Ok(())
}

/// Scales raw weights so they sum to 1: `p_j = raw_j / Σ raw`.
///
/// When the plain sum overflows (several sentinel weights in one row) the
/// weights are first divided by the largest one. A row whose weights all
/// underflowed to zero becomes uniform.
fn normalize(row: &mut [f64]) {
    let total: f64 = row.iter().sum();
    if total.is_finite() && total > 0.0 {
        for w in row.iter_mut() {
            *w /= total;
        }
        return;
    }

    let largest = row.iter().copied().fold(0.0f64, f64::max);
    if largest == 0.0 {
        let p = 1.0 / row.len() as f64;
        row.fill(p);
        return;
    }
    let mut total = 0.0;
    for w in row.iter_mut() {
        *w /= largest;
        total += *w;
    }
    for w in row.iter_mut() {
        *w /= total;
    }
}

/// Moves each center to the membership-weighted centroid of `vectors`.
///
/// A cluster whose total weight is zero keeps its previous center.
fn update_centers(
    vectors: &[Vector],
    memberships: &MembershipMatrix,
    blending: f64,
    centers: &mut [Vector],
) -> Result<()> {
    let mut weights = vec![0.0f64; vectors.len()];
    let mut acc = Vec::new();
    for (j, center) in centers.iter_mut().enumerate() {
        for (i, w) in weights.iter_mut().enumerate() {
            *w = memberships.get(i, j).powf(blending);
        }
        let norm: f64 = weights.iter().sum();
        if norm == 0.0 {
            continue;
        }

        acc.clear();
        acc.resize(center.dim(), 0.0);
        for (x, &w) in vectors.iter().zip(&weights) {
            if x.dim() != acc.len() {
                return Err(KFuzzyError::DimensionMismatch {
                    expected: acc.len(),
                    got: x.dim(),
                });
            }
            let weight = w / norm;
            for (a, &c) in acc.iter_mut().zip(x.as_slice()) {
                *a += c * weight;
            }
        }
        *center = Vector::new(acc.clone());
    }
    Ok(())
}
