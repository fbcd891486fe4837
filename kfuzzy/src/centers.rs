use crate::error::{KFuzzyError, Result};
use crate::seeder::{FarthestPointSeeder, MostDistant};
use crate::vector::Vector;

/// Chooses the initial cluster centers for a clustering run.
///
/// Implementations must be safe for concurrent use.
/// Use [`CenterSeedAdapter`] for the default farthest-point strategy.
pub trait CenterSeeder: Send + Sync {
    /// Returns exactly `k` centers, each with the dimension of `vectors`.
    fn select_centers(&self, vectors: &[Vector], k: usize) -> Result<Vec<Vector>>;
}

/// [`CenterSeeder`] backed by an index selection strategy.
///
/// The selected vectors are copied, in selection order, so the caller's
/// input is never aliased by the engine's working centers.
pub struct CenterSeedAdapter {
    selector: Box<dyn MostDistant>,
}

impl CenterSeedAdapter {
    /// Creates an adapter over [`FarthestPointSeeder`].
    pub fn new() -> Self {
        Self::with_selector(Box::new(FarthestPointSeeder::new()))
    }

    pub fn with_selector(selector: Box<dyn MostDistant>) -> Self {
        Self { selector }
    }
}

impl Default for CenterSeedAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CenterSeeder for CenterSeedAdapter {
    fn select_centers(&self, vectors: &[Vector], k: usize) -> Result<Vec<Vector>> {
        let indexes = self.selector.find_most_distant(vectors, k)?;
        if indexes.len() != k {
            return Err(KFuzzyError::InvalidInput(format!(
                "selector returned {} indexes, want {k}",
                indexes.len()
            )));
        }
        indexes
            .into_iter()
            .map(|i| {
                vectors.get(i).cloned().ok_or_else(|| {
                    KFuzzyError::InvalidInput(format!(
                        "selector returned index {i} out of {}",
                        vectors.len()
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Picks the last `m` indices, newest first.
    struct LastFirst;

    impl MostDistant for LastFirst {
        fn find_most_distant(&self, vectors: &[Vector], m: usize) -> Result<Vec<usize>> {
            Ok((0..vectors.len()).rev().take(m).collect())
        }
    }

    /// Misbehaving selector that always returns a bogus index.
    struct OutOfRange;

    impl MostDistant for OutOfRange {
        fn find_most_distant(&self, vectors: &[Vector], m: usize) -> Result<Vec<usize>> {
            Ok(vec![vectors.len(); m])
        }
    }

    fn points() -> Vec<Vector> {
        vec![
            Vector::from([-1.0, 0.0]),
            Vector::from([1.0, 2.0]),
            Vector::from([4.0, 2.0]),
            Vector::from([-1.0, -1.0]),
        ]
    }

    #[test]
    fn default_adapter_materializes_farthest_points() {
        let adapter = CenterSeedAdapter::new();
        let centers = adapter.select_centers(&points(), 3).unwrap();
        assert_eq!(
            centers,
            vec![
                Vector::from([4.0, 2.0]),
                Vector::from([-1.0, -1.0]),
                Vector::from([1.0, 2.0]),
            ]
        );
    }

    #[test]
    fn zero_centers() {
        let adapter = CenterSeedAdapter::default();
        assert!(adapter.select_centers(&points(), 0).unwrap().is_empty());
        assert!(adapter.select_centers(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn custom_selector() {
        let adapter = CenterSeedAdapter::with_selector(Box::new(LastFirst));
        let centers = adapter.select_centers(&points(), 2).unwrap();
        assert_eq!(
            centers,
            vec![Vector::from([-1.0, -1.0]), Vector::from([4.0, 2.0])]
        );
    }

    #[test]
    fn propagates_selector_errors() {
        let adapter = CenterSeedAdapter::new();
        let err = adapter.select_centers(&points(), 5).unwrap_err();
        assert!(matches!(err, KFuzzyError::InvalidInput(_)), "got {err:?}");
    }

    #[test]
    fn rejects_bad_selector_output() {
        let adapter = CenterSeedAdapter::with_selector(Box::new(OutOfRange));
        let err = adapter.select_centers(&points(), 2).unwrap_err();
        assert!(err.is_invalid_input(), "got {err:?}");
    }

    #[test]
    fn rejects_short_selector_output() {
        let adapter = CenterSeedAdapter::with_selector(Box::new(LastFirst));
        // LastFirst cannot produce more indexes than vectors.
        let err = adapter.select_centers(&points(), 6).unwrap_err();
        assert!(matches!(err, KFuzzyError::InvalidInput(_)), "got {err:?}");
    }
}
