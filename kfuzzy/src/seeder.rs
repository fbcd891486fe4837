use crate::error::{KFuzzyError, Result};
use crate::vector::{check_dimensions, Vector};

/// Selects a subset of mutually distant vectors.
///
/// Implementations return exactly `m` distinct indices into `vectors`.
pub trait MostDistant: Send + Sync {
    fn find_most_distant(&self, vectors: &[Vector], m: usize) -> Result<Vec<usize>>;
}

/// Greedy farthest-point (k-center) selection.
///
/// Starts from the single farthest pair, then repeatedly adds the point
/// whose distance to the nearest already selected point is largest.
/// O(n²) distance evaluations; the result spreads at least half as wide
/// as the optimal subset.
///
/// Deterministic: the first farthest pair in index order wins, and ties
/// during the greedy phase go to the lowest index. Indices are returned
/// in selection order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FarthestPointSeeder;

impl FarthestPointSeeder {
    pub fn new() -> Self {
        Self
    }
}

impl MostDistant for FarthestPointSeeder {
    fn find_most_distant(&self, vectors: &[Vector], m: usize) -> Result<Vec<usize>> {
        let n = vectors.len();
        if m > n {
            return Err(KFuzzyError::InvalidInput(format!(
                "cannot select {m} vectors out of {n}"
            )));
        }
        check_dimensions(vectors)?;

        match m {
            0 => Ok(Vec::new()),
            1 => Ok(vec![0]),
            _ if m == n => Ok((0..n).collect()),
            _ => greedy_select(vectors, m),
        }
    }
}

/// General case, `2 <= m < n`.
fn greedy_select(vectors: &[Vector], m: usize) -> Result<Vec<usize>> {
    let n = vectors.len();
    let (u, v) = farthest_pair(vectors)?;

    let mut selected = Vec::with_capacity(m);
    let mut taken = vec![false; n];
    // Distance from each point to its nearest selected point.
    let mut min_dist = vec![f64::INFINITY; n];

    for p in [u, v] {
        selected.push(p);
        taken[p] = true;
    }
    relax(vectors, &taken, &mut min_dist, u)?;
    relax(vectors, &taken, &mut min_dist, v)?;

    while selected.len() < m {
        let mut best: Option<usize> = None;
        for i in 0..n {
            if taken[i] {
                continue;
            }
            match best {
                Some(b) if min_dist[i] <= min_dist[b] => {}
                _ => best = Some(i),
            }
        }
        // m < n guarantees an unselected point remains.
        let Some(next) = best else { break };

        selected.push(next);
        taken[next] = true;
        relax(vectors, &taken, &mut min_dist, next)?;
    }

    tracing::trace!(n, m, ?selected, "farthest-point selection");
    Ok(selected)
}

/// Returns the first pair `(i, j)`, `i < j`, with the greatest distance.
fn farthest_pair(vectors: &[Vector]) -> Result<(usize, usize)> {
    let n = vectors.len();
    let (mut u, mut v) = (0, 1);
    let mut best = f64::NEG_INFINITY;
    for i in 0..n {
        for j in (i + 1)..n {
            let d = vectors[i].distance(&vectors[j])?;
            if d > best {
                best = d;
                u = i;
                v = j;
            }
        }
    }
    Ok((u, v))
}

/// Lowers each unselected point's nearest-selected distance against `from`.
fn relax(vectors: &[Vector], taken: &[bool], min_dist: &mut [f64], from: usize) -> Result<()> {
    let anchor = &vectors[from];
    for (i, dist) in min_dist.iter_mut().enumerate() {
        if taken[i] {
            continue;
        }
        let d = vectors[i].distance(anchor)?;
        if d < *dist {
            *dist = d;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    fn four_points() -> Vec<Vector> {
        vec![
            Vector::from([-1.0, 0.0]),
            Vector::from([1.0, 2.0]),
            Vector::from([4.0, 2.0]),
            Vector::from([-1.0, -1.0]),
        ]
    }

    #[test]
    fn rejects_too_many() {
        let seeder = FarthestPointSeeder::new();
        assert!(matches!(
            seeder.find_most_distant(&[], 1),
            Err(KFuzzyError::InvalidInput(_))
        ));
        assert!(seeder.find_most_distant(&[], 2).is_err());

        let vectors = vec![Vector::zeros(3); 10];
        assert!(seeder.find_most_distant(&vectors, 11).is_err());
        assert!(seeder.find_most_distant(&vectors, 20).is_err());
    }

    #[test]
    fn rejects_mixed_dimensions() {
        let seeder = FarthestPointSeeder::new();
        let vectors = vec![Vector::zeros(1), Vector::zeros(2), Vector::zeros(3)];
        let err = seeder.find_most_distant(&vectors, 1).unwrap_err();
        assert!(err.is_invalid_input(), "unexpected error: {err}");

        let vectors = vec![
            Vector::zeros(2),
            Vector::zeros(2),
            Vector::zeros(2),
            Vector::zeros(3),
        ];
        assert_eq!(
            seeder.find_most_distant(&vectors, 3),
            Err(KFuzzyError::DimensionMismatch { expected: 2, got: 3 })
        );
    }

    #[test]
    fn zero_selects_nothing() {
        let seeder = FarthestPointSeeder::new();
        assert!(seeder.find_most_distant(&[], 0).unwrap().is_empty());
        let vectors = vec![Vector::zeros(4); 10];
        assert!(seeder.find_most_distant(&vectors, 0).unwrap().is_empty());
    }

    #[test]
    fn one_selects_first() {
        let seeder = FarthestPointSeeder::new();
        assert_eq!(seeder.find_most_distant(&[Vector::zeros(3)], 1).unwrap(), vec![0]);
        assert_eq!(seeder.find_most_distant(&four_points(), 1).unwrap(), vec![0]);
    }

    #[test]
    fn two_of_two_and_farthest_pair() {
        let seeder = FarthestPointSeeder::new();
        let vectors = vec![Vector::zeros(3); 2];
        assert_eq!(seeder.find_most_distant(&vectors, 2).unwrap(), vec![0, 1]);

        let vectors = vec![
            Vector::from([0.0, 0.0, 0.0]),
            Vector::from([0.0, 3.0, 0.0]),
            Vector::from([0.0, 0.0, 4.0]),
        ];
        assert_eq!(seeder.find_most_distant(&vectors, 2).unwrap(), vec![1, 2]);
    }

    #[test]
    fn all_equal_returns_ascending() {
        let seeder = FarthestPointSeeder::new();
        let vectors = vec![Vector::zeros(2); 4];
        assert_eq!(seeder.find_most_distant(&vectors, 4).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn four_points_progression() {
        let seeder = FarthestPointSeeder::new();
        let vectors = four_points();

        assert_eq!(sorted(seeder.find_most_distant(&vectors, 2).unwrap()), vec![2, 3]);
        assert_eq!(seeder.find_most_distant(&vectors, 3).unwrap(), vec![2, 3, 1]);
        assert_eq!(
            sorted(seeder.find_most_distant(&vectors, 4).unwrap()),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn all_equal_partial_prefers_lowest_index() {
        let seeder = FarthestPointSeeder::new();
        let vectors = vec![Vector::from([1.0, 1.0]); 5];
        // Every distance is zero: the first pair wins, then lowest indices.
        assert_eq!(seeder.find_most_distant(&vectors, 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn greedy_relaxes_against_new_points() {
        let seeder = FarthestPointSeeder::new();
        // Extremes at 0 and 10 on a line. After picking 5.0, the point at
        // 4.9 is close to a selected point and 2.0 / 8.0 become the best.
        let vectors: Vec<Vector> = [0.0, 10.0, 5.0, 4.9, 2.0, 8.0]
            .iter()
            .map(|&x| Vector::from([x]))
            .collect();
        let picked = seeder.find_most_distant(&vectors, 4).unwrap();
        assert_eq!(&picked[..3], &[0, 1, 2]);
        // 2.0 and 8.0 are both 2 away from the selection: lowest index wins.
        assert_eq!(picked[3], 4);
    }

    #[test]
    fn indices_are_distinct() {
        let seeder = FarthestPointSeeder::new();
        let vectors: Vec<Vector> = (0..12)
            .map(|i| Vector::from([(i % 4) as f64, (i / 4) as f64]))
            .collect();
        for m in 0..=vectors.len() {
            let picked = seeder.find_most_distant(&vectors, m).unwrap();
            assert_eq!(picked.len(), m);
            let mut uniq = picked.clone();
            uniq.sort_unstable();
            uniq.dedup();
            assert_eq!(uniq.len(), m, "duplicate index in {picked:?}");
        }
    }
}
