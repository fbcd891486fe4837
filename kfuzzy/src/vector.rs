use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{KFuzzyError, Result};
use crate::numeric::approx_zero;

/// A point in n-dimensional Euclidean space.
///
/// Vectors are immutable: arithmetic returns a new vector and never
/// touches its operands. The dimension is fixed at construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    components: Vec<f64>,
}

impl Vector {
    pub fn new(components: Vec<f64>) -> Self {
        Self { components }
    }

    /// Returns the zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            components: vec![0.0; dim],
        }
    }

    /// Number of components.
    pub fn dim(&self) -> usize {
        self.components.len()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.components.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.components
    }

    pub fn is_finite(&self) -> bool {
        self.components.iter().all(|c| c.is_finite())
    }

    /// Component-wise sum. Both vectors must have the same dimension.
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Component-wise difference `self - other`.
    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Multiplies every component by `s`.
    pub fn scale(&self, s: f64) -> Vector {
        Vector {
            components: self.components.iter().map(|&c| c * s).collect(),
        }
    }

    /// Euclidean norm.
    ///
    /// Components are divided by the largest absolute component before
    /// squaring so that very large or very small values neither overflow
    /// nor underflow. A vector whose largest component is within epsilon
    /// of zero has magnitude 0.
    pub fn magnitude(&self) -> f64 {
        let mut largest = 0.0f64;
        for &c in &self.components {
            let a = c.abs();
            if largest < a {
                largest = a;
            }
        }
        if approx_zero(largest) {
            return 0.0;
        }

        let mut sum = 0.0f64;
        for &c in &self.components {
            let t = c / largest;
            sum += t * t;
        }
        largest * sum.sqrt()
    }

    /// Euclidean distance between `self` and `other`.
    pub fn distance(&self, other: &Vector) -> Result<f64> {
        Ok(self.sub(other)?.magnitude())
    }

    fn zip_with(&self, other: &Vector, f: impl Fn(f64, f64) -> f64) -> Result<Vector> {
        if self.dim() != other.dim() {
            return Err(KFuzzyError::DimensionMismatch {
                expected: self.dim(),
                got: other.dim(),
            });
        }
        let components = self
            .components
            .iter()
            .zip(&other.components)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Vector { components })
    }
}

/// Verifies that all vectors share the dimension of the first one.
/// Returns that dimension, or `None` for an empty slice.
pub fn check_dimensions(vectors: &[Vector]) -> Result<Option<usize>> {
    let Some(first) = vectors.first() else {
        return Ok(None);
    };
    let dim = first.dim();
    for v in &vectors[1..] {
        if v.dim() != dim {
            return Err(KFuzzyError::DimensionMismatch {
                expected: dim,
                got: v.dim(),
            });
        }
    }
    Ok(Some(dim))
}

impl From<Vec<f64>> for Vector {
    fn from(components: Vec<f64>) -> Self {
        Self::new(components)
    }
}

impl From<&[f64]> for Vector {
    fn from(components: &[f64]) -> Self {
        Self::new(components.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(components: [f64; N]) -> Self {
        Self::new(components.to_vec())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.components[index]
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
