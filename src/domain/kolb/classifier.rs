//! Kolb learning-style classifier.
//!
//! Column sums of the answer matrix give four accumulators:
//!
//! | Column | Accumulator | Mode                         |
//! |--------|-------------|------------------------------|
//! | 0      | `ec`        | Concrete Experience          |
//! | 1      | `or`        | Reflective Observation       |
//! | 2      | `ca`        | Abstract Conceptualization   |
//! | 3      | `ea`        | Active Experimentation       |
//!
//! Each profile is scored by the Euclidean norm of its two axes and the
//! largest norm wins. Ties are broken uniformly at random.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{AnswerMatrix, LearningProfile};

/// Accumulators and per-profile distances for one matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KolbScores {
    pub ec: u32,
    pub or: u32,
    pub ca: u32,
    pub ea: u32,
    pub divergent: f64,
    pub assimilator: f64,
    pub accommodator: f64,
    pub convergent: f64,
}

impl KolbScores {
    pub fn from_matrix(matrix: &AnswerMatrix) -> Self {
        let ec = matrix.column_sum(0);
        let or = matrix.column_sum(1);
        let ca = matrix.column_sum(2);
        let ea = matrix.column_sum(3);

        Self {
            ec,
            or,
            ca,
            ea,
            divergent: norm(or, ec),
            assimilator: norm(or, ca),
            accommodator: norm(ea, ec),
            convergent: norm(ea, ca),
        }
    }

    pub fn distance(&self, profile: LearningProfile) -> f64 {
        match profile {
            LearningProfile::Divergent => self.divergent,
            LearningProfile::Assimilator => self.assimilator,
            LearningProfile::Accommodator => self.accommodator,
            LearningProfile::Convergent => self.convergent,
        }
    }

    /// Profiles sharing the maximum distance, in declaration order.
    pub fn leaders(&self) -> Vec<LearningProfile> {
        let max = LearningProfile::ALL
            .iter()
            .map(|p| self.distance(*p))
            .fold(f64::MIN, f64::max);

        LearningProfile::ALL
            .into_iter()
            .filter(|p| self.distance(*p) == max)
            .collect()
    }
}

fn norm(a: u32, b: u32) -> f64 {
    let (a, b) = (a as f64, b as f64);
    (a * a + b * b).sqrt()
}

/// Classifies a matrix using the thread-local random source for ties.
pub fn classify(matrix: &AnswerMatrix) -> LearningProfile {
    classify_with(matrix, &mut rand::thread_rng())
}

/// Classifies a matrix, drawing tie-breaks from `rng`.
pub fn classify_with<R: Rng + ?Sized>(matrix: &AnswerMatrix, rng: &mut R) -> LearningProfile {
    let leaders = KolbScores::from_matrix(matrix).leaders();
    // The leader set is never empty: the max is taken over the same four values.
    *leaders.choose(rng).unwrap_or(&LearningProfile::Divergent)
}
