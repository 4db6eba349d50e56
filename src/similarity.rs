//! Pairwise cosine similarity between the users.
//!
//! The matrix is `N · Nᵗ`, where `N` is the interaction matrix with every row
//! scaled by `1 / (‖row‖ + ε)`. This takes `O(U² · I)` time and `O(U²)` memory,
//! which is the scalability ceiling of the whole pipeline.

use itertools::Itertools;

use crate::helpers::tracing::format_elapsed;
use crate::math::vector::{dot, normalize};
use crate::matrix::InteractionMatrix;
use crate::prelude::*;
use crate::store::UserId;

/// Symmetric user × user similarity matrix.
///
/// A user with at least one non-zero rating is similar to themselves with `≈ 1`.
/// An all-zero user is similar to nobody with `0`, including the diagonal.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    user_ids: Vec<UserId>,

    /// Row-major, `user_ids.len()` per user.
    values: Vec<f64>,
}

impl SimilarityMatrix {
    #[instrument(
        level = "info",
        skip_all,
        fields(n_users = matrix.n_users(), n_items = matrix.n_items()),
    )]
    pub fn compute(matrix: &InteractionMatrix) -> Self {
        let start_instant = Instant::now();
        let normalized = matrix.rows().map(normalize).collect_vec();

        let n_users = normalized.len();
        let mut values = vec![0.0; n_users * n_users];
        for (i, lhs) in normalized.iter().enumerate() {
            for (j, rhs) in normalized.iter().enumerate().skip(i) {
                let similarity = dot(lhs, rhs);
                values[i * n_users + j] = similarity;
                values[j * n_users + i] = similarity;
            }
        }

        info!(elapsed = format_elapsed(start_instant).as_str(), "computed");
        Self {
            user_ids: matrix.user_ids().to_vec(),
            values,
        }
    }

    #[must_use]
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    #[must_use]
    pub fn n_users(&self) -> usize {
        self.user_ids.len()
    }

    #[must_use]
    pub fn contains(&self, user_id: UserId) -> bool {
        self.position(user_id).is_some()
    }

    #[must_use]
    pub fn position(&self, user_id: UserId) -> Option<usize> {
        self.user_ids.binary_search(&user_id).ok()
    }

    /// Similarities of the user to every user, in the [`Self::user_ids`] order.
    #[must_use]
    pub fn similarities(&self, user_id: UserId) -> Option<&[f64]> {
        let n_users = self.n_users();
        self.position(user_id)
            .map(|row| &self.values[row * n_users..(row + 1) * n_users])
    }

    #[must_use]
    pub fn get(&self, lhs: UserId, rhs: UserId) -> Option<f64> {
        let column = self.position(rhs)?;
        self.similarities(lhs).map(|row| row[column])
    }
}
