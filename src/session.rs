//! Session state: everything derived from the input tables once per process.
//!
//! The state is immutable after construction, so a single instance may be shared
//! between any number of concurrent readers without locking.

use std::io::Read;
use std::path::Path;

use crate::error::DataLoadError;
use crate::matrix::InteractionMatrix;
use crate::prelude::*;
use crate::ranker::{rank, select_neighbors, Neighbor, Recommendation};
use crate::similarity::SimilarityMatrix;
use crate::store::{self, FactTable, Rating, UserId};

/// Neighbour set size used unless overridden.
pub const DEFAULT_N_NEIGHBORS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Size of the neighbour set, independent of the requested recommendation count.
    pub n_neighbors: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            n_neighbors: DEFAULT_N_NEIGHBORS,
        }
    }
}

pub struct SessionState {
    options: SessionOptions,

    /// Raw facts grouped by user, kept apart from the zero-filled matrix
    /// so that an item rated with zero still counts as seen.
    ratings: AHashMap<UserId, Vec<Rating>>,

    matrix: InteractionMatrix,
    similarity: SimilarityMatrix,
}

impl SessionState {
    #[instrument(level = "info", skip_all, fields(n_neighbors = options.n_neighbors))]
    pub fn new(facts: FactTable, options: SessionOptions) -> Self {
        let matrix = InteractionMatrix::build(&facts);
        let similarity = SimilarityMatrix::compute(&matrix);
        let mut ratings = AHashMap::<UserId, Vec<Rating>>::default();
        for rating in facts.records() {
            ratings.entry(rating.user_id).or_default().push(rating.clone());
        }
        Self {
            options,
            ratings,
            matrix,
            similarity,
        }
    }

    pub fn load(
        items: impl Read,
        ratings: impl Read,
        options: SessionOptions,
    ) -> StdResult<Self, DataLoadError> {
        Ok(Self::new(store::load(items, ratings)?, options))
    }

    pub fn load_from_paths(
        items_path: impl AsRef<Path>,
        ratings_path: impl AsRef<Path>,
        options: SessionOptions,
    ) -> StdResult<Self, DataLoadError> {
        Ok(Self::new(store::load_from_paths(items_path, ratings_path)?, options))
    }

    #[must_use]
    pub const fn options(&self) -> SessionOptions {
        self.options
    }

    #[must_use]
    pub const fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    #[must_use]
    pub const fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// The user's own ratings, empty for an unknown user.
    #[must_use]
    pub fn ratings_of(&self, user_id: UserId) -> &[Rating] {
        self.ratings.get(&user_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Neighbour set of the user, `None` for an unknown user.
    #[must_use]
    pub fn neighbors(&self, user_id: UserId) -> Option<Vec<Neighbor>> {
        select_neighbors(&self.similarity, user_id, self.options.n_neighbors)
    }

    /// Recommends up to `top_n` items the user has not rated yet.
    ///
    /// `None` means the user is unknown, an empty list means there is nothing to recommend.
    #[instrument(level = "debug", skip(self))]
    #[must_use]
    pub fn recommend(&self, user_id: UserId, top_n: usize) -> Option<Vec<Recommendation>> {
        let neighbors = self.neighbors(user_id)?;
        debug!(n_neighbors = neighbors.len());
        let neighbor_ratings = neighbors
            .iter()
            .flat_map(|neighbor| self.ratings_of(neighbor.user_id));
        Some(rank(self.ratings_of(user_id), neighbor_ratings, top_n))
    }
}

/// Loads the tables and derives the session state.
pub fn initialize(
    items_path: impl AsRef<Path>,
    ratings_path: impl AsRef<Path>,
) -> StdResult<SessionState, DataLoadError> {
    SessionState::load_from_paths(items_path, ratings_path, SessionOptions::default())
}

/// See [`SessionState::recommend`].
#[must_use]
pub fn recommend(
    session: &SessionState,
    user_id: UserId,
    count: usize,
) -> Option<Vec<Recommendation>> {
    session.recommend(user_id, count)
}
