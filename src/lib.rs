//! User-based collaborative filtering.
//!
//! The ratings table is pivoted into a dense user × item matrix,
//! users are compared by cosine similarity, and the items rated by
//! the most similar users are recommended by their mean rating.

pub mod error;
pub mod helpers;
pub mod math;
pub mod matrix;
pub mod prelude;
pub mod ranker;
pub mod session;
pub mod similarity;
pub mod store;

pub use crate::error::DataLoadError;
pub use crate::ranker::{Neighbor, Recommendation};
pub use crate::session::{initialize, recommend, SessionOptions, SessionState};
