//! Recommendation ranker: the target user's nearest neighbours
//! vote for the items the target user has not rated yet.

use itertools::Itertools;
use serde::Serialize;

use crate::helpers::average::Average;
use crate::prelude::*;
use crate::similarity::SimilarityMatrix;
use crate::store::{Rating, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub user_id: UserId,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,

    /// Mean rating among the neighbours who rated the item.
    pub score: f64,
}

/// Selects up to `n_neighbors` other users most similar to the target user.
///
/// Ordered by similarity descending, then by user ID. Users with non-positive
/// similarity share nothing with the target user and are never neighbours.
/// Returns `None` for an unknown user.
#[must_use]
pub fn select_neighbors(
    similarity: &SimilarityMatrix,
    user_id: UserId,
    n_neighbors: usize,
) -> Option<Vec<Neighbor>> {
    let similarities = similarity.similarities(user_id)?;
    let neighbors = similarity
        .user_ids()
        .iter()
        .zip(similarities)
        .filter(|(other_id, similarity)| **other_id != user_id && **similarity > 0.0)
        .map(|(other_id, similarity)| Neighbor {
            user_id: *other_id,
            similarity: *similarity,
        })
        .sorted_unstable_by(|lhs, rhs| {
            rhs.similarity
                .total_cmp(&lhs.similarity)
                .then(lhs.user_id.cmp(&rhs.user_id))
        })
        .take(n_neighbors)
        .collect();
    Some(neighbors)
}

/// Ranks the items rated by the neighbours and not by the target user.
///
/// `seen` are the target user's own ratings, `neighbor_ratings` are all the neighbours' ratings.
/// Items are scored by their mean rating and ordered by the score descending,
/// then by title ascending.
#[must_use]
pub fn rank<'a>(
    seen: &[Rating],
    neighbor_ratings: impl IntoIterator<Item = &'a Rating>,
    top_n: usize,
) -> Vec<Recommendation> {
    if top_n == 0 {
        return Vec::new();
    }

    let seen = seen
        .iter()
        .map(|rating| &*rating.title)
        .collect::<AHashSet<_>>();
    let mut averages = AHashMap::<&str, Average>::default();
    for rating in neighbor_ratings {
        if !seen.contains(&*rating.title) {
            averages.entry(&*rating.title).or_default().push(rating.rating);
        }
    }

    averages
        .into_iter()
        .filter_map(|(title, average)| {
            average.average().map(|score| Recommendation {
                title: title.to_owned(),
                score,
            })
        })
        .sorted_unstable_by(|lhs, rhs| {
            rhs.score
                .total_cmp(&lhs.score)
                .then_with(|| lhs.title.cmp(&rhs.title))
        })
        .take(top_n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::InteractionMatrix;
    use crate::store::FactTable;

    #[test]
    fn select_neighbors_ok() -> Result {
        let facts = FactTable::from_iter([
            Rating::new(1, "A", 5.0),
            Rating::new(2, "A", 4.0),
            Rating::new(2, "B", 5.0),
            Rating::new(3, "A", 5.0),
            Rating::new(4, "B", 5.0),
        ]);
        let similarity = SimilarityMatrix::compute(&InteractionMatrix::build(&facts));

        let neighbors = select_neighbors(&similarity, 1, 5).ok_or_else(|| anyhow!("not found"))?;
        assert_eq!(neighbors.iter().map(|neighbor| neighbor.user_id).collect_vec(), vec![3, 2]);

        let neighbors = select_neighbors(&similarity, 1, 1).ok_or_else(|| anyhow!("not found"))?;
        assert_eq!(neighbors.iter().map(|neighbor| neighbor.user_id).collect_vec(), vec![3]);

        assert_eq!(select_neighbors(&similarity, 42, 5), None);
        Ok(())
    }

    #[test]
    fn rank_ok() {
        let seen = [Rating::new(1, "A", 5.0)];
        let neighbor_ratings = [
            Rating::new(2, "A", 4.0),
            Rating::new(2, "B", 5.0),
            Rating::new(3, "B", 4.0),
            Rating::new(3, "C", 3.0),
            Rating::new(3, "D", 4.5),
        ];
        let recommendations = rank(&seen, &neighbor_ratings, 5);
        assert_eq!(
            recommendations,
            vec![
                Recommendation {
                    title: "B".to_owned(),
                    score: 4.5,
                },
                Recommendation {
                    title: "D".to_owned(),
                    score: 4.5,
                },
                Recommendation {
                    title: "C".to_owned(),
                    score: 3.0,
                },
            ],
        );
    }

    #[test]
    fn rank_truncated_ok() {
        let neighbor_ratings = [
            Rating::new(2, "A", 1.0),
            Rating::new(2, "B", 2.0),
            Rating::new(2, "C", 3.0),
        ];
        let titles = rank(&[], &neighbor_ratings, 2)
            .into_iter()
            .map(|recommendation| recommendation.title)
            .collect_vec();
        assert_eq!(titles, vec!["C", "B"]);
    }

    #[test]
    fn rank_zero_top_n_ok() {
        assert!(rank(&[], &[Rating::new(2, "A", 1.0)], 0).is_empty());
    }

    #[test]
    fn zero_rated_item_is_seen_ok() {
        let seen = [Rating::new(1, "A", 0.0)];
        assert!(rank(&seen, &[Rating::new(2, "A", 5.0)], 5).is_empty());
    }
}
