//! Pivots the fact table into a dense user × item interaction matrix.

use std::sync::Arc;

use itertools::Itertools;

use crate::helpers::average::Average;
use crate::prelude::*;
use crate::store::{FactTable, UserId};

/// Dense user × item ratings, zero standing in for «not rated».
///
/// Rows are sorted by user ID, columns by item title.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    user_ids: Vec<UserId>,
    item_titles: Vec<Arc<str>>,

    /// Row-major cells, `item_titles.len()` per user.
    cells: Vec<f64>,
}

impl InteractionMatrix {
    /// Builds the matrix. Repeated ratings of the same item by the same user
    /// are averaged into the single cell.
    #[instrument(level = "info", skip_all, fields(n_ratings = facts.len()))]
    pub fn build(facts: &FactTable) -> Self {
        let user_ids = facts
            .records()
            .iter()
            .map(|fact| fact.user_id)
            .sorted_unstable()
            .dedup()
            .collect_vec();
        let item_titles = facts
            .records()
            .iter()
            .map(|fact| &fact.title)
            .sorted_unstable()
            .dedup()
            .cloned()
            .collect_vec();

        let mut averages = AHashMap::<(usize, usize), Average>::default();
        for fact in facts.records() {
            if let (Ok(row), Ok(column)) = (
                user_ids.binary_search(&fact.user_id),
                item_titles.binary_search(&fact.title),
            ) {
                averages.entry((row, column)).or_default().push(fact.rating);
            }
        }

        let n_items = item_titles.len();
        let mut cells = vec![0.0; user_ids.len() * n_items];
        for ((row, column), average) in averages {
            cells[row * n_items + column] = average.average().unwrap_or_default();
        }

        info!(n_users = user_ids.len(), n_items, "built");
        Self {
            user_ids,
            item_titles,
            cells,
        }
    }

    #[must_use]
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    #[must_use]
    pub fn item_titles(&self) -> &[Arc<str>] {
        &self.item_titles
    }

    #[must_use]
    pub fn n_users(&self) -> usize {
        self.user_ids.len()
    }

    #[must_use]
    pub fn n_items(&self) -> usize {
        self.item_titles.len()
    }

    /// Row position of the user.
    #[must_use]
    pub fn position(&self, user_id: UserId) -> Option<usize> {
        self.user_ids.binary_search(&user_id).ok()
    }

    /// Iterates over the rows in the user order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // `max(1)` keeps `chunks_exact` from panicking on a matrix without items.
        self.cells.chunks_exact(self.n_items().max(1)).take(self.n_users())
    }

    #[must_use]
    pub fn row(&self, user_id: UserId) -> Option<&[f64]> {
        let n_items = self.n_items();
        self.position(user_id)
            .map(|row| &self.cells[row * n_items..(row + 1) * n_items])
    }

    #[must_use]
    pub fn get(&self, user_id: UserId, title: &str) -> Option<f64> {
        let column = self
            .item_titles
            .binary_search_by(|item_title| (**item_title).cmp(title))
            .ok()?;
        self.row(user_id).map(|row| row[column])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Rating;

    #[test]
    fn build_ok() {
        let facts = FactTable::from_iter([
            Rating::new(2, "Heat", 3.0),
            Rating::new(1, "Jumanji", 4.0),
            Rating::new(1, "Heat", 5.0),
        ]);
        let matrix = InteractionMatrix::build(&facts);
        assert_eq!(matrix.user_ids(), &[1, 2]);
        assert_eq!(
            matrix.item_titles().iter().map(|title| &**title).collect_vec(),
            vec!["Heat", "Jumanji"],
        );
        assert_eq!(matrix.row(1), Some([5.0, 4.0].as_slice()));
        assert_eq!(matrix.row(2), Some([3.0, 0.0].as_slice()));
        assert_eq!(matrix.row(3), None);
        assert_eq!(matrix.rows().count(), 2);
    }

    #[test]
    fn duplicate_ratings_averaged_ok() {
        let facts = FactTable::from_iter([
            Rating::new(1, "Heat", 2.0),
            Rating::new(1, "Heat", 5.0),
        ]);
        let matrix = InteractionMatrix::build(&facts);
        assert_eq!(matrix.get(1, "Heat"), Some(3.5));
    }

    #[test]
    fn empty_ok() {
        let matrix = InteractionMatrix::build(&FactTable::default());
        assert_eq!(matrix.n_users(), 0);
        assert_eq!(matrix.n_items(), 0);
        assert_eq!(matrix.rows().count(), 0);
    }
}
