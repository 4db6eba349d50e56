//! Rating store: loads the item metadata and ratings tables
//! and joins them into a single denormalised fact table.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{DataLoadError, Table};
use crate::prelude::*;

pub type UserId = i64;
pub type ItemId = i64;

/// Single `(user, item title, rating)` fact.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub user_id: UserId,
    pub title: Arc<str>,
    pub rating: f64,
}

impl Rating {
    pub fn new(user_id: UserId, title: impl Into<Arc<str>>, rating: f64) -> Self {
        Self {
            user_id,
            title: title.into(),
            rating,
        }
    }
}

/// Ratings joined with the item titles, in input order.
#[derive(Debug, Default, Clone)]
pub struct FactTable(Vec<Rating>);

impl FactTable {
    #[must_use]
    pub fn records(&self) -> &[Rating] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Rating> for FactTable {
    fn from_iter<T: IntoIterator<Item = Rating>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Deserialize)]
struct ItemRow {
    #[serde(rename = "movieId")]
    item_id: ItemId,

    title: String,
}

#[derive(Deserialize)]
struct RatingRow {
    #[serde(rename = "userId")]
    user_id: UserId,

    #[serde(rename = "movieId")]
    item_id: ItemId,

    rating: f64,
}

const ITEM_COLUMNS: &[&str] = &["movieId", "title"];
const RATING_COLUMNS: &[&str] = &["userId", "movieId", "rating"];

/// Opens both tables from the filesystem and joins them.
pub fn load_from_paths(
    items_path: impl AsRef<Path>,
    ratings_path: impl AsRef<Path>,
) -> StdResult<FactTable, DataLoadError> {
    let open = |table, path: &Path| {
        File::open(path).map_err(|error| DataLoadError::Open {
            table,
            path: path.to_path_buf(),
            source: error.into(),
        })
    };
    let items = open(Table::Items, items_path.as_ref())?;
    let ratings = open(Table::Ratings, ratings_path.as_ref())?;
    load(items, ratings)
}

/// Joins the ratings to the item metadata on the item identifier.
///
/// Inner join: ratings of unknown items are dropped.
#[instrument(level = "info", skip_all)]
pub fn load(items: impl Read, ratings: impl Read) -> StdResult<FactTable, DataLoadError> {
    let mut titles = AHashMap::<ItemId, Arc<str>>::default();
    read_table(items, Table::Items, ITEM_COLUMNS, |_, row: ItemRow| {
        if titles.insert(row.item_id, row.title.into()).is_some() {
            return Err(DataLoadError::DuplicateItem {
                item_id: row.item_id,
            });
        }
        Ok(())
    })?;
    debug!(n_items = titles.len(), "items loaded");

    let mut facts = Vec::new();
    let mut n_dropped = 0_usize;
    read_table(ratings, Table::Ratings, RATING_COLUMNS, |line, row: RatingRow| {
        if !row.rating.is_finite() {
            return Err(DataLoadError::InvalidRating {
                line,
                rating: row.rating,
            });
        }
        match titles.get(&row.item_id) {
            Some(title) => facts.push(Rating {
                user_id: row.user_id,
                title: title.clone(),
                rating: row.rating,
            }),
            None => n_dropped += 1,
        }
        Ok(())
    })?;
    if n_dropped != 0 {
        debug!(n_dropped, "ratings of unknown items dropped");
    }

    info!(n_items = titles.len(), n_ratings = facts.len(), "loaded");
    Ok(FactTable(facts))
}

/// Reads the CSV table, checking the required header columns first
/// and passing every deserialised row along with its line number.
fn read_table<T, F>(
    input: impl Read,
    table: Table,
    required_columns: &[&'static str],
    mut on_row: F,
) -> StdResult<(), DataLoadError>
where
    T: DeserializeOwned,
    F: FnMut(u64, T) -> StdResult<(), DataLoadError>,
{
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_reader(input);
    let headers = reader
        .headers()
        .map_err(|source| DataLoadError::Header { table, source })?
        .clone();
    if let Some(column) = required_columns
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(DataLoadError::MissingColumn { table, column });
    }

    let mut record = StringRecord::new();
    loop {
        let has_record = reader.read_record(&mut record).map_err(|source| {
            let line = source.position().map_or(0, |position| position.line());
            DataLoadError::Malformed {
                table,
                line,
                source,
            }
        })?;
        if !has_record {
            break;
        }
        let line = record.position().map_or(0, |position| position.line());
        let row = record
            .deserialize(Some(&headers))
            .map_err(|source| DataLoadError::Malformed {
                table,
                line,
                source,
            })?;
        on_row(line, row)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const ITEMS: &str = "movieId,title,genres\n\
        1,Toy Story (1995),Adventure|Animation\n\
        2,Jumanji (1995),Adventure|Children\n\
        3,Heat (1995),Action|Crime\n";

    pub const RATINGS: &str = "userId,movieId,rating,timestamp\n\
        1,1,4.0,964982703\n\
        1,3,4.0,964981247\n\
        2,2,3.5,964982224\n\
        2,42,5.0,964983815\n";

    #[test]
    fn load_ok() -> Result {
        let facts = load(ITEMS.as_bytes(), RATINGS.as_bytes())?;
        assert_eq!(
            facts.records(),
            &[
                Rating::new(1, "Toy Story (1995)", 4.0),
                Rating::new(1, "Heat (1995)", 4.0),
                Rating::new(2, "Jumanji (1995)", 3.5),
            ],
        );
        Ok(())
    }

    #[test]
    fn unknown_item_dropped_ok() -> Result {
        let facts = load(ITEMS.as_bytes(), "userId,movieId,rating\n7,42,5.0\n".as_bytes())?;
        assert!(facts.is_empty());
        Ok(())
    }

    #[test]
    fn missing_join_key_error() {
        let result = load("id,title\n1,Heat (1995)\n".as_bytes(), RATINGS.as_bytes());
        assert!(matches!(
            result,
            Err(DataLoadError::MissingColumn {
                table: Table::Items,
                column: "movieId",
            }),
        ));

        let result = load(ITEMS.as_bytes(), "userId,itemId,rating\n1,1,4.0\n".as_bytes());
        assert!(matches!(
            result,
            Err(DataLoadError::MissingColumn {
                table: Table::Ratings,
                column: "movieId",
            }),
        ));
    }

    #[test]
    fn malformed_rating_error() {
        let result = load(ITEMS.as_bytes(), "userId,movieId,rating\n1,1,4.0\n1,2,great\n".as_bytes());
        assert!(matches!(
            result,
            Err(DataLoadError::Malformed {
                table: Table::Ratings,
                line: 3,
                ..
            }),
        ));
    }

    #[test]
    fn non_finite_rating_error() {
        let result = load(ITEMS.as_bytes(), "userId,movieId,rating\n1,1,NaN\n".as_bytes());
        assert!(matches!(result, Err(DataLoadError::InvalidRating { line: 2, .. })));
    }

    #[test]
    fn duplicate_item_error() {
        let result = load("movieId,title\n1,Heat (1995)\n1,Heat\n".as_bytes(), RATINGS.as_bytes());
        assert!(matches!(result, Err(DataLoadError::DuplicateItem { item_id: 1 })));
    }

    #[test]
    fn missing_file_error() {
        let result = load_from_paths("/nonexistent/movies.csv", "/nonexistent/ratings.csv");
        assert!(matches!(
            result,
            Err(DataLoadError::Open {
                table: Table::Items,
                ..
            }),
        ));
    }
}
