use std::path::PathBuf;

/// Input table a load error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Items,
    Ratings,
}

impl std::fmt::Display for Table {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Self::Items => "items",
            Self::Ratings => "ratings",
        })
    }
}

/// Fatal to session initialisation. The inputs are static, so there is nothing to retry.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("failed to open the {table} table at `{path}`")]
    Open {
        table: Table,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read the {table} table header")]
    Header {
        table: Table,
        #[source]
        source: csv::Error,
    },

    #[error("the {table} table has no `{column}` column")]
    MissingColumn { table: Table, column: &'static str },

    #[error("malformed {table} record at line {line}")]
    Malformed {
        table: Table,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("non-finite rating `{rating}` at line {line}")]
    InvalidRating { line: u64, rating: f64 },

    #[error("item #{item_id} is listed more than once")]
    DuplicateItem { item_id: i64 },
}
