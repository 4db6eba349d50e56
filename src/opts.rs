//! CLI options.

use std::path::PathBuf;

use clap::{Args, Parser};
use user_knn::session::{SessionOptions, DEFAULT_N_NEIGHBORS};
use user_knn::store::UserId;

pub mod parsers;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Opts {
    /// Sentry DSN
    #[arg(short, long, env = "SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// Performance traces sample rate for Sentry
    #[arg(long, default_value = "0")]
    pub traces_sample_rate: f32,

    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand)]
pub enum Subcommand {
    Recommend(RecommendOpts),
    Neighbors(NeighborsOpts),
}

/// Recommends the items the user has not rated yet
#[derive(Args)]
pub struct RecommendOpts {
    #[command(flatten)]
    pub data: DataOpts,

    /// User ID to recommend for
    #[arg(short, long)]
    pub user_id: UserId,

    /// Number of recommendations
    #[arg(
        short = 'n',
        long,
        default_value = "5",
        value_parser = parsers::recommendation_count,
    )]
    pub count: usize,

    /// Print the recommendations as JSON
    #[arg(long)]
    pub json: bool,
}

/// Lists the users most similar to the user
#[derive(Args)]
pub struct NeighborsOpts {
    #[command(flatten)]
    pub data: DataOpts,

    /// User ID to look up the neighbours of
    #[arg(short, long)]
    pub user_id: UserId,
}

#[derive(Args)]
pub struct DataOpts {
    /// Item metadata CSV table with `movieId` and `title` columns
    #[arg(long, env = "USER_KNN_ITEMS", default_value = "movies.csv")]
    pub items: PathBuf,

    /// Ratings CSV table with `userId`, `movieId` and `rating` columns
    #[arg(long, env = "USER_KNN_RATINGS", default_value = "ratings.csv")]
    pub ratings: PathBuf,

    /// Number of similar users whose ratings are aggregated
    #[arg(
        long,
        default_value_t = DEFAULT_N_NEIGHBORS,
        value_parser = parsers::non_zero_usize,
    )]
    pub n_neighbors: usize,
}

impl DataOpts {
    pub const fn session_options(&self) -> SessionOptions {
        SessionOptions {
            n_neighbors: self.n_neighbors,
        }
    }
}
