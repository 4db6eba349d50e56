mod opts;

use std::io::{stdout, Write};

use clap::Parser;
use user_knn::helpers::tracing::format_elapsed;
use user_knn::prelude::*;
use user_knn::SessionState;

use crate::opts::{DataOpts, NeighborsOpts, Opts, RecommendOpts, Subcommand};


fn main() -> Result {
    let opts = Opts::parse();
    let _sentry_guard = user_knn::helpers::tracing::init(opts.sentry_dsn, opts.traces_sample_rate)?;
    match opts.subcommand {
        Subcommand::Recommend(opts) => run_recommend(opts),
        Subcommand::Neighbors(opts) => run_neighbors(opts),
    }
}

fn open_session(opts: &DataOpts) -> Result<SessionState> {
    let start_instant = Instant::now();
    let session = SessionState::load_from_paths(&opts.items, &opts.ratings, opts.session_options())
        .with_context(|| {
            format!(
                "failed to initialise the session from `{}` and `{}`",
                opts.items.display(),
                opts.ratings.display(),
            )
        })?;
    info!(elapsed = format_elapsed(start_instant).as_str(), "session is ready");
    Ok(session)
}

#[instrument(skip_all, fields(user_id = opts.user_id, count = opts.count))]
fn run_recommend(opts: RecommendOpts) -> Result {
    let session = open_session(&opts.data)?;
    let recommendations = session
        .recommend(opts.user_id, opts.count)
        .ok_or_else(|| anyhow!("user #{} is not found", opts.user_id))?;
    if recommendations.is_empty() {
        warn!("no recommendations available");
    }

    let mut stdout = stdout().lock();
    if opts.json {
        serde_json::to_writer_pretty(&mut stdout, &recommendations)?;
        writeln!(stdout)?;
    } else {
        for recommendation in &recommendations {
            writeln!(stdout, "{}\t{:.2}", recommendation.title, recommendation.score)?;
        }
    }
    Ok(())
}

#[instrument(skip_all, fields(user_id = opts.user_id))]
fn run_neighbors(opts: NeighborsOpts) -> Result {
    let session = open_session(&opts.data)?;
    let neighbors = session
        .neighbors(opts.user_id)
        .ok_or_else(|| anyhow!("user #{} is not found", opts.user_id))?;

    let mut stdout = stdout().lock();
    for neighbor in &neighbors {
        writeln!(stdout, "{}\t{:.4}", neighbor.user_id, neighbor.similarity)?;
    }
    Ok(())
}
