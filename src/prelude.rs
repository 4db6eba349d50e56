pub use std::result::Result as StdResult;
pub use std::time::Duration as StdDuration;
pub use std::time::Instant;

pub use ahash::{AHashMap, AHashSet};
pub use anyhow::{anyhow, Context};
pub use tracing::{debug, info, instrument, warn};

pub type Result<T = (), E = anyhow::Error> = StdResult<T, E>;
