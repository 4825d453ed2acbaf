//! Gift report from the children content file.
//!
//! ```bash
//! wg-cli gifts --file crates/site/content/children.json
//! ```
//!
//! Prints per-gift counts sorted by gift name, the number of children and,
//! when any child has a price, the total cost.

use std::path::{Path, PathBuf};

use thiserror::Error;
use winter_gifts_core::gifts::{GiftContent, GiftContentError, GiftTally};

/// Content file read when `--file` is not given.
pub const DEFAULT_CONTENT_FILE: &str = "crates/site/content/children.json";

/// Errors that can occur producing the report.
#[derive(Debug, Error)]
pub enum GiftsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: GiftContentError,
    },

    #[error("{path}: {source}")]
    Tally {
        path: PathBuf,
        #[source]
        source: GiftContentError,
    },
}

/// Read and tally a content file.
///
/// # Errors
///
/// Returns `GiftsError` if the file is missing, not valid content JSON, or
/// its prices sum past what a `Decimal` holds.
pub fn tally_file(path: &Path) -> Result<GiftTally, GiftsError> {
    let json = std::fs::read_to_string(path).map_err(|source| GiftsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = GiftContent::from_json(&json).map_err(|source| GiftsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    content.tally().map_err(|source| GiftsError::Tally {
        path: path.to_path_buf(),
        source,
    })
}

/// Print the report for `path` to stdout.
///
/// # Errors
///
/// Same as [`tally_file`].
pub fn report(path: &Path) -> Result<(), GiftsError> {
    let tally = tally_file(path)?;
    tracing::debug!(path = %path.display(), children = tally.total_children(), "Tallied gifts");

    #[allow(clippy::print_stdout)]
    {
        print!("{}", tally.render());
    }
    Ok(())
}
