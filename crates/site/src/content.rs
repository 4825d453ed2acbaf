//! Static content shipped with the site.
//!
//! - `children.json` in the content directory lists the children waiting
//!   for gifts; it is read once at startup.
//! - The footer is raw HTML embedded at build time and emitted unescaped.

use std::path::{Path, PathBuf};

use thiserror::Error;
use winter_gifts_core::gifts::{GiftContent, GiftContentError};

/// Footer markup from `assets/footer.html`.
pub const FOOTER_HTML: &str = include_str!("../assets/footer.html");

/// Errors loading content files.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: GiftContentError,
    },
}

/// Read and parse the children/gift content file.
///
/// # Errors
///
/// Returns [`ContentError`] if the file is missing or malformed.
pub fn load_gift_content(path: &Path) -> Result<GiftContent, ContentError> {
    let json = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = GiftContent::from_json(&json).map_err(|source| ContentError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        children = content.children_count(),
        "Loaded gift content"
    );
    Ok(content)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_children_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("content/children.json");
        let content = load_gift_content(&path).unwrap();
        assert!(content.children_count() > 0);
    }

    #[test]
    fn test_missing_file() {
        let err = load_gift_content(Path::new("/nonexistent/children.json")).unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }

    #[test]
    fn test_footer_is_embedded() {
        assert!(FOOTER_HTML.contains("<footer"));
    }
}
