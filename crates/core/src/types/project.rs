//! Fundraising projects.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::ProjectId;

/// A fundraising project as owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub goal_amount: Decimal,
    pub raised_amount: Decimal,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Funding progress as a whole percentage, capped at 100.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        if self.goal_amount <= Decimal::ZERO {
            return 0;
        }
        let pct = (self.raised_amount * Decimal::ONE_HUNDRED / self.goal_amount)
            .floor()
            .min(Decimal::ONE_HUNDRED)
            .max(Decimal::ZERO);
        pct.to_u8().unwrap_or(0)
    }
}

/// Validation errors for [`ProjectDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectDraftError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("slug may only contain lowercase letters, digits and dashes")]
    InvalidSlug,
    #[error("goal amount cannot be negative")]
    NegativeGoal,
}

/// Fields an admin can set when creating or updating a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub goal_amount: Decimal,
    pub published: bool,
}

impl ProjectDraft {
    /// Build a draft, deriving the slug from the title when none is given.
    ///
    /// # Errors
    ///
    /// Returns a [`ProjectDraftError`] for an empty title, a malformed slug
    /// or a negative goal.
    pub fn new(
        slug: Option<&str>,
        title: &str,
        summary: &str,
        goal_amount: Decimal,
        published: bool,
    ) -> Result<Self, ProjectDraftError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ProjectDraftError::EmptyTitle);
        }

        let slug = match slug.map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => explicit.to_owned(),
            None => slugify(title),
        };
        if slug.is_empty()
            || !slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ProjectDraftError::InvalidSlug);
        }

        if goal_amount < Decimal::ZERO {
            return Err(ProjectDraftError::NegativeGoal);
        }

        Ok(Self {
            slug,
            title: title.to_owned(),
            summary: summary.trim().to_owned(),
            goal_amount,
            published,
        })
    }
}

/// Lowercase ASCII slug with single dashes between words.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn project(goal: i64, raised: i64) -> Project {
        let now = Utc::now();
        Project {
            id: ProjectId::new(1),
            slug: "warm-boots".to_owned(),
            title: "Warm boots".to_owned(),
            summary: String::new(),
            goal_amount: Decimal::new(goal, 0),
            raised_amount: Decimal::new(raised, 0),
            published: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(project(200, 50).progress_percent(), 25);
        assert_eq!(project(3, 1).progress_percent(), 33);
        assert_eq!(project(100, 250).progress_percent(), 100);
        assert_eq!(project(0, 10).progress_percent(), 0);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Winter Boots for Kharkiv!"), "winter-boots-for-kharkiv");
        assert_eq!(slugify("  --Hello--  "), "hello");
        assert_eq!(slugify("Подарунки"), "");
    }

    #[test]
    fn test_draft_derives_slug() {
        let draft = ProjectDraft::new(None, " New Year Gifts ", "", Decimal::ZERO, false).unwrap();
        assert_eq!(draft.slug, "new-year-gifts");
        assert_eq!(draft.title, "New Year Gifts");
    }

    #[test]
    fn test_draft_rejections() {
        assert_eq!(
            ProjectDraft::new(None, "  ", "", Decimal::ZERO, false),
            Err(ProjectDraftError::EmptyTitle)
        );
        assert_eq!(
            ProjectDraft::new(Some("Bad Slug"), "Title", "", Decimal::ZERO, false),
            Err(ProjectDraftError::InvalidSlug)
        );
        assert_eq!(
            ProjectDraft::new(None, "Подарунки", "", Decimal::ZERO, false),
            Err(ProjectDraftError::InvalidSlug)
        );
        assert_eq!(
            ProjectDraft::new(None, "Title", "", Decimal::NEGATIVE_ONE, false),
            Err(ProjectDraftError::NegativeGoal)
        );
    }
}
