//! Case-insensitive title filtering of a project's columns.

use std::borrow::Cow;

use crate::model::Project;

/// A title substring filter over a project view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    query: String,
    needle: String,
}

impl TitleFilter {
    /// Creates a filter for `query`. An empty query matches everything.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let needle = query.to_lowercase();
        Self { query, needle }
    }

    /// The query as entered.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the filter hides anything at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.needle.is_empty()
    }

    /// Whether a title passes the filter.
    #[must_use]
    pub fn matches(&self, title: &str) -> bool {
        !self.is_active() || title.to_lowercase().contains(&self.needle)
    }

    /// The filtered view of `project`.
    ///
    /// An inactive filter borrows the project unchanged; otherwise each
    /// column keeps only matching tasks, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, project: &'a Project) -> Cow<'a, Project> {
        if !self.is_active() {
            return Cow::Borrowed(project);
        }
        let mut view = project.clone();
        for column in view.columns.iter_mut() {
            column.tasks.retain(|task| self.matches(&task.title));
        }
        Cow::Owned(view)
    }
}
