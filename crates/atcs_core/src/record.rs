use serde::Serialize;

use crate::classify::Category;

/// Structured content of one problem statement page.
///
/// Only [`RecordDraft::finish`] builds a record, so every instance holds at
/// least one non-empty text field and a duplicate-free image list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementRecord {
    problem: String,
    constraints: String,
    input: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

impl StatementRecord {
    pub fn problem(&self) -> &str {
        &self.problem
    }

    pub fn constraints(&self) -> &str {
        &self.constraints
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Raw image references in first-encounter order.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Pretty JSON with two-space indentation; `images` is left out when empty.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Accumulates one extraction pass.
///
/// Text fields follow first-match-wins: once set they are never replaced.
/// Image references are appended only if not already present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    problem: String,
    constraints: String,
    input: String,
    images: Vec<String>,
}

impl RecordDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field for `category` if it is still empty and `text` is not.
    /// Returns whether the draft changed.
    pub fn assign(&mut self, category: Category, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.is_empty() {
            return false;
        }
        let slot = match category {
            Category::Problem => &mut self.problem,
            Category::Constraints => &mut self.constraints,
            Category::Input => &mut self.input,
        };
        if !slot.is_empty() {
            return false;
        }
        *slot = text;
        true
    }

    pub fn is_set(&self, category: Category) -> bool {
        match category {
            Category::Problem => !self.problem.is_empty(),
            Category::Constraints => !self.constraints.is_empty(),
            Category::Input => !self.input.is_empty(),
        }
    }

    /// Appends a reference unless it is empty or already collected.
    pub fn push_image(&mut self, reference: &str) -> bool {
        if reference.is_empty() || self.images.iter().any(|r| r == reference) {
            return false;
        }
        self.images.push(reference.to_string());
        true
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn has_content(&self) -> bool {
        !(self.problem.is_empty() && self.constraints.is_empty() && self.input.is_empty())
    }

    pub fn finish(self) -> Option<StatementRecord> {
        if !self.has_content() {
            return None;
        }
        Some(StatementRecord {
            problem: self.problem,
            constraints: self.constraints,
            input: self.input,
            images: self.images,
        })
    }
}
