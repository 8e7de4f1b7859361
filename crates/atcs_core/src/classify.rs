use std::fmt;

/// Semantic field a statement section can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Problem,
    Constraints,
    Input,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Problem => write!(f, "problem"),
            Category::Constraints => write!(f, "constraints"),
            Category::Input => write!(f, "input"),
        }
    }
}

/// Ordered mapping from category to the heading substrings that trigger it.
///
/// Matching is case-sensitive. Categories are tried in insertion order and the
/// first hit wins, so a heading never falls through to a later category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<(Category, Vec<String>)>,
}

impl KeywordTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds triggers for `category`. Triggers for an already known category
    /// are appended to its existing set and keep its original position.
    pub fn with<I, S>(mut self, category: Category, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let triggers = triggers.into_iter().map(Into::into);
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, existing)) => existing.extend(triggers),
            None => self.entries.push((category, triggers.collect())),
        }
        self
    }

    pub fn classify(&self, heading: &str) -> Option<Category> {
        if heading.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(_, triggers)| {
                triggers
                    .iter()
                    .any(|t| !t.is_empty() && heading.contains(t.as_str()))
            })
            .map(|(category, _)| *category)
    }

    pub fn triggers(&self, category: Category) -> &[String] {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, t)| t.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for KeywordTable {
    /// AtCoder headings in Japanese plus their English counterparts.
    fn default() -> Self {
        Self::empty()
            .with(Category::Problem, ["問題", "Problem"])
            .with(Category::Constraints, ["制約", "Constraints"])
            .with(Category::Input, ["入力", "Input"])
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, KeywordTable};

    #[test]
    fn japanese_and_english_headings_classify() {
        let table = KeywordTable::default();
        assert_eq!(table.classify("問題文"), Some(Category::Problem));
        assert_eq!(table.classify("Problem Statement"), Some(Category::Problem));
        assert_eq!(table.classify("制約"), Some(Category::Constraints));
        assert_eq!(table.classify("Input"), Some(Category::Input));
        assert_eq!(table.classify("出力"), None);
        assert_eq!(table.classify(""), None);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let table = KeywordTable::default();
        assert_eq!(table.classify("problem"), None);
        assert_eq!(table.classify("INPUT"), None);
    }

    #[test]
    fn earlier_category_wins_when_several_match() {
        let table = KeywordTable::default();
        // "入力" would match Input, but Problem is checked first.
        assert_eq!(table.classify("問題の入力"), Some(Category::Problem));
    }

    #[test]
    fn extra_triggers_extend_existing_category() {
        let table = KeywordTable::default().with(Category::Input, ["Entrada"]);
        assert_eq!(table.classify("Entrada"), Some(Category::Input));
        assert_eq!(table.triggers(Category::Input).len(), 3);
    }
}
