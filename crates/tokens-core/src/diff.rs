//! Presence-only name diff

use std::collections::HashSet;

use serde::Serialize;

/// Partition of two name sets
///
/// `updated` means "present on both sides"; values are never compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameDiff {
    /// Imported names with no existing counterpart, in import order
    pub added: Vec<String>,
    /// Imported names that already exist, in import order
    pub updated: Vec<String>,
    /// Existing names the import does not mention, in existing order
    pub removed: Vec<String>,
}

impl NameDiff {
    /// Compare the `existing` names against the `imported` ones.
    pub fn compute<'a, E, I>(existing: E, imported: I) -> Self
    where
        E: IntoIterator<Item = &'a str>,
        I: IntoIterator<Item = &'a str>,
    {
        let existing: Vec<&str> = existing.into_iter().collect();
        let imported: Vec<&str> = imported.into_iter().collect();
        let existing_set: HashSet<&str> = existing.iter().copied().collect();
        let imported_set: HashSet<&str> = imported.iter().copied().collect();

        let mut diff = Self::default();
        let mut seen = HashSet::new();
        for name in imported {
            if !seen.insert(name) {
                continue;
            }
            if existing_set.contains(name) {
                diff.updated.push(name.to_string());
            } else {
                diff.added.push(name.to_string());
            }
        }

        let mut seen = HashSet::new();
        diff.removed = existing
            .into_iter()
            .filter(|name| !imported_set.contains(name) && seen.insert(*name))
            .map(str::to_string)
            .collect();

        diff
    }

    /// Names to create or update, added first
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.added
            .iter()
            .chain(self.updated.iter())
            .map(String::as_str)
    }

    /// Whether the import touches nothing
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_partition_preserves_order() {
        let diff = NameDiff::compute(["b", "x", "a"], ["a", "c", "b", "d"]);

        assert_eq!(diff.added, vec!["c", "d"]);
        assert_eq!(diff.updated, vec!["a", "b"]);
        assert_eq!(diff.removed, vec!["x"]);
    }

    #[test]
    fn test_empty_sides() {
        let diff = NameDiff::compute(Vec::<&str>::new(), ["a"]);
        assert_eq!(diff.added, vec!["a"]);
        assert!(diff.removed.is_empty());

        let diff = NameDiff::compute(["a"], Vec::<&str>::new());
        assert!(diff.is_empty());
        assert_eq!(diff.removed, vec!["a"]);
    }

    fn names() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-e]{1,2}", 0..12)
    }

    proptest! {
        #[test]
        fn prop_added_and_updated_disjoint(existing in names(), imported in names()) {
            let diff = NameDiff::compute(
                existing.iter().map(String::as_str),
                imported.iter().map(String::as_str),
            );
            let added: HashSet<_> = diff.added.iter().collect();
            prop_assert!(diff.updated.iter().all(|n| !added.contains(n)));
        }

        #[test]
        fn prop_added_union_updated_is_imported(existing in names(), imported in names()) {
            let diff = NameDiff::compute(
                existing.iter().map(String::as_str),
                imported.iter().map(String::as_str),
            );
            let union: HashSet<&str> = diff.candidates().collect();
            let expected: HashSet<&str> = imported.iter().map(String::as_str).collect();
            prop_assert_eq!(union, expected);
        }

        #[test]
        fn prop_removed_is_existing_minus_imported(existing in names(), imported in names()) {
            let diff = NameDiff::compute(
                existing.iter().map(String::as_str),
                imported.iter().map(String::as_str),
            );
            let removed: HashSet<&str> = diff.removed.iter().map(String::as_str).collect();
            let imported: HashSet<&str> = imported.iter().map(String::as_str).collect();
            let expected: HashSet<&str> = existing
                .iter()
                .map(String::as_str)
                .filter(|n| !imported.contains(n))
                .collect();
            prop_assert_eq!(removed, expected);
        }
    }
}
