//! Start point entity and the grouped directory of named locations

use serde::{Deserialize, Serialize};

/// A named starting location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPoint {
    /// Display name
    pub name: String,
    /// Map or info link
    pub link: String,
    /// Group header this entry is listed under
    pub group: String,
}

impl StartPoint {
    /// Label used in that group-ride announcement: a markdown link
    #[must_use]
    pub fn formatted(&self) -> String {
        format!("[{}]({})", self.name, self.link)
    }
}

const DEFAULT_GROUP: &str = "Other";

/// Immutable, grouped set of starting locations
///
/// Entries are ordered by (group, name); the position of an entry in that
/// order is its process-stable numeric handle, used in compact selection
/// tokens. Rendering lists entries under sorted group headers.
#[derive(Debug, Default)]
pub struct StartPointDirectory {
    entries: Vec<StartPoint>,
}

impl StartPointDirectory {
    /// Build the directory from manifest entries
    ///
    /// Entries without a group land under a shared default header. The
    /// (group, name) sort makes handle assignment deterministic across
    /// runs regardless of manifest order.
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = (String, String, Option<String>)>) -> Self {
        let mut entries: Vec<StartPoint> = points
            .into_iter()
            .map(|(name, link, group)| StartPoint {
                name,
                link,
                group: group.unwrap_or_else(|| DEFAULT_GROUP.to_string()),
            })
            .collect();
        entries.sort_by(|a, b| (&a.group, &a.name).cmp(&(&b.group, &b.name)));
        Self { entries }
    }

    /// Entry for the given stable handle
    #[must_use]
    pub fn get(&self, handle: usize) -> Option<&StartPoint> {
        self.entries.get(handle)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries with their handles, grouped under sorted headers
    ///
    /// Groups come out consecutive because the entries are sorted by
    /// (group, name) at construction.
    #[must_use]
    pub fn grouped(&self) -> Vec<(&str, Vec<(usize, &StartPoint)>)> {
        let mut groups: Vec<(&str, Vec<(usize, &StartPoint)>)> = Vec::new();
        for (handle, entry) in self.entries.iter().enumerate() {
            match groups.last_mut() {
                Some((group, members)) if *group == entry.group => members.push((handle, entry)),
                _ => groups.push((entry.group.as_str(), vec![(handle, entry)])),
            }
        }
        groups
    }
}
