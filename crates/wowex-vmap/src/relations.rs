//! Parent/child map relation

use std::collections::HashMap;
use wowex_formats::MapRow;

/// Read-only multimap from parent maps to the child maps sharing their
/// geometry, with the reverse lookup
#[derive(Debug, Clone, Default)]
pub struct MapRelations {
    children: HashMap<u32, Vec<u32>>,
    parents: HashMap<u32, u32>,
}

impl MapRelations {
    /// Relation with no children
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(child, parent)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut relations = Self::default();
        for (child, parent) in pairs {
            if child == parent {
                continue;
            }
            relations.parents.insert(child, parent);
        }
        for (&child, &parent) in &relations.parents {
            relations.children.entry(parent).or_default().push(child);
        }
        for list in relations.children.values_mut() {
            list.sort_unstable();
        }
        relations
    }

    /// Build from decoded map table rows
    pub fn from_map_rows<'a>(rows: impl IntoIterator<Item = &'a MapRow>) -> Self {
        Self::from_pairs(
            rows.into_iter()
                .filter_map(|row| row.parent().map(|parent| (row.id, parent))),
        )
    }

    /// Child maps of a parent, in ascending id order
    pub fn children(&self, parent: u32) -> &[u32] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or_default()
    }

    /// Parent of a map, `None` for top-level maps
    pub fn parent(&self, child: u32) -> Option<u32> {
        self.parents.get(&child).copied()
    }

    /// Number of child maps
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Check if no map has a parent
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl FromIterator<(u32, u32)> for MapRelations {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
