//! Hierarchical view of the flat index
//!
//! Staged paths are split on `/` into an owned tree of nodes. Directory nodes
//! hold children; leaves hold the staged entry. The structure only exists in
//! memory while a commit is being written.

use crate::artifacts::index::index_entry::IndexEntry;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexTreeNode {
    pub root: bool,
    pub name: String,
    pub entry: Option<IndexEntry>,
    pub children: BTreeMap<String, IndexTreeNode>,
}

impl IndexTreeNode {
    pub fn root() -> Self {
        IndexTreeNode {
            root: true,
            ..Default::default()
        }
    }

    fn directory(name: &str) -> Self {
        IndexTreeNode {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn build<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> Self {
        let mut root = IndexTreeNode::root();
        for entry in entries {
            root.insert(entry);
        }
        root
    }

    /// Place `entry` under the directory nodes named by its path
    pub fn insert(&mut self, entry: &IndexEntry) {
        let mut components = entry.path.split('/').peekable();
        let mut node = self;

        while let Some(component) = components.next() {
            if components.peek().is_none() {
                node.children.insert(
                    component.to_string(),
                    IndexTreeNode {
                        name: component.to_string(),
                        entry: Some(entry.clone()),
                        ..Default::default()
                    },
                );
                return;
            }

            node = node
                .children
                .entry(component.to_string())
                .or_insert_with(|| IndexTreeNode::directory(component));
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.entry.is_some()
    }

    /// All leaf entries in path order
    pub fn leaves(&self) -> Vec<&IndexEntry> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'n>(&'n self, leaves: &mut Vec<&'n IndexEntry>) {
        if let Some(entry) = &self.entry {
            leaves.push(entry);
        }
        for child in self.children.values() {
            child.collect_leaves(leaves);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::index_entry::EntryMetadata;
    use crate::artifacts::objects::object_id::ObjectId;
    use pretty_assertions::assert_eq;

    fn entry(path: &str) -> IndexEntry {
        IndexEntry::new(
            path.to_string(),
            ObjectId::from_bytes(path.as_bytes()),
            EntryMetadata::default(),
        )
    }

    #[test]
    fn splits_paths_into_nested_nodes() {
        let entries = [entry("main.txt"), entry("src/a.txt"), entry("src/sub/b.txt")];

        let root = IndexTreeNode::build(&entries);

        assert!(root.root);
        assert_eq!(root.children.keys().collect::<Vec<_>>(), vec!["main.txt", "src"]);
        assert!(root.children["main.txt"].is_leaf());

        let src = &root.children["src"];
        assert!(!src.is_leaf());
        assert_eq!(src.children.keys().collect::<Vec<_>>(), vec!["a.txt", "sub"]);
        assert_eq!(
            src.children["sub"].children["b.txt"].entry.as_ref().map(|e| e.path.as_str()),
            Some("src/sub/b.txt")
        );
    }

    #[test]
    fn leaf_paths_concatenate_ancestor_names() {
        let entries = [entry("a/b/c.txt"), entry("a/d.txt"), entry("e.txt")];
        let root = IndexTreeNode::build(&entries);

        fn check(node: &IndexTreeNode, prefix: &str) {
            let path = if prefix.is_empty() {
                node.name.clone()
            } else {
                format!("{prefix}/{}", node.name)
            };
            if let Some(entry) = &node.entry {
                assert_eq!(entry.path, path);
            }
            for child in node.children.values() {
                check(child, &path);
            }
        }
        for child in root.children.values() {
            check(child, "");
        }

        assert_eq!(root.leaves().len(), 3);
    }

    #[test]
    fn empty_index_projects_to_bare_root() {
        let root = IndexTreeNode::build(std::iter::empty());

        assert!(root.root);
        assert!(root.children.is_empty());
    }
}
