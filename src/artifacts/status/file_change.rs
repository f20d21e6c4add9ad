use colored::Colorize;

const LABEL_WIDTH: usize = 8;

/// Difference between the HEAD tree and the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndexChangeType {
    Added,
    Modified,
    Deleted,
}

/// Difference between the index and the working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkspaceChangeType {
    Modified,
    Deleted,
}

impl IndexChangeType {
    pub fn short_label(&self) -> &'static str {
        match self {
            IndexChangeType::Added => "A",
            IndexChangeType::Modified => "M",
            IndexChangeType::Deleted => "D",
        }
    }

    pub fn long_label(&self) -> &'static str {
        match self {
            IndexChangeType::Added => "new file:   ",
            IndexChangeType::Modified => "modified:   ",
            IndexChangeType::Deleted => "deleted:    ",
        }
    }
}

impl WorkspaceChangeType {
    pub fn short_label(&self) -> &'static str {
        match self {
            WorkspaceChangeType::Modified => "M",
            WorkspaceChangeType::Deleted => "D",
        }
    }

    pub fn long_label(&self) -> &'static str {
        match self {
            WorkspaceChangeType::Modified => "modified:   ",
            WorkspaceChangeType::Deleted => "deleted:    ",
        }
    }
}

impl std::fmt::Display for IndexChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>width$}{}", "", self.long_label().green(), width = LABEL_WIDTH)
    }
}

impl std::fmt::Display for WorkspaceChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>width$}{}", "", self.long_label().red(), width = LABEL_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_labels_are_indented() {
        colored::control::set_override(false);

        assert_eq!(IndexChangeType::Added.to_string(), "        new file:   ");
        assert_eq!(WorkspaceChangeType::Deleted.to_string(), "        deleted:    ");
    }
}
