use crate::tree::team_tree::TeamTreeNode;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Team members tallied per level of a materialized team view.
///
/// Level numbers match node depths, so direct invitees land in level 1
/// and the map covers only the levels the view actually expanded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LevelCounts {
    counts: HashMap<usize, usize>,
}

impl LevelCounts {
    /// Tally a materialized forest level by level.
    pub fn from_tree(forest: &[TeamTreeNode]) -> Self {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        let mut stack: Vec<&TeamTreeNode> = forest.iter().collect();

        while let Some(node) = stack.pop() {
            *counts.entry(node.depth()).or_insert(0) += 1;
            stack.extend(node.children());
        }

        Self { counts }
    }

    /// Members at `level`, zero when the level is absent.
    pub fn count_at(&self, level: usize) -> usize {
        self.counts.get(&level).copied().unwrap_or(0)
    }

    /// Members across all levels.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(level, count)` pairs ordered by level.
    pub fn sorted_entries(&self) -> Vec<(usize, usize)> {
        let mut entries: Vec<(usize, usize)> =
            self.counts.iter().map(|(&level, &count)| (level, count)).collect();
        entries.sort_by_key(|&(level, _)| level);
        entries
    }

    /// The deepest populated level, if any.
    pub fn deepest(&self) -> Option<usize> {
        self.counts.keys().copied().max()
    }
}

impl fmt::Display for LevelCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return write!(f, "no team members");
        }
        let parts: Vec<String> = self
            .sorted_entries()
            .into_iter()
            .map(|(level, count)| format!("L{}: {}", level, count))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
