//! Selektionsmodus und geordnete Menge der selektierten Nodes.

use super::node::NodeId;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aktiver Selektionsmodus des Editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Einzelne Primitive (Brushes, Patches)
    #[default]
    Primitive,
    /// Teile einer Gruppe (Entity-Kinder)
    GroupPart,
    Entity,
    Component,
    MergeAction,
}

impl SelectionMode {
    /// Nur in diesen Modi lassen sich Gruppen bilden oder auflösen.
    pub fn allows_grouping(self) -> bool {
        matches!(self, Self::Primitive | Self::GroupPart)
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Primitive => "Primitive",
            Self::GroupPart => "Group Part",
            Self::Entity => "Entity",
            Self::Component => "Component",
            Self::MergeAction => "Merge Action",
        };
        f.write_str(label)
    }
}

/// Selektionszustand eines Dokuments.
///
/// Die Reihenfolge der selektierten Nodes entspricht der Selektionsreihenfolge.
#[derive(Debug, Clone, Default)]
pub struct SelectionSystem {
    mode: SelectionMode,
    selected: IndexSet<NodeId>,
}

impl SelectionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        if self.mode != mode {
            log::debug!("Selektionsmodus: {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Anzahl selektierter Nodes
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.selected.contains(&node)
    }

    /// Zuletzt selektierter Node
    pub fn ultimate_selected(&self) -> Option<NodeId> {
        self.selected.last().copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.selected.iter().copied()
    }

    pub fn foreach_selected(&self, mut f: impl FnMut(NodeId)) {
        for node in &self.selected {
            f(*node);
        }
    }

    pub(crate) fn insert(&mut self, node: NodeId) -> bool {
        self.selected.insert(node)
    }

    pub(crate) fn remove(&mut self, node: NodeId) -> bool {
        self.selected.shift_remove(&node)
    }
}
