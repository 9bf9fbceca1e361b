//! Szenen-Nodes: Identität, Node-Art und die daraus abgeleiteten Fähigkeiten.

use super::selection_group::GroupId;
use super::traversable::TraversableNodeSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stabile Node-Identität innerhalb einer Szene (Arena-Schlüssel).
///
/// Die ID bleibt erhalten, wenn ein Node aus der Szene entfernt und später
/// wieder eingefügt wird (z.B. durch Undo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Art eines Szenen-Nodes. Die Fähigkeiten (Kinder, Selektion, Gruppen)
/// ergeben sich ausschließlich aus der Art.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Wurzel eines Dokuments
    Root,
    /// Entity mit Klassenname (Container für Primitive)
    Entity { classname: String },
    /// Brush-Primitive
    Brush,
    /// Patch-Primitive
    Patch,
    /// Overlay-Node einer Merge-Aktion, verweist auf den betroffenen Node
    MergeAction { affected: NodeId },
}

impl NodeKind {
    /// Erstellt eine Entity-Art mit dem gegebenen Klassennamen.
    pub fn entity(classname: impl Into<String>) -> Self {
        Self::Entity {
            classname: classname.into(),
        }
    }

    /// Node kann Kinder besitzen
    pub fn is_traversable(&self) -> bool {
        matches!(self, Self::Root | Self::Entity { .. })
    }

    /// Node kann selektiert werden
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Self::Root)
    }

    /// Node kann Mitglied von Selektionsgruppen sein
    pub fn is_group_selectable(&self) -> bool {
        !matches!(self, Self::Root)
    }

    /// Brush oder Patch
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Brush | Self::Patch)
    }

    /// Entity-Node
    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Entity { .. })
    }

    /// Kurzbezeichnung für Log-Ausgaben und Debug-Kommentare.
    pub fn label(&self) -> &str {
        match self {
            Self::Root => "Root",
            Self::Entity { .. } => "Entity",
            Self::Brush => "Brush",
            Self::Patch => "Patch",
            Self::MergeAction { .. } => "MergeAction",
        }
    }
}

/// Fähigkeit "Selectable": Selektionsflag eines Nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selectable {
    selected: bool,
}

impl Selectable {
    /// Aktueller Selektionszustand
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Setzt das Flag, gibt `true` zurück wenn sich etwas geändert hat.
    pub(crate) fn set_selected(&mut self, selected: bool) -> bool {
        let changed = self.selected != selected;
        self.selected = selected;
        changed
    }
}

/// Fähigkeit "GroupSelectable": geordnete Liste der Gruppen-IDs eines Nodes.
///
/// Die Reihenfolge ist signifikant: die zuletzt eingefügte ID ist die
/// "jüngste" Gruppe. Doppelte Einträge gibt es nicht.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSelectable {
    group_ids: Vec<GroupId>,
}

impl GroupSelectable {
    /// Alle Gruppen-IDs in Einfügereihenfolge
    pub fn group_ids(&self) -> &[GroupId] {
        &self.group_ids
    }

    /// Node gehört zu mindestens einer Gruppe
    pub fn is_group_member(&self) -> bool {
        !self.group_ids.is_empty()
    }

    /// Jüngste Gruppe (zuletzt hinzugefügt)
    pub fn most_recent_group_id(&self) -> Option<GroupId> {
        self.group_ids.last().copied()
    }

    /// Prüft die Zugehörigkeit zu einer Gruppe
    pub fn contains(&self, id: GroupId) -> bool {
        self.group_ids.contains(&id)
    }

    pub(crate) fn add_group_id(&mut self, id: GroupId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.group_ids.push(id);
        true
    }

    pub(crate) fn remove_group_id(&mut self, id: GroupId) -> bool {
        let before = self.group_ids.len();
        self.group_ids.retain(|existing| *existing != id);
        self.group_ids.len() < before
    }

    /// Ersetzt die Liste komplett und gibt die alte zurück.
    pub(crate) fn replace_group_ids(&mut self, ids: Vec<GroupId>) -> Vec<GroupId> {
        std::mem::replace(&mut self.group_ids, ids)
    }
}

/// Ein Node im Szenen-Arena-Speicher.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) in_scene: bool,
    pub(crate) hidden: bool,
    pub(crate) selectable: Option<Selectable>,
    pub(crate) group_selectable: Option<GroupSelectable>,
    pub(crate) children: Option<TraversableNodeSet>,
}

impl SceneNode {
    /// Erstellt einen freien (nicht eingehängten) Node mit den Fähigkeiten seiner Art.
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            selectable: kind.is_selectable().then(Selectable::default),
            group_selectable: kind.is_group_selectable().then(GroupSelectable::default),
            children: kind.is_traversable().then(|| TraversableNodeSet::new(id)),
            kind,
            parent: None,
            in_scene: false,
            hidden: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Eltern-Node, falls eingehängt
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Node ist Teil des Szenengraphen (unterhalb der Wurzel)
    pub fn is_in_scene(&self) -> bool {
        self.in_scene
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Merge-Aktions-Nodes lassen sich nicht ausblenden.
    pub fn supports_hiding(&self) -> bool {
        !matches!(self.kind, NodeKind::MergeAction { .. } | NodeKind::Root)
    }

    /// Selektionsflag (false für nicht selektierbare Nodes)
    pub fn is_selected(&self) -> bool {
        self.selectable.as_ref().is_some_and(Selectable::is_selected)
    }

    pub fn try_selectable(&self) -> Option<&Selectable> {
        self.selectable.as_ref()
    }

    pub fn try_group_selectable(&self) -> Option<&GroupSelectable> {
        self.group_selectable.as_ref()
    }

    pub fn try_traversable(&self) -> Option<&TraversableNodeSet> {
        self.children.as_ref()
    }
}
