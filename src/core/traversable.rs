//! Geordneter Kind-Container eines Nodes mit Observer-Benachrichtigung und Undo-Anbindung.

use super::node::NodeId;
use super::undo::{UndoMemento, UndoStateSaver, UndoableKey};
use std::collections::BTreeSet;

/// Empfänger der Einfüge- und Entfernen-Benachrichtigungen eines Containers.
pub trait TraversableObserver {
    /// `child` wurde unter `owner` eingefügt.
    fn insert_child(&mut self, owner: NodeId, child: NodeId);
    /// `child` wird aus `owner` entfernt.
    fn erase_child(&mut self, owner: NodeId, child: NodeId);
}

/// Kontext einer Container-Mutation: Observer und Undo-Zustandsspeicher.
pub trait TraversableContext: TraversableObserver + UndoStateSaver {}

impl<T: TraversableObserver + UndoStateSaver> TraversableContext for T {}

/// Geordnete Kind-Liste eines traversierbaren Nodes.
///
/// Einfügen speichert zuerst den Undo-Zustand, hängt dann an und benachrichtigt.
/// Entfernen speichert den Undo-Zustand, benachrichtigt und entfernt danach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversableNodeSet {
    owner: NodeId,
    children: Vec<NodeId>,
    undo_attached: bool,
}

impl TraversableNodeSet {
    /// Erstellt einen leeren Container für `owner`.
    pub fn new(owner: NodeId) -> Self {
        Self {
            owner,
            children: Vec::new(),
            undo_attached: false,
        }
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Hängt `child` an das Ende an.
    pub fn insert(&mut self, child: NodeId, ctx: &mut impl TraversableContext) {
        self.save_undo_state(ctx);
        self.children.push(child);
        ctx.insert_child(self.owner, child);
    }

    /// Entfernt `child`. Gibt `false` zurück, wenn es kein Kind war.
    pub fn erase(&mut self, child: NodeId, ctx: &mut impl TraversableContext) -> bool {
        let Some(position) = self.children.iter().position(|c| *c == child) else {
            log::debug!("Node {} ist kein Kind von {}", child, self.owner);
            return false;
        };
        self.save_undo_state(ctx);
        ctx.erase_child(self.owner, child);
        self.children.remove(position);
        true
    }

    /// Ersetzt den Inhalt (Undo-Restore) und meldet nur die Differenz:
    /// erst die entfallenen Kinder, dann die hinzugekommenen.
    pub fn assign(&mut self, children: Vec<NodeId>, observer: &mut impl TraversableObserver) {
        let current: BTreeSet<NodeId> = self.children.iter().copied().collect();
        let incoming: BTreeSet<NodeId> = children.iter().copied().collect();

        for removed in current.difference(&incoming) {
            observer.erase_child(self.owner, *removed);
        }

        self.children = children;

        for added in incoming.difference(&current) {
            observer.insert_child(self.owner, *added);
        }
    }

    /// Bindet den Container an das Undo-System (beim Einfügen in die Szene).
    pub fn instance_attach(&mut self) {
        self.undo_attached = true;
    }

    /// Löst die Undo-Bindung (beim Entfernen aus der Szene).
    pub fn instance_detach(&mut self) {
        self.undo_attached = false;
    }

    pub fn is_undo_attached(&self) -> bool {
        self.undo_attached
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains(&self, child: NodeId) -> bool {
        self.children.contains(&child)
    }

    fn save_undo_state(&self, saver: &mut impl UndoStateSaver) {
        if self.undo_attached {
            saver.save_state(
                UndoableKey::Children(self.owner),
                UndoMemento::Children(self.children.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        saved: Vec<(UndoableKey, UndoMemento)>,
    }

    impl TraversableObserver for Recorder {
        fn insert_child(&mut self, owner: NodeId, child: NodeId) {
            self.events.push(format!("insert {} -> {}", child.0, owner.0));
        }

        fn erase_child(&mut self, owner: NodeId, child: NodeId) {
            self.events.push(format!("erase {} <- {}", child.0, owner.0));
        }
    }

    impl UndoStateSaver for Recorder {
        fn save_state(&mut self, key: UndoableKey, memento: UndoMemento) {
            self.saved.push((key, memento));
        }
    }

    #[test]
    fn insert_saves_previous_state_then_notifies() {
        let mut set = TraversableNodeSet::new(NodeId(1));
        set.instance_attach();
        assert!(set.is_undo_attached());
        let mut recorder = Recorder::default();

        set.insert(NodeId(2), &mut recorder);
        set.insert(NodeId(3), &mut recorder);

        assert_eq!(set.as_slice(), &[NodeId(2), NodeId(3)]);
        assert_eq!(recorder.events, vec!["insert 2 -> 1", "insert 3 -> 1"]);
        assert_eq!(
            recorder.saved[0],
            (UndoableKey::Children(NodeId(1)), UndoMemento::Children(vec![]))
        );
        assert_eq!(
            recorder.saved[1].1,
            UndoMemento::Children(vec![NodeId(2)])
        );
    }

    #[test]
    fn detached_set_does_not_save_undo_state() {
        let mut set = TraversableNodeSet::new(NodeId(1));
        set.instance_attach();
        set.instance_detach();
        assert!(!set.is_undo_attached());
        let mut recorder = Recorder::default();

        set.insert(NodeId(2), &mut recorder);
        assert!(set.erase(NodeId(2), &mut recorder));

        assert!(recorder.saved.is_empty());
        assert_eq!(recorder.events.len(), 2);
    }

    #[test]
    fn erase_of_unknown_child_is_ignored() {
        let mut set = TraversableNodeSet::new(NodeId(1));
        set.instance_attach();
        let mut recorder = Recorder::default();

        assert!(!set.erase(NodeId(9), &mut recorder));
        assert!(recorder.events.is_empty());
        assert!(recorder.saved.is_empty());
    }

    #[test]
    fn assign_notifies_only_the_difference() {
        let mut set = TraversableNodeSet::new(NodeId(1));
        let mut recorder = Recorder::default();
        set.insert(NodeId(2), &mut recorder);
        set.insert(NodeId(3), &mut recorder);
        recorder.events.clear();

        set.assign(vec![NodeId(3), NodeId(4)], &mut recorder);

        assert_eq!(recorder.events, vec!["erase 2 <- 1", "insert 4 -> 1"]);
        assert_eq!(set.as_slice(), &[NodeId(3), NodeId(4)]);
    }
}
