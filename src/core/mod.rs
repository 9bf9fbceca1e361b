//! Core-Domänentypen: Szenengraph, Selektion, Selektionsgruppen und Undo.

pub mod group_manager;
/// Szenen-Nodes und ihre Fähigkeiten
///
/// - NodeId: stabile Identität innerhalb der Arena
/// - NodeKind: Root, Entity, Brush, Patch, MergeAction
/// - Selectable / GroupSelectable: Selektionsflag und Gruppen-IDs
pub mod node;
pub mod scene;
pub mod selection;
pub mod selection_group;
pub mod traversable;
pub mod undo;

pub use group_manager::{GroupError, GroupRecord, SelectionGroupManager};
pub use node::{GroupSelectable, NodeId, NodeKind, SceneNode, Selectable};
pub use scene::{Scene, SceneError};
pub use selection::{SelectionMode, SelectionSystem};
pub use selection_group::{GroupId, GroupMemberAccess, SelectionGroup};
pub use traversable::{TraversableContext, TraversableNodeSet, TraversableObserver};
pub use undo::{
    Operation, UndoMemento, UndoStateSaver, UndoSystem, UndoableCommand, UndoableKey,
    DEFAULT_UNDO_LEVELS, MAX_UNDO_LEVELS,
};
