//! Radiant Scene Groups Library.
//! Szenengraph-Kern mit Selektionsgruppen, Undo und Info-Datei-Persistenz.

pub mod app;
pub mod core;
pub mod info_file;
pub mod merge;
pub mod shared;

pub use app::{AppCommand, AppController, AppState, CommandError, Precondition, UiState};
pub use core::{
    GroupError, GroupId, NodeId, NodeKind, Scene, SceneError, SelectionGroup,
    SelectionGroupManager, SelectionMode, UndoableCommand,
};
pub use info_file::{
    load_selection_groups, save_selection_groups, ParseError, SelectionGroupInfoFileModule,
};
pub use merge::{
    ensure_group_size_order, import_subgraph, merge_selection_groups_three_way, remap_group_ids,
};
pub use shared::EditorOptions;
