//! Hilfsfunktionen zum Zusammenführen von Szenen.

pub mod group_order;
pub mod import;
pub mod remap;
pub mod three_way;

pub use group_order::ensure_group_size_order;
pub use import::{import_subgraph, ImportReport};
pub use remap::{remap_group_ids, RemapReport};
pub use three_way::{
    merge_selection_groups_three_way, node_fingerprint, Change, ThreeWayGroupMergeReport,
};
