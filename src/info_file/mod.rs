//! Persistenz der Selektionsgruppen in der Map-Info-Datei.

pub mod map_info_file;
pub mod node_index;
pub mod selection_groups;
pub mod tokeniser;

pub use map_info_file::{
    apply_info_file, parse_info_file, skip_block, skip_to_block_end, write_info_file,
    InfoFileModule, HEADER_SEQUENCE, MAP_INFO_VERSION,
};
pub use node_index::{build_node_index_map, foreach_saved_node, NodeIndexMap, NodeIndexPair};
pub use selection_groups::{
    SelectionGroupApplyReport, SelectionGroupInfo, SelectionGroupInfoFileModule,
    SelectionGroupNodeMappingEntry, SelectionGroupSummary, SelectionGroupSummaryEntry,
};
pub use tokeniser::{DefTokeniser, ParseError};

use crate::core::Scene;
use crate::shared::EditorOptions;

/// Erzeugt den Inhalt der Info-Datei mit dem Selektionsgruppen-Modul.
pub fn save_selection_groups(scene: &Scene, options: &EditorOptions) -> String {
    let mut module = SelectionGroupInfoFileModule::from_options(options);
    let mut modules: [&mut dyn InfoFileModule; 1] = [&mut module];
    write_info_file(scene, &mut modules)
}

/// Liest eine Info-Datei und überträgt die Gruppen auf die bereits geladene Szene.
///
/// Die Node-Zuordnung basiert auf der aktuellen Hierarchie der Szene.
pub fn load_selection_groups(
    scene: &mut Scene,
    content: &str,
) -> Result<SelectionGroupApplyReport, ParseError> {
    let node_map = build_node_index_map(scene);
    let mut module = SelectionGroupInfoFileModule::new();
    {
        let mut modules: [&mut dyn InfoFileModule; 1] = [&mut module];
        parse_info_file(content, &mut modules)?;
        apply_info_file(scene, &mut modules, &node_map);
    }
    Ok(module.last_report().clone())
}
