//! Info-Datei-Modul für Selektionsgruppen.
//!
//! Schreibt zwei Blöcke:
//!
//! ```text
//!     SelectionGroups
//!     {
//!         SelectionGroup 3 { "Linke Säulen" }
//!     }
//!     SelectionGroupNodeMapping
//!     {
//!         Node { ( 0 4 ) ( 3 ) } // Entity 1 (worldspawn) > Brush 9
//!     }
//! ```

use super::map_info_file::{skip_to_block_end, InfoFileModule};
use super::node_index::{NodeIndexMap, NodeIndexPair};
use super::tokeniser::{DefTokeniser, ParseError};
use crate::core::{GroupId, NodeId, Scene};
use crate::shared::EditorOptions;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const SELECTION_GROUPS_BLOCK: &str = "SelectionGroups";
pub const SELECTION_GROUP_KEY: &str = "SelectionGroup";
pub const NODE_MAPPING_BLOCK: &str = "SelectionGroupNodeMapping";
pub const NODE_KEY: &str = "Node";

const QUOTE_ESCAPE: &str = "&quot;";

/// Eine gelesene Gruppendefinition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionGroupInfo {
    pub id: GroupId,
    pub name: String,
}

/// Ergebnis von `apply_info_to_scene`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionGroupApplyReport {
    pub groups_created: usize,
    pub nodes_assigned: usize,
    /// Node-Einträge ohne passenden Node in der Szene
    pub unresolved_nodes: usize,
    /// Verweise auf nicht definierte Gruppen-IDs
    pub invalid_group_refs: usize,
}

/// Übersicht einer Gruppe für die Kommandozeilen-Ausgabe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionGroupSummaryEntry {
    pub id: GroupId,
    pub name: String,
    pub display_name: String,
    pub node_count: usize,
}

/// Gelesene Zuordnung eines Nodes zu seinen Gruppen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionGroupNodeMappingEntry {
    pub node: NodeIndexPair,
    pub group_ids: Vec<GroupId>,
}

/// Übersicht aller gelesenen Gruppen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionGroupSummary {
    pub groups: Vec<SelectionGroupSummaryEntry>,
    pub mapped_nodes: usize,
    pub node_mappings: Vec<SelectionGroupNodeMappingEntry>,
}

/// Modul für die Blöcke `SelectionGroups` und `SelectionGroupNodeMapping`.
#[derive(Debug, Default)]
pub struct SelectionGroupInfoFileModule {
    write_debug_comments: bool,
    group_buffer: String,
    node_buffer: String,
    /// Gruppen, die beim Speichern in mindestens einer Node-Zeile stehen
    saved_group_ids: BTreeSet<GroupId>,
    group_info: Vec<SelectionGroupInfo>,
    node_mapping: BTreeMap<NodeIndexPair, Vec<GroupId>>,
    last_report: SelectionGroupApplyReport,
}

impl SelectionGroupInfoFileModule {
    /// Erstellt das Modul mit Debug-Kommentaren in den Node-Zeilen.
    pub fn new() -> Self {
        Self {
            write_debug_comments: true,
            ..Self::default()
        }
    }

    pub fn from_options(options: &EditorOptions) -> Self {
        Self {
            write_debug_comments: options.write_debug_comments,
            ..Self::default()
        }
    }

    /// Gelesene Gruppendefinitionen in Dateireihenfolge
    pub fn group_info(&self) -> &[SelectionGroupInfo] {
        &self.group_info
    }

    /// Gelesene Node-Zuordnungen
    pub fn node_mapping(&self) -> &BTreeMap<NodeIndexPair, Vec<GroupId>> {
        &self.node_mapping
    }

    /// Ergebnis der letzten Übertragung auf eine Szene
    pub fn last_report(&self) -> &SelectionGroupApplyReport {
        &self.last_report
    }

    /// Fasst die gelesenen Daten zusammen (Gruppen mit Anzahl zugeordneter Nodes).
    pub fn summary(&self, label_prefix: &str) -> SelectionGroupSummary {
        let mut counts: BTreeMap<GroupId, usize> = BTreeMap::new();
        for ids in self.node_mapping.values() {
            for id in ids {
                *counts.entry(*id).or_default() += 1;
            }
        }

        let groups = self
            .group_info
            .iter()
            .map(|info| SelectionGroupSummaryEntry {
                id: info.id,
                name: info.name.clone(),
                display_name: if info.name.is_empty() {
                    format!("{} {}", label_prefix, info.id)
                } else {
                    info.name.clone()
                },
                node_count: counts.get(&info.id).copied().unwrap_or(0),
            })
            .collect();

        let node_mappings = self
            .node_mapping
            .iter()
            .map(|(node, group_ids)| SelectionGroupNodeMappingEntry {
                node: *node,
                group_ids: group_ids.clone(),
            })
            .collect();

        SelectionGroupSummary {
            groups,
            mapped_nodes: self.node_mapping.len(),
            node_mappings,
        }
    }

    fn save_node(&mut self, scene: &Scene, node: NodeId, pair: NodeIndexPair) {
        let ids = scene.group_ids_of(node);
        if ids.is_empty() {
            return;
        }

        let line = &mut self.node_buffer;
        line.push_str(&format!("\t\t{} {{ ( {} ", NODE_KEY, pair.entity));
        if let Some(primitive) = pair.primitive {
            line.push_str(&format!("{} ", primitive));
        }
        line.push_str(") ( ");
        for id in ids {
            line.push_str(&format!("{} ", id));
        }
        line.push_str(") }");
        if self.write_debug_comments {
            line.push_str(&format!(" // {}", scene.node_info(node)));
        }
        line.push('\n');

        self.saved_group_ids.extend(ids.iter().copied());
    }

    fn parse_selection_groups(&mut self, tok: &mut DefTokeniser<'_>) -> Result<(), ParseError> {
        tok.assert_next_token("{")?;
        loop {
            let token = tok.next_token()?;
            if token == "}" {
                break;
            }
            if token != SELECTION_GROUP_KEY {
                log::warn!(
                    "Zeile {}: unerwartetes Token '{}' in {}",
                    tok.line(),
                    token,
                    SELECTION_GROUPS_BLOCK
                );
                continue;
            }

            let mut open = 0;
            match parse_group_record(tok, &mut open) {
                Ok(info) => self.group_info.push(info),
                Err(ParseError::InvalidNumber { token, line }) => {
                    return abandon_block(tok, SELECTION_GROUPS_BLOCK, &token, line, open);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn parse_node_mapping(&mut self, tok: &mut DefTokeniser<'_>) -> Result<(), ParseError> {
        tok.assert_next_token("{")?;
        loop {
            let token = tok.next_token()?;
            if token == "}" {
                break;
            }
            if token != NODE_KEY {
                log::warn!(
                    "Zeile {}: unerwartetes Token '{}' in {}",
                    tok.line(),
                    token,
                    NODE_MAPPING_BLOCK
                );
                continue;
            }

            let mut open = 0;
            match parse_node_record(tok, &mut open) {
                Ok((pair, ids)) => self.node_mapping.entry(pair).or_default().extend(ids),
                Err(ParseError::InvalidNumber { token, line }) => {
                    return abandon_block(tok, NODE_MAPPING_BLOCK, &token, line, open);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Liest `<id> { "<name>" }`. `open` zählt die offenen Klammern des Eintrags.
fn parse_group_record(
    tok: &mut DefTokeniser<'_>,
    open: &mut usize,
) -> Result<SelectionGroupInfo, ParseError> {
    let id: GroupId = tok.next_number()?;
    tok.assert_next_token("{")?;
    *open += 1;
    let name = tok.next_token()?.replace(QUOTE_ESCAPE, "\"");
    tok.assert_next_token("}")?;
    *open -= 1;
    Ok(SelectionGroupInfo { id, name })
}

/// Liest `{ ( <e> [<p>] ) ( <ids> ) }`. `open` zählt die offenen Klammern des Eintrags.
fn parse_node_record(
    tok: &mut DefTokeniser<'_>,
    open: &mut usize,
) -> Result<(NodeIndexPair, Vec<GroupId>), ParseError> {
    tok.assert_next_token("{")?;
    *open += 1;
    tok.assert_next_token("(")?;
    let entity: usize = tok.next_number()?;
    let next = tok.next_token()?;
    let primitive = if next == ")" {
        None
    } else {
        let primitive = tok.parse_number::<usize>(next)?;
        tok.assert_next_token(")")?;
        Some(primitive)
    };

    tok.assert_next_token("(")?;
    let mut ids = Vec::new();
    loop {
        let token = tok.next_token()?;
        if token == ")" {
            break;
        }
        ids.push(tok.parse_number::<GroupId>(token)?);
    }
    tok.assert_next_token("}")?;
    *open -= 1;

    Ok((NodeIndexPair { entity, primitive }, ids))
}

/// Bricht einen Block nach einer ungültigen Zahl ab und springt hinter dessen `}`.
///
/// Bereits gelesene Einträge bleiben erhalten; die Datei wird mit dem nächsten
/// Block fortgesetzt.
fn abandon_block(
    tok: &mut DefTokeniser<'_>,
    block: &str,
    token: &str,
    line: usize,
    open: usize,
) -> Result<(), ParseError> {
    log::warn!(
        "Zeile {}: ungültige Zahl '{}' in {}, Rest des Blocks übersprungen",
        line,
        token,
        block
    );
    // Block selbst plus offene Klammern des Eintrags; das fehlerhafte Token ist schon verbraucht
    let depth = match token {
        "{" => open + 2,
        "}" => open,
        _ => open + 1,
    };
    skip_to_block_end(tok, depth)
}

impl InfoFileModule for SelectionGroupInfoFileModule {
    fn name(&self) -> &str {
        "SelectionGroups"
    }

    fn on_info_file_save_start(&mut self) {
        self.group_buffer.clear();
        self.node_buffer.clear();
        self.saved_group_ids.clear();
    }

    fn on_begin_save_map(&mut self, _scene: &Scene) {}

    /// Schreibt nur Gruppen, auf die eine gespeicherte Node-Zeile verweist.
    /// Leere Gruppen und Gruppen mit ausschließlich abgehängten Mitgliedern entfallen.
    fn on_finish_save_map(&mut self, scene: &Scene) {
        for group in scene.groups().iter() {
            if group.is_empty() || !self.saved_group_ids.contains(&group.id()) {
                continue;
            }
            self.group_buffer.push_str(&format!(
                "\t\t{} {} {{ \"{}\" }}\n",
                SELECTION_GROUP_KEY,
                group.id(),
                group.name().replace('"', QUOTE_ESCAPE)
            ));
        }
    }

    fn on_save_entity(&mut self, scene: &Scene, node: NodeId, entity_num: usize) {
        self.save_node(scene, node, NodeIndexPair::entity(entity_num));
    }

    fn on_save_primitive(
        &mut self,
        scene: &Scene,
        node: NodeId,
        entity_num: usize,
        primitive_num: usize,
    ) {
        self.save_node(
            scene,
            node,
            NodeIndexPair::primitive(entity_num, primitive_num),
        );
    }

    fn write_blocks(&self, out: &mut String) {
        for (block, buffer) in [
            (SELECTION_GROUPS_BLOCK, &self.group_buffer),
            (NODE_MAPPING_BLOCK, &self.node_buffer),
        ] {
            out.push_str(&format!("\t{}\n\t{{\n", block));
            out.push_str(buffer);
            out.push_str("\t}\n");
        }
    }

    fn on_info_file_save_finished(&mut self) {
        self.group_buffer.clear();
        self.node_buffer.clear();
        self.saved_group_ids.clear();
    }

    fn on_info_file_load_start(&mut self) {
        self.group_info.clear();
        self.node_mapping.clear();
        self.last_report = SelectionGroupApplyReport::default();
    }

    fn can_parse_block(&self, block_name: &str) -> bool {
        block_name == SELECTION_GROUPS_BLOCK || block_name == NODE_MAPPING_BLOCK
    }

    fn parse_block(
        &mut self,
        block_name: &str,
        tok: &mut DefTokeniser<'_>,
    ) -> Result<(), ParseError> {
        match block_name {
            SELECTION_GROUPS_BLOCK => self.parse_selection_groups(tok),
            NODE_MAPPING_BLOCK => self.parse_node_mapping(tok),
            other => Err(ParseError::UnexpectedToken {
                expected: SELECTION_GROUPS_BLOCK.to_string(),
                found: other.to_string(),
                line: tok.line(),
            }),
        }
    }

    fn apply_info_to_scene(&mut self, scene: &mut Scene, node_map: &NodeIndexMap) {
        let mut report = SelectionGroupApplyReport::default();
        scene.delete_all_selection_groups();

        let mut created = BTreeSet::new();
        for info in &self.group_info {
            match scene.create_selection_group_with_id(info.id) {
                Ok(id) => {
                    scene.set_group_name(id, info.name.clone());
                    created.insert(id);
                    report.groups_created += 1;
                }
                Err(e) => log::error!("Selektionsgruppe konnte nicht erstellt werden: {}", e),
            }
        }

        for (pair, ids) in &self.node_mapping {
            let Some(node) = node_map.get(pair).copied() else {
                report.unresolved_nodes += 1;
                continue;
            };
            for id in ids {
                if !created.contains(id) {
                    log::warn!("Node {}: ungültige Gruppen-ID {} ignoriert", pair, id);
                    report.invalid_group_refs += 1;
                    continue;
                }
                if scene.add_node_to_group(*id, node) {
                    report.nodes_assigned += 1;
                }
            }
        }

        if report.unresolved_nodes > 0 {
            log::warn!(
                "{} Node-Zuordnungen konnten keinem Node zugeordnet werden",
                report.unresolved_nodes
            );
        }
        log::info!(
            "{} Selektionsgruppen geladen, {} Zuordnungen übernommen",
            report.groups_created,
            report.nodes_assigned
        );
        self.last_report = report;
    }

    fn on_info_file_load_finished(&mut self) {
        self.group_info.clear();
        self.node_mapping.clear();
    }
}
