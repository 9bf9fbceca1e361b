//! Rahmen der Map-Info-Datei: Header, Block-Verteilung an Module, Speicher-Traversierung.

use super::node_index::{foreach_saved_node, NodeIndexMap};
use super::tokeniser::{DefTokeniser, ParseError};
use crate::core::{NodeId, Scene};

/// Header-Wörter vor der Versionsnummer
pub const HEADER_SEQUENCE: [&str; 5] = ["DarkRadiant", "Map", "Information", "File", "Version"];
/// Unterstützte Formatversion
pub const MAP_INFO_VERSION: u32 = 2;

/// Ein Modul, das eigene Blöcke in die Info-Datei schreibt und daraus liest.
///
/// Speichern: `on_info_file_save_start`, `on_begin_save_map`, je Node
/// `on_save_entity`/`on_save_primitive`, `on_finish_save_map`, `write_blocks`,
/// `on_info_file_save_finished`.
///
/// Laden: `on_info_file_load_start`, `parse_block` für jeden eigenen Block,
/// `apply_info_to_scene`, `on_info_file_load_finished`.
pub trait InfoFileModule {
    /// Name für Log-Ausgaben
    fn name(&self) -> &str;

    fn on_info_file_save_start(&mut self) {}
    fn on_begin_save_map(&mut self, scene: &Scene);
    fn on_finish_save_map(&mut self, _scene: &Scene) {}
    fn on_save_entity(&mut self, scene: &Scene, node: NodeId, entity_num: usize);
    fn on_save_primitive(
        &mut self,
        scene: &Scene,
        node: NodeId,
        entity_num: usize,
        primitive_num: usize,
    );
    /// Hängt die eigenen Blöcke an die Ausgabe an.
    fn write_blocks(&self, out: &mut String);
    fn on_info_file_save_finished(&mut self) {}

    fn on_info_file_load_start(&mut self) {}
    fn can_parse_block(&self, block_name: &str) -> bool;
    /// Liest einen Block; der Tokeniser steht direkt hinter dem Blocknamen.
    fn parse_block(
        &mut self,
        block_name: &str,
        tok: &mut DefTokeniser<'_>,
    ) -> Result<(), ParseError>;
    fn apply_info_to_scene(&mut self, scene: &mut Scene, node_map: &NodeIndexMap);
    fn on_info_file_load_finished(&mut self) {}
}

/// Schreibt die komplette Info-Datei einer Szene.
pub fn write_info_file(scene: &Scene, modules: &mut [&mut dyn InfoFileModule]) -> String {
    for module in modules.iter_mut() {
        module.on_info_file_save_start();
        module.on_begin_save_map(scene);
    }

    foreach_saved_node(scene, |node, pair| {
        for module in modules.iter_mut() {
            match pair.primitive {
                Some(primitive_num) => {
                    module.on_save_primitive(scene, node, pair.entity, primitive_num)
                }
                None => module.on_save_entity(scene, node, pair.entity),
            }
        }
    });

    let mut out = format!("{} {}\n{{\n", HEADER_SEQUENCE.join(" "), MAP_INFO_VERSION);
    for module in modules.iter_mut() {
        module.on_finish_save_map(scene);
        module.write_blocks(&mut out);
    }
    out.push_str("}\n");

    for module in modules.iter_mut() {
        module.on_info_file_save_finished();
    }
    out
}

/// Liest eine Info-Datei und verteilt die Blöcke an die Module.
///
/// Unbekannte Blöcke werden per Klammerzählung übersprungen.
pub fn parse_info_file(
    content: &str,
    modules: &mut [&mut dyn InfoFileModule],
) -> Result<(), ParseError> {
    for module in modules.iter_mut() {
        module.on_info_file_load_start();
    }

    let mut tok = DefTokeniser::new(content);
    for word in HEADER_SEQUENCE {
        if tok.assert_next_token(word).is_err() {
            return Err(ParseError::MissingHeader);
        }
    }
    let version: u32 = tok.next_number()?;
    if version != MAP_INFO_VERSION {
        return Err(ParseError::UnsupportedVersion(version));
    }
    tok.assert_next_token("{")?;

    loop {
        let block_name = tok.next_token()?;
        if block_name == "}" {
            break;
        }
        match modules
            .iter_mut()
            .find(|module| module.can_parse_block(&block_name))
        {
            Some(module) => {
                log::debug!("Info-Block '{}' -> Modul {}", block_name, module.name());
                module.parse_block(&block_name, &mut tok)?;
            }
            None => {
                log::debug!("Unbekannter Info-Block '{}' übersprungen", block_name);
                skip_block(&mut tok)?;
            }
        }
    }
    Ok(())
}

/// Überträgt die geparsten Daten aller Module auf die Szene.
pub fn apply_info_file(
    scene: &mut Scene,
    modules: &mut [&mut dyn InfoFileModule],
    node_map: &NodeIndexMap,
) {
    for module in modules.iter_mut() {
        module.apply_info_to_scene(scene, node_map);
        module.on_info_file_load_finished();
    }
}

/// Überspringt einen `{ ... }`-Block inklusive verschachtelter Blöcke.
pub fn skip_block(tok: &mut DefTokeniser<'_>) -> Result<(), ParseError> {
    tok.assert_next_token("{")?;
    skip_to_block_end(tok, 1)
}

/// Verbraucht Tokens, bis `depth` offene Klammern geschlossen sind.
pub fn skip_to_block_end(tok: &mut DefTokeniser<'_>, mut depth: usize) -> Result<(), ParseError> {
    while depth > 0 {
        match tok.next_token()?.as_str() {
            "{" => depth += 1,
            "}" => depth -= 1,
            _ => {}
        }
    }
    Ok(())
}
