#![no_main]

use libfuzzer_sys::fuzz_target;
use radiant_scene_groups::info_file::load_selection_groups;
use radiant_scene_groups::{NodeKind, Scene};

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    let mut scene = Scene::new();
    let root = scene.root();
    if let Ok(world) = scene.insert_new_node(root, NodeKind::entity("worldspawn")) {
        let _ = scene.insert_new_node(world, NodeKind::Brush);
        let _ = scene.insert_new_node(world, NodeKind::Patch);
    }

    // Parser und Anwendung dürfen bei beliebiger Eingabe nicht paniken
    let _ = load_selection_groups(&mut scene, content);
});
