//! Zuordnung zwischen Szenen-Nodes und ihrer Position in der Map-Datei.

use crate::core::{NodeId, Scene};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Position eines Nodes in Speicher-Reihenfolge: Entity-Nummer und,
/// für Primitive, die Nummer innerhalb der Entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndexPair {
    pub entity: usize,
    pub primitive: Option<usize>,
}

impl NodeIndexPair {
    pub fn entity(entity: usize) -> Self {
        Self {
            entity,
            primitive: None,
        }
    }

    pub fn primitive(entity: usize, primitive: usize) -> Self {
        Self {
            entity,
            primitive: Some(primitive),
        }
    }
}

impl fmt::Display for NodeIndexPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primitive {
            Some(primitive) => write!(f, "({} {})", self.entity, primitive),
            None => write!(f, "({})", self.entity),
        }
    }
}

/// Index-Paar -> Node der aktuell geladenen Szene
pub type NodeIndexMap = BTreeMap<NodeIndexPair, NodeId>;

/// Durchläuft alle speicherbaren Nodes in Datei-Reihenfolge.
///
/// Entities sind die Entity-Kinder der Wurzel, Primitive die Brush-/Patch-Kinder
/// einer Entity. Andere Nodes (z.B. Merge-Aktionen) werden nicht gezählt.
pub fn foreach_saved_node(scene: &Scene, mut f: impl FnMut(NodeId, NodeIndexPair)) {
    let entities = scene
        .children_of(scene.root())
        .iter()
        .copied()
        .filter(|id| scene.node(*id).is_some_and(|n| n.kind().is_entity()));

    for (entity_num, entity) in entities.enumerate() {
        f(entity, NodeIndexPair::entity(entity_num));

        let primitives = scene
            .children_of(entity)
            .iter()
            .copied()
            .filter(|id| scene.node(*id).is_some_and(|n| n.kind().is_primitive()));
        for (primitive_num, primitive) in primitives.enumerate() {
            f(primitive, NodeIndexPair::primitive(entity_num, primitive_num));
        }
    }
}

/// Baut die Index-Zuordnung der aktuellen Szene auf (nach dem Laden der Map).
pub fn build_node_index_map(scene: &Scene) -> NodeIndexMap {
    let mut map = NodeIndexMap::new();
    foreach_saved_node(scene, |node, pair| {
        map.insert(pair, node);
    });
    map
}
