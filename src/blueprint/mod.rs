//! Blueprints: declarative, position-indexed structure descriptions

pub mod store;

use serde::{Deserialize, Serialize};

pub use store::{
    validate_blueprint_id, BlueprintStore, FileBlueprintStore, MemoryBlueprintStore,
};

/// One parsed blueprint entry: a relative position, a block type, and
/// its raw state properties in file order. Entries with an empty block
/// string denote "no block here" and are dropped by the planner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlueprintEntry {
    /// Relative position (dx, dy, dz) from the blueprint origin.
    pub pos: [i32; 3],
    /// Block type identifier, e.g. `minecraft:oak_planks`.
    pub block: String,
    /// Ordered key/value state properties.
    #[serde(default)]
    pub properties: Vec<(String, String)>,
}

/// A parsed blueprint: the id it was loaded under plus its entries.
#[derive(Clone, Debug)]
pub struct Blueprint {
    pub id: String,
    pub entries: Vec<BlueprintEntry>,
}

impl Blueprint {
    pub fn new(id: impl Into<String>, entries: Vec<BlueprintEntry>) -> Self {
        Self {
            id: id.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
