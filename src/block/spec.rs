//! Block specifications: a validated type identifier plus an ordered,
//! typed property bag
//!
//! The canonical text form is `type[key=val,key=val,...]`, the same
//! encoding blueprint files use. Identifiers and the three
//! orientation-bearing properties (`facing`, `axis`, `rotation`) are
//! validated at construction; unrecognized properties are carried as
//! opaque key/value pairs and never rotated.

use std::fmt;

use crate::core::error::Error;
use crate::core::types::{Axis, Facing, Result, Rotation};
use crate::math::rotation::{rotate_axis, rotate_facing, rotate_sign_rotation};

/// Validated block type identifier, e.g. `minecraft:oak_stairs`.
///
/// The namespace is optional in input and omitted namespaces are
/// preserved as written so round-tripping a blueprint does not alter it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(String);

impl BlockId {
    /// Parse and validate an identifier: an optional lowercase namespace,
    /// a single `:`, and a lowercase path of `[a-z0-9_-]`.
    pub fn new(id: &str) -> Result<Self> {
        let (namespace, path) = match id.split_once(':') {
            Some((ns, path)) => (Some(ns), path),
            None => (None, id),
        };
        let valid_part = |s: &str| {
            !s.is_empty()
                && s.bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        };
        if let Some(ns) = namespace {
            if !valid_part(ns) {
                return Err(Error::Spec(format!("invalid block namespace in {id:?}")));
            }
        }
        if !valid_part(path) || path.contains(':') {
            return Err(Error::Spec(format!("invalid block id {id:?}")));
        }
        Ok(Self(id.to_string()))
    }

    /// Engine-internal constructor for identifiers known valid at
    /// compile time. Callers guarantee the literal satisfies [`new`].
    ///
    /// [`new`]: BlockId::new
    pub(crate) fn known(id: &'static str) -> Self {
        debug_assert!(BlockId::new(id).is_ok());
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier path with any namespace stripped.
    pub fn path(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, path)) => path,
            None => &self.0,
        }
    }

    /// Classify this identifier into the closed kind enumeration.
    pub fn kind(&self) -> BlockKind {
        BlockKind::classify(self.path())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed classification of block types.
///
/// Every engine decision (air tests, protection policy) branches on a
/// kind, never on the raw identifier string. Types the engine has no
/// opinion about fall into `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Air,
    Bed,
    RespawnAnchor,
    Chest,
    EnderChest,
    Barrel,
    ShulkerBox,
    Beacon,
    EnchantingTable,
    Anvil,
    Stairs,
    Other,
}

impl BlockKind {
    fn classify(path: &str) -> Self {
        match path {
            "air" | "cave_air" | "void_air" => BlockKind::Air,
            "respawn_anchor" => BlockKind::RespawnAnchor,
            "chest" | "trapped_chest" => BlockKind::Chest,
            "ender_chest" => BlockKind::EnderChest,
            "barrel" => BlockKind::Barrel,
            "beacon" => BlockKind::Beacon,
            "enchanting_table" => BlockKind::EnchantingTable,
            "anvil" | "chipped_anvil" | "damaged_anvil" => BlockKind::Anvil,
            _ if path.ends_with("_bed") => BlockKind::Bed,
            _ if path.ends_with("shulker_box") => BlockKind::ShulkerBox,
            _ if path.ends_with("_stairs") => BlockKind::Stairs,
            _ => BlockKind::Other,
        }
    }
}

/// One block-state property, typed where the engine understands the key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Property {
    Facing(Facing),
    Axis(Axis),
    /// Sign/banner rotation, 0-15.
    SignRotation(u8),
    /// Any property the engine does not model. Carried through verbatim
    /// and never rotated.
    Other { key: String, value: String },
}

impl Property {
    /// Parse a key/value pair, validating the known orientation keys.
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        match key {
            "facing" => Facing::parse(value)
                .map(Property::Facing)
                .ok_or_else(|| Error::Spec(format!("invalid facing value {value:?}"))),
            "axis" => Axis::parse(value)
                .map(Property::Axis)
                .ok_or_else(|| Error::Spec(format!("invalid axis value {value:?}"))),
            "rotation" => match value.parse::<u8>() {
                Ok(r) if r < 16 => Ok(Property::SignRotation(r)),
                _ => Err(Error::Spec(format!("invalid rotation value {value:?}"))),
            },
            _ => Ok(Property::Other {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Property::Facing(_) => "facing",
            Property::Axis(_) => "axis",
            Property::SignRotation(_) => "rotation",
            Property::Other { key, .. } => key,
        }
    }

    /// Apply a quarter-turn rotation. Unrecognized properties are the
    /// identity transform.
    pub fn rotated(&self, rotation: Rotation) -> Property {
        match self {
            Property::Facing(facing) => Property::Facing(rotate_facing(*facing, rotation)),
            Property::Axis(axis) => Property::Axis(rotate_axis(*axis, rotation)),
            Property::SignRotation(value) => {
                Property::SignRotation(rotate_sign_rotation(*value, rotation))
            }
            other => other.clone(),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Facing(facing) => write!(f, "facing={}", facing.as_str()),
            Property::Axis(axis) => write!(f, "axis={}", axis.as_str()),
            Property::SignRotation(value) => write!(f, "rotation={value}"),
            Property::Other { key, value } => write!(f, "{key}={value}"),
        }
    }
}

/// A block type plus its ordered state properties: one write's worth of
/// world content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockSpec {
    id: BlockId,
    properties: Vec<Property>,
}

impl BlockSpec {
    pub fn new(id: BlockId, properties: Vec<Property>) -> Self {
        Self { id, properties }
    }

    /// Plain air.
    pub fn air() -> Self {
        Self {
            id: BlockId("minecraft:air".to_string()),
            properties: Vec::new(),
        }
    }

    /// Parse the canonical text form `type[key=val,key=val,...]`.
    pub fn parse(text: &str) -> Result<Self> {
        let (id_part, props_part) = match text.split_once('[') {
            Some((id, rest)) => {
                let inner = rest
                    .strip_suffix(']')
                    .ok_or_else(|| Error::Spec(format!("unterminated property list in {text:?}")))?;
                (id, Some(inner))
            }
            None => (text, None),
        };
        let id = BlockId::new(id_part)?;
        let mut properties = Vec::new();
        if let Some(inner) = props_part {
            for pair in inner.split(',').filter(|p| !p.is_empty()) {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| Error::Spec(format!("malformed property {pair:?}")))?;
                properties.push(Property::parse(key.trim(), value.trim())?);
            }
        }
        Ok(Self { id, properties })
    }

    /// Build from an identifier and raw key/value pairs, as delivered by
    /// the blueprint parser collaborator.
    pub fn from_parts(
        id: &str,
        properties: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let id = BlockId::new(id)?;
        let properties = properties
            .into_iter()
            .map(|(key, value)| Property::parse(&key, &value))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { id, properties })
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn kind(&self) -> BlockKind {
        self.id.kind()
    }

    pub fn is_air(&self) -> bool {
        self.kind() == BlockKind::Air
    }

    /// Rotate every orientation-bearing property. The identifier and
    /// property order are unchanged.
    pub fn rotated(&self, rotation: Rotation) -> BlockSpec {
        if rotation == Rotation::None {
            return self.clone();
        }
        BlockSpec {
            id: self.id.clone(),
            properties: self.properties.iter().map(|p| p.rotated(rotation)).collect(),
        }
    }
}

impl fmt::Display for BlockSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id.as_str())?;
        if !self.properties.is_empty() {
            f.write_str("[")?;
            for (i, property) in self.properties.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{property}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}
