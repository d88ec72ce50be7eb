use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::{math::aabb::AABB, voxels::face::Face};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockTypeId(pub u16);

impl BlockTypeId {
    pub const AIR: BlockTypeId = BlockTypeId(0);
    /// Marks cells with no data, e.g. outside of loaded chunks
    pub const VOID: BlockTypeId = BlockTypeId(u16::MAX);

    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum BlockShape {
    #[default]
    Cube,
    /// Two crossed diagonal quads, used for plants
    CrossSprite,
    /// A cube shrunk to the block's hitbox
    BoundingBox,
}

#[derive(Debug, Clone, Deserialize)]
pub enum BlockTextureDefinition {
    Invisible,
    Single(String),
    PerFace {
        top: String,
        bottom: String,
        side: String,
    },
    Faces {
        left: String,
        right: String,
        bottom: String,
        top: String,
        front: String,
        back: String,
    },
}

impl BlockTextureDefinition {
    /// Texture name per face slot, or `None` for invisible blocks.
    pub fn face_textures(&self) -> Option<[&str; 6]> {
        match self {
            BlockTextureDefinition::Invisible => None,
            BlockTextureDefinition::Single(name) => Some([name.as_str(); 6]),
            BlockTextureDefinition::PerFace { top, bottom, side } => Some(Face::all().map(
                |face| match face {
                    Face::Top => top.as_str(),
                    Face::Bottom => bottom.as_str(),
                    _ => side.as_str(),
                },
            )),
            BlockTextureDefinition::Faces {
                left,
                right,
                bottom,
                top,
                front,
                back,
            } => Some([left, right, bottom, top, front, back].map(|name| name.as_str())),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HitboxDefinition {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockDefinition {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub shape: BlockShape,
    #[serde(default = "default_true")]
    pub solid: bool,
    #[serde(default)]
    pub light_passing: bool,
    /// Emitted light per color channel, 0..=15
    #[serde(default)]
    pub emission: [u8; 3],
    #[serde(default)]
    pub rotatable: bool,
    #[serde(default)]
    pub draw_group: u8,
    #[serde(default)]
    pub hitbox: Option<HitboxDefinition>,
    pub textures: BlockTextureDefinition,
}

/// Layout of `blocks.ron`
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDefinitionsFile {
    /// Paint order of draw groups. Defaults to order of first appearance.
    #[serde(default)]
    pub draw_groups: Option<Vec<u8>>,
    pub blocks: Vec<BlockDefinition>,
}

#[derive(Debug, Error, PartialEq)]
pub enum BlockDatabaseError {
    #[error("block '{name}' reuses id {id}")]
    DuplicateId { id: u16, name: String },
    #[error("block '{name}' uses the reserved void id {id}")]
    ReservedId { id: u16, name: String },
    #[error("block 0 ('{name}') must be non-solid and light passing")]
    AirNotPassable { name: String },
    #[error("block '{name}' uses draw group {group} which is not registered")]
    UnregisteredDrawGroup { name: String, group: u8 },
    #[error("draw group {group} is registered twice")]
    DuplicateDrawGroup { group: u8 },
    #[error("block '{name}' has a hitbox outside the unit cube or with min > max")]
    InvalidHitbox { name: String },
    #[error("block '{name}' has emission {emission:?}, channels must be at most 15")]
    InvalidEmission { name: String, emission: [u8; 3] },
}

#[derive(Debug, Clone)]
pub struct BlockType {
    pub id: BlockTypeId,
    pub name: String,
    pub shape: BlockShape,
    pub solid: bool,
    pub light_passing: bool,
    pub emission: [u8; 3],
    pub rotatable: bool,
    pub draw_group: u8,
    /// Block-local box in [0, 1]³
    pub hitbox: AABB,
    pub textures: BlockTextureDefinition,
}

impl BlockType {
    pub fn is_emissive(&self) -> bool {
        self.emission.iter().any(|&channel| channel > 0)
    }

    fn from_definition(def: BlockDefinition) -> Result<Self, BlockDatabaseError> {
        let hitbox = match def.hitbox {
            Some(hitbox) => {
                let min = Vec3::from(hitbox.min);
                let max = Vec3::from(hitbox.max);
                let in_unit_cube = min.cmpge(Vec3::ZERO).all() && max.cmple(Vec3::ONE).all();
                if !in_unit_cube || min.cmpgt(max).any() {
                    return Err(BlockDatabaseError::InvalidHitbox { name: def.name });
                }
                AABB { min, max }
            }
            None => AABB::UNIT,
        };

        if def.emission.iter().any(|&channel| channel > 15) {
            return Err(BlockDatabaseError::InvalidEmission {
                name: def.name,
                emission: def.emission,
            });
        }

        Ok(BlockType {
            id: BlockTypeId(def.id),
            name: def.name,
            shape: def.shape,
            solid: def.solid,
            light_passing: def.light_passing,
            emission: def.emission,
            rotatable: def.rotatable,
            draw_group: def.draw_group,
            hitbox,
            textures: def.textures,
        })
    }

    fn air() -> Self {
        BlockType {
            id: BlockTypeId::AIR,
            name: "air".to_string(),
            shape: BlockShape::Cube,
            solid: false,
            light_passing: true,
            emission: [0; 3],
            rotatable: false,
            draw_group: 0,
            hitbox: AABB::UNIT,
            textures: BlockTextureDefinition::Invisible,
        }
    }
}

/// Resolved block definitions, indexed by block id.
pub struct BlockDatabase {
    blocks: Vec<Option<BlockType>>,
    draw_groups: Vec<u8>,
}

impl Default for BlockDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockDatabase {
    /// A database containing only air.
    pub fn new() -> Self {
        BlockDatabase {
            blocks: vec![Some(BlockType::air())],
            draw_groups: Vec::new(),
        }
    }

    pub fn from_definitions(file: BlockDefinitionsFile) -> Result<Self, BlockDatabaseError> {
        let mut database = BlockDatabase::new();
        let mut seen_ids = Vec::new();

        for def in file.blocks {
            if def.id == BlockTypeId::VOID.0 {
                return Err(BlockDatabaseError::ReservedId {
                    id: def.id,
                    name: def.name,
                });
            }
            if seen_ids.contains(&def.id) {
                return Err(BlockDatabaseError::DuplicateId {
                    id: def.id,
                    name: def.name,
                });
            }
            seen_ids.push(def.id);

            let block = BlockType::from_definition(def)?;
            if block.id.is_air() && (block.solid || !block.light_passing) {
                return Err(BlockDatabaseError::AirNotPassable { name: block.name });
            }
            database.insert(block);
        }

        database.draw_groups = match file.draw_groups {
            Some(groups) => {
                for (i, group) in groups.iter().enumerate() {
                    if groups[..i].contains(group) {
                        return Err(BlockDatabaseError::DuplicateDrawGroup { group: *group });
                    }
                }

                if let Some(block) = database
                    .iter_blocks()
                    .find(|block| !block.id.is_air() && !groups.contains(&block.draw_group))
                {
                    return Err(BlockDatabaseError::UnregisteredDrawGroup {
                        name: block.name.clone(),
                        group: block.draw_group,
                    });
                }
                groups
            }
            None => {
                let mut groups: Vec<u8> = Vec::new();
                for block in database.iter_blocks().filter(|block| !block.id.is_air()) {
                    if !groups.contains(&block.draw_group) {
                        groups.push(block.draw_group);
                    }
                }
                groups
            }
        };

        Ok(database)
    }

    pub fn from_ron_str(data: &str) -> anyhow::Result<Self> {
        let file: BlockDefinitionsFile =
            ron::from_str(data).context("Failed to parse block defs file")?;
        let database = BlockDatabase::from_definitions(file).context("Invalid block definitions")?;

        log::info!(
            "Loaded {} block definitions in {} draw groups",
            database.len(),
            database.draw_groups.len()
        );
        Ok(database)
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read block defs file {}", path.display()))?;
        Self::from_ron_str(&data)
    }

    fn insert(&mut self, block: BlockType) {
        let index = block.id.0 as usize;
        if index >= self.blocks.len() {
            self.blocks.resize(index + 1, None);
        }
        self.blocks[index] = Some(block);
    }

    /// Unknown ids and [`BlockTypeId::VOID`] return `None`.
    pub fn get(&self, id: BlockTypeId) -> Option<&BlockType> {
        self.blocks.get(id.0 as usize)?.as_ref()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&BlockType> {
        self.iter_blocks().find(|block| block.name == name)
    }

    pub fn iter_blocks(&self) -> impl Iterator<Item = &BlockType> {
        self.blocks.iter().flatten()
    }

    /// Draw groups in paint order.
    pub fn draw_groups(&self) -> &[u8] {
        &self.draw_groups
    }

    pub fn len(&self) -> usize {
        self.iter_blocks().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the highest registered id.
    pub fn id_bound(&self) -> usize {
        self.blocks.len()
    }
}
