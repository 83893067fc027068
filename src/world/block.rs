//! Block identity and the static registry table (§3.2, §9 "Polymorphism over
//! blocks"): a closed set of ids plus a lookup table, not an open hierarchy.

use std::fmt;

/// An 8-bit tag identifying a block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct BlockId(pub u8);

unsafe impl bytemuck::Pod for BlockId {}
unsafe impl bytemuck::Zeroable for BlockId {}

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
    pub const STONE: BlockId = BlockId(1);
    pub const DIRT: BlockId = BlockId(2);
    pub const GRASS: BlockId = BlockId(3);
    pub const SAND: BlockId = BlockId(4);
    pub const RED_SAND: BlockId = BlockId(5);
    pub const SANDSTONE: BlockId = BlockId(6);
    pub const WATER: BlockId = BlockId(7);
    pub const WOOD: BlockId = BlockId(8);
    pub const LEAVES: BlockId = BlockId(9);
    pub const SNOW: BlockId = BlockId(10);
    pub const ICE: BlockId = BlockId(11);
    pub const GRAVEL: BlockId = BlockId(12);
    pub const CLAY: BlockId = BlockId(13);
    pub const COAL_ORE: BlockId = BlockId(14);
    pub const IRON_ORE: BlockId = BlockId(15);
    pub const GOLD_ORE: BlockId = BlockId(16);
    pub const DIAMOND_ORE: BlockId = BlockId(17);
    pub const TORCH: BlockId = BlockId(18);
    pub const LAVA: BlockId = BlockId(19);
    pub const CACTUS: BlockId = BlockId(20);
    pub const TALL_GRASS: BlockId = BlockId(21);
    pub const BEDROCK: BlockId = BlockId(22);

    pub const COUNT: usize = 23;

    pub fn is_air(self) -> bool {
        self == BlockId::AIR
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match registry().get(*self) {
            Some(def) => write!(f, "{}", def.name),
            None => write!(f, "Block({})", self.0),
        }
    }
}

/// Per-face texture tile ids (in atlas-tile-id space, opaque to this crate).
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceTextures {
    pub top: u16,
    pub bottom: u16,
    pub side: u16,
}

impl FaceTextures {
    pub const fn uniform(tile: u16) -> Self {
        Self { top: tile, bottom: tile, side: tile }
    }
}

/// Static description of one block kind: solidity, transparency, light
/// emission, per-face textures, and color tint.
#[derive(Debug, Clone, Copy)]
pub struct BlockDef {
    pub id: BlockId,
    pub name: &'static str,
    pub solid: bool,
    pub transparent: bool,
    pub light_emission: u8,
    pub hardness_secs: f32,
    pub textures: FaceTextures,
    pub tint: [f32; 3],
}

impl BlockDef {
    /// A face between this block and `other` is emitted per §4.2: solid
    /// facing non-solid, or differing transparent kinds. Same-kind
    /// transparent (water-water) is collapsed.
    pub fn face_visible_against(&self, other: &BlockDef) -> bool {
        if !self.solid {
            return false;
        }
        if !other.solid {
            return true;
        }
        self.transparent && other.transparent && self.id != other.id
    }
}

const fn def(
    id: BlockId,
    name: &'static str,
    solid: bool,
    transparent: bool,
    light_emission: u8,
    hardness_secs: f32,
    textures: FaceTextures,
    tint: [f32; 3],
) -> BlockDef {
    BlockDef { id, name, solid, transparent, light_emission, hardness_secs, textures, tint }
}

/// The closed registry table: one static entry per `BlockId`. Adding a block
/// is a table-entry addition, never an inheritance hierarchy (§9).
static TABLE: [BlockDef; BlockId::COUNT] = [
    def(BlockId::AIR, "Air", false, true, 0, 0.0, FaceTextures::uniform(0), [1.0, 1.0, 1.0]),
    def(BlockId::STONE, "Stone", true, false, 0, 1.5, FaceTextures::uniform(1), [0.55, 0.55, 0.55]),
    def(BlockId::DIRT, "Dirt", true, false, 0, 0.5, FaceTextures::uniform(2), [0.45, 0.32, 0.2]),
    def(BlockId::GRASS, "Grass", true, false, 0, 0.6, FaceTextures { top: 3, bottom: 2, side: 4 }, [0.36, 0.62, 0.25]),
    def(BlockId::SAND, "Sand", true, false, 0, 0.5, FaceTextures::uniform(5), [0.87, 0.8, 0.58]),
    def(BlockId::RED_SAND, "Red Sand", true, false, 0, 0.5, FaceTextures::uniform(6), [0.73, 0.4, 0.22]),
    def(BlockId::SANDSTONE, "Sandstone", true, false, 0, 0.8, FaceTextures::uniform(7), [0.82, 0.75, 0.55]),
    def(BlockId::WATER, "Water", false, true, 0, 0.0, FaceTextures::uniform(8), [0.15, 0.4, 0.7]),
    def(BlockId::WOOD, "Wood", true, false, 0, 2.0, FaceTextures { top: 9, bottom: 9, side: 10 }, [0.42, 0.28, 0.15]),
    def(BlockId::LEAVES, "Leaves", true, true, 0, 0.2, FaceTextures::uniform(11), [0.3, 0.55, 0.22]),
    def(BlockId::SNOW, "Snow", true, false, 0, 0.2, FaceTextures::uniform(12), [0.95, 0.95, 0.97]),
    def(BlockId::ICE, "Ice", true, true, 0, 0.5, FaceTextures::uniform(13), [0.8, 0.9, 0.97]),
    def(BlockId::GRAVEL, "Gravel", true, false, 0, 0.6, FaceTextures::uniform(14), [0.5, 0.48, 0.46]),
    def(BlockId::CLAY, "Clay", true, false, 0, 0.6, FaceTextures::uniform(15), [0.6, 0.6, 0.65]),
    def(BlockId::COAL_ORE, "Coal Ore", true, false, 0, 3.0, FaceTextures::uniform(16), [0.3, 0.3, 0.3]),
    def(BlockId::IRON_ORE, "Iron Ore", true, false, 0, 3.0, FaceTextures::uniform(17), [0.76, 0.68, 0.6]),
    def(BlockId::GOLD_ORE, "Gold Ore", true, false, 0, 3.0, FaceTextures::uniform(18), [0.9, 0.8, 0.3]),
    def(BlockId::DIAMOND_ORE, "Diamond Ore", true, false, 0, 3.0, FaceTextures::uniform(19), [0.6, 0.9, 0.9]),
    def(BlockId::TORCH, "Torch", false, true, 14, 0.0, FaceTextures::uniform(20), [1.0, 0.85, 0.5]),
    def(BlockId::LAVA, "Lava", false, false, 15, 0.0, FaceTextures::uniform(21), [1.0, 0.4, 0.1]),
    def(BlockId::CACTUS, "Cactus", true, false, 0, 0.4, FaceTextures::uniform(22), [0.25, 0.5, 0.25]),
    def(BlockId::TALL_GRASS, "Tall Grass", false, true, 0, 0.0, FaceTextures::uniform(23), [0.4, 0.65, 0.3]),
    def(BlockId::BEDROCK, "Bedrock", true, false, 0, f32::INFINITY, FaceTextures::uniform(24), [0.1, 0.1, 0.1]),
];

/// Immutable handle onto the static block table.
#[derive(Debug, Clone, Copy)]
pub struct BlockRegistry;

impl BlockRegistry {
    pub fn get(&self, id: BlockId) -> Option<&'static BlockDef> {
        TABLE.get(id.0 as usize)
    }

    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).map(|d| d.solid).unwrap_or(false)
    }

    pub fn is_transparent(&self, id: BlockId) -> bool {
        self.get(id).map(|d| d.transparent).unwrap_or(true)
    }

    pub fn light_emission(&self, id: BlockId) -> u8 {
        self.get(id).map(|d| d.light_emission).unwrap_or(0)
    }

    pub fn by_name(&self, name: &str) -> Option<BlockId> {
        TABLE.iter().find(|d| d.name.eq_ignore_ascii_case(name)).map(|d| d.id)
    }
}

pub fn registry() -> BlockRegistry {
    BlockRegistry
}
