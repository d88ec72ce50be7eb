use bitfield_struct::bitfield;

use crate::assets::blocks::BlockTypeId;

/// Orientation values stored in the low nibble of the state byte.
pub mod direction {
    pub const NORTH: u8 = 0;
    pub const WEST: u8 = 1;
    pub const SOUTH: u8 = 2;
    pub const EAST: u8 = 3;
    pub const UP: u8 = 4;
    pub const DOWN: u8 = 5;

    pub const ROTATION_MASK: u8 = 0xF;
}

#[bitfield(u32, hash = true)]
pub struct Voxel {
    #[bits(16)]
    pub block_type: u16,
    #[bits(8)]
    pub state: u8,
    #[bits(8)]
    __: u8,
}

impl Voxel {
    pub const fn from_type(block_type: u16) -> Self {
        let mut voxel = Voxel::new();
        voxel.set_block_type(block_type);
        voxel
    }

    pub const fn from_type_state(block_type: u16, state: u8) -> Self {
        let mut voxel = Voxel::new();
        voxel.set_block_type(block_type);
        voxel.set_state(state);
        voxel
    }

    pub const AIR: Voxel = Voxel::new();

    pub const fn is_air(&self) -> bool {
        self.block_type() == 0
    }

    pub const fn block_id(&self) -> BlockTypeId {
        BlockTypeId(self.block_type())
    }

    pub const fn rotation(&self) -> u8 {
        self.state() & direction::ROTATION_MASK
    }
}

impl PartialEq for Voxel {
    fn eq(&self, other: &Self) -> bool {
        self.into_bits() == other.into_bits()
    }
}

impl Eq for Voxel {}
