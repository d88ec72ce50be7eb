use glam::IVec3;

use crate::{
    assets::blocks::BlockTypeId,
    lighting::light::LightValue,
    voxels::chunk::ChunkDims,
    world::VoxelStorage,
};

/// Minimum color light applied to every filled cell when backlight is on.
pub const BACKLIGHT_FLOOR: u8 = 1;

/// A padded window of block ids and light values around one chunk.
///
/// The window covers the chunk plus a one cell border in X and Z, so face culling
/// and soft lighting can look across chunk edges. Cells that were not filled
/// (missing neighbors, out of window reads) read as [`BlockTypeId::VOID`] with zero light.
///
/// The buffers are reused between fills and only reallocated when the window size changes.
pub struct NeighborVolume {
    origin: IVec3,
    size: IVec3,
    block_ids: Vec<BlockTypeId>,
    lights: Vec<LightValue>,
}

impl NeighborVolume {
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        let size = IVec3::new(width as i32, height as i32, depth as i32);
        let volume = width as usize * height as usize * depth as usize;

        NeighborVolume {
            origin: IVec3::ZERO,
            size,
            block_ids: vec![BlockTypeId::VOID; volume],
            lights: vec![LightValue::ZERO; volume],
        }
    }

    /// A window sized for a chunk of `dims` plus its horizontal border.
    pub fn for_chunk_dims(dims: ChunkDims) -> Self {
        NeighborVolume::new(dims.width + 2, dims.height, dims.depth + 2)
    }

    /// Resizes the window, keeping the allocation if it is already large enough.
    pub fn resize_for_chunk_dims(&mut self, dims: ChunkDims) {
        let size = IVec3::new(dims.width as i32 + 2, dims.height as i32, dims.depth as i32 + 2);
        if size == self.size {
            return;
        }

        let volume = (size.x * size.y * size.z) as usize;
        self.size = size;
        self.block_ids.resize(volume, BlockTypeId::VOID);
        self.lights.resize(volume, LightValue::ZERO);
    }

    /// Moves the world space anchor (minimum corner) of the window.
    pub fn reposition(&mut self, x: i32, y: i32, z: i32) {
        self.origin = IVec3::new(x, y, z);
    }

    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    pub fn size(&self) -> IVec3 {
        self.size
    }

    /// Clears the window and copies in everything `storage` has for its footprint.
    #[profiling::function]
    pub fn fill<S: VoxelStorage + ?Sized>(&mut self, storage: &S, backlight: bool) {
        self.block_ids.fill(BlockTypeId::VOID);
        self.lights.fill(LightValue::ZERO);

        storage.copy_into(self);

        if backlight {
            for (id, light) in self.block_ids.iter().zip(self.lights.iter_mut()) {
                if *id != BlockTypeId::VOID {
                    *light = light.with_color_floor(BACKLIGHT_FLOOR);
                }
            }
        }
    }

    fn index(&self, local: IVec3) -> Option<usize> {
        if local.cmplt(IVec3::ZERO).any() || local.cmpge(self.size).any() {
            return None;
        }
        Some(((local.y * self.size.z + local.z) * self.size.x + local.x) as usize)
    }

    pub fn world_to_local(&self, world: IVec3) -> IVec3 {
        world - self.origin
    }

    /// Writes one cell. Positions outside the window are ignored.
    pub fn set_cell(&mut self, local: IVec3, id: BlockTypeId, light: LightValue) {
        if let Some(index) = self.index(local) {
            self.block_ids[index] = id;
            self.lights[index] = light;
        }
    }

    pub fn block_id_at(&self, x: i32, y: i32, z: i32) -> BlockTypeId {
        self.index(IVec3::new(x, y, z))
            .map_or(BlockTypeId::VOID, |index| self.block_ids[index])
    }

    pub fn light_at(&self, x: i32, y: i32, z: i32) -> LightValue {
        self.index(IVec3::new(x, y, z))
            .map_or(LightValue::ZERO, |index| self.lights[index])
    }
}
