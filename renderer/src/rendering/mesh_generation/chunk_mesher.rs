use std::sync::Arc;

use glam::{IVec3, Vec2, Vec3, Vec4};

use engine::{
    assets::{
        atlas::{UvRegion, UvResolver},
        blocks::{BlockDatabase, BlockShape, BlockType, BlockTypeId},
    },
    lighting::light::{LightValue, MAX_LIGHT},
    voxels::{chunk::Chunk, face::Face, neighbor_volume::NeighborVolume, voxel::Voxel},
    world::VoxelStorage,
};

use crate::rendering::{
    chunk_mesh::ChunkMesh,
    mesh_generation::{
        mesh_buffer::{FaceVertex, MeshBuffer, MeshCapacity},
        rotation::BlockRotation,
    },
};

/// Light multiplier per face slot (-X, +X, -Y, +Y, -Z, +Z).
const FACE_TINTS: [f32; Face::COUNT] = [0.7, 0.8, 0.6, 1.0, 0.75, 0.9];
const CROSS_SPRITE_TINT: f32 = 0.8;
/// Cross sprite quads span this fraction of the cell diagonal
const CROSS_SPRITE_WIDTH: f32 = 1.0 / 1.41;
const CROSS_SPRITE_JITTER_SPREAD: f32 = 1.0;

/// Offset from chunk-local coordinates to neighbor volume coordinates
const BORDER: IVec3 = IVec3::new(1, 0, 1);

/// Builds chunk meshes. Owns the neighbor volume and output arrays, which are reused
/// for every build, so one mesher handles one build at a time.
pub struct ChunkMesher {
    block_database: Arc<BlockDatabase>,
    uvs: Arc<dyn UvResolver + Send + Sync>,
    volume: NeighborVolume,
    buffer: MeshBuffer,
}

impl ChunkMesher {
    pub fn new(
        block_database: Arc<BlockDatabase>,
        uvs: Arc<dyn UvResolver + Send + Sync>,
        capacity: MeshCapacity,
    ) -> Self {
        ChunkMesher {
            block_database,
            uvs,
            volume: NeighborVolume::new(0, 0, 0),
            buffer: MeshBuffer::new(capacity),
        }
    }

    pub fn capacity(&self) -> MeshCapacity {
        self.buffer.capacity()
    }

    /// Meshes `chunk` using `storage` for the cells around it.
    /// If the output arrays fill up, the returned mesh is truncated and marked as overflowed.
    #[profiling::function]
    pub fn build<S: VoxelStorage + ?Sized>(
        &mut self,
        chunk: &Chunk,
        storage: &S,
        backlight: bool,
    ) -> ChunkMesh {
        let dims = chunk.dims();
        let origin = chunk.position.origin(dims).0;

        self.volume.resize_for_chunk_dims(dims);
        self.volume
            .reposition(origin.x - BORDER.x, origin.y, origin.z - BORDER.z);
        self.volume.fill(storage, backlight);
        self.buffer.reset();

        let blocks: &BlockDatabase = &self.block_database;
        let mut pass = MeshingPass {
            blocks,
            uvs: self.uvs.as_ref(),
            volume: &self.volume,
            buffer: &mut self.buffer,
            chunk_origin: origin,
        };

        let layer_size = dims.layer_size();
        let span = chunk.bottom() as usize * layer_size..chunk.top() as usize * layer_size;

        'groups: for &group in blocks.draw_groups() {
            for index in span.clone() {
                let voxel = chunk.voxels()[index];
                if voxel.is_air() {
                    continue;
                }
                // Unknown ids are not drawn
                let Some(block) = blocks.get(voxel.block_id()) else {
                    continue;
                };
                if block.draw_group != group {
                    continue;
                }

                let pos = dims.position(index).0;
                let complete = match block.shape {
                    BlockShape::Cube if block.is_emissive() => {
                        pass.emit_box(pos, voxel, block, Vec3::ZERO, Vec3::ONE, Shading::FullBright)
                    }
                    BlockShape::Cube => {
                        pass.emit_box(pos, voxel, block, Vec3::ZERO, Vec3::ONE, Shading::Soft)
                    }
                    BlockShape::BoundingBox => pass.emit_box(
                        pos,
                        voxel,
                        block,
                        block.hitbox.min,
                        block.hitbox.size(),
                        Shading::Soft,
                    ),
                    BlockShape::CrossSprite => pass.emit_cross_sprite(pos, block),
                };

                if !complete {
                    break 'groups;
                }
            }
        }

        self.buffer.to_mesh(chunk.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shading {
    /// Averaged light of the cells around each corner, tinted per face
    Soft,
    FullBright,
}

/// Borrowed state of one build
struct MeshingPass<'a> {
    blocks: &'a BlockDatabase,
    uvs: &'a (dyn UvResolver + Send + Sync),
    volume: &'a NeighborVolume,
    buffer: &'a mut MeshBuffer,
    chunk_origin: IVec3,
}

impl MeshingPass<'_> {
    fn block_id(&self, pos: IVec3) -> BlockTypeId {
        let local = pos + BORDER;
        self.volume.block_id_at(local.x, local.y, local.z)
    }

    /// Whether a face towards the cell at `pos` (chunk-local) can be seen.
    fn is_open(&self, pos: IVec3, group: u8) -> bool {
        let id = self.block_id(pos);
        if id == BlockTypeId::VOID || id.is_air() {
            return true;
        }
        let Some(block) = self.blocks.get(id) else {
            return true;
        };
        (block.draw_group != group && block.light_passing) || !block.solid
    }

    /// Light of the cell at `pos`, or zero if the cell blocks light.
    fn pick_light(&self, pos: IVec3) -> LightValue {
        let id = self.block_id(pos);
        if id == BlockTypeId::VOID {
            return LightValue::ZERO;
        }
        let passes_light = self.blocks.get(id).is_none_or(|block| block.light_passing);
        if !passes_light {
            return LightValue::ZERO;
        }

        let local = pos + BORDER;
        self.volume.light_at(local.x, local.y, local.z)
    }

    /// Average light of the four cells `pos`, `pos - a`, `pos - b` and `pos - a - b`,
    /// with every channel scaled to 0..1.
    fn soft_light(&self, pos: IVec3, a: IVec3, b: IVec3) -> Vec4 {
        let sum = [pos, pos - a, pos - b, pos - a - b]
            .into_iter()
            .map(|cell| {
                let [r, g, b, sun] = self.pick_light(cell).channels().map(f32::from);
                Vec4::new(r, g, b, sun)
            })
            .sum::<Vec4>();
        sum / (4.0 * MAX_LIGHT as f32)
    }

    /// Emits the visible faces of a box spanning `min..min + size` inside the cell at `pos`.
    /// Returns false if the output filled up.
    fn emit_box(
        &mut self,
        pos: IVec3,
        voxel: Voxel,
        block: &BlockType,
        min: Vec3,
        size: Vec3,
        shading: Shading,
    ) -> bool {
        let rotation = BlockRotation::from_voxel(voxel, block.rotatable);
        let regions = rotation.apply(self.uvs.face_uvs(block.id));
        let cell_origin = pos.as_vec3() + min;

        for face in Face::all() {
            if !self.is_open(pos + face.to_ivec3(), block.draw_group) {
                continue;
            }

            let normal = face.to_ivec3();
            // Cells in front of the face, one layer out along the normal
            let front_offset = normal.min(IVec3::ZERO);
            let (tangent_a, tangent_b) = face.tangents();
            let rotated = rotation.is_face_rotated(face);
            let uvs = face_uvs(regions[face.index()], rotated);

            let corners = face.vertices();
            let vertices = std::array::from_fn(|i| {
                let corner = corners[i].as_ivec3();
                let light = match shading {
                    Shading::FullBright => Vec4::ONE,
                    Shading::Soft => {
                        self.soft_light(pos + corner + front_offset, tangent_a, tangent_b)
                            * FACE_TINTS[face.index()]
                    }
                };

                FaceVertex {
                    position: cell_origin + corner.as_vec3() * size,
                    uv: uvs[i],
                    light,
                }
            });

            if !self.buffer.push_face(vertices, rotated) {
                return false;
            }
        }
        true
    }

    /// Emits two crossed double-sided quads, jittered per cell. Never culled.
    fn emit_cross_sprite(&mut self, pos: IVec3, block: &BlockType) -> bool {
        let regions = self.uvs.face_uvs(block.id);
        let (jitter_x, jitter_z) = cross_sprite_jitter(self.chunk_origin + pos);

        let margin = (1.0 - CROSS_SPRITE_WIDTH) * 0.5;
        let (near, far) = (margin, 1.0 - margin);
        let base = pos.as_vec3() + Vec3::new(jitter_x, 0.0, jitter_z);

        // Start and end of each quad's bottom edge in the XZ plane
        let diagonals = [
            (Vec2::new(near, near), Vec2::new(far, far), Face::Left),
            (Vec2::new(far, far), Vec2::new(near, near), Face::Left),
            (Vec2::new(near, far), Vec2::new(far, near), Face::Front),
            (Vec2::new(far, near), Vec2::new(near, far), Face::Front),
        ];

        for (start, end, texture_face) in diagonals {
            let uvs = face_uvs(regions[texture_face.index()], false);
            let corners = [(start, 0.0), (end, 0.0), (end, 1.0), (start, 1.0)];

            let vertices = std::array::from_fn(|i| {
                let (xz, y) = corners[i];
                // Light around the vertical cell edge closest to this corner
                let edge = pos + IVec3::new(xz.x.round() as i32, 0, xz.y.round() as i32);
                let light = self.soft_light(edge, IVec3::X, IVec3::Z) * CROSS_SPRITE_TINT;

                FaceVertex {
                    position: base + Vec3::new(xz.x, y, xz.y),
                    uv: uvs[i],
                    light,
                }
            });

            if !self.buffer.push_face(vertices, false) {
                return false;
            }
        }
        true
    }
}

/// UVs for the four face corners. Rotated faces turn the region a quarter turn.
fn face_uvs(region: UvRegion, rotated: bool) -> [Vec2; 4] {
    let UvRegion { u1, v1, u2, v2 } = region;
    if rotated {
        [
            Vec2::new(u2, v1),
            Vec2::new(u2, v2),
            Vec2::new(u1, v2),
            Vec2::new(u1, v1),
        ]
    } else {
        [
            Vec2::new(u1, v1),
            Vec2::new(u2, v1),
            Vec2::new(u2, v2),
            Vec2::new(u1, v2),
        ]
    }
}

/// Horizontal offset of a cross sprite, at most a quarter block per axis.
fn cross_sprite_jitter(world_pos: IVec3) -> (f32, f32) {
    let IVec3 { x, y, z } = world_pos;
    let hash = (x.wrapping_mul(z).wrapping_add(y) ^ z.wrapping_mul(y).wrapping_sub(x))
        .wrapping_mul(z.wrapping_add(y));

    let jitter_x = (hash as i8) as f32 / 512.0 * CROSS_SPRITE_JITTER_SPREAD;
    let jitter_z = ((hash >> 8) as i8) as f32 / 512.0 * CROSS_SPRITE_JITTER_SPREAD;
    (jitter_x, jitter_z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{
        assets::atlas::BlockUvCache,
        voxels::{
            chunk::ChunkDims,
            coord::{ChunkPos, WorldPos},
            voxel::direction,
        },
        world::World,
    };

    use crate::rendering::chunk_mesh::{VERTICES_PER_FACE, pack_vertex_light, unpack_vertex_light};

    const STONE: Voxel = Voxel::from_type(1);
    const GLASS: Voxel = Voxel::from_type(2);
    const WATER: Voxel = Voxel::from_type(3);
    const PLANT: Voxel = Voxel::from_type(4);
    const SLAB: Voxel = Voxel::from_type(5);
    const LOG: u16 = 6;
    const LAMP: Voxel = Voxel::from_type(7);

    const DEFS: &str = r#"(
        draw_groups: Some([0, 2, 1]),
        blocks: [
            (id: 1, name: "stone", textures: Single("stone")),
            (id: 2, name: "glass", light_passing: true, draw_group: 2, textures: Single("glass")),
            (id: 3, name: "water", light_passing: true, draw_group: 1, textures: Single("water")),
            (id: 4, name: "tall_grass", shape: CrossSprite, solid: false, light_passing: true,
                textures: Faces(left: "plant_a", right: "plant_a", bottom: "plant_a", top: "plant_a", front: "plant_b", back: "plant_b")),
            (id: 5, name: "slab", shape: BoundingBox, hitbox: Some((min: (0.0, 0.0, 0.0), max: (1.0, 0.5, 1.0))), textures: Single("slab")),
            (id: 6, name: "log", rotatable: true,
                textures: Faces(left: "l", right: "r", bottom: "b", top: "t", front: "f", back: "k")),
            (id: 7, name: "lamp", emission: (15, 15, 15), textures: Single("lamp")),
        ],
    )"#;

    struct Fixture {
        world: World,
        uvs: Arc<BlockUvCache>,
        mesher: ChunkMesher,
    }

    impl Fixture {
        fn new(dims: ChunkDims, capacity: usize) -> Self {
            let blocks = Arc::new(BlockDatabase::from_ron_str(DEFS).unwrap());
            let uvs = Arc::new(BlockUvCache::new(&blocks, 4).unwrap());
            let mesher = ChunkMesher::new(blocks, uvs.clone(), MeshCapacity::faces(capacity));

            let mut world = World::new(dims);
            world.insert_chunk_empty(ChunkPos::new(0, 0));
            Fixture { world, uvs, mesher }
        }

        fn set(&mut self, x: i32, y: i32, z: i32, voxel: Voxel) {
            assert!(self.world.set_voxel(WorldPos::new(x, y, z), voxel));
        }

        fn fill_light(&mut self, light: LightValue) {
            for chunk_pos in [ChunkPos::new(0, 0), ChunkPos::new(1, 0)] {
                if let Some(chunk) = self.world.chunk_mut(chunk_pos) {
                    chunk.fill_light(light);
                }
            }
        }

        fn build(&mut self, backlight: bool) -> ChunkMesh {
            let chunk = self.world.chunk(ChunkPos::new(0, 0)).unwrap();
            self.mesher.build(chunk, &self.world, backlight)
        }

        fn region(&self, id: u16, face: Face) -> UvRegion {
            self.uvs.face_uvs(BlockTypeId(id))[face.index()]
        }
    }

    fn face_vertices(mesh: &ChunkMesh, face: usize) -> &[crate::rendering::chunk_mesh::ChunkVertex] {
        &mesh.vertex_data()[face * VERTICES_PER_FACE..(face + 1) * VERTICES_PER_FACE]
    }

    fn face_region(mesh: &ChunkMesh, face: usize) -> UvRegion {
        let vertices = face_vertices(mesh, face);
        let (mut min, mut max) = (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN));
        for vertex in vertices {
            min = min.min(Vec2::from(vertex.uv));
            max = max.max(Vec2::from(vertex.uv));
        }
        UvRegion::new(min.x, min.y, max.x, max.y)
    }

    fn faces_with_region(mesh: &ChunkMesh, region: UvRegion) -> usize {
        (0..mesh.face_count())
            .filter(|&face| face_region(mesh, face) == region)
            .count()
    }

    /// Which way a box face points, from its vertex positions.
    fn face_direction(mesh: &ChunkMesh, face: usize) -> Face {
        let [a, b, _, d] = std::array::from_fn(|i| Vec3::from(face_vertices(mesh, face)[i].position));
        let normal = (b - a).cross(d - a).normalize().round().as_ivec3();
        Face::all()
            .into_iter()
            .find(|face| face.to_ivec3() == normal)
            .unwrap()
    }

    fn find_face(mesh: &ChunkMesh, direction: Face) -> usize {
        (0..mesh.face_count())
            .find(|&face| face_direction(mesh, face) == direction)
            .unwrap()
    }

    #[test]
    fn test_single_voxel_in_tiny_chunk() {
        let mut fixture = Fixture::new(ChunkDims::new(2, 1, 2), 64);
        fixture.set(0, 0, 0, STONE);
        fixture.fill_light(LightValue::FULL);

        let mesh = fixture.build(false);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert!(!mesh.overflowed());

        // Chunk-local unit cube at the origin
        for vertex in mesh.vertex_data() {
            for coordinate in vertex.position {
                assert!(coordinate == 0.0 || coordinate == 1.0);
            }
        }
        assert!(mesh.indices().iter().all(|&index| index < 24));

        let directions: Vec<Face> = (0..6).map(|face| face_direction(&mesh, face)).collect();
        assert_eq!(directions, Face::all().to_vec());

        // Placed at the chunk origin, which is also the world origin
        assert_eq!(mesh.position, ChunkPos::new(0, 0));
        assert_eq!(mesh.position.origin_f32(ChunkDims::new(2, 1, 2)), Vec3::ZERO);

        // Faces looking out of the window (above, below, or into unloaded chunks) read no light
        for direction in [Face::Top, Face::Bottom, Face::Left, Face::Front] {
            let face = find_face(&mesh, direction);
            for vertex in face_vertices(&mesh, face) {
                assert_eq!(vertex.light_channels(), [0, 0, 0, 0], "{direction:?}");
            }
        }

        // Corners of the inner faces average two lit air cells out of four
        for direction in [Face::Right, Face::Back] {
            let face = find_face(&mesh, direction);
            let brightest = face_vertices(&mesh, face)
                .iter()
                .map(|vertex| vertex.light_channels()[3])
                .max()
                .unwrap();
            let expected = pack_vertex_light(Vec4::splat(0.5 * FACE_TINTS[direction.index()]));
            assert_eq!(brightest, unpack_vertex_light(expected)[3], "{direction:?}");
        }
    }

    #[test]
    fn test_fully_lit_cube_uses_face_tints() {
        let mut fixture = Fixture::new(ChunkDims::new(3, 3, 3), 64);
        fixture.set(1, 1, 1, STONE);
        fixture.fill_light(LightValue::FULL);

        let mesh = fixture.build(false);
        assert_eq!(mesh.face_count(), 6);

        for face in 0..mesh.face_count() {
            let direction = face_direction(&mesh, face);
            let expected = pack_vertex_light(Vec4::ONE * FACE_TINTS[direction.index()]);
            for vertex in face_vertices(&mesh, face) {
                assert_eq!(vertex.light.to_bits(), expected.to_bits(), "{direction:?}");
            }
        }

        let top = find_face(&mesh, Face::Top);
        assert_eq!(face_vertices(&mesh, top)[0].light.to_bits(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_soft_light_darkens_corners_next_to_walls() {
        let mut fixture = Fixture::new(ChunkDims::new(3, 3, 3), 64);
        fixture.set(1, 1, 1, STONE);
        fixture.set(0, 2, 1, STONE);
        fixture.fill_light(LightValue::FULL);

        let mesh = fixture.build(false);
        let top = find_face(&mesh, Face::Top);
        let lights: Vec<u8> = face_vertices(&mesh, top)
            .iter()
            .map(|vertex| vertex.light_channels()[0])
            .collect();

        // Corners at x = 1 see the wall in one of their four cells
        assert_eq!(lights.iter().filter(|&&light| light == 191).count(), 2);
        assert_eq!(lights.iter().filter(|&&light| light == 255).count(), 2);
    }

    #[test]
    fn test_adjacent_solid_voxels_share_no_faces() {
        let mut fixture = Fixture::new(ChunkDims::new(4, 1, 4), 64);
        fixture.set(1, 0, 1, STONE);
        fixture.set(2, 0, 1, STONE);
        assert_eq!(fixture.build(false).face_count(), 10);

        fixture.set(2, 0, 1, Voxel::AIR);
        let mesh = fixture.build(false);
        assert_eq!(mesh.face_count(), 6);

        let right = find_face(&mesh, Face::Right);
        assert!(face_vertices(&mesh, right).iter().all(|vertex| vertex.position[0] == 2.0));
    }

    #[test]
    fn test_same_group_translucent_faces_merge() {
        let mut fixture = Fixture::new(ChunkDims::new(4, 1, 4), 64);
        fixture.set(1, 0, 1, WATER);
        fixture.set(2, 0, 1, WATER);
        assert_eq!(fixture.build(false).face_count(), 10);

        // Glass is in another draw group, so the boundary is drawn from both sides
        fixture.set(2, 0, 1, GLASS);
        assert_eq!(fixture.build(false).face_count(), 12);
    }

    #[test]
    fn test_draw_groups_are_meshed_in_content_order() {
        let mut fixture = Fixture::new(ChunkDims::new(4, 1, 4), 64);
        fixture.set(0, 0, 0, WATER);
        fixture.set(3, 0, 3, GLASS);
        fixture.set(2, 0, 0, STONE);

        let mesh = fixture.build(false);
        assert_eq!(mesh.face_count(), 18);
        // Groups [0, 2, 1]: stone, then glass, then water
        assert_eq!(face_region(&mesh, 0), fixture.region(1, Face::Top));
        assert_eq!(face_region(&mesh, 6), fixture.region(2, Face::Top));
        assert_eq!(face_region(&mesh, 12), fixture.region(3, Face::Top));
    }

    #[test]
    fn test_cross_sprite_ignores_neighbors() {
        let mut fixture = Fixture::new(ChunkDims::new(3, 3, 3), 64);
        fixture.set(1, 1, 1, PLANT);
        let open = fixture.build(false);
        assert_eq!(open.face_count(), 4);

        for (x, y, z) in [(0, 1, 1), (2, 1, 1), (1, 0, 1), (1, 2, 1), (1, 1, 0), (1, 1, 2)] {
            fixture.set(x, y, z, STONE);
        }
        let enclosed = fixture.build(false);

        let plant_a = fixture.region(4, Face::Left);
        let plant_b = fixture.region(4, Face::Front);
        assert_eq!(
            faces_with_region(&enclosed, plant_a) + faces_with_region(&enclosed, plant_b),
            4
        );
        assert_eq!(faces_with_region(&open, plant_a), 2);
        assert_eq!(faces_with_region(&open, plant_b), 2);
    }

    #[test]
    fn test_cross_sprite_jitter_is_bounded_and_deterministic() {
        for x in -40..40 {
            for z in -40..40 {
                let pos = IVec3::new(x, 7, z);
                let (jitter_x, jitter_z) = cross_sprite_jitter(pos);
                assert!(jitter_x.abs() <= 0.25 && jitter_z.abs() <= 0.25);
                assert_eq!(cross_sprite_jitter(pos), (jitter_x, jitter_z));
            }
        }
    }

    #[test]
    fn test_bounding_box_uses_hitbox() {
        let mut fixture = Fixture::new(ChunkDims::new(3, 3, 3), 64);
        fixture.set(1, 1, 1, SLAB);

        let mesh = fixture.build(false);
        assert_eq!(mesh.face_count(), 6);

        let top = find_face(&mesh, Face::Top);
        assert!(face_vertices(&mesh, top).iter().all(|vertex| vertex.position[1] == 1.5));
        let max_y = mesh
            .vertex_data()
            .iter()
            .map(|vertex| vertex.position[1])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_y, 1.5);

        // Still culled like a full cube
        fixture.set(1, 0, 1, STONE);
        assert_eq!(fixture.build(false).face_count(), 6 - 1 + 5);
    }

    #[test]
    fn test_emissive_cube_is_full_bright_in_darkness() {
        let mut fixture = Fixture::new(ChunkDims::new(3, 3, 3), 64);
        fixture.set(1, 1, 1, LAMP);

        let mesh = fixture.build(false);
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.vertex_data().iter().all(|vertex| vertex.light.to_bits() == 0xFFFF_FFFF));
    }

    #[test]
    fn test_backlight_lifts_dark_faces() {
        let mut fixture = Fixture::new(ChunkDims::new(3, 3, 3), 64);
        fixture.set(1, 1, 1, STONE);

        let dark = fixture.build(false);
        let top = find_face(&dark, Face::Top);
        assert_eq!(face_vertices(&dark, top)[0].light_channels(), [0, 0, 0, 0]);

        let lifted = fixture.build(true);
        let top = find_face(&lifted, Face::Top);
        // 1/15 of full brightness in each color channel, no sun
        assert_eq!(face_vertices(&lifted, top)[0].light_channels(), [17, 17, 17, 0]);
    }

    #[test]
    fn test_rotation_remaps_textures_only() {
        let mut fixture = Fixture::new(ChunkDims::new(3, 3, 3), 64);
        fixture.set(1, 1, 1, Voxel::from_type_state(LOG, direction::UP));
        let upright = fixture.build(false);

        let authored: Vec<UvRegion> = Face::all().iter().map(|&face| fixture.region(LOG, face)).collect();
        for face in Face::all() {
            assert_eq!(face_region(&upright, find_face(&upright, face)), authored[face.index()]);
        }

        for (state, slots) in [
            (direction::EAST, [2, 3, 0, 1, 4, 5]),
            (direction::WEST, [2, 3, 0, 1, 4, 5]),
            (direction::NORTH, [0, 1, 4, 5, 2, 3]),
            (direction::SOUTH, [0, 1, 4, 5, 2, 3]),
        ] {
            fixture.set(1, 1, 1, Voxel::from_type_state(LOG, state));
            let rotated = fixture.build(false);

            for face in Face::all() {
                let region = face_region(&rotated, find_face(&rotated, face));
                assert_eq!(region, authored[slots[face.index()]], "state {state}, {face:?}");
            }

            let positions = |mesh: &ChunkMesh| -> Vec<[f32; 3]> {
                mesh.vertex_data().iter().map(|vertex| vertex.position).collect()
            };
            assert_eq!(positions(&rotated), positions(&upright));
        }
    }

    #[test]
    fn test_rotated_faces_use_other_diagonal() {
        let mut fixture = Fixture::new(ChunkDims::new(3, 3, 3), 64);
        fixture.set(1, 1, 1, Voxel::from_type_state(LOG, direction::EAST));
        let mesh = fixture.build(false);

        let indices_of = |face: usize| -> Vec<u32> {
            let base = face as u32 * 4;
            mesh.indices()[face * 6..face * 6 + 6]
                .iter()
                .map(|index| index - base)
                .collect()
        };

        assert_eq!(indices_of(find_face(&mesh, Face::Left)), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(indices_of(find_face(&mesh, Face::Top)), vec![0, 1, 3, 1, 2, 3]);
        assert_eq!(indices_of(find_face(&mesh, Face::Back)), vec![0, 1, 3, 1, 2, 3]);
    }

    #[test]
    fn test_non_rotatable_blocks_ignore_state() {
        let mut fixture = Fixture::new(ChunkDims::new(3, 3, 3), 64);
        fixture.set(1, 1, 1, Voxel::from_type_state(1, direction::EAST));
        let mesh = fixture.build(false);
        let expected = fixture.region(1, Face::Top);
        assert_eq!(faces_with_region(&mesh, expected), 6);
        assert_eq!(&mesh.indices()[..6], &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_overflow_boundary() {
        // A cube and a plant need exactly ten faces
        let setup = |capacity| {
            let mut fixture = Fixture::new(ChunkDims::new(4, 1, 4), capacity);
            fixture.set(0, 0, 0, STONE);
            fixture.set(3, 0, 3, PLANT);
            fixture
        };

        let exact = setup(10).build(false);
        assert_eq!(exact.face_count(), 10);
        assert!(!exact.overflowed());

        let truncated = setup(9).build(false);
        assert!(truncated.overflowed());
        assert!(truncated.face_count() <= 9);
        assert_eq!(truncated.index_count(), truncated.face_count() * 6);
    }

    #[test]
    fn test_overflow_resets_between_builds() {
        let mut fixture = Fixture::new(ChunkDims::new(4, 1, 4), 6);
        fixture.set(0, 0, 0, STONE);
        fixture.set(3, 0, 3, STONE);
        assert!(fixture.build(false).overflowed());

        fixture.set(3, 0, 3, Voxel::AIR);
        let mesh = fixture.build(false);
        assert!(!mesh.overflowed());
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn test_unknown_ids_are_void() {
        let mut fixture = Fixture::new(ChunkDims::new(4, 1, 4), 64);
        fixture.set(1, 0, 1, STONE);
        fixture.set(2, 0, 1, Voxel::from_type(300));

        let mesh = fixture.build(false);
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn test_faces_across_chunk_borders() {
        let mut fixture = Fixture::new(ChunkDims::new(2, 1, 2), 64);
        fixture.set(1, 0, 0, STONE);
        assert_eq!(fixture.build(false).face_count(), 6);

        fixture.world.insert_chunk_empty(ChunkPos::new(1, 0));
        fixture.set(2, 0, 0, STONE);
        let mesh = fixture.build(false);
        assert_eq!(mesh.face_count(), 5);
        assert!((0..5).all(|face| face_direction(&mesh, face) != Face::Right));
    }
}
