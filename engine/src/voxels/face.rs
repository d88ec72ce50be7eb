use glam::{IVec3, U8Vec3};

/// Block faces. The discriminant doubles as the face's slot in per-block
/// texture tables: -X, +X, -Y, +Y, -Z, +Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// X-
    Left = 0,
    /// X+
    Right,
    /// Y-
    Bottom,
    /// Y+
    Top,
    /// Z-
    Front,
    /// Z+
    Back,
}

impl Default for Face {
    fn default() -> Self {
        Face::Top
    }
}

impl Face {
    pub const COUNT: usize = 6;

    pub fn to_ivec3(&self) -> IVec3 {
        match self {
            Face::Top => IVec3::Y,
            Face::Bottom => -IVec3::Y,
            Face::Left => -IVec3::X,
            Face::Right => IVec3::X,
            Face::Front => -IVec3::Z,
            Face::Back => IVec3::Z,
        }
    }

    pub const fn all() -> [Face; 6] {
        [
            Face::Left,
            Face::Right,
            Face::Bottom,
            Face::Top,
            Face::Front,
            Face::Back,
        ]
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Face::Right | Face::Top | Face::Back)
    }

    /// The two positive unit axes spanning the face plane.
    pub fn tangents(self) -> (IVec3, IVec3) {
        match self {
            Face::Left | Face::Right => (IVec3::Z, IVec3::Y),
            Face::Bottom | Face::Top => (IVec3::X, IVec3::Z),
            Face::Front | Face::Back => (IVec3::X, IVec3::Y),
        }
    }

    /// Corners of the unit cube face, counter-clockwise seen from outside.
    /// Corner 1 follows the texture's U axis from corner 0, corner 3 its V axis.
    pub fn vertices(self) -> [U8Vec3; 4] {
        match self {
            Face::Top => [
                U8Vec3::new(0, 1, 1),
                U8Vec3::new(1, 1, 1),
                U8Vec3::new(1, 1, 0),
                U8Vec3::new(0, 1, 0),
            ],
            Face::Bottom => [
                U8Vec3::new(0, 0, 0),
                U8Vec3::new(1, 0, 0),
                U8Vec3::new(1, 0, 1),
                U8Vec3::new(0, 0, 1),
            ],
            Face::Left => [
                U8Vec3::new(0, 0, 0),
                U8Vec3::new(0, 0, 1),
                U8Vec3::new(0, 1, 1),
                U8Vec3::new(0, 1, 0),
            ],
            Face::Right => [
                U8Vec3::new(1, 0, 1),
                U8Vec3::new(1, 0, 0),
                U8Vec3::new(1, 1, 0),
                U8Vec3::new(1, 1, 1),
            ],
            Face::Front => [
                U8Vec3::new(1, 0, 0),
                U8Vec3::new(0, 0, 0),
                U8Vec3::new(0, 1, 0),
                U8Vec3::new(1, 1, 0),
            ],
            Face::Back => [
                U8Vec3::new(0, 0, 1),
                U8Vec3::new(1, 0, 1),
                U8Vec3::new(1, 1, 1),
                U8Vec3::new(0, 1, 1),
            ],
        }
    }
}
