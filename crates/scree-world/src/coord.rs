use scree_geom::Vec3;

/// Edge length of one streaming sector, in voxels.
pub const SECTOR_SIZE: i32 = 16;

/// Default radius, in sectors, of the neighborhood kept visible around the viewer.
pub const SECTOR_PAD: i32 = 4;

/// Discrete grid cell. One unit cube of world space, identified by its center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Continuous center of the cell.
    #[inline]
    pub fn center(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// Cell one step through the given face.
    #[inline]
    pub fn neighbor(self, face: Face) -> Self {
        let (dx, dy, dz) = face.offset();
        self.offset(dx, dy, dz)
    }

    #[inline]
    pub fn sector(self) -> SectorCoord {
        SectorCoord::new(
            self.x.div_euclid(SECTOR_SIZE),
            0,
            self.z.div_euclid(SECTOR_SIZE),
        )
    }
}

impl From<(i32, i32, i32)> for VoxelCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<VoxelCoord> for (i32, i32, i32) {
    fn from(value: VoxelCoord) -> Self {
        (value.x, value.y, value.z)
    }
}

/// Streaming cell grouping a 16x16 column footprint of voxels.
///
/// The world is not sectored vertically; `sy` is always 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SectorCoord {
    pub sx: i32,
    pub sy: i32,
    pub sz: i32,
}

impl SectorCoord {
    #[inline]
    pub const fn new(sx: i32, sy: i32, sz: i32) -> Self {
        Self { sx, sy, sz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            sx: self.sx + dx,
            sy: self.sy + dy,
            sz: self.sz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: SectorCoord) -> i64 {
        let dx = i64::from(self.sx - other.sx);
        let dy = i64::from(self.sy - other.sy);
        let dz = i64::from(self.sz - other.sz);
        dx * dx + dy * dy + dz * dz
    }
}

impl From<(i32, i32, i32)> for SectorCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<SectorCoord> for (i32, i32, i32) {
    fn from(value: SectorCoord) -> Self {
        (value.sx, value.sy, value.sz)
    }
}

/// The six axis faces of a cell, in neighbor-scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    PosY,
    NegY,
    NegX,
    PosX,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::NegX,
        Face::PosX,
        Face::PosZ,
        Face::NegZ,
    ];

    #[inline]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosX => (1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Index of the axis this face moves along: x = 0, y = 1, z = 2.
    #[inline]
    pub const fn axis(self) -> usize {
        match self {
            Face::NegX | Face::PosX => 0,
            Face::PosY | Face::NegY => 1,
            Face::PosZ | Face::NegZ => 2,
        }
    }

    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Face::PosY | Face::PosX | Face::PosZ => 1,
            Face::NegY | Face::NegX | Face::NegZ => -1,
        }
    }

    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Face::PosY | Face::NegY)
    }
}

/// Grid cell containing the continuous position `p`.
///
/// Each axis rounds to the nearest integer, ties half away from zero, so
/// `(0.5, -0.5, 0.0)` lands in cell `(1, -1, 0)`.
#[inline]
pub fn normalize(p: Vec3) -> VoxelCoord {
    VoxelCoord::new(p.x.round() as i32, p.y.round() as i32, p.z.round() as i32)
}

/// Sector containing the continuous position `p`.
#[inline]
pub fn sectorize(p: Vec3) -> SectorCoord {
    normalize(p).sector()
}

/// Sectors within `pad` of `center`, clipped to a circle in the xz plane.
///
/// An offset is kept when `dx^2 + dz^2 <= (pad + 1)^2`, so the footprint is
/// round rather than square and corner sectors do not pop in and out.
pub fn sector_neighborhood(center: SectorCoord, pad: i32) -> Vec<SectorCoord> {
    if pad < 0 {
        return Vec::new();
    }
    let mut coords = Vec::new();
    let clip = (pad + 1) * (pad + 1);
    for dx in -pad..=pad {
        for dz in -pad..=pad {
            if dx * dx + dz * dz > clip {
                continue;
            }
            coords.push(center.offset(dx, 0, dz));
        }
    }
    coords
}
