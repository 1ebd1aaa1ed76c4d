/// Atlas tile (column, row) for each face group of a block.
///
/// Top and bottom get their own tiles; the four side faces share one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceTiles {
    pub top: (u32, u32),
    pub bottom: (u32, u32),
    pub side: (u32, u32),
}

impl FaceTiles {
    #[inline]
    pub const fn uniform(tile: (u32, u32)) -> Self {
        Self {
            top: tile,
            bottom: tile,
            side: tile,
        }
    }
}

/// The closed set of block materials. Every occupied voxel carries exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    Grass,
    Sand,
    Brick,
    Stone,
}

impl Material {
    /// Hotbar contents, in number-key order.
    pub const PLACEABLE: [Material; 3] = [Material::Brick, Material::Sand, Material::Stone];

    /// Tile assignment in the shared 4x4 atlas.
    pub const fn tiles(self) -> FaceTiles {
        match self {
            Material::Grass => FaceTiles {
                top: (1, 0),
                bottom: (0, 1),
                side: (0, 0),
            },
            Material::Sand => FaceTiles::uniform((1, 1)),
            Material::Brick => FaceTiles::uniform((2, 0)),
            Material::Stone => FaceTiles::uniform((2, 1)),
        }
    }

    /// Stone cannot be mined.
    #[inline]
    pub const fn breakable(self) -> bool {
        !matches!(self, Material::Stone)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Material::Grass => "grass",
            Material::Sand => "sand",
            Material::Brick => "brick",
            Material::Stone => "stone",
        }
    }
}
