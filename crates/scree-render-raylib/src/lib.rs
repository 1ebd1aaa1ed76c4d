//! Raylib-based GPU rendering: conversions, per-block mesh upload, textures.
// Unsafe is required for Raylib mesh/model upload operations in this crate.

use std::collections::HashMap;

use log::warn;
use raylib::prelude::*;
use scree_blocks::{ATLAS_GRID, CubeMesh};
use scree_world::{RenderHandle, RenderSink};

pub mod conv {
    use scree_geom::Vec3;

    pub fn vec3_to_rl(v: Vec3) -> raylib::prelude::Vector3 {
        raylib::prelude::Vector3::new(v.x, v.y, v.z)
    }

    pub fn vec3_from_rl(v: raylib::prelude::Vector3) -> Vec3 {
        Vec3 {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Loaded textures keyed by path. Models keep raw references to these, so
/// the cache must outlive every model bound to it.
pub struct TextureCache {
    pub map: HashMap<String, raylib::core::texture::Texture2D>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get_ref(&self, key: &str) -> Option<&raylib::core::texture::Texture2D> {
        self.map.get(key)
    }

    pub fn replace_loaded(&mut self, key: String, tex: raylib::core::texture::Texture2D) {
        self.map.insert(key, tex);
    }

    /// Load `path` on first use; later calls reuse the cached texture.
    /// Atlas tiles are sampled with point filtering so texels stay crisp.
    pub fn ensure(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        path: &str,
    ) -> Option<&raylib::core::texture::Texture2D> {
        use std::collections::hash_map::Entry;
        match self.map.entry(path.to_string()) {
            Entry::Occupied(e) => Some(e.into_mut()),
            Entry::Vacant(v) => {
                let tex = rl.load_texture(thread, path).ok()?;
                tex.set_texture_filter(
                    thread,
                    raylib::consts::TextureFilter::TEXTURE_FILTER_POINT,
                );
                tex.set_texture_wrap(thread, raylib::consts::TextureWrap::TEXTURE_WRAP_REPEAT);
                Some(v.insert(tex))
            }
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Solid-color stand-in for a missing atlas file, one painted tile per
/// block face the materials reference.
pub fn fallback_atlas(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
) -> Option<raylib::core::texture::Texture2D> {
    const TILE: i32 = 16;
    let side = TILE * ATLAS_GRID as i32;
    let mut image = Image::gen_image_color(side, side, Color::MAGENTA);
    let tiles: [((i32, i32), Color); 6] = [
        ((0, 0), Color::new(106, 170, 64, 255)),  // grass side
        ((1, 0), Color::new(96, 188, 58, 255)),   // grass top
        ((0, 1), Color::new(134, 96, 67, 255)),   // dirt underside
        ((1, 1), Color::new(219, 206, 142, 255)), // sand
        ((2, 0), Color::new(150, 86, 68, 255)),   // brick
        ((2, 1), Color::new(125, 125, 125, 255)), // stone
    ];
    for ((tx, ty), color) in tiles {
        let x = tx * TILE;
        let y = ty * TILE;
        image.draw_rectangle(x, y, TILE, TILE, color);
        // darker border so identical neighbors still read as blocks
        let edge = Color::new(
            color.r - color.r / 4,
            color.g - color.g / 4,
            color.b - color.b / 4,
            255,
        );
        image.draw_rectangle_lines(
            Rectangle::new(x as f32, y as f32, TILE as f32, TILE as f32),
            1,
            edge,
        );
    }
    let tex = rl.load_texture_from_image(thread, &image).ok()?;
    tex.set_texture_filter(
        thread,
        raylib::consts::TextureFilter::TEXTURE_FILTER_POINT,
    );
    Some(tex)
}

/// Outward normals in the face order the cube builder emits.
const FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

/// GPU residency for visible blocks, one small model per shown block,
/// keyed by the handle the world was issued.
pub struct BlockModels {
    models: HashMap<u64, raylib::core::models::Model>,
    next: u64,
}

impl BlockModels {
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
            next: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn models(&self) -> impl Iterator<Item = &raylib::core::models::Model> {
        self.models.values()
    }
}

impl Default for BlockModels {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-frame adapter wiring world visibility traffic to the GPU.
///
/// Borrows the raylib handle for the stretch of the frame that mutates the
/// world; the model store itself lives across frames in the app. A failed
/// upload still consumes a handle, and releasing that handle is a no-op.
pub struct RaylibSink<'a> {
    pub store: &'a mut BlockModels,
    pub rl: &'a mut RaylibHandle,
    pub thread: &'a RaylibThread,
    pub atlas: Option<&'a raylib::core::texture::Texture2D>,
}

impl RenderSink for RaylibSink<'_> {
    fn upload(&mut self, mesh: &CubeMesh) -> RenderHandle {
        let handle = RenderHandle(self.store.next);
        self.store.next += 1;
        match upload_block_mesh(self.rl, self.thread, mesh, self.atlas) {
            Some(model) => {
                self.store.models.insert(handle.0, model);
            }
            None => warn!("block mesh upload failed"),
        }
        handle
    }

    fn release(&mut self, handle: RenderHandle) {
        // dropping the model unloads its GPU buffers
        self.store.models.remove(&handle.0);
    }
}

/// Upload one cube as a raylib model: 24 vertices, 6 quads expanded to
/// 12 indexed triangles, the texture atlas bound as albedo.
fn upload_block_mesh(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    cpu: &CubeMesh,
    atlas: Option<&raylib::core::texture::Texture2D>,
) -> Option<raylib::core::models::Model> {
    let v_count = cpu.positions.len() / 3;
    let quads = v_count / 4;
    let mut raw: raylib::ffi::Mesh = unsafe { std::mem::zeroed() };
    raw.vertexCount = v_count as i32;
    raw.triangleCount = (quads * 2) as i32;
    unsafe {
        let vbytes = (v_count * 3 * std::mem::size_of::<f32>()) as u32;
        let tbytes = (v_count * 2 * std::mem::size_of::<f32>()) as u32;
        let ibytes = (quads * 6 * std::mem::size_of::<u16>()) as u32;
        raw.vertices = raylib::ffi::MemAlloc(vbytes) as *mut f32;
        raw.normals = raylib::ffi::MemAlloc(vbytes) as *mut f32;
        raw.texcoords = raylib::ffi::MemAlloc(tbytes) as *mut f32;
        raw.indices = raylib::ffi::MemAlloc(ibytes) as *mut u16;
        std::ptr::copy_nonoverlapping(cpu.positions.as_ptr(), raw.vertices, v_count * 3);
        std::ptr::copy_nonoverlapping(cpu.uvs.as_ptr(), raw.texcoords, v_count * 2);
        for (face, normal) in FACE_NORMALS.iter().enumerate() {
            for corner in 0..4 {
                let dst = raw.normals.add((face * 4 + corner) * 3);
                std::ptr::copy_nonoverlapping(normal.as_ptr(), dst, 3);
            }
        }
        let mut write = 0usize;
        for q in 0..quads {
            let base = (q * 4) as u16;
            let tri = [base, base + 1, base + 2, base, base + 2, base + 3];
            std::ptr::copy_nonoverlapping(tri.as_ptr(), raw.indices.add(write), 6);
            write += 6;
        }
    }
    let mut mesh = unsafe { raylib::core::models::Mesh::from_raw(raw) };
    unsafe {
        mesh.upload(false);
    }
    let mut model = rl
        .load_model_from_mesh(thread, unsafe { mesh.make_weak() })
        .ok()?;
    if let Some(tex) = atlas {
        if let Some(mat) = model.materials_mut().get_mut(0) {
            mat.set_material_texture(raylib::consts::MaterialMapIndex::MATERIAL_MAP_ALBEDO, tex);
        }
    }
    Some(model)
}
