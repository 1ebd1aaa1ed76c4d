use raylib::prelude::*;

use scree_geom::Vec3;
use scree_physics::hit_test;
use scree_render_raylib::{BlockModels, RaylibSink, TextureCache, conv, fallback_atlas};
use scree_sim::{Player, SimConfig, break_block, place_block, step, step_blocks};
use scree_world::{SectorCoord, World, sectorize};

use crate::worldgen::{self, TerrainParams};

const ATLAS_PATH: &str = "assets/texture.png";

const HOTBAR_KEYS: [KeyboardKey; 9] = [
    KeyboardKey::KEY_ONE,
    KeyboardKey::KEY_TWO,
    KeyboardKey::KEY_THREE,
    KeyboardKey::KEY_FOUR,
    KeyboardKey::KEY_FIVE,
    KeyboardKey::KEY_SIX,
    KeyboardKey::KEY_SEVEN,
    KeyboardKey::KEY_EIGHT,
    KeyboardKey::KEY_NINE,
];

pub struct App {
    pub world: World,
    pub player: Player,
    pub cfg: SimConfig,
    models: BlockModels,
    textures: TextureCache,
    prev_sector: Option<SectorCoord>,
    captured: bool,
    fly_mode: bool,
    wireframe: bool,
    show_grid: bool,
}

impl App {
    pub fn new(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        cfg: SimConfig,
        terrain: &TerrainParams,
    ) -> Self {
        let mut textures = TextureCache::new();
        if textures.ensure(rl, thread, ATLAS_PATH).is_none() {
            match fallback_atlas(rl, thread) {
                Some(tex) => textures.replace_loaded(ATLAS_PATH.to_string(), tex),
                None => log::warn!("no texture atlas; blocks draw untextured"),
            }
        }

        let mut world = World::with_sector_pad(cfg.sector_pad);
        let mut models = BlockModels::new();
        {
            let atlas = textures.get_ref(ATLAS_PATH);
            let mut sink = RaylibSink {
                store: &mut models,
                rl,
                thread,
                atlas,
            };
            worldgen::generate(&mut world, terrain, &mut sink);
        }

        Self {
            world,
            player: Player::new(Vec3::ZERO),
            cfg,
            models,
            textures,
            prev_sector: None,
            captured: false,
            fly_mode: false,
            wireframe: false,
            show_grid: false,
        }
    }

    pub fn step(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, dt: f32) {
        // Toggles
        if rl.is_key_pressed(KeyboardKey::KEY_TAB) {
            self.captured = !self.captured;
            if self.captured {
                rl.disable_cursor();
            } else {
                rl.enable_cursor();
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_V) {
            self.fly_mode = !self.fly_mode;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F) {
            self.wireframe = !self.wireframe;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_G) {
            self.show_grid = !self.show_grid;
        }

        // Mouse look
        if self.captured {
            let md = rl.get_mouse_delta();
            self.player.turn(md.x, -md.y);
        }

        // Movement intent for this frame, straight from held keys
        let mut movement = [0i32; 2];
        if rl.is_key_down(KeyboardKey::KEY_W) {
            movement[0] -= 1;
        }
        if rl.is_key_down(KeyboardKey::KEY_S) {
            movement[0] += 1;
        }
        if rl.is_key_down(KeyboardKey::KEY_A) {
            movement[1] -= 1;
        }
        if rl.is_key_down(KeyboardKey::KEY_D) {
            movement[1] += 1;
        }
        self.player.movement = movement;
        if !self.fly_mode && rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            self.player.jump(self.cfg.jump_speed());
        }
        for (slot, key) in HOTBAR_KEYS.iter().enumerate() {
            if rl.is_key_pressed(*key) {
                self.player.select_slot(slot);
            }
        }

        // Mouse edits only while captured; the first click captures instead
        let break_click =
            self.captured && rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT);
        let place_click =
            self.captured && rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_RIGHT);
        if !self.captured && rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            self.captured = true;
            rl.disable_cursor();
        }

        // Free-fly wish direction, gathered while rl is still borrowable
        let fly_wish = if self.fly_mode {
            let fwd = self.player.look_vector();
            let right = fwd.cross(Vec3::UP).normalized();
            let mut wish = Vec3::ZERO;
            if rl.is_key_down(KeyboardKey::KEY_W) {
                wish += fwd;
            }
            if rl.is_key_down(KeyboardKey::KEY_S) {
                wish -= fwd;
            }
            if rl.is_key_down(KeyboardKey::KEY_A) {
                wish -= right;
            }
            if rl.is_key_down(KeyboardKey::KEY_D) {
                wish += right;
            }
            if rl.is_key_down(KeyboardKey::KEY_E) {
                wish += Vec3::UP;
            }
            if rl.is_key_down(KeyboardKey::KEY_Q) {
                wish -= Vec3::UP;
            }
            wish
        } else {
            Vec3::ZERO
        };

        let atlas = self.textures.get_ref(ATLAS_PATH);
        let mut sink = RaylibSink {
            store: &mut self.models,
            rl,
            thread,
            atlas,
        };

        self.world.process_queue(self.cfg.queue_budget(), &mut sink);

        let here = sectorize(self.player.position);
        if self.prev_sector != Some(here) {
            let first = self.prev_sector.is_none();
            self.world.change_sectors(self.prev_sector, here, &mut sink);
            if first {
                self.world.process_entire_queue(&mut sink);
            }
            self.prev_sector = Some(here);
        }

        if break_click {
            break_block(&mut self.world, &self.player, &self.cfg, &mut sink);
        }
        if place_click {
            place_block(&mut self.world, &mut self.player, &self.cfg, &mut sink);
        }

        if self.fly_mode {
            if fly_wish.length() > 0.0 {
                let speed = self.cfg.walk_speed * 3.0;
                self.player.position += fly_wish.normalized() * (speed * dt);
            }
            self.player.velocity = 0.0;
            step_blocks(&mut self.world, &self.cfg, dt, &mut sink);
        } else {
            step(&mut self.world, &mut self.player, &self.cfg, dt, &mut sink);
        }
    }

    pub fn render(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        let look = self.player.look_vector();
        let eye = conv::vec3_to_rl(self.player.position);
        let camera = Camera3D::perspective(eye, eye + conv::vec3_to_rl(look), Vector3::up(), 65.0);
        let focused = hit_test(self.player.position, look, self.cfg.reach, |c| {
            self.world.contains(c)
        })
        .ok()
        .and_then(|ray| ray.hit);

        let mut d = rl.begin_drawing(thread);
        d.clear_background(Color::new(128, 176, 255, 255));
        {
            let mut d3 = d.begin_mode3D(camera);
            if self.show_grid {
                d3.draw_grid(64, 1.0);
            }
            for model in self.models.models() {
                if self.wireframe {
                    d3.draw_model_wires(model, Vector3::zero(), 1.0, Color::WHITE);
                } else {
                    d3.draw_model(model, Vector3::zero(), 1.0, Color::WHITE);
                }
            }
            if let Some(cell) = focused {
                d3.draw_cube_wires(conv::vec3_to_rl(cell.center()), 1.02, 1.02, 1.02, Color::BLACK);
            }
        }

        let cx = d.get_screen_width() / 2;
        let cy = d.get_screen_height() / 2;
        d.draw_line(cx - 8, cy, cx + 8, cy, Color::BLACK);
        d.draw_line(cx, cy - 8, cx, cy + 8, Color::BLACK);

        let stats = self.world.stats();
        let hud = format!(
            "({:.2}, {:.2}, {:.2}) | shown {} / {} | falling {} | queued {} | place: {} (1-3) | {} (V), F wireframe, G grid, Tab release",
            self.player.position.x,
            self.player.position.y,
            self.player.position.z,
            stats.shown,
            stats.blocks,
            stats.falling,
            stats.pending_ops,
            self.player.selected_material().name(),
            if self.fly_mode { "Fly" } else { "Walk" },
        );
        d.draw_text(&hud, 12, 12, 18, Color::DARKGRAY);
        d.draw_fps(12, 36);
    }
}
