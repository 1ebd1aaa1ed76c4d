use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use log::debug;
use scree_blocks::{CubeMesh, Material};
use scree_geom::Vec3;
use thiserror::Error;

use crate::coord::{Face, SECTOR_PAD, SectorCoord, VoxelCoord, normalize, sector_neighborhood};
use crate::queue::{Op, OpQueue};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("no block at {0:?}")]
    NotFound(VoxelCoord),
}

/// Continuous motion state of a block that is still falling.
///
/// `pos` is the block's true position between ticks; the voxel's coordinate
/// is always `normalize(pos)`. Without the carried float position a block
/// moving a fraction of a cell per sub-step would round back to where it
/// started and never arrive anywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallState {
    pub pos: Vec3,
    pub velocity: f32,
}

/// One occupied cell. Identity is the coordinate; material and fall state
/// ride along. Moving a voxel is remove-then-insert, never a key edit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voxel {
    pub coord: VoxelCoord,
    pub material: Material,
    pub fall: Option<FallState>,
}

impl Voxel {
    pub fn fixed(coord: VoxelCoord, material: Material) -> Self {
        Self {
            coord,
            material,
            fall: None,
        }
    }

    /// A block in free fall at the continuous position `pos`.
    pub fn falling(pos: Vec3, velocity: f32, material: Material) -> Self {
        Self {
            coord: normalize(pos),
            material,
            fall: Some(FallState { pos, velocity }),
        }
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.fall.is_some()
    }

    /// Continuous center the block renders at: the carried fall position
    /// while airborne, the cell center once settled.
    #[inline]
    pub fn render_center(&self) -> Vec3 {
        self.fall.map(|f| f.pos).unwrap_or_else(|| self.coord.center())
    }
}

/// Opaque token for one uploaded block mesh, issued and redeemed by a sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// Where block meshes go when they become visible.
///
/// The world hands a sink one cube's worth of geometry per shown block and
/// returns the handle later, when the block stops being visible.
pub trait RenderSink {
    fn upload(&mut self, mesh: &CubeMesh) -> RenderHandle;
    fn release(&mut self, handle: RenderHandle);
}

/// Sink for headless hosts: issues handles and forgets them.
#[derive(Debug, Default)]
pub struct NullSink {
    next: u64,
}

impl RenderSink for NullSink {
    fn upload(&mut self, _mesh: &CubeMesh) -> RenderHandle {
        self.next += 1;
        RenderHandle(self.next)
    }

    fn release(&mut self, _handle: RenderHandle) {}
}

#[derive(Default, Debug, Clone, Copy)]
pub struct WorldStats {
    pub blocks: usize,
    pub shown: usize,
    pub uploaded: usize,
    pub falling: usize,
    pub sectors: usize,
    pub pending_ops: usize,
}

/// The authoritative block set plus everything hanging off it: the sector
/// index used for streaming, the shown subset, live render handles, the
/// falling set, and the deferred show/hide queue.
pub struct World {
    blocks: HashMap<VoxelCoord, Voxel>,
    sectors: HashMap<SectorCoord, Vec<VoxelCoord>>,
    shown: HashSet<VoxelCoord>,
    handles: HashMap<VoxelCoord, RenderHandle>,
    falling: HashSet<VoxelCoord>,
    queue: OpQueue,
    sector_pad: i32,
}

impl World {
    pub fn new() -> Self {
        Self::with_sector_pad(SECTOR_PAD)
    }

    pub fn with_sector_pad(sector_pad: i32) -> Self {
        Self {
            blocks: HashMap::new(),
            sectors: HashMap::new(),
            shown: HashSet::new(),
            handles: HashMap::new(),
            falling: HashSet::new(),
            queue: OpQueue::new(),
            sector_pad,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[inline]
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.blocks.contains_key(&coord)
    }

    #[inline]
    pub fn get(&self, coord: VoxelCoord) -> Option<&Voxel> {
        self.blocks.get(&coord)
    }

    #[inline]
    pub fn is_shown(&self, coord: VoxelCoord) -> bool {
        self.shown.contains(&coord)
    }

    #[inline]
    pub fn is_falling(&self, coord: VoxelCoord) -> bool {
        self.falling.contains(&coord)
    }

    /// Every occupied coordinate, in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        self.blocks.keys().copied()
    }

    /// Snapshot of the falling set in a stable order, for the physics pass.
    pub fn falling_coords(&self) -> Vec<VoxelCoord> {
        let mut coords: Vec<VoxelCoord> = self.falling.iter().copied().collect();
        coords.sort();
        coords
    }

    /// Coordinates indexed under one sector. Order is insertion order.
    pub fn sector_blocks(&self, sector: SectorCoord) -> &[VoxelCoord] {
        self.sectors.get(&sector).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn pending_ops(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            blocks: self.blocks.len(),
            shown: self.shown.len(),
            uploaded: self.handles.len(),
            falling: self.falling.len(),
            sectors: self.sectors.len(),
            pending_ops: self.queue.len(),
        }
    }

    /// True when at least one of the six face neighbors is unoccupied.
    /// Fully buried blocks are never worth drawing.
    pub fn exposed(&self, coord: VoxelCoord) -> bool {
        Face::ALL
            .iter()
            .any(|f| !self.blocks.contains_key(&coord.neighbor(*f)))
    }

    /// Insert a block. An existing occupant at the same coordinate is
    /// removed first; insertion replaces, it does not error.
    ///
    /// With `immediate` the block is shown right away if exposed and the
    /// neighbors are reconciled synchronously. Without it the visual pass is
    /// left to sector streaming and the deferred queue.
    pub fn add_block(&mut self, voxel: Voxel, immediate: bool, sink: &mut dyn RenderSink) {
        let coord = voxel.coord;
        if self.blocks.contains_key(&coord) {
            let _ = self.remove_block(coord, immediate, sink);
        }
        if voxel.is_falling() {
            self.falling.insert(coord);
        }
        self.blocks.insert(coord, voxel);
        self.sectors.entry(coord.sector()).or_default().push(coord);
        if immediate {
            if self.exposed(coord) {
                self.show_block(coord, true, sink);
            }
            self.check_neighbors(coord, sink);
        }
    }

    /// Remove the block at `coord`, returning it.
    ///
    /// Removing an empty cell is an error rather than a no-op: a silent miss
    /// here would leave the sector index pointing at a ghost.
    pub fn remove_block(
        &mut self,
        coord: VoxelCoord,
        immediate: bool,
        sink: &mut dyn RenderSink,
    ) -> Result<Voxel, WorldError> {
        let voxel = self
            .blocks
            .remove(&coord)
            .ok_or(WorldError::NotFound(coord))?;
        let sector = coord.sector();
        if let Some(list) = self.sectors.get_mut(&sector) {
            list.retain(|&c| c != coord);
            if list.is_empty() {
                self.sectors.remove(&sector);
            }
        }
        self.falling.remove(&coord);
        if self.shown.contains(&coord) {
            self.hide_block(coord, immediate, sink);
        }
        if immediate {
            self.check_neighbors(coord, sink);
        }
        Ok(voxel)
    }

    /// Mark `coord` visible. The mesh uploads now when `immediate`,
    /// otherwise when the queued op drains.
    pub fn show_block(&mut self, coord: VoxelCoord, immediate: bool, sink: &mut dyn RenderSink) {
        self.shown.insert(coord);
        if immediate {
            self.materialize(coord, sink);
        } else {
            self.queue.push(Op::Show(coord));
        }
    }

    /// Mark `coord` hidden. The mesh is released now when `immediate`,
    /// otherwise when the queued op drains.
    pub fn hide_block(&mut self, coord: VoxelCoord, immediate: bool, sink: &mut dyn RenderSink) {
        self.shown.remove(&coord);
        if immediate {
            self.dematerialize(coord, sink);
        } else {
            self.queue.push(Op::Hide(coord));
        }
    }

    /// Bring the six neighbors of a changed cell back in line with their
    /// exposure: newly exposed neighbors get shown, newly buried ones hidden.
    pub fn check_neighbors(&mut self, coord: VoxelCoord, sink: &mut dyn RenderSink) {
        for face in Face::ALL {
            let n = coord.neighbor(face);
            if !self.blocks.contains_key(&n) {
                continue;
            }
            if self.exposed(n) {
                if !self.shown.contains(&n) {
                    self.show_block(n, true, sink);
                }
            } else if self.shown.contains(&n) {
                self.hide_block(n, true, sink);
            }
        }
    }

    /// Queue up shows for every exposed, not-yet-shown block of a sector.
    pub fn show_sector(&mut self, sector: SectorCoord, sink: &mut dyn RenderSink) {
        let coords: Vec<VoxelCoord> = self.sectors.get(&sector).cloned().unwrap_or_default();
        for coord in coords {
            if !self.shown.contains(&coord) && self.exposed(coord) {
                self.show_block(coord, false, sink);
            }
        }
    }

    /// Queue up hides for every shown block of a sector.
    pub fn hide_sector(&mut self, sector: SectorCoord, sink: &mut dyn RenderSink) {
        let coords: Vec<VoxelCoord> = self.sectors.get(&sector).cloned().unwrap_or_default();
        for coord in coords {
            if self.shown.contains(&coord) {
                self.hide_block(coord, false, sink);
            }
        }
    }

    /// The viewer moved from sector `before` to `after`: queue shows for
    /// sectors entering the padded neighborhood and hides for sectors
    /// leaving it. `None` for `before` means the first placement, so the
    /// whole `after` neighborhood is new.
    pub fn change_sectors(
        &mut self,
        before: Option<SectorCoord>,
        after: SectorCoord,
        sink: &mut dyn RenderSink,
    ) {
        let before_set: HashSet<SectorCoord> = before
            .map(|b| sector_neighborhood(b, self.sector_pad).into_iter().collect())
            .unwrap_or_default();
        let after_set: HashSet<SectorCoord> =
            sector_neighborhood(after, self.sector_pad).into_iter().collect();
        let mut show: Vec<SectorCoord> = after_set.difference(&before_set).copied().collect();
        // nearest sectors stream in first
        show.sort_by_key(|s| s.distance_sq(after));
        let hide: Vec<SectorCoord> = before_set.difference(&after_set).copied().collect();
        debug!(
            "sector change {:?} -> {:?}: +{} -{}",
            before,
            after,
            show.len(),
            hide.len()
        );
        for sector in show {
            self.show_sector(sector, sink);
        }
        for sector in hide {
            self.hide_sector(sector, sink);
        }
    }

    /// Drain deferred ops in FIFO order until the queue empties or `budget`
    /// wall time has passed. Called once per frame so a big streaming burst
    /// spreads across several frames instead of stalling one.
    pub fn process_queue(&mut self, budget: Duration, sink: &mut dyn RenderSink) {
        let start = Instant::now();
        while start.elapsed() < budget {
            let Some(op) = self.queue.pop() else {
                break;
            };
            self.run_op(op, sink);
        }
    }

    /// Drain every deferred op with no time limit. Used once, when the
    /// viewer's sector context is first established.
    pub fn process_entire_queue(&mut self, sink: &mut dyn RenderSink) {
        while let Some(op) = self.queue.pop() {
            self.run_op(op, sink);
        }
    }

    fn run_op(&mut self, op: Op, sink: &mut dyn RenderSink) {
        match op {
            Op::Show(coord) => self.materialize(coord, sink),
            Op::Hide(coord) => self.dematerialize(coord, sink),
        }
    }

    /// Upload the mesh for a shown block. A stale target (removed since the
    /// op was queued, hidden again, or already uploaded) is a no-op.
    fn materialize(&mut self, coord: VoxelCoord, sink: &mut dyn RenderSink) {
        if self.handles.contains_key(&coord) || !self.shown.contains(&coord) {
            return;
        }
        let Some(voxel) = self.blocks.get(&coord) else {
            return;
        };
        let mesh = CubeMesh::build(voxel.render_center(), voxel.material);
        let handle = sink.upload(&mesh);
        self.handles.insert(coord, handle);
    }

    /// Release the mesh for a hidden block. No handle, no work.
    fn dematerialize(&mut self, coord: VoxelCoord, sink: &mut dyn RenderSink) {
        if let Some(handle) = self.handles.remove(&coord) {
            sink.release(handle);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
