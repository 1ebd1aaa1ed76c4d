//! Sparse voxel store with sector streaming and deferred visibility work.
#![forbid(unsafe_code)]

pub mod coord;
pub mod queue;
pub mod world;

pub use coord::{
    Face, SECTOR_PAD, SECTOR_SIZE, SectorCoord, VoxelCoord, normalize, sector_neighborhood,
    sectorize,
};
pub use queue::{Op, OpQueue, QUEUE_BUDGET};
pub use world::{
    FallState, NullSink, RenderHandle, RenderSink, Voxel, World, WorldError, WorldStats,
};
