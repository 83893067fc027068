//! The chunk map and its concurrent generate -> mesh -> upload pipeline
//! (§4.4). Grounded on the renderer's DashMap-backed chunk manager: lock-free
//! reads of the map itself, a `parking_lot::RwLock` per chunk for the rare
//! structural write, and `crossbeam_channel` carrying job results back to the
//! thread that drives `update`.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use dashmap::DashMap;
use parking_lot::RwLock;
use thiserror::Error;

use crate::generation::region::GenRegionCache;
use crate::generation::Generator;
use crate::jobs::{JobQueue, JobSystem, PoolCategory};
use crate::lighting::{skylight, LightAccess};
use crate::mesher::{mesh_subchunk, MesherSource};
use crate::rhi::Rhi;
use crate::world::block::BlockId;
use crate::world::chunk::{Chunk, ChunkState, LightByte, SubchunkMesh, SubchunkUpload};
use crate::world::coords::{BlockPos, ChunkPos, SUBCHUNK_COUNT};
use crate::world::frame_budget::{ChunkLoadThrottler, FrameBudget};

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("chunk {0:?} is not loaded")]
    ChunkNotLoaded(ChunkPos),
}

const REGION_CACHE_CAPACITY: usize = 4;

thread_local! {
    /// One generation-region cache per worker thread, rebuilt if the seed
    /// changes. Keeps `GenRegionCache`'s `&mut self` API off a shared lock
    /// without serializing every generation job behind it.
    static REGION_CACHE: RefCell<Option<(u32, GenRegionCache)>> = RefCell::new(None);
}

fn generate_with_thread_local_cache(generator: &Generator, pos: ChunkPos) -> Vec<BlockId> {
    REGION_CACHE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let stale = !matches!(&*slot, Some((seed, _)) if *seed == generator.seed());
        if stale {
            *slot = Some((generator.seed(), GenRegionCache::new(generator.seed(), REGION_CACHE_CAPACITY)));
        }
        let (_, cache) = slot.as_mut().expect("just initialized");
        generator.generate_chunk(pos, cache)
    })
}

struct GenJobResult {
    pos: ChunkPos,
    generation: u64,
    blocks: Vec<BlockId>,
}

struct MeshJobResult {
    pos: ChunkPos,
    subchunk: usize,
    generation: u64,
    mesh: SubchunkMesh,
}

/// Read access for one chunk's mesh job: the chunk itself plus whichever of
/// its four face-neighbors happen to be loaded. A neighbor that isn't loaded
/// reads as opaque stone (§4.2): treating the missing seam as air would leak
/// a spurious face into a volume that might turn out to be solid once the
/// neighbor actually loads.
struct ChunkMeshView<'a> {
    center: &'a Chunk,
    neighbors: [Option<&'a Chunk>; 4],
    min: BlockPos,
}

impl MesherSource for ChunkMeshView<'_> {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        use crate::world::coords::CHUNK_HEIGHT;
        if y < 0 {
            return BlockId::BEDROCK;
        }
        if y >= CHUNK_HEIGHT {
            return BlockId::AIR;
        }
        let world = BlockPos::new(self.min.x + x, y, self.min.z + z);
        let chunk_pos = world.chunk_pos();
        if chunk_pos == self.center.pos {
            return self.center.get_block(world.local_pos());
        }
        for neighbor in self.neighbors.iter().flatten() {
            if neighbor.pos == chunk_pos {
                return neighbor.get_block(world.local_pos());
            }
        }
        // Missing neighbor: treat the seam as opaque stone rather than air
        // so occupancy never leaks through an unloaded border (§4.2, §12.3).
        BlockId::STONE
    }

    fn light_at(&self, x: i32, y: i32, z: i32) -> LightByte {
        use crate::world::coords::CHUNK_HEIGHT;
        if y < 0 || y >= CHUNK_HEIGHT {
            return LightByte::new(15, 0);
        }
        let world = BlockPos::new(self.min.x + x, y, self.min.z + z);
        let chunk_pos = world.chunk_pos();
        if chunk_pos == self.center.pos {
            return self.center.get_light(world.local_pos());
        }
        for neighbor in self.neighbors.iter().flatten() {
            if neighbor.pos == chunk_pos {
                return neighbor.get_light(world.local_pos());
            }
        }
        // Consistent with treating the missing seam as opaque stone: no
        // light passes through it.
        LightByte::new(0, 0)
    }
}

/// Bridges a freshly generated chunk's local block/light storage to
/// `lighting::skylight`'s [`LightAccess`] trait. Runs entirely within one
/// chunk's own columns, matching the lifecycle's "skylight column pass
/// done" gate on `generating -> generated` (§4.2) before any cross-chunk BFS
/// propagation has a neighbor to read.
struct ChunkLightView<'a> {
    chunk: &'a mut Chunk,
}

impl LightAccess for ChunkLightView<'_> {
    fn is_loaded(&self, _pos: BlockPos) -> bool {
        true
    }

    fn get_block(&self, pos: BlockPos) -> BlockId {
        self.chunk.get_block(pos.local_pos())
    }

    fn is_transparent(&self, id: BlockId) -> bool {
        crate::world::block::registry().is_transparent(id)
    }

    fn get_sky_light(&self, pos: BlockPos) -> u8 {
        self.chunk.get_light(pos.local_pos()).sky()
    }

    fn get_block_light(&self, pos: BlockPos) -> u8 {
        self.chunk.get_light(pos.local_pos()).block()
    }

    fn set_sky_light(&mut self, pos: BlockPos, level: u8) {
        let local = pos.local_pos();
        let updated = self.chunk.get_light(local).with_sky(level);
        self.chunk.set_light(local, updated);
    }

    fn set_block_light(&mut self, pos: BlockPos, level: u8) {
        let local = pos.local_pos();
        let updated = self.chunk.get_light(local).with_block(level);
        self.chunk.set_light(local, updated);
    }
}

/// Owns every loaded chunk and the job pipeline that fills them in (§4.4).
pub struct World {
    chunks: Arc<DashMap<ChunkPos, Arc<RwLock<Chunk>>>>,
    generator: Arc<Generator>,
    jobs: JobSystem,
    gen_queue: JobQueue<ChunkPos>,
    mesh_queue: JobQueue<ChunkPos>,
    gen_tx: Sender<GenJobResult>,
    gen_rx: Receiver<GenJobResult>,
    mesh_tx: Sender<MeshJobResult>,
    mesh_rx: Receiver<MeshJobResult>,
    throttler: ChunkLoadThrottler,
}

impl World {
    pub fn new(seed: u32) -> Self {
        let (gen_tx, gen_rx) = unbounded();
        let (mesh_tx, mesh_rx) = unbounded();
        Self {
            chunks: Arc::new(DashMap::new()),
            generator: Arc::new(Generator::new(seed)),
            jobs: JobSystem::new(),
            gen_queue: JobQueue::new(),
            mesh_queue: JobQueue::new(),
            gen_tx,
            gen_rx,
            mesh_tx,
            mesh_rx,
            throttler: ChunkLoadThrottler::new(8),
        }
    }

    pub fn generator(&self) -> &Arc<Generator> {
        &self.generator
    }

    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    pub fn chunk_state(&self, pos: ChunkPos) -> Option<ChunkState> {
        self.chunks.get(&pos).map(|c| c.read().state())
    }

    pub fn get_block(&self, pos: BlockPos) -> Result<BlockId, WorldError> {
        let chunk_pos = pos.chunk_pos();
        let entry = self.chunks.get(&chunk_pos).ok_or(WorldError::ChunkNotLoaded(chunk_pos))?;
        Ok(entry.read().get_block(pos.local_pos()))
    }

    /// Writes a block and dirties the affected subchunk(s); `update` picks
    /// the remesh up on its next pass.
    pub fn set_block(&self, pos: BlockPos, id: BlockId) -> Result<(), WorldError> {
        let chunk_pos = pos.chunk_pos();
        let entry = self.chunks.get(&chunk_pos).ok_or(WorldError::ChunkNotLoaded(chunk_pos))?;
        entry.write().set_block(pos.local_pos(), id);
        Ok(())
    }

    /// Ensures every chunk within `radius` (chunk units, circular) of
    /// `observer` exists in the map, queuing generation for any that don't.
    pub fn ensure_loaded_near(&self, observer: ChunkPos, radius: i32) {
        let mut to_queue = Vec::new();
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                if dx * dx + dz * dz > radius * radius {
                    continue;
                }
                let pos = observer.offset(dx, dz);
                let entry = self.chunks.entry(pos).or_insert_with(|| Arc::new(RwLock::new(Chunk::new_empty(pos))));
                let mut chunk = entry.write();
                if chunk.state() == ChunkState::Empty {
                    chunk.set_state(ChunkState::Generating);
                    to_queue.push(pos);
                }
            }
        }
        for pos in to_queue {
            self.gen_queue.push(pos, pos.distance_squared_to(observer));
        }
    }

    /// Drops chunks outside `radius` that aren't pinned. Called once
    /// per-frame after `update` so eviction never races an in-flight job
    /// result for the same chunk.
    pub fn evict_far_chunks(&self, observer: ChunkPos, radius: i32) {
        let keep = radius * radius;
        self.chunks.retain(|pos, chunk| {
            let far = pos.distance_squared_to(observer) > keep as i64;
            !far || chunk.read().is_pinned()
        });
    }

    /// Runs one frame's worth of the world pipeline: dispatch generation and
    /// mesh jobs bounded by `budget`, drain whatever results are ready, and
    /// upload finished meshes to the GPU through `rhi`.
    pub fn update(&self, observer: ChunkPos, rhi: &dyn Rhi, budget: &mut FrameBudget) {
        self.drain_generation_jobs(budget);
        self.drain_generation_results();
        self.enqueue_dirty_meshes(observer);
        self.drain_mesh_jobs(budget);
        self.drain_mesh_results(rhi);
    }

    fn drain_generation_jobs(&self, budget: &mut FrameBudget) {
        let limit = self.throttler.chunks_this_frame(budget);
        for _ in 0..limit {
            if !budget.has_budget() {
                break;
            }
            let Some(pos) = self.gen_queue.pop() else { break };
            let started = Instant::now();
            self.spawn_generation_job(pos);
            budget.record_time(started.elapsed());
        }
    }

    fn spawn_generation_job(&self, pos: ChunkPos) {
        let Some(entry) = self.chunks.get(&pos).map(|e| e.value().clone()) else { return };
        let expected_generation = entry.read().generation();
        let generator = Arc::clone(&self.generator);
        let tx = self.gen_tx.clone();
        self.jobs.spawn(PoolCategory::Generation, move || {
            let blocks = generate_with_thread_local_cache(&generator, pos);
            let _ = tx.send(GenJobResult { pos, generation: expected_generation, blocks });
        });
    }

    fn drain_generation_results(&self) {
        while let Ok(result) = self.gen_rx.try_recv() {
            let Some(entry) = self.chunks.get(&result.pos) else { continue };
            let mut chunk = entry.write();
            if chunk.generation() != result.generation {
                continue;
            }
            chunk.blocks_mut().copy_from_slice(&result.blocks);
            skylight::calculate_chunk_skylight(&mut ChunkLightView { chunk: &mut chunk }, result.pos.min_block());
            chunk.set_state(ChunkState::Generated);
            for subchunk in 0..SUBCHUNK_COUNT as usize {
                chunk.mark_dirty(subchunk);
            }
            drop(chunk);

            // A neighbor that already meshed against this chunk while it was
            // missing read the shared seam as opaque stone (§4.2); now that
            // the seam is real, both sides need a remesh.
            for neighbor_pos in result.pos.neighbors4() {
                if let Some(neighbor_entry) = self.chunks.get(&neighbor_pos) {
                    let mut neighbor = neighbor_entry.write();
                    for subchunk in 0..SUBCHUNK_COUNT as usize {
                        neighbor.mark_dirty(subchunk);
                    }
                }
            }
        }
    }

    fn enqueue_dirty_meshes(&self, observer: ChunkPos) {
        let mut to_queue = Vec::new();
        for entry in self.chunks.iter() {
            let pos = *entry.key();
            let mut chunk = entry.value().write();
            let meshable = matches!(chunk.state(), ChunkState::Generated | ChunkState::Meshed | ChunkState::Uploaded);
            if !meshable || !chunk.any_dirty() {
                continue;
            }
            // Every 4-neighbor must be at least generated before this chunk
            // meshes, so the mesher's border reads see real blocks instead
            // of the missing-neighbor opaque-stone fallback (§4.4).
            let neighbors_ready = pos
                .neighbors4()
                .iter()
                .all(|n| self.chunks.get(n).map(|e| e.read().state().is_generated_or_later()).unwrap_or(false));
            if !neighbors_ready {
                continue;
            }
            chunk.set_state(ChunkState::Meshing);
            to_queue.push(pos);
        }
        for pos in to_queue {
            self.mesh_queue.push(pos, pos.distance_squared_to(observer));
        }
    }

    fn drain_mesh_jobs(&self, budget: &mut FrameBudget) {
        let limit = self.throttler.chunks_this_frame(budget);
        for _ in 0..limit {
            if !budget.has_budget() {
                break;
            }
            let Some(pos) = self.mesh_queue.pop() else { break };
            let started = Instant::now();
            self.spawn_mesh_job(pos);
            budget.record_time(started.elapsed());
        }
    }

    fn spawn_mesh_job(&self, pos: ChunkPos) {
        let Some(center_entry) = self.chunks.get(&pos).map(|e| e.value().clone()) else { return };
        let neighbor_entries: [Option<Arc<RwLock<Chunk>>>; 4] =
            pos.neighbors4().map(|n| self.chunks.get(&n).map(|e| e.value().clone()));
        let tx = self.mesh_tx.clone();
        self.jobs.spawn(PoolCategory::Meshing, move || {
            let center = center_entry.read();
            let neighbor_guards: Vec<_> = neighbor_entries.iter().map(|o| o.as_ref().map(|e| e.read())).collect();
            let neighbor_refs: [Option<&Chunk>; 4] = std::array::from_fn(|i| neighbor_guards[i].as_deref());
            let view = ChunkMeshView { center: &center, neighbors: neighbor_refs, min: pos.min_block() };
            let generation = center.generation();
            let dirty: Vec<usize> = (0..SUBCHUNK_COUNT as usize).filter(|&i| center.is_dirty(i)).collect();
            for subchunk in dirty {
                let mesh = mesh_subchunk(&view, subchunk, pos.min_block());
                let _ = tx.send(MeshJobResult { pos, subchunk, generation, mesh });
            }
        });
    }

    fn drain_mesh_results(&self, rhi: &dyn Rhi) {
        while let Ok(result) = self.mesh_rx.try_recv() {
            let Some(entry) = self.chunks.get(&result.pos) else { continue };
            let mut chunk = entry.write();
            if chunk.generation() != result.generation {
                continue;
            }
            upload_subchunk(&mut chunk, result.subchunk, result.mesh, rhi);
            chunk.clear_dirty(result.subchunk);
        }
        for entry in self.chunks.iter() {
            let mut chunk = entry.value().write();
            if chunk.state() == ChunkState::Meshing && !chunk.any_dirty() {
                chunk.set_state(ChunkState::Uploaded);
            }
        }
    }
}

fn upload_subchunk(chunk: &mut Chunk, subchunk: usize, mesh: SubchunkMesh, rhi: &dyn Rhi) {
    let old = chunk.subchunk_uploads[subchunk];
    for handle in [old.opaque_vertex_buffer, old.opaque_index_buffer, old.transparent_vertex_buffer, old.transparent_index_buffer]
        .into_iter()
        .flatten()
    {
        rhi.destroy_buffer(handle);
    }

    let mut upload = SubchunkUpload::default();
    if !mesh.opaque_vertices.is_empty() {
        upload.opaque_vertex_buffer = Some(rhi.create_vertex_buffer("subchunk opaque vertices", bytemuck::cast_slice(&mesh.opaque_vertices)));
        upload.opaque_index_buffer = Some(rhi.create_index_buffer("subchunk opaque indices", bytemuck::cast_slice(&mesh.opaque_indices)));
        upload.opaque_index_count = mesh.opaque_indices.len() as u32;
    }
    if !mesh.transparent_vertices.is_empty() {
        upload.transparent_vertex_buffer =
            Some(rhi.create_vertex_buffer("subchunk transparent vertices", bytemuck::cast_slice(&mesh.transparent_vertices)));
        upload.transparent_index_buffer =
            Some(rhi.create_index_buffer("subchunk transparent indices", bytemuck::cast_slice(&mesh.transparent_indices)));
        upload.transparent_index_count = mesh.transparent_indices.len() as u32;
    }
    chunk.subchunk_meshes[subchunk] = mesh;
    chunk.subchunk_uploads[subchunk] = upload;
}
