//! Greedy face-merging mesher (§4.2). Builds one subchunk's mesh at a time:
//! for each of the 6 face directions, slice the subchunk into 16 layers,
//! build a 2D visibility mask per layer, then merge adjacent cells sharing a
//! block id and light level into maximal rectangles before emitting quads.
//!
//! Coordinates inside this module are subchunk-local (0..16 on every axis).
//! A `MesherSource` translates a local coordinate -1..=16 into whatever
//! chunk/neighbor-chunk lookup is needed; this module never reaches into a
//! `Chunk` directly, so it stays decoupled from how chunks are locked.

pub mod mesh;
pub mod vertex;

use bytemuck::Zeroable;

use crate::mesher::mesh::add_quad;
use crate::mesher::vertex::{create_vertex, Vertex};
use crate::world::block::{registry, BlockId, BlockRegistry};
use crate::world::chunk::{LightByte, SubchunkMesh};
use crate::world::coords::{BlockPos, CHUNK_WIDTH};

/// Read access a mesh job needs: block and light samples in subchunk-local
/// coordinates, extended one cell past each edge (-1 and 16) so face
/// visibility and ambient occlusion can see across chunk and subchunk
/// boundaries. Implemented by the job that has already locked the chunk and
/// its 4 horizontal neighbors for reading.
pub trait MesherSource {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId;
    fn light_at(&self, x: i32, y: i32, z: i32) -> LightByte;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaceDir {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl FaceDir {
    const ALL: [FaceDir; 6] =
        [FaceDir::PosX, FaceDir::NegX, FaceDir::PosY, FaceDir::NegY, FaceDir::PosZ, FaceDir::NegZ];

    fn axis(self) -> usize {
        match self {
            FaceDir::PosX | FaceDir::NegX => 0,
            FaceDir::PosY | FaceDir::NegY => 1,
            FaceDir::PosZ | FaceDir::NegZ => 2,
        }
    }

    fn is_positive(self) -> bool {
        matches!(self, FaceDir::PosX | FaceDir::PosY | FaceDir::PosZ)
    }

    fn normal_i(self) -> i32 {
        if self.is_positive() {
            1
        } else {
            -1
        }
    }

    fn normal(self) -> [f32; 3] {
        let mut n = [0.0; 3];
        n[self.axis()] = self.normal_i() as f32;
        n
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FaceKey {
    block: BlockId,
    sky: u8,
    block_light: u8,
}

fn to_source_coords(subchunk_index: usize, local: [i32; 3]) -> [i32; 3] {
    [local[0], local[1] + subchunk_index as i32 * CHUNK_WIDTH, local[2]]
}

/// Builds the mesh for one subchunk. `chunk_min` is the chunk's world block
/// origin, used to translate subchunk-local quad corners into world space.
pub fn mesh_subchunk(source: &dyn MesherSource, subchunk_index: usize, chunk_min: BlockPos) -> SubchunkMesh {
    let registry = registry();
    let mut mesh = SubchunkMesh::default();
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];

    for face in FaceDir::ALL {
        extract_face(source, subchunk_index, chunk_min, registry, face, &mut mesh, &mut min, &mut max);
    }

    if mesh.is_empty() {
        mesh.min = [0.0; 3];
        mesh.max = [0.0; 3];
    } else {
        mesh.min = min;
        mesh.max = max;
    }
    mesh
}

fn extract_face(
    source: &dyn MesherSource,
    subchunk_index: usize,
    chunk_min: BlockPos,
    registry: BlockRegistry,
    face: FaceDir,
    mesh: &mut SubchunkMesh,
    min: &mut [f32; 3],
    max: &mut [f32; 3],
) {
    let axis = face.axis();
    let u_axis = (axis + 1) % 3;
    let v_axis = (axis + 2) % 3;
    let normal_i = face.normal_i();
    let size = CHUNK_WIDTH as usize;

    for slice in 0..size as i32 {
        let mut mask: Vec<Vec<Option<FaceKey>>> = vec![vec![None; size]; size];

        for u in 0..size as i32 {
            for v in 0..size as i32 {
                let mut local = [0i32; 3];
                local[axis] = slice;
                local[u_axis] = u;
                local[v_axis] = v;
                let abs = to_source_coords(subchunk_index, local);
                let block = source.block_at(abs[0], abs[1], abs[2]);
                if block == BlockId::AIR {
                    continue;
                }

                let mut neighbor_local = local;
                neighbor_local[axis] += normal_i;
                let neighbor_abs = to_source_coords(subchunk_index, neighbor_local);
                let neighbor_block = source.block_at(neighbor_abs[0], neighbor_abs[1], neighbor_abs[2]);

                let def = registry.get(block).expect("dense table");
                let ndef = registry.get(neighbor_block).expect("dense table");
                if def.face_visible_against(ndef) {
                    let light = source.light_at(neighbor_abs[0], neighbor_abs[1], neighbor_abs[2]);
                    mask[u as usize][v as usize] =
                        Some(FaceKey { block, sky: light.sky(), block_light: light.block() });
                }
            }
        }

        extract_rectangles(
            source, subchunk_index, chunk_min, registry, face, slice, &mask, mesh, min, max,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn extract_rectangles(
    source: &dyn MesherSource,
    subchunk_index: usize,
    chunk_min: BlockPos,
    registry: BlockRegistry,
    face: FaceDir,
    slice: i32,
    mask: &[Vec<Option<FaceKey>>],
    mesh: &mut SubchunkMesh,
    min: &mut [f32; 3],
    max: &mut [f32; 3],
) {
    let size = mask.len();
    let mut used = vec![vec![false; size]; size];

    for start_u in 0..size {
        for start_v in 0..size {
            if used[start_u][start_v] || mask[start_u][start_v].is_none() {
                continue;
            }
            let key = mask[start_u][start_v].unwrap();

            let mut width = 1;
            while start_u + width < size && !used[start_u + width][start_v] && mask[start_u + width][start_v] == Some(key)
            {
                width += 1;
            }

            let mut height = 1;
            'grow: while start_v + height < size {
                for u in start_u..start_u + width {
                    if used[u][start_v + height] || mask[u][start_v + height] != Some(key) {
                        break 'grow;
                    }
                }
                height += 1;
            }

            for u in start_u..start_u + width {
                for v in start_v..start_v + height {
                    used[u][v] = true;
                }
            }

            emit_quad(
                source, subchunk_index, chunk_min, registry, face, slice, start_u as i32, start_v as i32,
                width as i32, height as i32, key, mesh, min, max,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_quad(
    source: &dyn MesherSource,
    subchunk_index: usize,
    chunk_min: BlockPos,
    registry: BlockRegistry,
    face: FaceDir,
    slice: i32,
    start_u: i32,
    start_v: i32,
    width: i32,
    height: i32,
    key: FaceKey,
    mesh: &mut SubchunkMesh,
    min: &mut [f32; 3],
    max: &mut [f32; 3],
) {
    let axis = face.axis();
    let u_axis = (axis + 1) % 3;
    let v_axis = (axis + 2) % 3;
    let plane_local = if face.is_positive() { slice + 1 } else { slice };
    let neighbor_plane_local = slice + face.normal_i();

    let def = registry.get(key.block).expect("dense table");
    let color = def.tint;
    let normal = face.normal();

    let corners = [
        (start_u, start_v),
        (start_u + width, start_v),
        (start_u + width, start_v + height),
        (start_u, start_v + height),
    ];

    let mut quad = [Vertex::zeroed(); 4];
    for (i, &(u_c, v_c)) in corners.iter().enumerate() {
        let mut local = [0f32; 3];
        local[axis] = plane_local as f32;
        local[u_axis] = u_c as f32;
        local[v_axis] = v_c as f32;
        local[1] += (subchunk_index * CHUNK_WIDTH as usize) as f32;

        let world = [local[0] + chunk_min.x as f32, local[1], local[2] + chunk_min.z as f32];
        for a in 0..3 {
            min[a] = min[a].min(world[a]);
            max[a] = max[a].max(world[a]);
        }

        let sign_u = if u_c == start_u { -1 } else { 1 };
        let sign_v = if v_c == start_v { -1 } else { 1 };
        let ao = corner_ao(source, subchunk_index, axis, u_axis, v_axis, neighbor_plane_local, u_c, v_c, sign_u, sign_v, registry);

        let uv = [(u_c - start_u) as f32, (v_c - start_v) as f32];
        quad[i] = create_vertex(world, normal, color, uv, key.sky, key.block_light, ao);
    }

    if def.transparent {
        add_quad(&mut mesh.transparent_vertices, &mut mesh.transparent_indices, quad);
    } else {
        add_quad(&mut mesh.opaque_vertices, &mut mesh.opaque_indices, quad);
    }
}

#[allow(clippy::too_many_arguments)]
fn corner_ao(
    source: &dyn MesherSource,
    subchunk_index: usize,
    axis: usize,
    u_axis: usize,
    v_axis: usize,
    neighbor_plane_local: i32,
    u_coord: i32,
    v_coord: i32,
    sign_u: i32,
    sign_v: i32,
    registry: BlockRegistry,
) -> u8 {
    let mut outside = [0i32; 3];
    outside[axis] = neighbor_plane_local;
    outside[u_axis] = u_coord;
    outside[v_axis] = v_coord;

    let mut side1 = outside;
    side1[u_axis] += sign_u;
    let mut side2 = outside;
    side2[v_axis] += sign_v;
    let mut corner = outside;
    corner[u_axis] += sign_u;
    corner[v_axis] += sign_v;

    let is_solid = |p: [i32; 3]| {
        let abs = to_source_coords(subchunk_index, p);
        registry.is_solid(source.block_at(abs[0], abs[1], abs[2]))
    };

    let s1 = is_solid(side1);
    let s2 = is_solid(side2);
    let c = is_solid(corner);
    if s1 && s2 {
        0
    } else {
        3 - (s1 as u8 + s2 as u8 + c as u8)
    }
}
