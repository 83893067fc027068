//! Quad emission into a subchunk's vertex/index streams (§4.2). Opaque and
//! transparent faces are tracked as separate streams so the render graph can
//! draw transparent geometry back-to-front without touching opaque state.

use crate::mesher::vertex::Vertex;

pub fn add_quad(vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>, quad: [Vertex; 4]) {
    let start = vertices.len() as u32;
    vertices.extend_from_slice(&quad);
    indices.extend_from_slice(&[start, start + 1, start + 2, start, start + 2, start + 3]);
}
