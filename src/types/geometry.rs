use glam::Vec3;
use serde::Serialize;

/// Triangle-strip ribbon geometry.
///
/// All buffers are contiguous `Vec<f32>` / `Vec<u32>` for zero-copy interop
/// with glTF writers. Every cross-section contributes two vertices (top edge,
/// then bottom edge) and two strip indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RibbonGeometry {
    /// Interleaved positions: [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Interleaved normals: [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Interleaved UVs: [u, v, u, v, ...]
    pub uvs: Vec<f32>,
    /// Triangle-strip indices into the vertex buffers
    pub indices: Vec<u32>,
}

impl RibbonGeometry {
    /// Pre-allocate room for `cross_sections` pose samples.
    pub fn with_capacity(cross_sections: usize) -> Self {
        let vertices = cross_sections * 2;
        Self {
            positions: Vec::with_capacity(vertices * 3),
            normals: Vec::with_capacity(vertices * 3),
            uvs: Vec::with_capacity(vertices * 2),
            indices: Vec::with_capacity(vertices),
        }
    }

    /// Number of vertices (positions / 3).
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of cross-sections (vertex pairs).
    pub fn cross_section_count(&self) -> usize {
        self.vertex_count() / 2
    }

    /// Number of triangles the strip encodes, including zero-area ones.
    pub fn triangle_count(&self) -> usize {
        self.indices.len().saturating_sub(2)
    }

    /// Whether the geometry contains no vertices.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[vertex * 3..vertex * 3 + 3])
    }

    pub fn normal(&self, vertex: usize) -> Vec3 {
        Vec3::from_slice(&self.normals[vertex * 3..vertex * 3 + 3])
    }

    pub fn uv(&self, vertex: usize) -> [f32; 2] {
        [self.uvs[vertex * 2], self.uvs[vertex * 2 + 1]]
    }

    /// Append one cross-section: top vertex, then bottom vertex.
    pub(crate) fn push_cross_section(&mut self, top: Vec3, bottom: Vec3, up: Vec3, u: f32) {
        let base = self.vertex_count() as u32;

        self.positions.extend_from_slice(&top.to_array());
        self.positions.extend_from_slice(&bottom.to_array());

        self.normals.extend_from_slice(&up.to_array());
        self.normals.extend_from_slice(&(-up).to_array());

        self.uvs.extend_from_slice(&[u, 0.0, u, 1.0]);

        self.indices.push(base);
        self.indices.push(base + 1);
    }

    pub(crate) fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    /// Expand the strip into an indexed triangle list with consistent winding.
    ///
    /// Odd strip triangles swap their first two vertices, which is how
    /// strip-capable rasterizers keep every face pointing the same way.
    pub fn to_triangle_list(&self) -> Vec<u32> {
        let mut list = Vec::with_capacity(self.triangle_count() * 3);
        for (i, window) in self.indices.windows(3).enumerate() {
            if i % 2 == 0 {
                list.extend_from_slice(&[window[0], window[1], window[2]]);
            } else {
                list.extend_from_slice(&[window[1], window[0], window[2]]);
            }
        }
        list
    }
}
