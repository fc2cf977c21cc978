//! CPU-side triangle mesh built from a grouped OBJ model.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::{
    error::{AssetError, AssetResult, Attribute},
    model::ObjModel,
};

/// Vertex with position/normal/uv. Values are in object space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex bytes for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl ObjModel {
    /// Flatten every group into one fan-triangulated indexed mesh.
    ///
    /// Identical (v, vt, vn) triples share a vertex. Faces without normals get
    /// +Z, faces without texture coordinates get (0, 0).
    pub fn to_mesh_data(&self) -> AssetResult<MeshData> {
        self.ensure_live()?;

        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        struct Key(usize, Option<usize>, Option<usize>);

        let mut unique: HashMap<Key, u32> = HashMap::new();
        let mut vertices: Vec<MeshVertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        for group in &self.groups {
            for (face_no, face) in group.faces.iter().enumerate() {
                let mut face_indices: Vec<u32> = Vec::with_capacity(face.len());
                for (corner, &vi) in face.vert_indices.iter().enumerate() {
                    let vti = face.tex_coord_indices.as_ref().map(|t| t[corner]);
                    let vni = face.normal_indices.as_ref().map(|n| n[corner]);
                    let key = Key(vi, vti, vni);

                    let index = match unique.get(&key) {
                        Some(&idx) => idx,
                        None => {
                            let p = self.resolve(group, face_no, Attribute::Vertex, vi, 3)?;
                            let uv = match vti {
                                Some(i) => {
                                    let t = self.resolve(group, face_no, Attribute::TexCoord, i, 2)?;
                                    [t[0], t[1]]
                                }
                                None => [0.0, 0.0],
                            };
                            let normal = match vni {
                                Some(i) => {
                                    let n = self.resolve(group, face_no, Attribute::Normal, i, 3)?;
                                    [n[0], n[1], n[2]]
                                }
                                None => [0.0, 0.0, 1.0],
                            };

                            let idx = u32::try_from(vertices.len())
                                .map_err(|_| AssetError::TooManyVertices { max: u32::MAX })?;
                            vertices.push(MeshVertex::new([p[0], p[1], p[2]], normal, uv));
                            unique.insert(key, idx);
                            idx
                        }
                    };
                    face_indices.push(index);
                }

                if face_indices.len() < 3 {
                    continue;
                }
                // Triangulate fan
                for tri in 1..(face_indices.len() - 1) {
                    indices.push(face_indices[0]);
                    indices.push(face_indices[tri]);
                    indices.push(face_indices[tri + 1]);
                }
            }
        }

        log::debug!(
            "Triangulated OBJ: {} unique vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );
        Ok(MeshData::new(vertices, indices))
    }
}
