//! Grouped polygon model as read from an OBJ file.

use corelib::BoundingBox;

use crate::{
    error::{AssetError, AssetResult, Attribute},
    mtl::{Material, MaterialId, MaterialLibrary},
    texture::TextureRelease,
};

/// Polygon of 0-based indices into the model arrays.
///
/// `normal_indices` / `tex_coord_indices` are present only if the face line
/// encoded them, and then have the same length as `vert_indices`.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub(crate) vert_indices: Vec<usize>,
    pub(crate) normal_indices: Option<Vec<usize>>,
    pub(crate) tex_coord_indices: Option<Vec<usize>>,
    pub(crate) material: Option<MaterialId>,
}

impl Face {
    pub fn vert_indices(&self) -> &[usize] {
        &self.vert_indices
    }

    pub fn normal_indices(&self) -> Option<&[usize]> {
        self.normal_indices.as_deref()
    }

    pub fn tex_coord_indices(&self) -> Option<&[usize]> {
        self.tex_coord_indices.as_deref()
    }

    /// Material active when the face was declared; `None` is the model default.
    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }

    pub fn len(&self) -> usize {
        self.vert_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vert_indices.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) faces: Vec<Face>,
}

impl Group {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }
}

/// Model loaded from a Wavefront OBJ file, keeping the file's groupings.
///
/// Only the loaders in [`crate::obj`] build one. It is read-only afterwards
/// apart from the terminal [`ObjModel::dispose`].
#[derive(Debug)]
pub struct ObjModel {
    pub(crate) vertices: Vec<Vec<f32>>,
    pub(crate) normals: Vec<Vec<f32>>,
    pub(crate) tex_coords: Vec<Vec<f32>>,
    pub(crate) groups: Vec<Group>,
    pub(crate) mtllib: Option<MaterialLibrary>,
    pub(crate) default_material: Material,
    pub(crate) bounds: Option<BoundingBox>,
    pub(crate) disposed: bool,
}

pub const DEFAULT_MATERIAL_NAME: &str = "Default Material";

impl ObjModel {
    pub(crate) fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            groups: Vec::new(),
            mtllib: None,
            default_material: Material::new(DEFAULT_MATERIAL_NAME),
            bounds: None,
            disposed: false,
        }
    }

    pub fn vertices(&self) -> &[Vec<f32>] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec<f32>] {
        &self.normals
    }

    pub fn tex_coords(&self) -> &[Vec<f32>] {
        &self.tex_coords
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn face_count(&self) -> usize {
        self.groups.iter().map(|g| g.faces.len()).sum()
    }

    pub fn material_library(&self) -> Option<&MaterialLibrary> {
        self.mtllib.as_ref()
    }

    /// Resolve a face material; `None` and stale ids fall back to the default.
    pub fn material(&self, id: Option<MaterialId>) -> &Material {
        id.and_then(|id| self.mtllib.as_ref()?.get(id))
            .unwrap_or(&self.default_material)
    }

    /// Box over all vertices with at least three components, `None` if there
    /// were none.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Error out if the model was disposed.
    pub fn ensure_live(&self) -> AssetResult<()> {
        if self.disposed {
            Err(AssetError::Disposed)
        } else {
            Ok(())
        }
    }

    pub fn attribute(&self, attribute: Attribute) -> &[Vec<f32>] {
        match attribute {
            Attribute::Vertex => &self.vertices,
            Attribute::Normal => &self.normals,
            Attribute::TexCoord => &self.tex_coords,
        }
    }

    /// Checked lookup of a face attribute with at least `required` components.
    pub fn resolve(
        &self,
        group: &Group,
        face: usize,
        attribute: Attribute,
        index: usize,
        required: usize,
    ) -> AssetResult<&[f32]> {
        let values = self.attribute(attribute);
        let tuple = values.get(index).ok_or_else(|| AssetError::IndexOutOfRange {
            group: group.name.clone(),
            face,
            attribute,
            index,
            len: values.len(),
        })?;
        if tuple.len() < required {
            return Err(AssetError::ShortTuple {
                attribute,
                index,
                len: tuple.len(),
                required,
            });
        }
        Ok(tuple)
    }

    /// Check every face index against the model arrays.
    pub fn validate(&self) -> AssetResult<()> {
        for group in &self.groups {
            for (face_no, face) in group.faces.iter().enumerate() {
                let check = |indices: &[usize], attribute: Attribute, len: usize| {
                    match indices.iter().find(|&&i| i >= len) {
                        Some(&index) => Err(AssetError::IndexOutOfRange {
                            group: group.name.clone(),
                            face: face_no,
                            attribute,
                            index,
                            len,
                        }),
                        None => Ok(()),
                    }
                };
                check(&face.vert_indices, Attribute::Vertex, self.vertices.len())?;
                if let Some(n) = &face.normal_indices {
                    check(n, Attribute::Normal, self.normals.len())?;
                }
                if let Some(t) = &face.tex_coord_indices {
                    check(t, Attribute::TexCoord, self.tex_coords.len())?;
                }
            }
        }
        Ok(())
    }

    /// Release GPU textures held by the material library. One-shot.
    pub fn dispose(&mut self, gpu: &mut impl TextureRelease) -> AssetResult<()> {
        self.ensure_live()?;
        let mut released = 0;
        if let Some(lib) = &self.mtllib {
            for texture in lib.materials().iter().filter_map(|m| m.diffuse_map.as_ref()) {
                gpu.release_texture(texture);
                released += 1;
            }
        }
        self.disposed = true;
        log::debug!("Disposed OBJ model ({} texture(s) released)", released);
        Ok(())
    }
}
