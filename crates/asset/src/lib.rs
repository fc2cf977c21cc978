//! Asset loading/parsers: OBJ models, MTL material libraries, textures.

pub mod error;
pub mod mesh;
pub mod model;
pub mod mtl;
pub mod obj;
pub mod texture;

pub use error::{AssetError, AssetResult, Attribute};
pub use mesh::{MeshData, MeshVertex};
pub use model::{Face, Group, ObjModel};
pub use mtl::{Material, MaterialId, MaterialLibrary};
pub use obj::{load_obj_from_path, load_obj_from_reader, load_obj_from_str};
pub use texture::{Texture, TextureData, TextureRelease};
