//! Asset loading errors.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Per-vertex attribute a face index points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    Vertex,
    Normal,
    TexCoord,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Attribute::Vertex => "vertex",
            Attribute::Normal => "normal",
            Attribute::TexCoord => "texture coordinate",
        })
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("Parse error on line {line} ('{content}'): {reason}")]
    Parse {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Directive '{directive}' on line {line} is missing its argument")]
    MissingArgument { line: usize, directive: &'static str },

    #[error("Unknown material '{name}' on line {line}")]
    UnknownMaterial { line: usize, name: String },

    #[error("usemtl '{name}' on line {line} before any mtllib")]
    NoMaterialLibrary { line: usize, name: String },

    #[error(
        "Group '{group}', face {face}: {attribute} index {index} out of range (len={len})"
    )]
    IndexOutOfRange {
        group: String,
        face: usize,
        attribute: Attribute,
        index: usize,
        len: usize,
    },

    #[error("{attribute} {index} has {len} components, need {required}")]
    ShortTuple {
        attribute: Attribute,
        index: usize,
        len: usize,
        required: usize,
    },

    #[error("Too many vertices in mesh (>{max})")]
    TooManyVertices { max: u32 },

    #[error("Model already disposed")]
    Disposed,

    #[error("Texture {width}x{height} needs {width}*{height}*4 bytes, got {len}")]
    TextureSize { width: u32, height: u32, len: usize },

    #[error("Failed to load texture {}: {source}", .path.display())]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type AssetResult<T> = Result<T, AssetError>;

impl AssetError {
    pub(crate) fn parse(line: usize, content: &str, reason: impl Into<String>) -> Self {
        AssetError::Parse {
            line,
            content: content.to_owned(),
            reason: reason.into(),
        }
    }
}
