//! OBJ parser keeping groups, materials and polygon faces as declared.
//!
//! Supported directives: `v`, `vn`, `vt`, `f`, `g`, `mtllib`, `usemtl`.
//! Everything else (comments, `o`, `s`, `l`, `p`, ...) is skipped.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use corelib::{Vec3, bounds::BoundsAccumulator};

use crate::{
    error::{AssetError, AssetResult},
    model::{Face, Group, ObjModel},
    mtl::{MaterialId, MaterialLibrary},
};

/// Name of the group that collects faces declared before any `g` line.
pub const DEFAULT_GROUP_NAME: &str = "Unnamed Default Group";

/// Load an OBJ model; `mtllib` paths resolve against the file's directory.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> AssetResult<ObjModel> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    log::info!("Loading OBJ model {:?}", path);
    load_obj_from_reader(BufReader::new(file), base_dir)
}

/// Load an OBJ model from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R, base_dir: &Path) -> AssetResult<ObjModel> {
    parse_obj(reader, base_dir)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str, base_dir: &Path) -> AssetResult<ObjModel> {
    parse_obj(io::Cursor::new(contents), base_dir)
}

/// Directive of one OBJ line, keyed on its first token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineKind {
    Vertex,
    Normal,
    TexCoord,
    Face,
    MaterialLibrary,
    UseMaterial,
    Group,
    Ignored,
}

/// Split a trimmed line into its kind and the text after the directive.
fn classify(line: &str) -> (LineKind, &str) {
    let Some(tag) = line.split_whitespace().next() else {
        return (LineKind::Ignored, "");
    };
    let kind = match tag {
        "v" => LineKind::Vertex,
        "vn" => LineKind::Normal,
        "vt" => LineKind::TexCoord,
        "f" => LineKind::Face,
        "mtllib" => LineKind::MaterialLibrary,
        "usemtl" => LineKind::UseMaterial,
        "g" => LineKind::Group,
        _ => LineKind::Ignored,
    };
    (kind, line[tag.len()..].trim_start())
}

/// Line currently being handled, for error context.
#[derive(Clone, Copy)]
struct LineCtx<'a> {
    no: usize,
    raw: &'a str,
}

impl LineCtx<'_> {
    fn parse_error(&self, reason: impl Into<String>) -> AssetError {
        AssetError::parse(self.no, self.raw, reason)
    }

    fn missing(&self, directive: &'static str) -> AssetError {
        AssetError::MissingArgument {
            line: self.no,
            directive,
        }
    }
}

struct ParserState<'a> {
    model: ObjModel,
    base_dir: &'a Path,
    current_group: Option<Group>,
    current_material: Option<MaterialId>,
    bounds: BoundsAccumulator,
}

impl<'a> ParserState<'a> {
    fn new(base_dir: &'a Path) -> Self {
        Self {
            model: ObjModel::empty(),
            base_dir,
            current_group: None,
            current_material: None,
            bounds: BoundsAccumulator::default(),
        }
    }

    fn handle(&mut self, kind: LineKind, args: &str, ctx: LineCtx<'_>) -> AssetResult<()> {
        match kind {
            LineKind::Vertex => self.vertex(args, ctx),
            LineKind::Normal => {
                let n = read_floats(args, ctx)?;
                self.model.normals.push(n);
                Ok(())
            }
            LineKind::TexCoord => {
                let t = read_floats(args, ctx)?;
                self.model.tex_coords.push(t);
                Ok(())
            }
            LineKind::Face => self.face(args, ctx),
            LineKind::MaterialLibrary => self.material_library(args, ctx),
            LineKind::UseMaterial => self.use_material(args, ctx),
            LineKind::Group => {
                self.group(args);
                Ok(())
            }
            LineKind::Ignored => Ok(()),
        }
    }

    fn vertex(&mut self, args: &str, ctx: LineCtx<'_>) -> AssetResult<()> {
        let v = read_floats(args, ctx)?;
        if let &[x, y, z, ..] = v.as_slice() {
            self.bounds.include(Vec3::new(x, y, z));
        }
        self.model.vertices.push(v);
        Ok(())
    }

    fn face(&mut self, args: &str, ctx: LineCtx<'_>) -> AssetResult<()> {
        let mut face = parse_face(args, ctx)?;
        face.material = self.current_material;
        self.current_group
            .get_or_insert_with(|| Group::new(DEFAULT_GROUP_NAME))
            .faces
            .push(face);
        Ok(())
    }

    fn material_library(&mut self, args: &str, ctx: LineCtx<'_>) -> AssetResult<()> {
        if args.is_empty() {
            return Err(ctx.missing("mtllib"));
        }
        let lib = self.model.mtllib.get_or_insert_with(MaterialLibrary::new);
        for file in args.split_whitespace() {
            lib.load_from_path(self.base_dir.join(file))?;
        }
        Ok(())
    }

    fn use_material(&mut self, args: &str, ctx: LineCtx<'_>) -> AssetResult<()> {
        let name = args.trim();
        if name.is_empty() {
            return Err(ctx.missing("usemtl"));
        }
        let Some(lib) = &self.model.mtllib else {
            return Err(AssetError::NoMaterialLibrary {
                line: ctx.no,
                name: name.to_owned(),
            });
        };
        let id = lib.find(name).ok_or_else(|| AssetError::UnknownMaterial {
            line: ctx.no,
            name: name.to_owned(),
        })?;
        self.current_material = Some(id);
        Ok(())
    }

    fn group(&mut self, args: &str) {
        if let Some(open) = self.current_group.take() {
            self.model.groups.push(open);
        }
        let name = args.split_whitespace().next().unwrap_or("default");
        self.current_group = Some(Group::new(name));
    }

    fn finish(mut self) -> ObjModel {
        if let Some(open) = self.current_group.take() {
            self.model.groups.push(open);
        }
        self.model.bounds = self.bounds.finish();
        self.model
    }
}

fn parse_obj<R: BufRead>(reader: R, base_dir: &Path) -> AssetResult<ObjModel> {
    let mut state = ParserState::new(base_dir);

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.map_err(|source| AssetError::Read {
            line: line_no,
            source,
        })?;
        let trimmed = line.trim();
        let (kind, args) = classify(trimmed);
        let ctx = LineCtx {
            no: line_no,
            raw: trimmed,
        };
        state.handle(kind, args, ctx)?;
    }

    let model = state.finish();
    if model.bounds.is_none() {
        log::warn!("OBJ has no vertex with 3 components; bounding box is empty");
    }
    log::info!(
        "Loaded OBJ: {} vertices, {} normals, {} texcoords, {} group(s), {} face(s)",
        model.vertices.len(),
        model.normals.len(),
        model.tex_coords.len(),
        model.groups.len(),
        model.face_count()
    );
    Ok(model)
}

/// All tokens as floats; a bare directive yields an empty tuple.
fn read_floats(args: &str, ctx: LineCtx<'_>) -> AssetResult<Vec<f32>> {
    args.split_whitespace()
        .map(|token| {
            token
                .parse::<f32>()
                .map_err(|e| ctx.parse_error(format!("invalid number '{token}': {e}")))
        })
        .collect()
}

/// Index layout of every vertex on a face line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FaceFormat {
    /// `v`
    Vertex,
    /// `v/vt`
    VertexTexCoord,
    /// `v//vn`
    VertexNormal,
    /// `v/vt/vn`
    VertexTexCoordNormal,
}

impl FaceFormat {
    /// Detect from one face vertex. Trailing empty sub-tokens don't count.
    fn detect(token: &str) -> Self {
        let parts: Vec<&str> = token.split('/').collect();
        let used = parts.iter().rposition(|p| !p.is_empty()).map_or(1, |i| i + 1);
        match used {
            1 => FaceFormat::Vertex,
            2 => FaceFormat::VertexTexCoord,
            _ if parts[1].is_empty() => FaceFormat::VertexNormal,
            _ => FaceFormat::VertexTexCoordNormal,
        }
    }

    fn has_tex_coords(self) -> bool {
        matches!(self, FaceFormat::VertexTexCoord | FaceFormat::VertexTexCoordNormal)
    }

    fn has_normals(self) -> bool {
        matches!(self, FaceFormat::VertexNormal | FaceFormat::VertexTexCoordNormal)
    }
}

/// Parse the vertex list of an `f` line. The format seen on the first vertex
/// is applied to all of them; mixed layouts are not supported.
fn parse_face(args: &str, ctx: LineCtx<'_>) -> AssetResult<Face> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return Err(ctx.missing("f"));
    };
    let format = FaceFormat::detect(first);

    let mut vert_indices = Vec::with_capacity(tokens.len());
    let mut tex_coord_indices = format.has_tex_coords().then(|| Vec::with_capacity(tokens.len()));
    let mut normal_indices = format.has_normals().then(|| Vec::with_capacity(tokens.len()));

    for token in tokens {
        let parts: Vec<&str> = token.split('/').collect();
        let sub = |i: usize| {
            parts.get(i).copied().ok_or_else(|| {
                ctx.parse_error(format!("face vertex '{token}' does not match {format:?} layout"))
            })
        };
        vert_indices.push(parse_index(sub(0)?, ctx)?);
        if let Some(t) = tex_coord_indices.as_mut() {
            t.push(parse_index(sub(1)?, ctx)?);
        }
        if let Some(n) = normal_indices.as_mut() {
            n.push(parse_index(sub(2)?, ctx)?);
        }
    }

    Ok(Face {
        vert_indices,
        normal_indices,
        tex_coord_indices,
        material: None,
    })
}

/// OBJ indices are 1-based; relative (negative) indices are not supported.
fn parse_index(token: &str, ctx: LineCtx<'_>) -> AssetResult<usize> {
    let raw = token
        .parse::<i64>()
        .map_err(|e| ctx.parse_error(format!("invalid index '{token}': {e}")))?;
    if raw < 1 {
        return Err(ctx.parse_error(format!("index {raw} is not a positive 1-based index")));
    }
    usize::try_from(raw - 1).map_err(|_| ctx.parse_error(format!("index {raw} too large")))
}
