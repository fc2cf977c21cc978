//! Wavefront MTL material library.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    error::{AssetError, AssetResult},
    texture::Texture,
};

/// Stable handle of a material inside its library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Fixed-function surface description.
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub emission: [f32; 3],
    pub shininess: f32,
    pub alpha: f32,
    pub illum: u32,
    pub diffuse_map: Option<Texture>,
}

impl Material {
    /// Material with GL's default lighting coefficients.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [0.2, 0.2, 0.2],
            diffuse: [0.8, 0.8, 0.8],
            specular: [0.0, 0.0, 0.0],
            emission: [0.0, 0.0, 0.0],
            shininess: 0.0,
            alpha: 1.0,
            illum: 2,
            diffuse_map: None,
        }
    }

    /// Diffuse color with alpha, ready for a `glColor4fv`-style call.
    pub fn diffuse_rgba(&self) -> [f32; 4] {
        let [r, g, b] = self.diffuse;
        [r, g, b, self.alpha]
    }
}

/// Named materials collected from one or more `.mtl` files.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a `.mtl` file; texture paths resolve against its directory.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> AssetResult<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let before = self.materials.len();
        self.load_from_reader(BufReader::new(file), base_dir)?;
        log::info!(
            "Material library {:?}: {} new material(s), {} total",
            path,
            self.materials.len() - before,
            self.materials.len()
        );
        Ok(())
    }

    /// Parse MTL text into this library.
    ///
    /// A name that is already present is replaced in place, so previously
    /// handed-out [`MaterialId`]s stay valid.
    pub fn load_from_reader<R: BufRead>(&mut self, reader: R, base_dir: &Path) -> AssetResult<()> {
        let mut current: Option<Material> = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line_no = line_no + 1;
            let line = line.map_err(|source| AssetError::Read {
                line: line_no,
                source,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut parts = trimmed.split_whitespace();
            let Some(tag) = parts.next() else { continue };

            if tag == "newmtl" {
                let name = rest_of_line(trimmed, tag)
                    .ok_or(AssetError::MissingArgument {
                        line: line_no,
                        directive: "newmtl",
                    })?;
                if let Some(done) = current.replace(Material::new(name)) {
                    self.insert(done);
                }
                continue;
            }

            let known = matches!(tag, "Ka" | "Kd" | "Ks" | "Ke" | "Ns" | "d" | "Tr" | "illum" | "map_Kd");
            if !known {
                continue;
            }
            let Some(mat) = current.as_mut() else {
                return Err(AssetError::parse(line_no, trimmed, format!("'{tag}' before any newmtl")));
            };

            match tag {
                "Ka" => mat.ambient = parse_rgb(parts, line_no, trimmed)?,
                "Kd" => mat.diffuse = parse_rgb(parts, line_no, trimmed)?,
                "Ks" => mat.specular = parse_rgb(parts, line_no, trimmed)?,
                "Ke" => mat.emission = parse_rgb(parts, line_no, trimmed)?,
                "Ns" => mat.shininess = parse_scalar(parts.next(), line_no, trimmed)?,
                "d" => mat.alpha = parse_scalar(parts.next(), line_no, trimmed)?,
                "Tr" => mat.alpha = 1.0 - parse_scalar(parts.next(), line_no, trimmed)?,
                "illum" => {
                    let raw = parts.next().unwrap_or_default();
                    mat.illum = raw.parse().map_err(|_| {
                        AssetError::parse(line_no, trimmed, format!("invalid illum model '{raw}'"))
                    })?;
                }
                "map_Kd" => {
                    // Options like -s/-o precede the file name; take the last token.
                    let file = parts.last().ok_or(AssetError::MissingArgument {
                        line: line_no,
                        directive: "map_Kd",
                    })?;
                    let texture = Texture::load_or_placeholder(base_dir.join(file));
                    if texture.placeholder {
                        log::warn!("Material '{}' uses a placeholder diffuse map", mat.name);
                    }
                    mat.diffuse_map = Some(texture);
                }
                _ => {}
            }
        }

        if let Some(done) = current {
            self.insert(done);
        }
        Ok(())
    }

    fn insert(&mut self, material: Material) {
        match self.materials.iter_mut().find(|m| m.name == material.name) {
            Some(slot) => {
                log::warn!("Material '{}' redefined; replacing earlier definition", material.name);
                *slot = material;
            }
            None => self.materials.push(material),
        }
    }

    /// Exact-name lookup.
    pub fn find(&self, name: &str) -> Option<MaterialId> {
        self.materials.iter().position(|m| m.name == name).map(MaterialId)
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

fn rest_of_line<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let rest = line[tag.len()..].trim();
    (!rest.is_empty()).then_some(rest)
}

fn parse_scalar(token: Option<&str>, line_no: usize, line: &str) -> AssetResult<f32> {
    let token = token.ok_or_else(|| AssetError::parse(line_no, line, "missing value"))?;
    token
        .parse::<f32>()
        .map_err(|e| AssetError::parse(line_no, line, format!("invalid number '{token}': {e}")))
}

fn parse_rgb<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    line_no: usize,
    line: &str,
) -> AssetResult<[f32; 3]> {
    let r = parse_scalar(parts.next(), line_no, line)?;
    // A single value means grey.
    let g = match parts.next() {
        Some(t) => parse_scalar(Some(t), line_no, line)?,
        None => return Ok([r, r, r]),
    };
    let b = parse_scalar(parts.next(), line_no, line)?;
    Ok([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureData;
    use std::io::Cursor;

    fn parse(src: &str) -> AssetResult<MaterialLibrary> {
        let mut lib = MaterialLibrary::new();
        lib.load_from_reader(Cursor::new(src), Path::new("."))?;
        Ok(lib)
    }

    #[test]
    fn parses_colors_and_scalars() {
        let lib = parse(
            "# grass\n\
             newmtl Grass\n\
             Ka 0.1 0.2 0.3\n\
             Kd 0.0 0.6 0.0\n\
             Ks 0.5\n\
             Ns 12.5\n\
             Tr 0.25\n\
             illum 1\n\
             newmtl Line\n\
             Kd 1 1 1\n",
        )
        .unwrap();

        assert_eq!(lib.len(), 2);
        let grass = lib.get(lib.find("Grass").unwrap()).unwrap();
        assert_eq!(grass.ambient, [0.1, 0.2, 0.3]);
        assert_eq!(grass.diffuse, [0.0, 0.6, 0.0]);
        assert_eq!(grass.specular, [0.5, 0.5, 0.5]);
        assert_eq!(grass.shininess, 12.5);
        assert_eq!(grass.alpha, 0.75);
        assert_eq!(grass.illum, 1);
        assert_eq!(lib.find("Line"), Some(MaterialId(1)));
        assert_eq!(lib.get(MaterialId(1)).unwrap().ambient, [0.2, 0.2, 0.2]);
    }

    #[test]
    fn directive_before_newmtl_is_error() {
        let err = parse("Kd 1 0 0\n").unwrap_err();
        assert!(matches!(err, AssetError::Parse { line: 1, .. }));
    }

    #[test]
    fn bad_number_reports_line() {
        let err = parse("newmtl A\nKd 1 x 0\n").unwrap_err();
        match err {
            AssetError::Parse { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "Kd 1 x 0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn redefinition_replaces_in_place() {
        let mut lib = parse("newmtl A\nKd 1 0 0\nnewmtl B\n").unwrap();
        lib.load_from_reader(Cursor::new("newmtl A\nKd 0 0 1\nnewmtl C\n"), Path::new("."))
            .unwrap();
        assert_eq!(lib.len(), 3);
        assert_eq!(lib.find("A"), Some(MaterialId(0)));
        assert_eq!(lib.get(MaterialId(0)).unwrap().diffuse, [0.0, 0.0, 1.0]);
        assert_eq!(lib.find("C"), Some(MaterialId(2)));
    }

    #[test]
    fn missing_texture_gets_placeholder() {
        let lib = parse("newmtl A\nmap_Kd nope.png\n").unwrap();
        let map = lib.get(MaterialId(0)).unwrap().diffuse_map.as_ref().unwrap();
        assert!(map.placeholder);
        assert_eq!(map.path, Path::new(".").join("nope.png"));
        assert_eq!(map.data.width, crate::texture::PLACEHOLDER_SIZE);
    }

    #[test]
    fn texture_resolves_against_library_dir() {
        let dir = tempfile::tempdir().unwrap();
        let tex = TextureData::placeholder(8);
        image::save_buffer(
            dir.path().join("ball.png"),
            &tex.data,
            8,
            8,
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        std::fs::write(dir.path().join("ball.mtl"), "newmtl Ball\nmap_Kd -s 1 1 1 ball.png\n").unwrap();

        let mut lib = MaterialLibrary::new();
        lib.load_from_path(dir.path().join("ball.mtl")).unwrap();
        let map = lib.get(MaterialId(0)).unwrap().diffuse_map.as_ref().unwrap();
        assert_eq!(map.path, dir.path().join("ball.png"));
        assert!(!map.placeholder);
        assert_eq!(map.data.width, 8);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut lib = MaterialLibrary::new();
        let err = lib.load_from_path("/no/such/dir/x.mtl").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
