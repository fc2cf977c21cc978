//! Immediate-mode walk over a grouped OBJ model.

use asset::{AssetResult, Attribute, Face, Group, Material, ObjModel};

/// Receiver of polygon draw calls (a GL2-style `glBegin(GL_POLYGON)` stream).
///
/// Per corner the walker emits `normal` and `tex_coord` (when the face has
/// them) before `vertex`.
pub trait PolygonSink {
    fn bind_material(&mut self, material: &Material);
    fn begin_polygon(&mut self, vertex_count: usize);
    fn normal(&mut self, n: &[f32]);
    fn tex_coord(&mut self, t: &[f32]);
    fn vertex(&mut self, v: &[f32]);
    fn end_polygon(&mut self);
}

/// Counters for one [`draw_model`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub polygons: usize,
    pub vertices: usize,
    pub material_binds: usize,
}

/// Draw every face in group/face order.
///
/// The bound material is tracked across the whole pass and only re-bound when
/// consecutive faces differ. Fails on a disposed model or a bad index; all
/// corners of a face are resolved before anything reaches the sink, so every
/// `begin_polygon` is matched by an `end_polygon`.
pub fn draw_model(model: &ObjModel, sink: &mut impl PolygonSink) -> AssetResult<DrawStats> {
    model.ensure_live()?;

    let mut stats = DrawStats::default();
    let mut bound = None;

    for group in model.groups() {
        for (face_no, face) in group.faces().iter().enumerate() {
            let corners = resolve_corners(model, group, face_no, face)?;

            let wanted = face.material();
            if stats.material_binds == 0 || bound != wanted {
                sink.bind_material(model.material(wanted));
                bound = wanted;
                stats.material_binds += 1;
            }

            sink.begin_polygon(corners.len());
            for corner in &corners {
                if let Some(n) = corner.normal {
                    sink.normal(n);
                }
                if let Some(t) = corner.tex_coord {
                    sink.tex_coord(t);
                }
                sink.vertex(corner.vertex);
            }
            sink.end_polygon();

            stats.polygons += 1;
            stats.vertices += face.len();
        }
    }

    log::trace!("draw_model: {:?}", stats);
    Ok(stats)
}

/// Attribute tuples of one face corner.
struct Corner<'a> {
    normal: Option<&'a [f32]>,
    tex_coord: Option<&'a [f32]>,
    vertex: &'a [f32],
}

fn resolve_corners<'a>(
    model: &'a ObjModel,
    group: &Group,
    face_no: usize,
    face: &Face,
) -> AssetResult<Vec<Corner<'a>>> {
    face.vert_indices()
        .iter()
        .enumerate()
        .map(|(corner, &vi)| {
            let normal = face
                .normal_indices()
                .map(|n| model.resolve(group, face_no, Attribute::Normal, n[corner], 3))
                .transpose()?;
            let tex_coord = face
                .tex_coord_indices()
                .map(|t| model.resolve(group, face_no, Attribute::TexCoord, t[corner], 2))
                .transpose()?;
            let vertex = model.resolve(group, face_no, Attribute::Vertex, vi, 3)?;
            Ok(Corner {
                normal,
                tex_coord,
                vertex,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset::{AssetError, Texture, TextureRelease, load_obj_from_path, load_obj_from_str};
    use std::{fs, path::Path};

    #[derive(Debug, PartialEq)]
    enum Call {
        Bind(String),
        Begin(usize),
        Normal(Vec<f32>),
        TexCoord(Vec<f32>),
        Vertex(Vec<f32>),
        End,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn binds(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Bind(name) => Some(name.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl PolygonSink for Recorder {
        fn bind_material(&mut self, material: &Material) {
            self.calls.push(Call::Bind(material.name.clone()));
        }
        fn begin_polygon(&mut self, vertex_count: usize) {
            self.calls.push(Call::Begin(vertex_count));
        }
        fn normal(&mut self, n: &[f32]) {
            self.calls.push(Call::Normal(n.to_vec()));
        }
        fn tex_coord(&mut self, t: &[f32]) {
            self.calls.push(Call::TexCoord(t.to_vec()));
        }
        fn vertex(&mut self, v: &[f32]) {
            self.calls.push(Call::Vertex(v.to_vec()));
        }
        fn end_polygon(&mut self) {
            self.calls.push(Call::End);
        }
    }

    struct NoGpu;

    impl TextureRelease for NoGpu {
        fn release_texture(&mut self, _texture: &Texture) {}
    }

    #[test]
    fn emits_normal_texcoord_vertex_per_corner() {
        let model = load_obj_from_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1/1 2/2/1 3/3/1\n",
            Path::new("."),
        )
        .unwrap();
        let mut rec = Recorder::default();
        let stats = draw_model(&model, &mut rec).unwrap();

        assert_eq!(
            stats,
            DrawStats {
                polygons: 1,
                vertices: 3,
                material_binds: 1
            }
        );
        assert_eq!(rec.calls[0], Call::Bind("Default Material".into()));
        assert_eq!(rec.calls[1], Call::Begin(3));
        assert_eq!(rec.calls[2], Call::Normal(vec![0.0, 0.0, 1.0]));
        assert_eq!(rec.calls[3], Call::TexCoord(vec![0.0, 0.0]));
        assert_eq!(rec.calls[4], Call::Vertex(vec![0.0, 0.0, 0.0]));
        assert_eq!(rec.calls[10], Call::Vertex(vec![0.0, 1.0, 0.0]));
        assert_eq!(rec.calls.last(), Some(&Call::End));
    }

    #[test]
    fn rebinds_only_when_material_changes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("m.mtl"), "newmtl Grass\nnewmtl Line\n").unwrap();
        let obj = dir.path().join("m.obj");
        fs::write(
            &obj,
            "mtllib m.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\n\
             usemtl Grass\ng A\nf 1 2 3\nf 1 2 3\n\
             g B\nf 1 2 3\n\
             usemtl Line\nf 1 2 3\n\
             usemtl Grass\nf 1 2 3\n",
        )
        .unwrap();
        let model = load_obj_from_path(&obj).unwrap();

        let mut rec = Recorder::default();
        let stats = draw_model(&model, &mut rec).unwrap();
        assert_eq!(rec.binds(), ["Grass", "Line", "Grass"]);
        assert_eq!(stats.material_binds, 3);
        assert_eq!(stats.polygons, 5);
    }

    #[test]
    fn out_of_range_index_fails_fast() {
        let model = load_obj_from_str("v 0 0 0\nv 1 0 0\nf 1 2 3\n", Path::new(".")).unwrap();
        let err = draw_model(&model, &mut Recorder::default()).unwrap_err();
        assert!(matches!(err, AssetError::IndexOutOfRange { index: 2, len: 2, .. }));
    }

    #[test]
    fn failed_face_leaves_no_open_polygon() {
        let model = load_obj_from_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nf 1 2 4\n",
            Path::new("."),
        )
        .unwrap();
        let mut rec = Recorder::default();
        assert!(draw_model(&model, &mut rec).is_err());

        let begins = rec.calls.iter().filter(|c| matches!(c, Call::Begin(_))).count();
        let ends = rec.calls.iter().filter(|c| matches!(c, Call::End)).count();
        assert_eq!((begins, ends), (1, 1));
        assert_eq!(rec.calls.last(), Some(&Call::End));

        let mut rec = Recorder::default();
        let bad = load_obj_from_str("v 0 0 0\nv 1 0 0\nf 1 2 3\n", Path::new(".")).unwrap();
        assert!(draw_model(&bad, &mut rec).is_err());
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn short_vertex_is_rejected() {
        let model = load_obj_from_str("v 0 0\nf 1 1 1\n", Path::new(".")).unwrap();
        let err = draw_model(&model, &mut Recorder::default()).unwrap_err();
        assert!(matches!(err, AssetError::ShortTuple { len: 2, required: 3, .. }));
    }

    #[test]
    fn render_after_dispose_is_rejected() {
        let mut model = load_obj_from_str("v 0 0 0\nf 1 1 1\n", Path::new(".")).unwrap();
        model.dispose(&mut NoGpu).unwrap();
        let mut rec = Recorder::default();
        assert!(matches!(draw_model(&model, &mut rec), Err(AssetError::Disposed)));
        assert!(rec.calls.is_empty());
    }
}
