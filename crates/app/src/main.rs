//! Entry point: load an OBJ model, check it, preview the field overlay.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use asset::{Material, Texture, TextureRelease};
use corelib::{Viewport, WorldSnapshot};
use renderer::{Field2DOverlay, PolygonSink, draw_model};

fn parse_obj_arg() -> Option<PathBuf> {
    std::env::args()
        .find_map(|arg| arg.strip_prefix("--obj=").map(PathBuf::from))
}

fn parse_triangulate_arg() -> bool {
    // --triangulate[=on|off], off by default
    for arg in std::env::args() {
        if arg == "--triangulate" {
            return true;
        }
        if let Some(val) = arg.strip_prefix("--triangulate=") {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    false
}

fn parse_viewport_arg() -> Viewport {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--viewport=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        }
    }

    Viewport::new(0, 0, w.unwrap_or(1280).max(1), h.unwrap_or(720).max(1))
}

/// Sink that only counts, standing in for a GL context.
#[derive(Default)]
struct CountingSink {
    textured_binds: usize,
}

impl PolygonSink for CountingSink {
    fn bind_material(&mut self, material: &Material) {
        log::debug!("bind material '{}'", material.name);
        if material.diffuse_map.is_some() {
            self.textured_binds += 1;
        }
    }
    fn begin_polygon(&mut self, _vertex_count: usize) {}
    fn normal(&mut self, _n: &[f32]) {}
    fn tex_coord(&mut self, _t: &[f32]) {}
    fn vertex(&mut self, _v: &[f32]) {}
    fn end_polygon(&mut self) {}
}

impl TextureRelease for CountingSink {
    fn release_texture(&mut self, texture: &Texture) {
        log::debug!("release texture {:?}", texture.path);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(obj) = parse_obj_arg() else {
        bail!("usage: app --obj=PATH [--triangulate[=on|off]] [--viewport=WxH]");
    };
    let triangulate = parse_triangulate_arg();
    let screen = parse_viewport_arg();
    log::info!(
        "Starting fieldview. model={:?}, triangulate={}, viewport={}x{}",
        obj,
        triangulate,
        screen.w,
        screen.h
    );

    let mut model = asset::load_obj_from_path(&obj)
        .with_context(|| format!("Failed to load OBJ model {}", obj.display()))?;
    model.validate().context("OBJ model references missing data")?;

    match model.bounds() {
        Some(b) => log::info!("Bounds: min={} max={} size={}", b.min, b.max, b.size()),
        None => log::warn!("Model has no 3D vertices"),
    }
    for group in model.groups() {
        log::info!("Group '{}': {} face(s)", group.name(), group.faces().len());
    }

    let mut sink = CountingSink::default();
    let stats = draw_model(&model, &mut sink)?;
    log::info!(
        "Draw pass: {} polygon(s), {} vertices, {} material bind(s) ({} textured)",
        stats.polygons,
        stats.vertices,
        stats.material_binds,
        sink.textured_binds
    );

    if triangulate {
        let mesh = model.to_mesh_data()?;
        if !mesh.is_valid() {
            bail!("{} has no faces to triangulate", obj.display());
        }
        log::info!(
            "Mesh: {} vertices, {} triangles, {} bytes",
            mesh.vertices.len(),
            mesh.triangle_count(),
            mesh.vertex_bytes().len()
        );
    }

    let mut overlay = Field2DOverlay::default();
    overlay.set_visible(true);
    let world = WorldSnapshot {
        field_loaded: true,
        ..Default::default()
    };
    if let Some(frame) = overlay.plan(screen, &world) {
        log::info!(
            "Overlay inset {}x{} at ({}, {})",
            frame.viewport.w,
            frame.viewport.h,
            frame.viewport.x,
            frame.viewport.y
        );
    }

    model.dispose(&mut sink)?;
    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
