//! Top-down 2D mini map of player and ball positions.

use corelib::{GameState, GameStateListener, Mat4, TopDownCamera, Vec3, Viewport, WorldSnapshot};

const OUTLINE: [f32; 3] = [0.0, 0.0, 0.0];
const BALL: [f32; 3] = [1.0, 1.0, 1.0];

/// Layout knobs for the mini map, in screen-relative units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Offset of the inset from the bottom-left corner, pixels.
    pub margin: i32,
    /// Inset width as a fraction of the screen width.
    pub width_fraction: f32,
    /// Agent point size as a fraction of the screen width.
    pub point_size_fraction: f32,
    /// Ball point size relative to agent points.
    pub ball_scale: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            margin: 20,
            width_fraction: 0.3,
            point_size_fraction: 0.01125,
            ball_scale: 0.75,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPoint {
    pub position: Vec3,
    pub color: [f32; 3],
}

/// Points drawn with one point size.
#[derive(Clone, Debug, PartialEq)]
pub struct PointBatch {
    pub size: f32,
    pub points: Vec<OverlayPoint>,
}

/// Everything a backend needs to draw one overlay frame.
///
/// Draw the field model with `projection`/`view` inside `viewport`, then the
/// batches in order (smooth points), then switch back to `restore`.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayFrame {
    pub projection: Mat4,
    pub view: Mat4,
    pub viewport: Viewport,
    pub restore: Viewport,
    pub batches: Vec<PointBatch>,
}

/// Displays player positions from a 2D top-down view of the field.
#[derive(Clone, Debug)]
pub struct Field2DOverlay {
    field_width: f32,
    field_length: f32,
    visible: bool,
    config: OverlayConfig,
}

impl Default for Field2DOverlay {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl Field2DOverlay {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            field_width: 180.0,
            field_length: 120.0,
            visible: false,
            config,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn field_size(&self) -> (f32, f32) {
        (self.field_width, self.field_length)
    }

    pub fn camera(&self) -> TopDownCamera {
        TopDownCamera::for_field(self.field_width, self.field_length)
    }

    /// Inset rectangle for a screen; height keeps the field's aspect.
    pub fn inset(&self, screen: Viewport) -> Viewport {
        let w = (screen.w as f32 * self.config.width_fraction) as u32;
        let h = (w as f32 * self.field_width / self.field_length) as u32;
        Viewport::new(self.config.margin, self.config.margin, w, h)
    }

    /// Lay out one frame, or `None` while hidden or before the field is loaded.
    pub fn plan(&self, screen: Viewport, world: &WorldSnapshot) -> Option<OverlayFrame> {
        if !self.visible || !world.field_loaded {
            return None;
        }

        let cam = self.camera();
        let point_size = (screen.w as f32 * self.config.point_size_fraction).floor();

        // Black pass first, then a slightly smaller colored pass on top,
        // leaving a dark outline around each point.
        let mut batches = Vec::with_capacity(4);
        self.push_points(&mut batches, world, point_size, Some(OUTLINE));
        self.push_points(&mut batches, world, (point_size - 2.0).max(1.0), None);

        Some(OverlayFrame {
            projection: cam.proj(),
            view: cam.view(),
            viewport: self.inset(screen),
            restore: screen,
            batches,
        })
    }

    fn push_points(
        &self,
        batches: &mut Vec<PointBatch>,
        world: &WorldSnapshot,
        size: f32,
        manual_color: Option<[f32; 3]>,
    ) {
        let agents = [&world.left, &world.right]
            .into_iter()
            .flat_map(|team| {
                let color = manual_color.unwrap_or(team.color);
                team.known_positions()
                    .map(move |position| OverlayPoint { position, color })
            })
            .collect();
        batches.push(PointBatch {
            size,
            points: agents,
        });

        if let Some(position) = world.ball {
            batches.push(PointBatch {
                size: size * self.config.ball_scale,
                points: vec![OverlayPoint {
                    position,
                    color: manual_color.unwrap_or(BALL),
                }],
            });
        }
    }
}

impl GameStateListener for Field2DOverlay {
    fn measures_and_rules_changed(&mut self, gs: &GameState) {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(gs.field_width) || !valid(gs.field_length) {
            log::warn!(
                "Ignoring field size {}x{}; keeping {}x{}",
                gs.field_width,
                gs.field_length,
                self.field_width,
                self.field_length
            );
            return;
        }
        log::debug!(
            "Overlay field size {}x{} -> {}x{}",
            self.field_width,
            self.field_length,
            gs.field_width,
            gs.field_length
        );
        self.field_width = gs.field_width;
        self.field_length = gs.field_length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{Team, vec3};

    fn world() -> WorldSnapshot {
        let mut left = Team::new([0.0, 0.0, 1.0]);
        left.agents = vec![Some(vec3(-5.0, 0.4, 1.0)), None];
        let mut right = Team::new([1.0, 0.0, 0.0]);
        right.agents = vec![Some(vec3(5.0, 0.4, -1.0))];
        WorldSnapshot {
            left,
            right,
            ball: Some(vec3(0.0, 0.04, 0.0)),
            field_loaded: true,
        }
    }

    fn shown() -> Field2DOverlay {
        let mut o = Field2DOverlay::default();
        o.set_visible(true);
        o
    }

    const SCREEN: Viewport = Viewport::new(0, 0, 1280, 720);

    #[test]
    fn hidden_or_unloaded_draws_nothing() {
        let o = Field2DOverlay::default();
        assert!(!o.is_visible());
        assert!(o.plan(SCREEN, &world()).is_none());

        let mut w = world();
        w.field_loaded = false;
        assert!(shown().plan(SCREEN, &w).is_none());
    }

    #[test]
    fn inset_keeps_field_aspect() {
        let o = shown();
        assert_eq!(o.inset(SCREEN), Viewport::new(20, 20, 384, 576));

        let mut o = o;
        o.measures_and_rules_changed(&GameState::default());
        assert_eq!(o.field_size(), (20.0, 30.0));
        assert_eq!(o.inset(SCREEN), Viewport::new(20, 20, 384, 256));
    }

    #[test]
    fn non_positive_measures_are_ignored() {
        let mut o = shown();
        for (w, l) in [(20.0, 0.0), (-1.0, 30.0), (f32::NAN, 30.0)] {
            o.measures_and_rules_changed(&GameState {
                field_width: w,
                field_length: l,
                ..GameState::default()
            });
            assert_eq!(o.field_size(), (180.0, 120.0));
        }
        assert_eq!(o.inset(SCREEN), Viewport::new(20, 20, 384, 576));
        let frame = o.plan(SCREEN, &world()).unwrap();
        assert!(frame.projection.to_cols_array().iter().all(|f| f.is_finite()));
    }

    #[test]
    fn outline_pass_then_colored_pass() {
        let frame = shown().plan(SCREEN, &world()).unwrap();
        assert_eq!(frame.restore, SCREEN);

        let sizes: Vec<f32> = frame.batches.iter().map(|b| b.size).collect();
        assert_eq!(sizes, [14.0, 10.5, 12.0, 9.0]);

        assert!(frame.batches[0].points.iter().all(|p| p.color == OUTLINE));
        assert_eq!(frame.batches[0].points.len(), 2);

        let colored = &frame.batches[2].points;
        assert_eq!(colored[0].color, [0.0, 0.0, 1.0]);
        assert_eq!(colored[1].color, [1.0, 0.0, 0.0]);
        assert_eq!(colored[1].position, vec3(5.0, 0.4, -1.0));
        assert_eq!(frame.batches[3].points[0].color, BALL);
    }

    #[test]
    fn unknown_ball_has_no_batch() {
        let mut w = world();
        w.ball = None;
        let frame = shown().plan(SCREEN, &w).unwrap();
        assert_eq!(frame.batches.len(), 2);
    }

    #[test]
    fn camera_maps_field_corner_to_clip_corner() {
        let o = shown();
        let frame = o.plan(SCREEN, &world()).unwrap();
        let pv = frame.projection * frame.view;
        // Half length along X, half width along Z.
        let clip = pv.project_point3(vec3(60.0, 0.0, 90.0));
        assert!((clip.x.abs() - 1.0).abs() < 1e-5);
        assert!((clip.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn tiny_screens_keep_positive_point_size() {
        let frame = shown().plan(Viewport::new(0, 0, 100, 100), &world()).unwrap();
        assert!(frame.batches.iter().all(|b| b.size > 0.0));
    }
}
