/// Per-frame orchestration: clear, faces, edges, points, overlay.
///
/// There is no depth buffer. Faces are painted in mesh order, so a far face
/// listed after a near one paints over it; edges and points are drawn after
/// all faces so they stay on top.
use nalgebra::{Point2, Point3};

use crate::color::{Rgb, Rgba};
use crate::geometry::Mesh;
use crate::math::{dot, normalize, try_face_normal};
use crate::projection::{Camera, NEAR_EPSILON};
use crate::schedule::TICK_RATE;
use crate::settings::{LineColor, RenderSettings};
use crate::shading::{shade, ShaderSettings};
use crate::state::CameraState;
use crate::surface::DrawSurface;
use crate::transform::Transform;

pub const BACKGROUND: Rgb = Rgb::new(40, 63, 86);
pub const OVERLAY_COLOR: Rgba = Rgba::new(0x11, 0xcc, 0xff, 0x66);
/// Blue channel of drawn points; red and green follow the depth level
const POINT_BLUE: u8 = 0x88;
const OVERLAY_X: f32 = 600.0;
const OVERLAY_TOP: f32 = 50.0;
const OVERLAY_LINE_HEIGHT: f32 = 20.0;

/// Counters describing what one frame drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles_drawn: usize,
    pub triangles_culled: usize,
    pub triangles_degenerate: usize,
    pub edges_drawn: usize,
    pub points_drawn: usize,
    /// Primitives skipped because a vertex came closer than [`NEAR_EPSILON`]
    pub near_plane_hits: usize,
}

#[derive(Debug, Clone)]
pub struct FrameRenderer {
    pub camera: Camera,
    pub shader: ShaderSettings,
    pub background: Rgb,
    pub show_overlay: bool,
}

impl FrameRenderer {
    pub fn new(camera: Camera, shader: ShaderSettings) -> Self {
        Self {
            camera,
            shader,
            background: BACKGROUND,
            show_overlay: true,
        }
    }

    /// Draw one frame of `mesh` as seen from `state`.
    ///
    /// Any primitive that gets too close to the camera is skipped and flips
    /// the dolly to recede on the next tick.
    pub fn render_frame<S: DrawSurface + ?Sized>(
        &self,
        mesh: &Mesh,
        state: &mut CameraState,
        settings: &RenderSettings,
        surface: &mut S,
    ) -> FrameStats {
        let mut stats = FrameStats::default();

        let rotation = Transform::rotation_matrix(state.angle_x, state.angle_y);
        let view: Vec<Point3<f32>> = mesh
            .vertices()
            .iter()
            .map(|v| Transform::translate_z(&(rotation * v), state.dz))
            .collect();

        surface.clear(self.background);

        if settings.render_triangles {
            self.draw_faces(mesh, &view, state.dz, settings, surface, &mut stats);
        }
        if let LineColor::Color(color) = settings.line_color {
            self.draw_edges(mesh, &view, state.dz, color, surface, &mut stats);
        }
        if settings.point_size > 0.0 {
            self.draw_points(&view, state.dz, settings.point_size, surface, &mut stats);
        }
        if self.show_overlay {
            self.draw_overlay(mesh, state.dz, surface);
        }

        if stats.near_plane_hits > 0 {
            state.recede();
        }

        tracing::trace!(
            drawn = stats.triangles_drawn,
            culled = stats.triangles_culled,
            degenerate = stats.triangles_degenerate,
            edges = stats.edges_drawn,
            points = stats.points_drawn,
            near = stats.near_plane_hits,
            dz = state.dz,
            "frame"
        );
        stats
    }

    fn draw_faces<S: DrawSurface + ?Sized>(
        &self,
        mesh: &Mesh,
        view: &[Point3<f32>],
        dz: f32,
        settings: &RenderSettings,
        surface: &mut S,
        stats: &mut FrameStats,
    ) {
        for triangle in mesh.triangles() {
            let [p1, p2, p3] = triangle.map(|i| view[i]);
            if [p1, p2, p3].iter().any(|p| p.z < NEAR_EPSILON) {
                stats.near_plane_hits += 1;
                continue;
            }

            let normal = match try_face_normal(&p1, &p2, &p3) {
                Some(normal) => normal,
                None => {
                    stats.triangles_degenerate += 1;
                    continue;
                }
            };
            // Direction from the camera (at the origin) toward the triangle
            let camera_vector = normalize(p1.coords + p2.coords + p3.coords);
            let facing = dot(&normal, &camera_vector);
            if !settings.render_backfaces && facing < 0.0 {
                stats.triangles_culled += 1;
                continue;
            }

            let color = shade(&self.shader, &normal, facing);
            let s1 = self.screen(&p1);
            let s2 = self.screen(&p2);
            let s3 = self.screen(&p3);
            surface.fill_triangle([s1.xy(), s2.xy(), s3.xy()], color.into(), dz / s1.z);
            stats.triangles_drawn += 1;
        }
    }

    fn draw_edges<S: DrawSurface + ?Sized>(
        &self,
        mesh: &Mesh,
        view: &[Point3<f32>],
        dz: f32,
        color: Rgb,
        surface: &mut S,
        stats: &mut FrameStats,
    ) {
        for (a, b) in mesh.edges() {
            let (pa, pb) = (view[a], view[b]);
            if pa.z < NEAR_EPSILON || pb.z < NEAR_EPSILON {
                stats.near_plane_hits += 1;
                continue;
            }

            let depth = (pa.z + pb.z) / 2.0;
            let sa = self.screen(&pa);
            let sb = self.screen(&pb);
            surface.stroke_line(
                sa.xy(),
                sb.xy(),
                dz / depth / 2.0,
                color.with_alpha(depth_level(dz, depth)),
            );
            stats.edges_drawn += 1;
        }
    }

    fn draw_points<S: DrawSurface + ?Sized>(
        &self,
        view: &[Point3<f32>],
        dz: f32,
        point_size: f32,
        surface: &mut S,
        stats: &mut FrameStats,
    ) {
        for p in view {
            if p.z < NEAR_EPSILON {
                stats.near_plane_hits += 1;
                continue;
            }

            let radius = point_size * dz / p.z;
            if radius <= 0.0 {
                stats.near_plane_hits += 1;
                continue;
            }

            let level = depth_level(dz, p.z);
            let center = self.screen(p).xy();
            surface.fill_ellipse(center, radius, Rgba::new(level, level, POINT_BLUE, level));
            stats.points_drawn += 1;
        }
    }

    fn draw_overlay<S: DrawSurface + ?Sized>(&self, mesh: &Mesh, dz: f32, surface: &mut S) {
        let lines = [
            format!("FPS: {}", TICK_RATE),
            format!("Focal: {}", self.camera.focal),
            format!("Z Distance: {:.2}", dz),
            format!("Points: {}", mesh.vertices().len()),
            format!("Faces: {}", mesh.faces().len()),
        ];
        for (i, line) in lines.iter().enumerate() {
            let y = OVERLAY_TOP + OVERLAY_LINE_HEIGHT * i as f32;
            surface.draw_text(Point2::new(OVERLAY_X, y), line, OVERLAY_COLOR);
        }
    }

    fn screen(&self, p: &Point3<f32>) -> Point3<f32> {
        self.camera.to_screen(&self.camera.project(p))
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(Camera::default(), ShaderSettings::default())
    }
}

/// Depth falloff in `[0, 255]`: 100 at the dolly distance, brighter/more opaque when closer.
pub fn depth_level(dz: f32, z: f32) -> u8 {
    (dz / z * 100.0).clamp(0.0, 255.0) as u8
}
