/// The state a host keeps between ticks: current mesh, camera state and renderer
use std::sync::Arc;

use crate::geometry::Mesh;
use crate::renderer::{FrameRenderer, FrameStats};
use crate::settings::RenderSettings;
use crate::state::CameraState;
use crate::surface::DrawSurface;

pub struct Viewer {
    mesh: Arc<Mesh>,
    state: CameraState,
    renderer: FrameRenderer,
}

impl Viewer {
    pub fn new(mesh: Arc<Mesh>, renderer: FrameRenderer) -> Self {
        let state = CameraState::for_mesh(&mesh);
        Self {
            mesh,
            state,
            renderer,
        }
    }

    /// Install a new mesh. It is picked up by the next tick; the spin carries
    /// over and the dolly range is re-derived from the new geometry.
    pub fn set_mesh(&mut self, mesh: Arc<Mesh>) {
        self.state.retarget(&mesh);
        tracing::debug!(name = mesh.name(), dz = self.state.dz, "mesh selected");
        self.mesh = mesh;
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut FrameRenderer {
        &mut self.renderer
    }

    /// Run one frame: advance the camera state by `dt` seconds, then draw.
    pub fn tick<S: DrawSurface + ?Sized>(
        &mut self,
        dt: f32,
        settings: &RenderSettings,
        surface: &mut S,
    ) -> FrameStats {
        let mesh = Arc::clone(&self.mesh);
        self.state = self.state.advance(dt, settings);
        self.renderer
            .render_frame(&mesh, &mut self.state, settings, surface)
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(Arc::new(Mesh::default()), FrameRenderer::default())
    }
}
