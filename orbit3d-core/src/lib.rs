/// orbit3d core library - the software rendering pipeline
///
/// Everything here is independent of any window system: mesh loading, the
/// per-vertex transform chain, flat shading, and a frame renderer that issues
/// draw calls against the [`DrawSurface`] trait. Hosts supply the surface and
/// the tick loop.

pub mod color;
pub mod geometry;
pub mod math;
pub mod obj;
pub mod projection;
pub mod renderer;
pub mod schedule;
pub mod settings;
pub mod shading;
pub mod state;
pub mod surface;
pub mod transform;
pub mod viewer;

// Re-export commonly used types
pub use color::{ColorError, Rgb, Rgba, UnitRgb};
pub use geometry::{Mesh, MeshError};
pub use obj::{
    check_extension, convert_obj, import_model, load_model, parse_obj, ImportError, ObjError,
    ObjModel,
};
pub use projection::{Camera, NEAR_EPSILON};
pub use renderer::{FrameRenderer, FrameStats};
pub use schedule::{tick_dt, tick_interval, ManualScheduler, Scheduler, TICK_RATE};
pub use settings::{LineColor, RenderSettings, SettingsError, Toggle};
pub use shading::{shade, ShaderSettings};
pub use state::{CameraState, DollyDirection};
pub use surface::{DisplayList, DrawCommand, DrawSurface};
pub use transform::Transform;
pub use viewer::Viewer;
