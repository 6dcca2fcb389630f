/// orbit3d web host
///
/// Draws the viewer into an HTML canvas through its 2D context and drives the
/// tick with `setTimeout`, so the page stays responsive between frames.
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

use nalgebra::Point2;
use orbit3d_core::projection::CANVAS_SIZE;
use orbit3d_core::{
    import_model, parse_obj, tick_dt, tick_interval, DrawSurface, FrameRenderer, Mesh,
    RenderSettings, Rgb, Rgba, Toggle, Viewer,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, CanvasRenderingContext2d, HtmlCanvasElement};

const OVERLAY_FONT: &str = "14px monospace";

/// [`DrawSurface`] backed by a canvas 2D context
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        context.set_font(OVERLAY_FONT);
        Ok(Self {
            context,
            width: canvas.width(),
            height: canvas.height(),
        })
    }
}

fn report(result: Result<(), JsValue>) {
    if let Err(err) = result {
        console::warn_1(&err);
    }
}

impl DrawSurface for CanvasSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: Rgb) {
        self.context.set_fill_style_str(&color.to_css());
        self.context
            .fill_rect(0.0, 0.0, self.width as f64, self.height as f64);
    }

    fn fill_ellipse(&mut self, center: Point2<f32>, radius: f32, color: Rgba) {
        let ctx = &self.context;
        ctx.begin_path();
        report(ctx.ellipse(
            center.x as f64,
            center.y as f64,
            radius as f64,
            radius as f64,
            0.0,
            0.0,
            TAU,
        ));
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill();
    }

    fn stroke_line(&mut self, from: Point2<f32>, to: Point2<f32>, width: f32, color: Rgba) {
        let ctx = &self.context;
        ctx.begin_path();
        ctx.move_to(from.x as f64, from.y as f64);
        ctx.line_to(to.x as f64, to.y as f64);
        ctx.set_line_width(width as f64);
        ctx.set_stroke_style_str(&color.to_css());
        ctx.stroke();
    }

    fn fill_triangle(&mut self, points: [Point2<f32>; 3], color: Rgba, outline_width: f32) {
        let ctx = &self.context;
        let css = color.to_css();
        ctx.begin_path();
        ctx.move_to(points[0].x as f64, points[0].y as f64);
        ctx.line_to(points[1].x as f64, points[1].y as f64);
        ctx.line_to(points[2].x as f64, points[2].y as f64);
        ctx.close_path();
        ctx.set_fill_style_str(&css);
        ctx.fill();
        // seals hairline gaps between neighbouring triangles
        if outline_width > 0.0 {
            ctx.set_line_width(outline_width as f64);
            ctx.set_stroke_style_str(&css);
            ctx.stroke();
        }
    }

    fn draw_text(&mut self, position: Point2<f32>, text: &str, color: Rgba) {
        self.context.set_fill_style_str(&color.to_css());
        report(
            self.context
                .fill_text(text, position.x as f64, position.y as f64),
        );
    }
}

struct Session {
    viewer: Viewer,
    settings: RenderSettings,
    surface: CanvasSurface,
    running: bool,
    /// Bumped on every start so a stale timer chain can tell it was superseded
    generation: u32,
}

impl Session {
    fn tick(&mut self) {
        self.viewer.tick(tick_dt(), &self.settings, &mut self.surface);
    }
}

/// Canvas viewer exported to JavaScript
#[wasm_bindgen]
pub struct WebViewer {
    session: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl WebViewer {
    /// Attach to the `<canvas>` with the given element id.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebViewer, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id `{}`", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(CANVAS_SIZE);
        canvas.set_height(CANVAS_SIZE);

        let surface = CanvasSurface::new(&canvas)?;
        let session = Session {
            viewer: Viewer::new(Arc::new(Mesh::default()), FrameRenderer::default()),
            settings: RenderSettings::default(),
            surface,
            running: false,
            generation: 0,
        };
        Ok(WebViewer {
            session: Rc::new(RefCell::new(session)),
        })
    }

    /// Switch a render toggle by name (`rotate`, `move`, `points`, `edges`, `backface`, `triangles`).
    pub fn set_setting(&self, name: &str, enabled: bool) -> Result<(), JsValue> {
        let toggle = Toggle::from_str(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session.borrow_mut().settings.set(toggle, enabled);
        Ok(())
    }

    pub fn is_enabled(&self, name: &str) -> Result<bool, JsValue> {
        let toggle = Toggle::from_str(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.session.borrow().settings.is_enabled(toggle))
    }

    /// Import OBJ text and show it from the next tick on.
    pub fn load_obj(&self, text: &str) -> Result<(), JsValue> {
        let mesh = parse_obj(text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?
            .into_mesh()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        console::log_1(&JsValue::from_str(&format!(
            "imported {}: {} vertices, {} triangles",
            mesh.name(),
            mesh.vertices().len(),
            mesh.triangles().len()
        )));
        self.session.borrow_mut().viewer.set_mesh(Arc::new(mesh));
        Ok(())
    }

    /// Import a file picked in the page. Only `.obj` names are accepted, as on the desktop.
    pub fn load_file(&self, name: &str, text: &str) -> Result<(), JsValue> {
        let mesh = import_model(name, text).map_err(|e| JsValue::from_str(&e.to_string()))?;
        console::log_1(&JsValue::from_str(&format!(
            "imported {} from {}: {} vertices, {} triangles",
            mesh.name(),
            name,
            mesh.vertices().len(),
            mesh.triangles().len()
        )));
        self.session.borrow_mut().viewer.set_mesh(Arc::new(mesh));
        Ok(())
    }

    /// Show one of the built-in models.
    pub fn select_model(&self, name: &str) -> Result<(), JsValue> {
        let mesh = Mesh::builtin(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown model `{}`", name)))?;
        self.session.borrow_mut().viewer.set_mesh(Arc::new(mesh));
        Ok(())
    }

    /// Comma-separated names accepted by [`WebViewer::select_model`]
    pub fn model_names() -> String {
        Mesh::BUILTIN_NAMES.join(",")
    }

    /// Begin ticking at the fixed rate. Calling it while running does nothing.
    pub fn start(&self) -> Result<(), JsValue> {
        let generation = {
            let mut session = self.session.borrow_mut();
            if session.running {
                return Ok(());
            }
            session.running = true;
            session.generation = session.generation.wrapping_add(1);
            session.generation
        };
        schedule(self.session.clone(), generation)
    }

    /// Stop after the current tick.
    pub fn stop(&self) {
        self.session.borrow_mut().running = false;
    }
}

/// Run `session.tick` on a `setTimeout` chain until the session stops.
fn schedule(session: Rc<RefCell<Session>>, generation: u32) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let delay = tick_interval().as_millis() as i32;

    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = callback.clone();
    let timer_window = window.clone();
    *callback.borrow_mut() = Some(Closure::new(move || {
        let current = {
            let s = session.borrow();
            s.running && s.generation == generation
        };
        if !current {
            // drop the closure so the chain can be collected
            next.borrow_mut().take();
            return;
        }
        session.borrow_mut().tick();

        if let Some(cb) = next.borrow().as_ref() {
            report(
                timer_window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        cb.as_ref().unchecked_ref(),
                        delay,
                    )
                    .map(|_| ()),
            );
        }
    }));

    let borrowed = callback.borrow();
    let first = borrowed
        .as_ref()
        .ok_or_else(|| JsValue::from_str("tick callback missing"))?;
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        first.as_ref().unchecked_ref(),
        delay,
    )?;
    Ok(())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console::log_1(&JsValue::from_str("orbit3d-web loaded"));
    Ok(())
}
