/// wire3d Web - canvas 2D front end compiled to WASM
///
/// Draws the wireframe into an HTML canvas and rotates it while the mouse
/// is dragged across the canvas.
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use log::{info, warn};
use nalgebra::Point2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};
use wire3d_core::{
    DrawSurface, Mesh, OrientedMesh, PointerEvent, RenderConfig, Rotate, Style, Viewer, Wireframe,
};

/// `DrawSurface` over a 2D canvas context
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Self { context }
    }
}

impl DrawSurface for CanvasSurface {
    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, style: Style) {
        self.context.set_fill_style_str(&style.color.to_hex());
        self.context.begin_path();
        if let Err(e) = self.context.arc(center.x, center.y, radius, 0.0, TAU) {
            warn!("arc failed: {e:?}");
            return;
        }
        self.context.fill();
    }

    fn line(&mut self, from: Point2<f64>, to: Point2<f64>, style: Style) {
        self.context.set_stroke_style_str(&style.color.to_hex());
        self.context.begin_path();
        self.context.move_to(from.x, from.y);
        self.context.line_to(to.x, to.y);
        self.context.stroke();
    }

    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.clear_rect(x, y, width, height);
    }

    fn set_origin(&mut self, x: f64, y: f64) {
        if let Err(e) = self.context.translate(x, y) {
            warn!("translate failed: {e:?}");
        }
    }
}

/// The mesh representation picked at construction
pub enum Model {
    InPlace(Mesh),
    DriftFree(OrientedMesh),
}

impl Rotate for Model {
    fn rotate_x(&mut self, theta: f64) {
        match self {
            Model::InPlace(mesh) => mesh.rotate_x(theta),
            Model::DriftFree(mesh) => mesh.rotate_x(theta),
        }
    }

    fn rotate_y(&mut self, theta: f64) {
        match self {
            Model::InPlace(mesh) => mesh.rotate_y(theta),
            Model::DriftFree(mesh) => mesh.rotate_y(theta),
        }
    }
}

impl Wireframe for Model {
    fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, config: &RenderConfig) {
        match self {
            Model::InPlace(mesh) => mesh.draw(surface, config),
            Model::DriftFree(mesh) => mesh.draw(surface, config),
        }
    }
}

struct Inner {
    viewer: Viewer<Model>,
    surface: CanvasSurface,
}

impl Inner {
    fn dispatch(&mut self, events: &[PointerEvent]) {
        for &event in events {
            self.viewer.handle_event(event, &mut self.surface);
        }
    }
}

/// Pointer events a DOM mouse event stands for.
///
/// Button presses first record the position so a drag starts from it.
fn pointer_events(dom_event: &str, x: f64, y: f64) -> Vec<PointerEvent> {
    let position = PointerEvent::Move { x, y };
    match dom_event {
        "mousedown" => vec![position, PointerEvent::Down],
        "mouseup" => vec![position, PointerEvent::Up],
        "mousemove" => vec![position],
        _ => Vec::new(),
    }
}

const DOM_EVENTS: [&str; 3] = ["mousedown", "mousemove", "mouseup"];

type Listener = Closure<dyn FnMut(MouseEvent)>;

#[wasm_bindgen]
pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    inner: Rc<RefCell<Inner>>,
    listeners: Vec<(&'static str, Listener)>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Attach to the canvas with the given id and draw a cube.
    ///
    /// With `drift_free` the cube keeps its original coordinates and only a
    /// composed orientation changes between frames.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, drift_free: bool) -> Result<WebRenderer, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
            .dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;

        let cube = Mesh::cube(2.0);
        let model = if drift_free {
            Model::DriftFree(OrientedMesh::new(cube))
        } else {
            Model::InPlace(cube)
        };
        let (width, height) = (canvas.width() as f64, canvas.height() as f64);
        let mut viewer = Viewer::new(model, RenderConfig::default(), width, height)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut surface = CanvasSurface::new(context);
        viewer.attach(&mut surface);
        info!("attached to #{canvas_id} ({width}x{height}), drift_free={drift_free}");

        let inner = Rc::new(RefCell::new(Inner { viewer, surface }));
        let mut listeners = Vec::with_capacity(DOM_EVENTS.len());
        for name in DOM_EVENTS {
            let state = Rc::clone(&inner);
            let listener = Listener::new(move |event: MouseEvent| {
                let events =
                    pointer_events(name, event.offset_x() as f64, event.offset_y() as f64);
                state.borrow_mut().dispatch(&events);
            });
            canvas.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
            listeners.push((name, listener));
        }

        Ok(WebRenderer {
            canvas,
            inner,
            listeners,
        })
    }

    /// Clear and draw the current frame
    pub fn render(&self) {
        let mut inner = self.inner.borrow_mut();
        let Inner { viewer, surface } = &mut *inner;
        viewer.redraw(surface);
    }

    /// Rotate by `y_degrees` about Y, then `x_degrees` about X
    pub fn rotate(&self, y_degrees: f64, x_degrees: f64) {
        let mut inner = self.inner.borrow_mut();
        let Inner { viewer, surface } = &mut *inner;
        viewer.nudge(y_degrees, x_degrees, surface);
    }
}

impl Drop for WebRenderer {
    fn drop(&mut self) {
        for (name, listener) in &self.listeners {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(())
}
