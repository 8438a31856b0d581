/// Pointer-driven rotation: drag state machine and the redraw loop
use log::{debug, trace};
use nalgebra::Point2;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::geometry::Wireframe;
use crate::surface::DrawSurface;
use crate::transform::Rotate;

/// Whether the pointer button is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerState {
    Pressed,
    #[default]
    Released,
}

impl PointerState {
    pub fn press(self) -> Self {
        PointerState::Pressed
    }

    pub fn release(self) -> Self {
        PointerState::Released
    }

    pub fn is_pressed(self) -> bool {
        self == PointerState::Pressed
    }
}

/// Pointer input in surface pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down,
    Up,
    Move { x: f64, y: f64 },
}

/// Rotation produced by one drag step, in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRotation {
    /// From horizontal movement
    pub y_angle: f64,
    /// From vertical movement
    pub x_angle: f64,
}

impl DragRotation {
    /// Apply Y first, then X
    pub fn apply<R: Rotate + ?Sized>(&self, target: &mut R) {
        target.rotate_y(self.y_angle);
        target.rotate_x(self.x_angle);
    }
}

/// Turns pointer events into rotation increments
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: PointerState,
    last: Option<Point2<f64>>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn last_position(&self) -> Option<Point2<f64>> {
        self.last
    }

    pub fn pointer_down(&mut self) {
        self.state = self.state.press();
    }

    pub fn pointer_up(&mut self) {
        self.state = self.state.release();
    }

    /// Record the new position and, while pressed, return the rotation for
    /// the movement since the previous position.
    ///
    /// The position is tracked in both states. A pressed move with no earlier
    /// position diffs against itself and yields a zero rotation.
    pub fn pointer_move(&mut self, x: f64, y: f64, config: &RenderConfig) -> Option<DragRotation> {
        let current = Point2::new(x, y);
        let previous = self.last.replace(current).unwrap_or(current);

        if !self.state.is_pressed() {
            return None;
        }
        let delta = current - previous;
        Some(DragRotation {
            y_angle: config.drag_angle(delta.x),
            x_angle: config.drag_angle(delta.y),
        })
    }
}

/// Owns the model being viewed and drives the clear-and-redraw cycle
#[derive(Debug, Clone)]
pub struct Viewer<W> {
    model: W,
    config: RenderConfig,
    controller: DragController,
    width: f64,
    height: f64,
}

impl<W: Wireframe> Viewer<W> {
    /// `width` and `height` are the surface size in pixels
    pub fn new(model: W, config: RenderConfig, width: f64, height: f64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            model,
            config,
            controller: DragController::new(),
            width,
            height,
        })
    }

    pub fn model(&self) -> &W {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut W {
        &mut self.model
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Centre the origin on a freshly acquired surface and draw the first frame
    pub fn attach<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) {
        debug!("attaching {}x{} surface", self.width, self.height);
        surface.set_origin(self.width / 2.0, self.height / 2.0);
        self.redraw(surface);
    }

    /// Update the surface size. The caller re-attaches a surface of that size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Clear the whole surface and draw the model
    pub fn redraw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.clear(
            -self.width / 2.0,
            -self.height / 2.0,
            self.width,
            self.height,
        );
        self.model.draw(surface, &self.config);
    }

    /// Feed one pointer event. Returns true when the surface was redrawn.
    pub fn handle_event<S: DrawSurface + ?Sized>(
        &mut self,
        event: PointerEvent,
        surface: &mut S,
    ) -> bool {
        match event {
            PointerEvent::Down => {
                self.controller.pointer_down();
                false
            }
            PointerEvent::Up => {
                self.controller.pointer_up();
                false
            }
            PointerEvent::Move { x, y } => {
                match self.controller.pointer_move(x, y, &self.config) {
                    Some(rotation) => {
                        trace!(
                            "drag to ({x}, {y}): rotate_y {:.4} rad, rotate_x {:.4} rad",
                            rotation.y_angle,
                            rotation.x_angle
                        );
                        rotation.apply(&mut self.model);
                        self.redraw(surface);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Rotate by fixed angles in degrees, Y then X, then redraw.
    ///
    /// Unlike drags this ignores `degrees_per_pixel`.
    pub fn nudge<S: DrawSurface + ?Sized>(
        &mut self,
        y_degrees: f64,
        x_degrees: f64,
        surface: &mut S,
    ) {
        DragRotation {
            y_angle: y_degrees.to_radians(),
            x_angle: x_degrees.to_radians(),
        }
        .apply(&mut self.model);
        self.redraw(surface);
    }
}
