/// Terminal front end: draws a wireframe with characters and rotates it on mouse drag
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::{debug, info};
use std::io::{stdout, Write};
use wire3d_core::{PointerEvent, RenderConfig, Viewer, Wireframe};

pub mod renderer;

pub use renderer::{CharCanvas, CELL_ASPECT};

/// Degrees of rotation per arrow-key press
const KEY_STEP: f64 = 5.0;

/// Main application struct for terminal wireframe viewing
pub struct TerminalApp<W> {
    viewer: Viewer<W>,
    canvas: CharCanvas,
    running: bool,
}

impl<W: Wireframe> TerminalApp<W> {
    /// Size the canvas to the current terminal
    pub fn new(model: W, config: RenderConfig) -> Result<Self> {
        let (cols, rows) = terminal::size().context("failed to query terminal size")?;
        Self::with_size(model, config, cols, rows)
    }

    pub fn with_size(model: W, config: RenderConfig, cols: u16, rows: u16) -> Result<Self> {
        let mut canvas = CharCanvas::new(cols as usize, rows as usize);
        let (width, height) = canvas.pixel_size();
        let mut viewer = Viewer::new(model, config, width, height)?;
        viewer.attach(&mut canvas);

        Ok(Self {
            viewer,
            canvas,
            running: true,
        })
    }

    pub fn viewer(&self) -> &Viewer<W> {
        &self.viewer
    }

    pub fn canvas(&self) -> &CharCanvas {
        &self.canvas
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        self.render()?;

        // Redraw only in response to input
        while self.running {
            let event = event::read()?;
            if self.handle_event(event) {
                self.render()?;
            }
        }

        info!("quitting");
        Ok(())
    }

    /// Apply one terminal event. Returns true when the screen needs repainting.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                debug!("resized to {cols}x{rows}");
                self.canvas = CharCanvas::new(cols as usize, rows as usize);
                let (width, height) = self.canvas.pixel_size();
                self.viewer.resize(width, height);
                self.viewer.attach(&mut self.canvas);
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        let (dx, dy) = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return false;
            }
            KeyCode::Char('w') | KeyCode::Up => (0.0, -KEY_STEP),
            KeyCode::Char('s') | KeyCode::Down => (0.0, KEY_STEP),
            KeyCode::Char('a') | KeyCode::Left => (-KEY_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => (KEY_STEP, 0.0),
            _ => return false,
        };
        self.viewer.nudge(dx, dy, &mut self.canvas);
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let (x, y) = CharCanvas::cell_to_pixel(mouse.column, mouse.row);
        let position = PointerEvent::Move { x, y };

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Start the drag from where the button went down
                let moved = self.viewer.handle_event(position, &mut self.canvas);
                self.viewer.handle_event(PointerEvent::Down, &mut self.canvas);
                moved
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let moved = self.viewer.handle_event(position, &mut self.canvas);
                self.viewer.handle_event(PointerEvent::Up, &mut self.canvas);
                moved
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.viewer.handle_event(position, &mut self.canvas)
            }
            _ => false,
        }
    }

    fn render(&mut self) -> Result<()> {
        let mut stdout = stdout();
        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print("wire3d | drag or WASD/arrows to rotate | Q quit"),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
