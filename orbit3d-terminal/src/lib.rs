/// Terminal host for the orbit3d viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use orbit3d_core::projection::CANVAS_SIZE;
use orbit3d_core::{
    tick_dt, tick_interval, FrameRenderer, FrameStats, Mesh, RenderSettings, Scheduler, Toggle,
    Viewer,
};
use std::io::{self, stdout, Write};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

pub mod cli;
pub mod export;
pub mod renderer;
pub mod scheduler;

pub use renderer::Framebuffer;
pub use scheduler::{FixedRateScheduler, FpsCounter};

/// Install the stderr log subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Interactive viewer: owns the models, the toggles and the pixel grid.
pub struct TerminalApp {
    models: Vec<Arc<Mesh>>,
    current: usize,
    viewer: Viewer,
    settings: RenderSettings,
    framebuffer: Framebuffer,
    running: bool,
}

impl TerminalApp {
    /// `models` must not be empty; an empty list falls back to the cube.
    pub fn new(models: Vec<Arc<Mesh>>, settings: RenderSettings) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        Ok(Self::with_size(models, settings, columns, rows))
    }

    pub fn with_size(
        mut models: Vec<Arc<Mesh>>,
        settings: RenderSettings,
        columns: u16,
        rows: u16,
    ) -> Self {
        if models.is_empty() {
            models.push(Arc::new(Mesh::default()));
        }
        let viewer = Viewer::new(models[0].clone(), FrameRenderer::default());
        Self {
            models,
            current: 0,
            viewer,
            settings,
            framebuffer: Framebuffer::fit(columns, rows, CANVAS_SIZE, CANVAS_SIZE),
            running: true,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut scheduler = FixedRateScheduler;
        let mut fps = FpsCounter::new();
        let mut failure = None;

        scheduler.run(tick_interval(), &mut || match self.frame(&mut fps) {
            Ok(flow) => flow,
            Err(err) => {
                failure = Some(err);
                ControlFlow::Break(())
            }
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn frame(&mut self, fps: &mut FpsCounter) -> io::Result<ControlFlow<()>> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => self.handle_key(code),
                Event::Resize(columns, rows) => self.resize(columns, rows)?,
                _ => {}
            }
        }
        if !self.running {
            return Ok(ControlFlow::Break(()));
        }

        let stats = self
            .viewer
            .tick(tick_dt(), &self.settings, &mut self.framebuffer);
        self.present(&stats, fps.fps())?;
        fps.record();
        Ok(ControlFlow::Continue(()))
    }

    /// Apply a key press. Letters flip the render toggles, Tab cycles models.
    pub fn handle_key(&mut self, code: KeyCode) {
        let toggle = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Tab => {
                self.next_model();
                return;
            }
            KeyCode::Char('r') => Toggle::Rotate,
            KeyCode::Char('m') => Toggle::Move,
            KeyCode::Char('p') => Toggle::Points,
            KeyCode::Char('e') => Toggle::Edges,
            KeyCode::Char('b') => Toggle::Backfaces,
            KeyCode::Char('t') => Toggle::Triangles,
            _ => return,
        };
        self.settings.toggle(toggle);
        tracing::debug!(setting = %toggle, enabled = self.settings.is_enabled(toggle), "toggled");
    }

    fn next_model(&mut self) {
        self.current = (self.current + 1) % self.models.len();
        self.viewer.set_mesh(self.models[self.current].clone());
    }

    fn resize(&mut self, columns: u16, rows: u16) -> io::Result<()> {
        self.framebuffer = Framebuffer::fit(columns, rows, CANVAS_SIZE, CANVAS_SIZE);
        execute!(stdout(), terminal::Clear(terminal::ClearType::All))
    }

    fn present(&self, stats: &FrameStats, fps: f32) -> io::Result<()> {
        let mut stdout = stdout();
        self.framebuffer.draw(&mut stdout)?;

        let enabled: Vec<&str> = Toggle::ALL
            .iter()
            .filter(|t| self.settings.is_enabled(**t))
            .map(|t| t.name())
            .collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "orbit3d | {} | FPS: {:.1} | faces {} culled {} | on: {}",
                self.viewer.mesh().name(),
                fps,
                stats.triangles_drawn,
                stats.triangles_culled,
                enabled.join(","),
            )),
            cursor::MoveTo(0, 1),
            Print("r/m/p/e/b/t=Toggle Tab=Model Q=Quit"),
            ResetColor
        )?;

        stdout.flush()
    }
}
