use crate::basic_rasterizer::BasicAsciiRasterizer;
use crate::config::RenderConfig;
use crate::rasterizer::Rasterizer;
use crate::scene::Scene;
use crate::surface::{Shape, Surface, Trig};
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, trace};

/// Moves the cursor to row 1, column 1 so that frames overwrite each other
pub const CURSOR_HOME: &str = "\x1b[H";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("Failed to write frame: {0}")]
    Io(#[from] io::Error),
}

/// Where samples get drawn.
/// Keeps the glyph and the inverse depth of the nearest sample per cell.
pub struct Canvas<R: Rasterizer> {
    pub frame_buffer: Vec<char>,
    pub z_buffer: Vec<f32>,
    rasterizer: R,
    width: usize,
    height: usize,
}

impl<R: Rasterizer> Canvas<R> {
    /// Blank glyphs and zero inverse depth, i.e. nothing drawn yet
    pub fn new(width: usize, height: usize, rasterizer: R) -> Self {
        Self {
            frame_buffer: vec![rasterizer.bg_char(); width * height],
            z_buffer: vec![0.0; width * height],
            rasterizer,
            width,
            height,
        }
    }
    /// Converting from cell coordinates to 1D index, `None` when off the grid
    #[inline]
    fn cell_to_index(&self, column: i32, row: i32) -> Option<usize> {
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        (column < self.width && row < self.height).then_some(row * self.width + column)
    }
    /// Draw one sample if it is nearer than anything drawn at that cell so far.
    /// Returns whether the cell was written.
    pub fn plot(&mut self, column: i32, row: i32, ooz: f32, luminance: f32) -> bool {
        let Some(idx) = self.cell_to_index(column, row) else {
            return false;
        };
        // Strictly greater, so ties keep the first sample
        if ooz > self.z_buffer[idx] {
            self.z_buffer[idx] = ooz;
            self.frame_buffer[idx] = self.rasterizer.luminance_to_char(luminance);
            true
        } else {
            false
        }
    }
    /// Sweep the surface of the scene and draw every sample at the given rotation
    pub fn draw_scene_to_canvas<S: Surface>(&mut self, scene: &Scene<S>, trig: &Trig) {
        let surface = &scene.surface;
        let rotation = surface.rotation(trig);
        let (us, vs) = surface.sweep();
        for u in us.values() {
            for v in vs.values() {
                let (position, luminance) = surface.sample(u, v, trig);
                let projected = scene.projection.project(&(rotation * position));
                self.plot(projected.column, projected.row, projected.ooz, luminance);
            }
        }
    }
    /// Copy of the glyph grid
    pub fn to_frame(&self) -> Frame {
        Frame {
            cells: self.frame_buffer.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

/// One finished grid of glyphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    cells: Vec<char>,
    width: usize,
    height: usize,
}

impl Frame {
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width.max(1))
    }
    pub fn get(&self, column: usize, row: usize) -> Option<char> {
        if column >= self.width {
            return None;
        }
        self.cells.get(row * self.width + column).copied()
    }
    /// Number of cells not holding `background`
    pub fn lit_cells(&self, background: char) -> usize {
        self.cells.iter().filter(|&&c| c != background).count()
    }
    /// Emit the frame prefixed by the cursor-home sequence
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}{}", CURSOR_HOME, self)
    }
}

/// Rows one after another, each terminated by a newline
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Renders whole frames of a scene.
/// Holds no per-frame state, buffers live only for the duration of a call.
#[derive(Debug, Clone)]
pub struct Renderer<S: Surface = Shape, R: Rasterizer + Clone = BasicAsciiRasterizer> {
    scene: Scene<S>,
    rasterizer: R,
    width: usize,
    height: usize,
}

impl<S: Surface, R: Rasterizer + Clone> Renderer<S, R> {
    pub fn new(scene: Scene<S>, rasterizer: R, width: usize, height: usize) -> Self {
        Self {
            scene,
            rasterizer,
            width,
            height,
        }
    }
    pub fn scene(&self) -> &Scene<S> {
        &self.scene
    }
    pub fn bg_char(&self) -> char {
        self.rasterizer.bg_char()
    }
    /// Draw the frame for rotation angles `a` and `b`
    pub fn render_frame(&self, a: f64, b: f64) -> Frame {
        let mut canvas = Canvas::new(self.width, self.height, self.rasterizer.clone());
        canvas.draw_scene_to_canvas(&self.scene, &Trig::new(a, b));
        let frame = canvas.to_frame();
        trace!(a, b, lit = frame.lit_cells(self.bg_char()), "rendered frame");
        frame
    }
    /// Draw the frame and write it to `out`
    pub fn render<W: Write>(&self, a: f64, b: f64, out: &mut W) -> Result<(), RenderError> {
        self.render_frame(a, b).write_to(out)?;
        Ok(())
    }
}

impl Renderer {
    pub fn from_config(config: &RenderConfig) -> Result<Self, RenderError> {
        let scene = Scene::from_config(config)?;
        let rasterizer = config.rasterizer().map_err(crate::config::ConfigError::from)?;
        debug!(
            surface = ?config.surface,
            width = config.width,
            height = config.height,
            k1 = scene.projection.k1,
            k2 = scene.projection.k2,
            "renderer ready"
        );
        Ok(Self::new(scene, rasterizer, config.width, config.height))
    }
}
