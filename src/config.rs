//! Immutable configuration handed to the renderer
use crate::basic_rasterizer::{BasicAsciiRasterizer, DEFAULT_GRADIENT, DEFAULT_SCALE};
use crate::rasterizer::RasterizerError;
use crate::surface::{MobiusStrip, Shape, Surface, Torus};
use clap::ValueEnum;
use derive_setters::Setters;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Screen must be at least 1x1, got {width}x{height}.")]
    ZeroDimension { width: usize, height: usize },
    #[error("Sweep step `{name}` must be positive, got {step}.")]
    NonPositiveStep { name: &'static str, step: f32 },
    #[error("Fit radius must be positive, got {0}.")]
    NonPositiveFitRadius(f32),
    #[error("Camera distance {k2} must exceed the surface's bounding radius {radius}.")]
    CameraInsideSurface { k2: f32, radius: f32 },
    #[error(transparent)]
    Rasterizer(#[from] RasterizerError),
}

/// Which built-in surface gets drawn
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SurfaceKind {
    #[default]
    Torus,
    Mobius,
}

/// How far each angle moves between two frames
#[derive(Debug, Clone, Copy, PartialEq, Setters)]
pub struct SpinRate {
    pub a: f64,
    pub b: f64,
}

impl Default for SpinRate {
    fn default() -> Self {
        Self {
            a: 0.0004,
            b: 0.0002,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Setters)]
pub struct RenderConfig {
    /// Columns of the character grid
    pub width: usize,
    /// Rows of the character grid
    pub height: usize,
    /// Distance from the camera to the origin of object space.
    /// Must stay above the surface's bounding radius or `1 / (K2 + z)` can blow up.
    pub k2: f32,
    /// Object space distance that gets projected to 3/8 of the screen width at `z = 0`
    pub fit_radius: f32,
    /// Vertical squash compensating for terminal cells being twice as tall as wide
    pub char_aspect: f32,
    pub surface: SurfaceKind,
    pub torus: Torus,
    pub mobius: MobiusStrip,
    pub spin: SpinRate,
    #[setters(into)]
    pub gradient: String,
    pub luminance_scale: f32,
    pub background: char,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let torus = Torus::default();
        Self {
            width: 80,
            height: 40,
            k2: 5.0,
            fit_radius: torus.r1 + torus.r2,
            char_aspect: 0.5,
            surface: SurfaceKind::default(),
            torus,
            mobius: MobiusStrip::default(),
            spin: SpinRate::default(),
            gradient: DEFAULT_GRADIENT.to_string(),
            luminance_scale: DEFAULT_SCALE,
            background: ' ',
        }
    }
}

impl RenderConfig {
    /// Projection scale chosen so `fit_radius` lands 3/8 of the width away from the centre.
    /// screen_width * 3 / 8 = K1 * fit_radius / K2
    pub fn k1(&self) -> f32 {
        self.width as f32 * self.k2 * 3.0 / (8.0 * self.fit_radius)
    }
    pub fn shape(&self) -> Shape {
        match self.surface {
            SurfaceKind::Torus => Shape::Torus(self.torus),
            SurfaceKind::Mobius => Shape::Mobius(self.mobius),
        }
    }
    pub fn rasterizer(&self) -> Result<BasicAsciiRasterizer, RasterizerError> {
        BasicAsciiRasterizer::new(
            self.gradient.chars().collect(),
            self.luminance_scale,
            self.background,
        )
    }
    /// Check every invariant the render loop relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        let steps = match self.surface {
            SurfaceKind::Torus => [
                ("theta_step", self.torus.theta_step),
                ("phi_step", self.torus.phi_step),
            ],
            SurfaceKind::Mobius => [
                ("u_step", self.mobius.u_step),
                ("v_step", self.mobius.v_step),
            ],
        };
        for (name, step) in steps {
            if !(step > 0.0) {
                return Err(ConfigError::NonPositiveStep { name, step });
            }
        }
        if !(self.fit_radius > 0.0) {
            return Err(ConfigError::NonPositiveFitRadius(self.fit_radius));
        }
        let radius = self.shape().bounding_radius();
        if !(self.k2 > radius) {
            return Err(ConfigError::CameraInsideSurface {
                k2: self.k2,
                radius,
            });
        }
        self.rasterizer()?;
        Ok(())
    }
}
