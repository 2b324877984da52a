use crate::config::{ConfigError, RenderConfig};
use crate::surface::{Shape, Surface};
use nalgebra::Point3;

/// Camera-space point mapped onto the character grid.
/// Cell indices may fall outside the grid, the canvas drops those.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub column: i32,
    pub row: i32,
    /// Inverse depth, larger is nearer
    pub ooz: f32,
}

/// Perspective projection onto a grid of fixed size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub k1: f32,
    pub k2: f32,
    /// Vertical squash for non-square terminal cells
    pub char_aspect: f32,
    half_width: f32,
    half_height: f32,
}

impl Projection {
    pub fn new(width: usize, height: usize, k1: f32, k2: f32, char_aspect: f32) -> Self {
        // Integer halves, so odd sizes put the centre above and left of the middle
        Self {
            k1,
            k2,
            char_aspect,
            half_width: (width / 2) as f32,
            half_height: (height / 2) as f32,
        }
    }
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            config.width,
            config.height,
            config.k1(),
            config.k2,
            config.char_aspect,
        )
    }
    /// Project a camera-space point. `y` is negated because rows grow downwards.
    /// `k2 + z` stays positive as long as `k2` exceeds the surface's bounding radius.
    pub fn project(&self, point: &Point3<f32>) -> Projected {
        let ooz = 1.0 / (self.k2 + point.z);
        let x = self.half_width + self.k1 * ooz * point.x;
        let y = self.half_height - self.k1 * ooz * point.y * self.char_aspect;
        // Truncates towards zero and saturates on overflow
        Projected {
            column: x as i32,
            row: y as i32,
            ooz,
        }
    }
}

/// Holding the surface together with the camera looking at it
#[derive(Debug, Clone)]
pub struct Scene<S: Surface = Shape> {
    pub surface: S,
    pub projection: Projection,
}

impl<S: Surface> Scene<S> {
    pub fn new(surface: S, projection: Projection) -> Self {
        Scene {
            surface,
            projection,
        }
    }
}

impl Scene<Shape> {
    /// Scene with the surface selected by the configuration
    pub fn from_config(config: &RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.shape(), Projection::from_config(config)))
    }
}
