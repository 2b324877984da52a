use crate::rasterizer::{Rasterizer, RasterizerError};

/// Glyphs ordered from dimmest to brightest
pub const DEFAULT_GRADIENT: &str = ".,-~:;=!*#$@";
/// Multiplier applied to luminance before it is floored into a gradient index
pub const DEFAULT_SCALE: f32 = 8.0;

/// Simple rasterizer that assigns one ASCII character per luminance level.
/// Levels are `floor(luminance * scale)`, clamped into the gradient.
#[derive(Clone, Debug)]
pub struct BasicAsciiRasterizer {
    gradient: Vec<char>,
    scale: f32,
    background: char,
}

impl BasicAsciiRasterizer {
    pub fn new(
        gradient: Vec<char>,
        scale: f32,
        background: char,
    ) -> Result<BasicAsciiRasterizer, RasterizerError> {
        if gradient.is_empty() {
            return Err(RasterizerError::EmptyGradient);
        }
        // Also rejects NaN
        if !(scale > 0.0) {
            return Err(RasterizerError::NonPositiveScale(scale));
        }
        Ok(BasicAsciiRasterizer {
            gradient,
            scale,
            background,
        })
    }
    pub fn gradient(&self) -> &[char] {
        &self.gradient
    }
    /// Index into the gradient, never out of range.
    /// `as` saturates, so infinities land on the ends and NaN lands on zero.
    fn level(&self, luminance: f32) -> usize {
        let max = self.gradient.len() as i64 - 1;
        ((luminance * self.scale).floor() as i64).clamp(0, max) as usize
    }
}

impl Default for BasicAsciiRasterizer {
    fn default() -> Self {
        BasicAsciiRasterizer::new(DEFAULT_GRADIENT.chars().collect(), DEFAULT_SCALE, ' ').unwrap()
    }
}

impl Rasterizer for BasicAsciiRasterizer {
    fn luminance_to_char(&self, luminance: f32) -> char {
        self.gradient[self.level(luminance)]
    }
    fn bg_char(&self) -> char {
        self.background
    }
}
