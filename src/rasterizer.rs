use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RasterizerError {
    #[error("Gradient must contain at least one symbol.")]
    EmptyGradient,
    #[error("Luminance scale must be positive, got {0}.")]
    NonPositiveScale(f32),
}

/// Turns a luminance value into the symbol that gets printed for a cell
pub trait Rasterizer {
    fn luminance_to_char(&self, luminance: f32) -> char;
    /// Symbol used for cells that no sample reached
    fn bg_char(&self) -> char;
}
