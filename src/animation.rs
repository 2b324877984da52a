//! Endless sequence of frames with advancing rotation
use crate::config::SpinRate;
use crate::rasterizer::Rasterizer;
use crate::render::{Frame, Renderer};
use crate::surface::Surface;

/// The two rotation angles, owned by whoever drives the animation
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Spin {
    pub a: f64,
    pub b: f64,
}

impl Spin {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
    /// Angles one frame later. No wrapping, the trig functions take care of it.
    pub fn advance(self, rate: &SpinRate) -> Self {
        Self {
            a: self.a + rate.a,
            b: self.b + rate.b,
        }
    }
}

/// Lazily renders frames, advancing the spin after each one.
/// Never ends, use `take` for a fixed number of frames.
pub struct Animation<'r, S: Surface, R: Rasterizer + Clone> {
    renderer: &'r Renderer<S, R>,
    rate: SpinRate,
    start: Spin,
    spin: Spin,
}

impl<'r, S: Surface, R: Rasterizer + Clone> Animation<'r, S, R> {
    pub fn new(renderer: &'r Renderer<S, R>, start: Spin, rate: SpinRate) -> Self {
        Self {
            renderer,
            rate,
            start,
            spin: start,
        }
    }
    /// Angles of the next frame to be rendered
    pub fn spin(&self) -> Spin {
        self.spin
    }
    /// Go back to the first frame
    pub fn restart(&mut self) {
        self.spin = self.start;
    }
}

impl<S: Surface, R: Rasterizer + Clone> Iterator for Animation<'_, S, R> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let frame = self.renderer.render_frame(self.spin.a, self.spin.b);
        self.spin = self.spin.advance(&self.rate);
        Some(frame)
    }
}

impl<S: Surface, R: Rasterizer + Clone> Renderer<S, R> {
    /// Frames starting from zero rotation
    pub fn animate(&self, rate: SpinRate) -> Animation<'_, S, R> {
        Animation::new(self, Spin::default(), rate)
    }
}
