use crate::animation::Animation;
use crate::rasterizer::Rasterizer;
use crate::render::RenderError;
use crate::surface::Surface;

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Start the terminal.
/// Clears once, after that every frame only homes the cursor.
pub fn startup<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, Clear(ClearType::All))?;
    Ok(())
}

/// Perform shutdown of terminal
pub fn shutdown<W: Write>(out: &mut W) -> io::Result<()> {
    if let Err(e) = out.flush() {
        warn!("Could not flush the last frame: {e}");
        return Err(e);
    }
    Ok(())
}

/// Write frames to `out` one after another, flushing and then sleeping `delay` after each.
/// Runs forever unless `frames` is given.
pub fn play<S, R, W>(
    animation: Animation<'_, S, R>,
    out: &mut W,
    frames: Option<usize>,
    delay: Duration,
) -> Result<usize, RenderError>
where
    S: Surface,
    R: Rasterizer + Clone,
    W: Write,
{
    let mut written = 0usize;
    for frame in animation.take(frames.unwrap_or(usize::MAX)) {
        frame.write_to(out)?;
        out.flush()?;
        written += 1;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    debug!(written, "animation finished");
    Ok(written)
}
