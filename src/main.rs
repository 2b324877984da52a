use anyhow::{Context, Result};
use clap::Parser;
use donut_tui::{
    config::{RenderConfig, SpinRate, SurfaceKind},
    render::Renderer,
    tui::ui::{play, shutdown, startup},
};
use std::io::{stdout, BufWriter};
use std::time::Duration;
use tracing::{info, Level};

/// Spin a torus or a Möbius strip as ASCII art
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Surface to draw
    #[arg(short, long, value_enum, default_value_t = SurfaceKind::Torus)]
    surface: SurfaceKind,
    /// Columns of the frame
    #[arg(long, default_value_t = 80)]
    width: usize,
    /// Rows of the frame
    #[arg(long, default_value_t = 40)]
    height: usize,
    /// Stop after this many frames instead of running forever
    #[arg(short = 'n', long)]
    frames: Option<usize>,
    /// Pause between frames in milliseconds
    #[arg(short, long, default_value_t = 0)]
    delay_ms: u64,
    /// Change of angle A per frame
    #[arg(long, default_value_t = 0.0004, allow_negative_numbers = true)]
    rate_a: f64,
    /// Change of angle B per frame
    #[arg(long, default_value_t = 0.0002, allow_negative_numbers = true)]
    rate_b: f64,
    /// More logging on stderr, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = RenderConfig::default()
        .surface(args.surface)
        .width(args.width)
        .height(args.height)
        .spin(SpinRate {
            a: args.rate_a,
            b: args.rate_b,
        });
    let renderer = Renderer::from_config(&config).context("Could not set up the renderer")?;
    info!(surface = ?config.surface, frames = ?args.frames, "starting animation");

    let mut out = BufWriter::new(stdout().lock());
    startup(&mut out)?;
    let result = play(
        renderer.animate(config.spin),
        &mut out,
        args.frames,
        Duration::from_millis(args.delay_ms),
    );
    let written = result.context("Could not write to stdout")?;
    shutdown(&mut out)?;
    info!(written, "done");
    Ok(())
}
