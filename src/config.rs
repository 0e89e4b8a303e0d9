use crate::export::OutputFormat;
use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_FPS: u32 = 30;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "beat_overlay",
    version,
    about = "Per-frame audio-reactive overlay effects (spectrum track -> flash/glitch/flare parameters)"
)]
pub struct Config {
    /// Precomputed spectrum track. Without one every frame renders as silence.
    #[arg(long, value_name = "FILE")]
    pub spectrum: Option<PathBuf>,

    /// Frame rate; defaults to the track's `fps=` header, then 30.
    #[arg(long)]
    pub fps: Option<u32>,

    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,

    #[arg(long, value_name = "SECONDS", conflicts_with = "frames")]
    pub duration: Option<f32>,

    #[arg(long, value_name = "FRAME", default_value_t = 0)]
    pub start: u64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Output file; stdout when omitted.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.fps == Some(0) {
            bail!("--fps must be >= 1");
        }
        if self.frames == Some(0) {
            bail!("--frames must be >= 1");
        }
        if let Some(duration) = self.duration {
            if !duration.is_finite() || duration <= 0.0 {
                bail!("--duration must be a finite number of seconds > 0");
            }
        }
        Ok(())
    }

    pub fn resolve_fps(&self, track_fps: Option<u32>) -> u32 {
        self.fps.or(track_fps).unwrap_or(DEFAULT_FPS)
    }

    /// Number of frames to render: `--frames`, then `--duration`, then the
    /// span of the loaded track past `--start`.
    pub fn resolve_frame_count(&self, fps: u32, track_span: Option<u64>) -> Result<u64> {
        if let Some(frames) = self.frames {
            return Ok(frames);
        }
        if let Some(duration) = self.duration {
            return Ok(compute_frame_count(duration, fps));
        }
        match track_span {
            Some(span) if span > self.start => Ok(span - self.start),
            Some(_) => bail!("spectrum track has no frames at or after --start {}", self.start),
            None => bail!("nothing to render: pass --frames, --duration or --spectrum"),
        }
    }
}

pub fn compute_frame_count(duration_s: f32, fps: u32) -> u64 {
    ((duration_s.max(0.0) * fps as f32).floor() as u64).max(1)
}
