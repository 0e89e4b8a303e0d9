use crate::config::Config;
use crate::effects::compute;
use crate::export::FrameWriter;
use crate::spectrum::{Silence, SpectrumSource, spectrum_or_silence};
use crate::track::SpectrumTrack;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub beats: u64,
    pub glitches: u64,
    pub flares: u64,
    /// Frames with no spectrum data that were rendered as silence.
    pub silent: u64,
}

pub fn run(cfg: Config) -> Result<RunStats> {
    cfg.validate()?;

    let track = match &cfg.spectrum {
        Some(path) => {
            let track = SpectrumTrack::load(path)
                .with_context(|| format!("load spectrum track {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                frames = track.len(),
                fps = ?track.fps(),
                "loaded spectrum track"
            );
            Some(track)
        }
        None => {
            tracing::warn!("no spectrum track given; rendering silence");
            None
        }
    };

    let track_fps = track.as_ref().and_then(SpectrumTrack::fps);
    let fps = cfg.resolve_fps(track_fps);
    if let (Some(cli), Some(file)) = (cfg.fps, track_fps) {
        if cli != file {
            tracing::warn!(cli, file, "--fps differs from the track header; using --fps");
        }
    }

    let track_span = track.as_ref().map(SpectrumTrack::frame_span);
    let frame_count = cfg.resolve_frame_count(fps, track_span)?;
    let source: &dyn SpectrumSource = match &track {
        Some(t) => t,
        None => &Silence,
    };

    let mut sink: Box<dyn Write> = match &cfg.out {
        Some(path) => {
            ensure_parent_dir(path)?;
            let file = fs::File::create(path)
                .with_context(|| format!("create output {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    tracing::info!(
        fps,
        frames = frame_count,
        start = cfg.start,
        format = ?cfg.format,
        "rendering"
    );
    let mut writer = FrameWriter::new(cfg.format, &mut *sink);
    let stats = render_frames(source, fps, cfg.start, frame_count, &mut writer)?;
    tracing::info!(
        frames = stats.frames,
        beats = stats.beats,
        glitches = stats.glitches,
        flares = stats.flares,
        silent = stats.silent,
        "done"
    );
    Ok(stats)
}

/// Drives the mapper once per frame in `start..start + count`.
pub fn render_frames(
    source: &dyn SpectrumSource,
    fps: u32,
    start: u64,
    count: u64,
    writer: &mut FrameWriter<'_>,
) -> Result<RunStats> {
    let mut stats = RunStats::default();
    writer.begin()?;

    for frame in start..start.saturating_add(count) {
        if source.spectrum(frame).is_none() {
            stats.silent += 1;
            tracing::trace!(frame, "spectrum unavailable; using silence");
        }
        let bundle = compute(frame, fps, spectrum_or_silence(source, frame));

        stats.frames += 1;
        stats.beats += u64::from(bundle.is_beat);
        stats.glitches += u64::from(bundle.is_glitch);
        stats.flares += u64::from(bundle.is_flare);

        writer
            .write(&bundle)
            .with_context(|| format!("write frame {frame}"))?;
    }

    writer.finish().context("flush output")?;
    Ok(stats)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    let mut parent = path.parent().unwrap_or_else(|| Path::new(""));
    if parent == Path::new("") {
        parent = Path::new(".");
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("create output directory {}", parent.display()))
}
