use crate::effects::EffectBundle;
use crate::style::{compose_layers, num};
use anyhow::Result;
use clap::ValueEnum;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `key=value` line per frame.
    Summary,
    /// Tab-separated table with a header row.
    #[value(alias = "table")]
    Tsv,
    /// Full layer stack per frame as CSS declarations.
    #[value(alias = "layers")]
    Css,
}

const TSV_COLUMNS: [&str; 13] = [
    "frame",
    "time_s",
    "bass",
    "beat",
    "color",
    "flash",
    "glitch",
    "glitch_offset",
    "rgb_split",
    "motion_blur",
    "flare",
    "flare_intensity",
    "video_frame",
];

/// Writes frame output in one format. Call [`FrameWriter::begin`] once,
/// then [`FrameWriter::write`] for every frame in order.
pub struct FrameWriter<'a> {
    format: OutputFormat,
    out: &'a mut dyn Write,
}

impl<'a> FrameWriter<'a> {
    pub fn new(format: OutputFormat, out: &'a mut dyn Write) -> Self {
        Self { format, out }
    }

    pub fn begin(&mut self) -> Result<()> {
        if self.format == OutputFormat::Tsv {
            writeln!(self.out, "{}", TSV_COLUMNS.join("\t"))?;
        }
        Ok(())
    }

    pub fn write(&mut self, bundle: &EffectBundle) -> Result<()> {
        match self.format {
            OutputFormat::Summary => writeln!(self.out, "{}", summary_line(bundle))?,
            OutputFormat::Tsv => writeln!(self.out, "{}", tsv_row(bundle))?,
            OutputFormat::Css => {
                writeln!(self.out, "frame {}", bundle.frame)?;
                for layer in compose_layers(bundle) {
                    writeln!(self.out, "  {} {{ {} }}", layer.kind.label(), layer.to_css())?;
                }
            }
        }
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

pub fn summary_line(b: &EffectBundle) -> String {
    format!(
        "frame={} t={:.3} bass={:.4} beat={} color={} flash={:.4} glitch={} glitch_offset={:.4} rgb_split={:.4} motion_blur={:.4} flare={} flare_intensity={:.4}",
        b.frame,
        b.time_s,
        b.bass_average,
        b.is_beat,
        b.flash_color.hex(),
        b.flash_intensity,
        b.is_glitch,
        b.glitch_offset,
        b.rgb_split,
        b.motion_blur,
        b.is_flare,
        b.flare_intensity,
    )
}

pub fn tsv_row(b: &EffectBundle) -> String {
    [
        b.frame.to_string(),
        num(b.time_s),
        num(b.bass_average),
        u8::from(b.is_beat).to_string(),
        b.flash_color.hex(),
        num(b.flash_intensity),
        u8::from(b.is_glitch).to_string(),
        num(b.glitch_offset),
        num(b.rgb_split),
        num(b.motion_blur),
        u8::from(b.is_flare).to_string(),
        num(b.flare_intensity),
        crate::style::video_loop_frame(b.frame).to_string(),
    ]
    .join("\t")
}
