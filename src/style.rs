use crate::effects::{EffectBundle, FLARES, FlareSpot};
use std::fmt::Write as _;

pub const VIDEO_ASSET: &str = "movie.mp4";
pub const AUDIO_ASSET: &str = "becomezero.wav";

/// The background clip restarts every this many frames.
pub const VIDEO_LOOP_FRAMES: u64 = 280;

/// Height of each cinematic bar, as a percentage of the frame (~2.39:1).
pub const LETTERBOX_PCT: f32 = 12.0;
pub const LETTERBOX_Z_INDEX: u32 = 1000;

const VIDEO_GRADE: &str = "sepia(0.1) contrast(1.15) brightness(0.95) saturate(1.1)";
const COLOR_GRADE_GRADIENT: &str =
    "linear-gradient(180deg, rgba(0, 100, 150, 0.08) 0%, rgba(255, 140, 0, 0.06) 100%)";
const VIGNETTE_GRADIENT: &str =
    "radial-gradient(ellipse at center, transparent 20%, rgba(0,0,0,0.9) 100%)";
const FLASH_GLOW_PX: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Video,
    ColorGrade,
    Vignette,
    Flash,
    Flare,
    LetterboxTop,
    LetterboxBottom,
}

impl LayerKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::ColorGrade => "color-grade",
            Self::Vignette => "vignette",
            Self::Flash => "flash",
            Self::Flare => "flare",
            Self::LetterboxTop => "letterbox-top",
            Self::LetterboxBottom => "letterbox-bottom",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    props: Vec<(&'static str, String)>,
}

impl Layer {
    fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            props: Vec::new(),
        }
    }

    fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.props.push((key, value.into()));
        self
    }

    fn full_frame(kind: LayerKind) -> Self {
        Self::new(kind)
            .with("position", "absolute")
            .with("top", "0")
            .with("left", "0")
            .with("width", "100%")
            .with("height", "100%")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn props(&self) -> &[(&'static str, String)] {
        &self.props
    }

    /// `key: value; key: value` declaration list.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.props.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{k}: {v};");
        }
        out
    }
}

pub fn video_loop_frame(frame: u64) -> u64 {
    frame % VIDEO_LOOP_FRAMES
}

/// Builds the paint-ordered layer stack. The flash layer only exists on
/// beat frames and the flare discs only while flaring.
pub fn compose_layers(bundle: &EffectBundle) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(6 + FLARES.len());
    layers.push(video_layer(bundle));

    layers.push(
        Layer::full_frame(LayerKind::ColorGrade)
            .with("background", COLOR_GRADE_GRADIENT)
            .with("mix-blend-mode", "overlay")
            .with("pointer-events", "none"),
    );
    layers.push(
        Layer::full_frame(LayerKind::Vignette)
            .with("background", VIGNETTE_GRADIENT)
            .with("pointer-events", "none"),
    );

    let color = bundle.flash_color.hex();
    if bundle.is_beat {
        layers.push(
            Layer::full_frame(LayerKind::Flash)
                .with("background-color", color.clone())
                .with("opacity", num(bundle.flash_intensity))
                .with("mix-blend-mode", "screen")
                .with("pointer-events", "none")
                .with("box-shadow", format!("inset 0 0 {FLASH_GLOW_PX}px {color}")),
        );
    }

    if bundle.is_flare {
        for (spot, opacity) in FLARES.iter().zip(bundle.flare_opacities()) {
            layers.push(flare_layer(spot, opacity, &color));
        }
    }

    layers.push(letterbox(LayerKind::LetterboxTop, "top"));
    layers.push(letterbox(LayerKind::LetterboxBottom, "bottom"));
    layers
}

fn video_layer(bundle: &EffectBundle) -> Layer {
    let transform = if bundle.is_glitch {
        let g = num(bundle.glitch_offset);
        format!("translate({g}px, {g}px)")
    } else {
        "none".to_string()
    };
    let split = num(bundle.rgb_split);
    let filter = format!(
        "drop-shadow({split}px 0 0 red) drop-shadow(-{split}px 0 0 cyan) blur({}px) {VIDEO_GRADE}",
        num(bundle.motion_blur)
    );

    Layer::new(LayerKind::Video)
        .with("src", VIDEO_ASSET)
        .with("volume", "0")
        .with("loop-frame", video_loop_frame(bundle.frame).to_string())
        .with("transform", transform)
        .with("filter", filter)
}

fn flare_layer(spot: &FlareSpot, opacity: f32, color: &str) -> Layer {
    let size = format!("{}px", num(spot.size_px));
    let mut layer = Layer::new(LayerKind::Flare)
        .with("position", "absolute")
        .with("top", format!("{}%", num(spot.top_pct)))
        .with("left", format!("{}%", num(spot.left_pct)))
        .with("width", size.clone())
        .with("height", size);
    if spot.centered {
        layer = layer.with("transform", "translate(-50%, -50%)");
    }
    layer
        .with("border-radius", "50%")
        .with(
            "background",
            format!("radial-gradient(circle, {color} 0%, transparent 70%)"),
        )
        .with("opacity", num(opacity))
        .with("pointer-events", "none")
        .with("filter", format!("blur({}px)", num(spot.blur_px)))
}

fn letterbox(kind: LayerKind, edge: &'static str) -> Layer {
    Layer::new(kind)
        .with("position", "absolute")
        .with(edge, "0")
        .with("left", "0")
        .with("width", "100%")
        .with("height", format!("{}%", num(LETTERBOX_PCT)))
        .with("background-color", "black")
        .with("pointer-events", "none")
        .with("z-index", LETTERBOX_Z_INDEX.to_string())
}

/// Shortest decimal form; negative zero prints as `0`.
pub(crate) fn num(v: f32) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}
