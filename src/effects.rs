use crate::spectrum::bass_average;

pub const BEAT_THRESHOLD: f32 = 0.05;
pub const FLASH_GAIN: f32 = 1.2;

pub const GLITCH_THRESHOLD: f32 = 0.2;
pub const GLITCH_GAIN: f32 = 30.0;
// Subtracted after the gain, so offsets just above the threshold are negative.
pub const GLITCH_BIAS: f32 = 5.0;

pub const RGB_SPLIT_THRESHOLD: f32 = 0.1;
pub const RGB_SPLIT_GAIN: f32 = 8.0;

pub const MOTION_BLUR_THRESHOLD: f32 = 0.08;
pub const MOTION_BLUR_GAIN: f32 = 5.0;

pub const FLARE_THRESHOLD: f32 = 0.15;
pub const FLARE_GAIN: f32 = 3.0;

/// Frames each palette colour is held before rotating to the next.
pub const COLOR_HOLD_FRAMES: u64 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Flash colours: magenta, green, cyan, pink, violet.
pub const PALETTE: [Rgb; 5] = [
    Rgb::new(0xFF, 0x00, 0xFF),
    Rgb::new(0x00, 0xFF, 0x00),
    Rgb::new(0x00, 0xFF, 0xFF),
    Rgb::new(0xFF, 0x00, 0x66),
    Rgb::new(0x99, 0x00, 0xFF),
];

/// Full palette cycle length in frames.
pub const COLOR_CYCLE_FRAMES: u64 = COLOR_HOLD_FRAMES * PALETTE.len() as u64;

pub fn color_index(frame: u64) -> usize {
    ((frame / COLOR_HOLD_FRAMES) % PALETTE.len() as u64) as usize
}

/// A lens-flare disc. Opacity is `flare_intensity * weight`; everything else
/// is static layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlareSpot {
    pub weight: f32,
    pub top_pct: f32,
    pub left_pct: f32,
    pub size_px: f32,
    pub blur_px: f32,
    /// Positioned by its centre rather than its top-left corner.
    pub centered: bool,
}

pub const FLARES: [FlareSpot; 3] = [
    FlareSpot {
        weight: 1.0,
        top_pct: 50.0,
        left_pct: 50.0,
        size_px: 200.0,
        blur_px: 20.0,
        centered: true,
    },
    FlareSpot {
        weight: 0.6,
        top_pct: 30.0,
        left_pct: 70.0,
        size_px: 100.0,
        blur_px: 15.0,
        centered: false,
    },
    FlareSpot {
        weight: 0.5,
        top_pct: 70.0,
        left_pct: 30.0,
        size_px: 80.0,
        blur_px: 10.0,
        centered: false,
    },
];

/// Visual-effect parameters for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectBundle {
    pub frame: u64,
    pub time_s: f32,
    pub bass_average: f32,
    pub is_beat: bool,
    pub color_index: usize,
    pub flash_color: Rgb,
    pub flash_intensity: f32,
    pub is_glitch: bool,
    pub glitch_offset: f32,
    pub rgb_split: f32,
    pub motion_blur: f32,
    pub is_flare: bool,
    pub flare_intensity: f32,
}

impl EffectBundle {
    /// Opacity of each entry in [`FLARES`], in the same order.
    pub fn flare_opacities(&self) -> [f32; 3] {
        FLARES.map(|spot| self.flare_intensity * spot.weight)
    }
}

/// Maps one frame's spectrum to its effect parameters.
///
/// Every threshold is a strict `>` comparison and the effects are
/// independent, so any combination may be active at once. `fps` only feeds
/// `time_s`; a zero rate yields `time_s == 0`.
pub fn compute(frame: u64, fps: u32, spectrum: &[f32]) -> EffectBundle {
    let bass = bass_average(spectrum);

    let is_beat = bass > BEAT_THRESHOLD;
    let color_index = color_index(frame);
    let flash_intensity = if is_beat { bass * FLASH_GAIN } else { 0.0 };

    let is_glitch = bass > GLITCH_THRESHOLD;
    let glitch_offset = if is_glitch {
        (bass - GLITCH_THRESHOLD) * GLITCH_GAIN - GLITCH_BIAS
    } else {
        0.0
    };
    let rgb_split = if bass > RGB_SPLIT_THRESHOLD {
        bass * RGB_SPLIT_GAIN
    } else {
        0.0
    };

    let motion_blur = if bass > MOTION_BLUR_THRESHOLD {
        bass * MOTION_BLUR_GAIN
    } else {
        0.0
    };

    let is_flare = bass > FLARE_THRESHOLD;
    let flare_intensity = if is_flare {
        (bass - FLARE_THRESHOLD) * FLARE_GAIN
    } else {
        0.0
    };

    let time_s = if fps == 0 {
        0.0
    } else {
        frame as f32 / fps as f32
    };

    EffectBundle {
        frame,
        time_s,
        bass_average: bass,
        is_beat,
        color_index,
        flash_color: PALETTE[color_index],
        flash_intensity,
        is_glitch,
        glitch_offset,
        rgb_split,
        motion_blur,
        is_flare,
        flare_intensity,
    }
}
