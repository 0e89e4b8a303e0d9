/// Number of amplitude bins the audio analysis step produces per frame.
pub const SPECTRUM_BINS: usize = 256;

/// Lowest bins averaged into the beat-detection signal (kick/snare range).
pub const BASS_BINS: usize = 20;

static SILENCE: [f32; SPECTRUM_BINS] = [0.0; SPECTRUM_BINS];

/// One frame's amplitude snapshot across frequency bins.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSample {
    bins: Vec<f32>,
}

impl SpectrumSample {
    /// Non-finite and negative amplitudes are stored as 0.
    pub fn new(bins: Vec<f32>) -> Self {
        let bins = bins
            .into_iter()
            .map(|v| if v.is_finite() && v > 0.0 { v } else { 0.0 })
            .collect();
        Self { bins }
    }

    pub fn silence() -> Self {
        Self {
            bins: SILENCE.to_vec(),
        }
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bass_average(&self) -> f32 {
        bass_average(&self.bins)
    }
}

impl Default for SpectrumSample {
    fn default() -> Self {
        Self::silence()
    }
}

/// Mean of the first [`BASS_BINS`] entries, or of all entries when fewer exist.
/// An empty spectrum averages to 0.
pub fn bass_average(bins: &[f32]) -> f32 {
    let bass = &bins[..bins.len().min(BASS_BINS)];
    if bass.is_empty() {
        return 0.0;
    }
    bass.iter().sum::<f32>() / bass.len() as f32
}

/// Supplier of per-frame spectra. `None` means the data is unavailable for
/// that frame and the caller substitutes silence.
pub trait SpectrumSource {
    fn spectrum(&self, frame: u64) -> Option<&[f32]>;
}

/// Source with no audio data at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl SpectrumSource for Silence {
    fn spectrum(&self, _frame: u64) -> Option<&[f32]> {
        None
    }
}

pub fn spectrum_or_silence(source: &dyn SpectrumSource, frame: u64) -> &[f32] {
    source.spectrum(frame).unwrap_or(&SILENCE)
}
