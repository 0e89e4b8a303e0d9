use crate::spectrum::{SPECTRUM_BINS, SpectrumSample, SpectrumSource};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;
use std::path::Path;

/// Precomputed per-frame spectra, as written by an offline analysis pass.
///
/// ```text
/// # spectrum track v1
/// fps=30
/// 0: 0.12 0.30 0.08 ...
/// 1: 0.10 0.28 0.07 ...
/// ```
///
/// Frames missing from the file are treated as unavailable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumTrack {
    fps: Option<u32>,
    frames: BTreeMap<u64, SpectrumSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    Io(String),
    Parse { line: usize, message: String },
    DuplicateFrame { line: usize, frame: u64 },
    TooManyBins { line: usize, count: usize },
    InvalidValue { line: usize, message: String },
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
            Self::DuplicateFrame { line, frame } => {
                write!(f, "duplicate frame {frame} at line {line}")
            }
            Self::TooManyBins { line, count } => write!(
                f,
                "line {line} has {count} bins (at most {SPECTRUM_BINS} allowed)"
            ),
            Self::InvalidValue { line, message } => {
                write!(f, "invalid value at line {line}: {message}")
            }
        }
    }
}

impl std::error::Error for TrackError {}

impl SpectrumTrack {
    pub fn new(fps: Option<u32>) -> Self {
        Self {
            fps,
            frames: BTreeMap::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, TrackError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| TrackError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, TrackError> {
        let mut track = Self::default();

        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                match key.trim() {
                    "fps" => {
                        if track.fps.is_some() {
                            return Err(TrackError::Parse {
                                line: line_no,
                                message: "duplicate 'fps' header".to_string(),
                            });
                        }
                        let fps = value.trim().parse::<u32>().map_err(|_| TrackError::Parse {
                            line: line_no,
                            message: format!("expected integer fps, got '{}'", value.trim()),
                        })?;
                        if fps == 0 {
                            return Err(TrackError::InvalidValue {
                                line: line_no,
                                message: "fps must be >= 1".to_string(),
                            });
                        }
                        track.fps = Some(fps);
                    }
                    other => {
                        return Err(TrackError::Parse {
                            line: line_no,
                            message: format!("unknown header '{other}'"),
                        });
                    }
                }
                continue;
            }

            let (frame_raw, values_raw) = line.split_once(':').ok_or(TrackError::Parse {
                line: line_no,
                message: "expected <frame>: <values...>".to_string(),
            })?;
            let frame = frame_raw
                .trim()
                .parse::<u64>()
                .map_err(|_| TrackError::Parse {
                    line: line_no,
                    message: format!("invalid frame index '{}'", frame_raw.trim()),
                })?;
            let bins = parse_bins(values_raw, line_no)?;

            if track.frames.contains_key(&frame) {
                return Err(TrackError::DuplicateFrame {
                    line: line_no,
                    frame,
                });
            }
            track.frames.insert(frame, SpectrumSample::new(bins));
        }

        Ok(track)
    }

    pub fn fps(&self) -> Option<u32> {
        self.fps
    }

    /// Stores `sample` at `frame`, returning the sample it replaced.
    pub fn insert(&mut self, frame: u64, sample: SpectrumSample) -> Option<SpectrumSample> {
        self.frames.insert(frame, sample)
    }

    /// Number of frames stored (gaps are not counted).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// One past the highest frame index, i.e. the length a render must
    /// cover to reach every stored frame.
    pub fn frame_span(&self) -> u64 {
        self.frames
            .keys()
            .next_back()
            .map(|f| f.saturating_add(1))
            .unwrap_or(0)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::from("# spectrum track v1\n");
        if let Some(fps) = self.fps {
            let _ = writeln!(out, "fps={fps}");
        }
        for (frame, sample) in &self.frames {
            let _ = write!(out, "{frame}:");
            for v in sample.bins() {
                let _ = write!(out, " {v}");
            }
            out.push('\n');
        }
        out
    }
}

impl SpectrumSource for SpectrumTrack {
    fn spectrum(&self, frame: u64) -> Option<&[f32]> {
        self.frames.get(&frame).map(SpectrumSample::bins)
    }
}

fn parse_bins(raw: &str, line_no: usize) -> Result<Vec<f32>, TrackError> {
    let mut bins = Vec::with_capacity(SPECTRUM_BINS);
    for token in raw.split_whitespace() {
        let v = token.parse::<f32>().map_err(|_| TrackError::Parse {
            line: line_no,
            message: format!("invalid amplitude '{token}'"),
        })?;
        if !v.is_finite() || v < 0.0 {
            return Err(TrackError::InvalidValue {
                line: line_no,
                message: format!("amplitude must be finite and >= 0, got {token}"),
            });
        }
        bins.push(v);
    }
    if bins.len() > SPECTRUM_BINS {
        return Err(TrackError::TooManyBins {
            line: line_no,
            count: bins.len(),
        });
    }
    Ok(bins)
}
