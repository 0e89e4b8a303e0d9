use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use beat_overlay::spectrum::{BASS_BINS, SPECTRUM_BINS, SpectrumSample};
use beat_overlay::track::SpectrumTrack;

const DEFAULT_SEED: u64 = 0xBEA7_2026;

struct Args {
    out: PathBuf,
    fps: u32,
    seed: u64,
}

fn parse_args() -> Args {
    let mut out = PathBuf::from("assets/test/kick_ramp_120bpm.spectrum");
    let mut fps = 30u32;
    let mut seed = DEFAULT_SEED;

    let mut it = std::env::args().skip(1);
    while let Some(k) = it.next() {
        let v = it.next();
        match (k.as_str(), v) {
            ("--out", Some(p)) => out = PathBuf::from(p),
            ("--fps", Some(v)) => {
                if let Ok(f) = v.parse::<u32>() {
                    fps = f.clamp(1, 240);
                }
            }
            ("--seed", Some(v)) => {
                if let Ok(s) = v.parse::<u64>() {
                    seed = s;
                }
            }
            _ => {}
        }
    }

    Args { out, fps, seed }
}

fn main() -> Result<()> {
    let args = parse_args();
    if let Some(parent) = args.out.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }

    let track = make_kick_ramp(args.fps, args.seed);
    fs::write(&args.out, track.to_text())
        .with_context(|| format!("write {}", args.out.display()))?;

    println!("generated: {}", args.out.display());
    println!(
        "fps={} frames={} duration={:.2}s",
        args.fps,
        track.frame_span(),
        track.frame_span() as f32 / args.fps as f32
    );
    Ok(())
}

/// Silence, then 120 BPM kicks whose peak bass climbs through every effect
/// threshold, then a quiet pad, then a gap left out of the file entirely.
fn make_kick_ramp(fps: u32, seed: u64) -> SpectrumTrack {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut track = SpectrumTrack::new(Some(fps));
    let mut frame = 0u64;

    // 1) 2s silence.
    for _ in 0..fps * 2 {
        track.insert(frame, SpectrumSample::silence());
        frame += 1;
    }

    // 2) 24 kicks at 120 BPM, peak bass rising 0.03 -> 0.40.
    let beat_frames = (fps / 2).max(1);
    for i in 0..24 {
        let peak = 0.03 + 0.37 * i as f32 / 23.0;
        for k in 0..beat_frames {
            let decay = (1.0 - k as f32 / beat_frames as f32).powf(2.4);
            track.insert(frame, kick_frame(&mut rng, peak * decay, 0.02));
            frame += 1;
        }
    }

    // 3) 4s pad: treble only, bass stays under the beat threshold.
    for _ in 0..fps * 4 {
        track.insert(frame, kick_frame(&mut rng, 0.01, 0.12));
        frame += 1;
    }

    // 4) 1s dropout (absent from the file), then one closing hit.
    frame += u64::from(fps);
    track.insert(frame, kick_frame(&mut rng, 0.35, 0.05));

    track
}

fn kick_frame(rng: &mut fastrand::Rng, bass: f32, treble: f32) -> SpectrumSample {
    let bins = (0..SPECTRUM_BINS)
        .map(|i| {
            let jitter = 0.9 + rng.f32() * 0.2;
            if i < BASS_BINS {
                bass * jitter
            } else {
                let rolloff = 1.0 - i as f32 / SPECTRUM_BINS as f32;
                treble * rolloff * jitter
            }
        })
        .collect();
    SpectrumSample::new(bins)
}
