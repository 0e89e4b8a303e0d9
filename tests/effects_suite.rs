use beat_overlay::effects::{
    COLOR_CYCLE_FRAMES, EffectBundle, FLARES, PALETTE, color_index, compute,
};
use beat_overlay::spectrum::{
    SPECTRUM_BINS, Silence, SpectrumSample, bass_average, spectrum_or_silence,
};

const EPS: f32 = 1e-5;

/// 256-bin spectrum whose first 20 bins average to `bass` (bin 0 carries all
/// of it so the division is exact), with loud treble that must be ignored.
fn spectrum_with_bass(bass: f32) -> Vec<f32> {
    let mut bins = vec![0.9f32; SPECTRUM_BINS];
    bins[..20].fill(0.0);
    bins[0] = bass * 20.0;
    bins
}

fn assert_quiet(b: &EffectBundle) {
    assert!(!b.is_beat);
    assert!(!b.is_glitch);
    assert!(!b.is_flare);
    assert_eq!(b.flash_intensity, 0.0);
    assert_eq!(b.glitch_offset, 0.0);
    assert_eq!(b.rgb_split, 0.0);
    assert_eq!(b.motion_blur, 0.0);
    assert_eq!(b.flare_intensity, 0.0);
}

// ── bass average ────────────────────────────────────────────────────────────

#[test]
fn bass_average_uses_only_first_twenty_bins() {
    let mut bins = vec![1.0f32; SPECTRUM_BINS];
    bins[..20].fill(0.25);
    assert!((bass_average(&bins) - 0.25).abs() < EPS);
}

#[test]
fn bass_average_of_empty_spectrum_is_zero() {
    let avg = bass_average(&[]);
    assert_eq!(avg, 0.0);
    assert!(!avg.is_nan());
}

#[test]
fn bass_average_of_short_spectrum_uses_available_bins() {
    assert!((bass_average(&[0.2, 0.4]) - 0.3).abs() < EPS);
}

#[test]
fn spectrum_sample_sanitizes_invalid_amplitudes() {
    let sample = SpectrumSample::new(vec![f32::NAN, -1.0, f32::INFINITY, 0.5]);
    assert_eq!(sample.bins(), &[0.0, 0.0, 0.0, 0.5]);
    assert_eq!(SpectrumSample::silence().len(), SPECTRUM_BINS);
    assert_eq!(SpectrumSample::silence().bass_average(), 0.0);
}

#[test]
fn missing_spectrum_resolves_to_256_zeros() {
    let bins = spectrum_or_silence(&Silence, 42);
    assert_eq!(bins.len(), SPECTRUM_BINS);
    assert!(bins.iter().all(|v| *v == 0.0));
}

// ── mapper ──────────────────────────────────────────────────────────────────

#[test]
fn silence_disables_every_effect() {
    let silence = vec![0.0f32; SPECTRUM_BINS];
    for frame in [0u64, 1, 17, 18, 89, 90, 10_000] {
        assert_quiet(&compute(frame, 30, &silence));
    }
}

#[test]
fn empty_spectrum_is_treated_as_silence() {
    let b = compute(5, 30, &[]);
    assert_eq!(b.bass_average, 0.0);
    assert_quiet(&b);
}

#[test]
fn beat_threshold_is_strict() {
    let at = compute(0, 30, &spectrum_with_bass(0.05));
    assert_eq!(at.bass_average, 0.05);
    assert!(!at.is_beat);
    assert_eq!(at.flash_intensity, 0.0);

    let above = compute(0, 30, &spectrum_with_bass(0.0501));
    assert!(above.is_beat);
    assert!((above.flash_intensity - 0.0501 * 1.2).abs() < EPS);
}

#[test]
fn quarter_bass_activates_glitch_split_blur_and_flare() {
    let b = compute(0, 30, &spectrum_with_bass(0.25));
    assert!((b.bass_average - 0.25).abs() < EPS);
    assert!(b.is_beat);
    assert!((b.flash_intensity - 0.3).abs() < EPS);
    assert!(b.is_glitch);
    assert!((b.glitch_offset - -3.5).abs() < EPS);
    assert!((b.rgb_split - 2.0).abs() < EPS);
    assert!((b.motion_blur - 1.25).abs() < EPS);
    assert!(b.is_flare);
    assert!((b.flare_intensity - 0.3).abs() < EPS);
}

#[test]
fn glitch_offset_crosses_zero_at_one_third() {
    let low = compute(0, 30, &spectrum_with_bass(0.21));
    assert!(low.is_glitch);
    assert!(low.glitch_offset < 0.0);

    let high = compute(0, 30, &spectrum_with_bass(0.5));
    assert!((high.glitch_offset - 4.0).abs() < EPS);
}

#[test]
fn thresholds_are_independent() {
    // 0.09: beat and blur, but no split, flare or glitch.
    let b = compute(0, 30, &spectrum_with_bass(0.09));
    assert!(b.is_beat);
    assert!(b.motion_blur > 0.0);
    assert_eq!(b.rgb_split, 0.0);
    assert!(!b.is_flare);
    assert!(!b.is_glitch);

    // 0.16: flare without glitch.
    let b = compute(0, 30, &spectrum_with_bass(0.16));
    assert!(b.rgb_split > 0.0);
    assert!(b.is_flare);
    assert!(!b.is_glitch);
}

#[test]
fn compute_is_deterministic_for_random_inputs() {
    let mut rng = fastrand::Rng::with_seed(0x5EED);
    for _ in 0..256 {
        let frame = rng.u64(0..1_000_000);
        let fps = rng.u32(1..=120);
        let bins = (0..SPECTRUM_BINS)
            .map(|_| rng.f32() * 0.6)
            .collect::<Vec<_>>();
        assert_eq!(compute(frame, fps, &bins), compute(frame, fps, &bins));
    }
}

#[test]
fn color_rotates_every_eighteen_frames_with_ninety_frame_period() {
    assert_eq!(COLOR_CYCLE_FRAMES, 90);
    assert_eq!(color_index(0), 0);
    assert_eq!(color_index(17), 0);
    assert_eq!(color_index(18), 1);
    assert_eq!(color_index(89), 4);
    assert_eq!(color_index(90), 0);

    let loud = spectrum_with_bass(0.3);
    for frame in 0..(COLOR_CYCLE_FRAMES * 3) {
        let quiet = compute(frame, 30, &[]);
        let hot = compute(frame, 30, &loud);
        assert_eq!(quiet.color_index, hot.color_index);
        assert_eq!(quiet.color_index, color_index(frame + COLOR_CYCLE_FRAMES));
        assert_eq!(hot.flash_color, PALETTE[hot.color_index]);
    }
}

#[test]
fn palette_hex_values_are_stable() {
    let hex = PALETTE.map(|c| c.hex());
    assert_eq!(hex, ["#FF00FF", "#00FF00", "#00FFFF", "#FF0066", "#9900FF"]);
}

#[test]
fn flare_opacities_scale_by_fixed_weights() {
    let b = compute(0, 30, &spectrum_with_bass(0.25));
    let [a, c, d] = b.flare_opacities();
    assert!((a - 0.3).abs() < EPS);
    assert!((c - 0.18).abs() < EPS);
    assert!((d - 0.15).abs() < EPS);
    assert_eq!(FLARES.map(|f| f.blur_px), [20.0, 15.0, 10.0]);
}

#[test]
fn time_follows_frame_rate() {
    assert!((compute(45, 30, &[]).time_s - 1.5).abs() < EPS);
    assert_eq!(compute(45, 0, &[]).time_s, 0.0);
}
