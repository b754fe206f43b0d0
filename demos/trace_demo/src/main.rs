// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated display, application and latency tester driving the full
//! pipeline.
//!
//! A 90 Hz display scans out frames produced by an application that runs at
//! full rate, then half rate, then drops a frame. A simulated readback device
//! echoes the test colors it sees, and goes silent for a while to force a
//! stale latency cycle. Events go to both a
//! [`PrettyPrintSink`](glint_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](glint_debug::recorder::RecorderSink), and the recording
//! is exported as a Chrome trace.

use std::fs::File;
use std::io::{self, BufWriter};

use glint_core::clock::{Clock, ManualClock};
use glint_core::config::{LatencyTesterConfig, PredictorConfig};
use glint_core::latency::{CycleTransition, LatencySample, LatencyTester, SaveOutcome};
use glint_core::readback::{FrameTimeRecordSet, color_to_readback_index};
use glint_core::timing::{FrameTimingPredictor, Timing};
use glint_core::trace::{
    FramePredictionEvent, FrameSubmitEvent, LatencyCycleEvent, LatencyMatchEvent,
    LatencySummaryEvent, PredictionKey, TraceSink, Tracer,
};

use glint_debug::pretty::PrettyPrintSink;
use glint_debug::recorder::RecorderSink;

const APP_FRAMES: u32 = 240;
/// Nominal refresh interval (90 Hz).
const NOMINAL_PERIOD: f64 = 1.0 / 90.0;
/// What the panel actually does.
const ACTUAL_PERIOD: f64 = 0.011_05;
/// Present call happens this long before vsync.
const PRESENT_LEAD: f64 = 0.0015;
/// Photons leave the panel this long after vsync.
const PANEL_DELAY: f64 = 0.0025;
/// Application frames run at half rate in this range.
const HALF_RATE: std::ops::RangeInclusive<u32> = 121..=180;
/// The application misses one vsync on this frame.
const DROPPED_FRAME: u32 = 200;
/// The readback device reports nothing in this range.
const DEVICE_SILENT: std::ops::RangeInclusive<u32> = 60..=90;

/// Forwards every event to two sinks.
struct Tee<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Tee<'_> {
    fn on_frame_submit(&mut self, e: &FrameSubmitEvent) {
        self.pretty.on_frame_submit(e);
        self.recorder.on_frame_submit(e);
    }

    fn on_frame_prediction(&mut self, e: &FramePredictionEvent) {
        self.pretty.on_frame_prediction(e);
        self.recorder.on_frame_prediction(e);
    }

    fn on_latency_cycle(&mut self, e: &LatencyCycleEvent) {
        self.pretty.on_latency_cycle(e);
        self.recorder.on_latency_cycle(e);
    }

    fn on_latency_match(&mut self, e: &LatencyMatchEvent) {
        self.pretty.on_latency_match(e);
        self.recorder.on_latency_match(e);
    }

    fn on_latency_summary(&mut self, s: &LatencySummaryEvent) {
        self.pretty.on_latency_summary(s);
        self.recorder.on_latency_summary(s);
    }
}

/// Scan-out start of `display_frame` with a little deterministic jitter.
fn scanout_time(display_frame: u32) -> f64 {
    let jitter = (f64::from(display_frame.wrapping_mul(7919) % 5) - 2.0) * 0.000_1;
    1.0 + f64::from(display_frame) * ACTUAL_PERIOD + jitter
}

fn main() -> io::Result<()> {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- components --------------------------------------------------------
    let clock = ManualClock::new(1.0);
    let mut predictor = FrameTimingPredictor::new(PredictorConfig::standard(), clock.clone());
    predictor.initialize(Timing {
        frame_delta: NOMINAL_PERIOD,
        app_to_display_frame_ratio: 1.0,
        ..Timing::default()
    });
    let reader = predictor.reader();
    let mut tester = LatencyTester::new(LatencyTesterConfig::standard(), clock.clone());
    let mut device = FrameTimeRecordSet::new();

    {
        let mut tee = Tee {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);

        // -- simulated loop ------------------------------------------------
        let mut display_frame = 0_u32;
        for app_frame in 1..=APP_FRAMES {
            // 1. Predict and render.
            let predicted = reader.app_frame_timing(app_frame);
            tracer.frame_prediction(&FramePredictionEvent::new(
                PredictionKey::App(app_frame),
                &predicted,
            ));
            let render_imu = clock.now_seconds();
            let draw_color = tester.next_draw_color();

            // 2. Present on the next vsync the app makes.
            let step = match app_frame {
                f if HALF_RATE.contains(&f) => 2,
                DROPPED_FRAME => 2,
                _ => 1,
            };
            display_frame += step;
            let scanout = scanout_time(display_frame);
            let present = scanout - PRESENT_LEAD;

            // Timewarp re-predicts from the display counter just before vsync.
            let warp = reader.display_frame_timing(display_frame);
            tracer.frame_prediction(&FramePredictionEvent::new(
                PredictionKey::Display(display_frame),
                &warp,
            ));

            clock.set(scanout);
            let report = predictor.submit_display_frame(display_frame, app_frame, scanout);
            tracer.frame_submit(&FrameSubmitEvent::from(&report));

            // 3. Tell the tester what was drawn.
            let outcome = tester.save_draw_color(&LatencySample {
                draw_color,
                present_seconds: present,
                render_imu_seconds: render_imu,
                timewarp_imu_seconds: present - 0.001,
                render_predicted_scanout_seconds: predicted.frame_submit_seconds,
                timewarp_predicted_scanout_seconds: warp.frame_submit_seconds,
            });
            if let SaveOutcome::Abandoned { .. } = outcome {
                tracer.latency_cycle(&LatencyCycleEvent {
                    transition: CycleTransition::Abandoned,
                    seconds: scanout,
                });
            }

            // 4. The device sees the quad and reports back.
            if !DEVICE_SILENT.contains(&app_frame)
                && let Some(index) = color_to_readback_index(draw_color)
            {
                device.add_value(index, scanout + PANEL_DELAY);
            }
            let matched = tester.match_record(&device);
            tracer.match_report(&matched, scanout);

            // 5. Periodic summary.
            if app_frame % 30 == 0 {
                tracer.latency_summary(&LatencySummaryEvent {
                    seconds: scanout,
                    timings: tester.latency_timings(),
                    vsync_to_scanout: tester.vsync_to_scanout(),
                });
            }
        }
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let mut writer = BufWriter::new(File::create(path)?);
    glint_debug::chrome::export(recorder.as_bytes(), &mut writer)?;

    println!(
        "Wrote {path} ({APP_FRAMES} app frames, smoothed frame delta {:.3}ms)",
        predictor.frame_delta() * 1000.0
    );
    Ok(())
}
