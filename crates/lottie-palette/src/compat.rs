//! # Compatibility Checker
//!
//! Checks a document's canvas and timing against the sticker target:
//! 512x512, 60 fps, at most 3 seconds.

use lottie_data::model::LottieHeader;
use std::fmt;

pub const TARGET_SIZE: f64 = 512.0;
pub const TARGET_FRAME_RATE: f64 = 60.0;
pub const MAX_DURATION_SECONDS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub title: &'static str,
    pub current: String,
    pub required: String,
    pub passed: bool,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "pass" } else { "FAIL" };
        write!(
            f,
            "[{status}] {}: current {} (required {})",
            self.title, self.current, self.required
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityReport {
    pub size: Check,
    pub frame_rate: Check,
    pub duration: Check,
    /// `(op - ip) / fr`. Not finite when `fr` is zero.
    pub duration_seconds: f64,
}

impl CompatibilityReport {
    pub fn passed(&self) -> bool {
        self.size.passed && self.frame_rate.passed && self.duration.passed
    }

    pub fn checks(&self) -> [&Check; 3] {
        [&self.size, &self.frame_rate, &self.duration]
    }
}

pub fn check(w: f64, h: f64, fr: f64, ip: f64, op: f64) -> CompatibilityReport {
    let duration_seconds = (op - ip) / fr;

    CompatibilityReport {
        size: Check {
            title: "Size (512x512)",
            current: format!("{w}x{h}"),
            required: format!("{TARGET_SIZE}x{TARGET_SIZE}"),
            passed: w == TARGET_SIZE && h == TARGET_SIZE,
        },
        frame_rate: Check {
            title: "Frame Rate (60 FPS)",
            current: format!("{fr} FPS"),
            required: format!("{TARGET_FRAME_RATE} FPS"),
            passed: fr == TARGET_FRAME_RATE,
        },
        duration: Check {
            title: "Duration (Max 3s)",
            current: format!("{duration_seconds:.2}s"),
            required: format!("{MAX_DURATION_SECONDS}s"),
            passed: duration_seconds.is_finite() && duration_seconds <= MAX_DURATION_SECONDS,
        },
        duration_seconds,
    }
}

pub fn check_header(header: &LottieHeader) -> CompatibilityReport {
    check(header.w, header.h, header.fr, header.ip, header.op)
}
