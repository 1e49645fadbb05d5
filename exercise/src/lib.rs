//! Guided wellness exercises.
//!
//! Two timed exercises are offered: a 4-7-8 breathing cycle driven one
//! second at a time by [`BreathingExercise`], and a fixed five-minute
//! meditation whose stage prompts come from [`meditation_guidance`]. The
//! schedules here are pure; timers and session persistence live with the
//! caller.

use serde::{Deserialize, Serialize};

/// Kind of guided exercise a stored session belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Breathing,
    Meditation,
}

/// One phase of the 4-7-8 breathing cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
    Pause,
}

impl BreathPhase {
    /// How long the phase lasts, in seconds.
    pub fn duration_secs(self) -> u32 {
        match self {
            BreathPhase::Inhale => 4,
            BreathPhase::Hold => 7,
            BreathPhase::Exhale => 8,
            BreathPhase::Pause => 2,
        }
    }

    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            BreathPhase::Inhale => BreathPhase::Hold,
            BreathPhase::Hold => BreathPhase::Exhale,
            BreathPhase::Exhale => BreathPhase::Pause,
            BreathPhase::Pause => BreathPhase::Inhale,
        }
    }

    /// On-screen instruction for the phase.
    pub fn label(self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Breathe in",
            BreathPhase::Hold => "Hold",
            BreathPhase::Exhale => "Breathe out",
            BreathPhase::Pause => "Rest",
        }
    }
}

/// Second-by-second driver for the 4-7-8 breathing exercise.
///
/// A full cycle is inhale, hold, exhale, rest; completing the rest phase
/// increments the cycle count.
#[derive(Clone, Debug)]
pub struct BreathingExercise {
    phase: BreathPhase,
    remaining: u32,
    cycles: u32,
    elapsed_secs: u32,
}

impl Default for BreathingExercise {
    fn default() -> Self {
        Self::new()
    }
}

impl BreathingExercise {
    pub fn new() -> Self {
        Self {
            phase: BreathPhase::Inhale,
            remaining: BreathPhase::Inhale.duration_secs(),
            cycles: 0,
            elapsed_secs: 0,
        }
    }

    /// Advance the exercise by one second.
    pub fn tick(&mut self) {
        self.elapsed_secs += 1;
        self.remaining -= 1;
        if self.remaining == 0 {
            if self.phase == BreathPhase::Pause {
                self.cycles += 1;
            }
            self.phase = self.phase.next();
            self.remaining = self.phase.duration_secs();
        }
    }

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    /// Seconds left in the current phase.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn completed_cycles(&self) -> u32 {
        self.cycles
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }
}

/// Length of a guided meditation session, in seconds.
pub const MEDITATION_SECS: u32 = 300;

/// Stage prompt for a meditation session given the seconds remaining.
pub fn meditation_guidance(remaining_secs: u32) -> &'static str {
    if remaining_secs > 240 {
        "Sit comfortably and close your eyes"
    } else if remaining_secs > 180 {
        "Focus on your natural breathing"
    } else if remaining_secs > 120 {
        "Observe your thoughts without judging them"
    } else if remaining_secs > 60 {
        "Gently return to your breath"
    } else {
        "Prepare to end the session"
    }
}

/// Fraction of the meditation completed, from 0.0 to 1.0.
pub fn meditation_progress(remaining_secs: u32) -> f32 {
    let remaining = remaining_secs.min(MEDITATION_SECS);
    (MEDITATION_SECS - remaining) as f32 / MEDITATION_SECS as f32
}
