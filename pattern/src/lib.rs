//! Severity classification over a user's recent mood history.
//!
//! [`classify`] scans a newest-first window of up to seven [`MoodSample`]s
//! and reports whether the recent pattern warrants escalation. The scan is
//! pure and infallible: too little history simply yields [`Verdict::None`].
//!
//! ```
//! use pattern::{classify, MoodSample, Verdict};
//!
//! let window: Vec<MoodSample> = [1, 1, 3, 3, 1, 2, 3].into_iter().map(MoodSample::new).collect();
//! assert!(matches!(classify(&window), Verdict::Critical { .. }));
//! ```

use serde::{Deserialize, Serialize};

/// A single mood rating inside the classification window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSample {
    /// Rating on the 1 (worst) to 5 (best) scale.
    pub mood: u8,
}

impl MoodSample {
    pub fn new(mood: u8) -> Self {
        Self { mood }
    }
}

/// Outcome of scanning a mood window, in escalating order of concern.
///
/// Each actionable tier carries a fixed title and advisory message ready for
/// display. Tiers above `None` surface as inline alerts; `Critical`
/// additionally drives guardian notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", rename_all = "lowercase")]
pub enum Verdict {
    /// Nothing actionable in the window.
    None,
    /// Mood has drifted downward across the last five entries.
    Declining {
        title: &'static str,
        message: &'static str,
    },
    /// Several consecutive low entries or a very low three-day average.
    High {
        title: &'static str,
        message: &'static str,
    },
    /// A cluster of very bad entries; immediate support is warranted.
    Critical {
        title: &'static str,
        message: &'static str,
    },
}

impl Verdict {
    fn declining() -> Self {
        Verdict::Declining {
            title: "Downward Trend",
            message: "Your mood has shown a downward trend. Consider using the wellness tools more often.",
        }
    }

    fn high() -> Self {
        Verdict::High {
            title: "Pattern Detected",
            message: "You have logged low moods for several days in a row. Consider talking to a mental health professional.",
        }
    }

    fn critical() -> Self {
        Verdict::Critical {
            title: "Critical Pattern Detected",
            message: "A concerning pattern was detected in your recent emotional state. It is important to seek support.",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Verdict::None)
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Verdict::Critical { .. })
    }
}

/// Maximum number of entries a caller should supply.
pub const WINDOW: usize = 7;

/// Wellness recommendations offered alongside an actionable verdict.
pub const RECOMMENDATIONS: [&str; 7] = [
    "Practice breathing exercises daily",
    "Keep a regular sleep routine",
    "Consider contacting a mental health professional",
    "Stay connected with family and friends",
    "Avoid alcohol and drugs",
    "Make time for activities you enjoy",
    "Consider joining a support group",
];

/// The slice of [`RECOMMENDATIONS`] actually shown to the user.
pub fn visible_recommendations() -> &'static [&'static str] {
    &RECOMMENDATIONS[..5]
}

/// Classify a newest-first window of recent mood samples.
///
/// Tiers are checked strongest first, so a window matching both the critical
/// and the high condition reports `Critical`. The input is trusted to be
/// ordered and capped at [`WINDOW`] entries by the caller; fewer than three
/// entries never produce a verdict.
pub fn classify(history: &[MoodSample]) -> Verdict {
    if history.len() < 3 {
        return Verdict::None;
    }

    if history.len() >= 4 && critical_pattern(history) {
        log::debug!("critical pattern over {} entries", history.len());
        return Verdict::critical();
    }

    let last3 = &history[..3];
    let low_count = last3.iter().filter(|s| s.mood <= 2).count();
    let average = last3.iter().map(|s| f32::from(s.mood)).sum::<f32>() / last3.len() as f32;
    if low_count >= 3 || average <= 2.5 {
        return Verdict::high();
    }

    if history.len() >= 5 {
        // Newest-first, so a decline toward the present means each entry is
        // no higher than the chronologically earlier one that follows it.
        let last5 = &history[..5];
        if last5.windows(2).all(|pair| pair[0].mood <= pair[1].mood) {
            return Verdict::declining();
        }
    }

    Verdict::None
}

/// A burst of very bad entries outweighs any average-based signal.
fn critical_pattern(history: &[MoodSample]) -> bool {
    let in_range = history
        .iter()
        .filter(|s| (1..=3).contains(&s.mood))
        .count();
    let very_bad = history.iter().filter(|s| s.mood == 1).count();
    let low = history.iter().filter(|s| s.mood <= 2).count();

    (in_range >= 4 && very_bad >= 2) || (low >= 3 && very_bad >= 1)
}
