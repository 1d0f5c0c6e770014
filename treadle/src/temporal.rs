//! Temporal context injected into every stage prompt.
//!
//! The loop recomputes this immediately before each Planner, Executor and
//! Replanner invocation so that every decision sees a consistent "now",
//! even in runs that span midnight. Stages never cache it.

/// Snapshot of the current date, time and year.
///
/// **Interaction**: the runner builds one per stage call via
/// [`TemporalContext::now`] and passes it down by reference; stages render
/// it into their prompts with [`TemporalContext::prompt_preamble`]. Tests
/// use [`TemporalContext::fixed`] for deterministic prompts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TemporalContext {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Wall-clock time, `HH:MM:SS` (24h).
    pub time: String,
    /// Calendar year, `YYYY`.
    pub year: String,
}

impl TemporalContext {
    /// Captures the local "now".
    pub fn now() -> Self {
        let now = chrono::Local::now();
        Self {
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            year: now.format("%Y").to_string(),
        }
    }

    /// Builds a fixed context for deterministic prompts in tests.
    pub fn fixed(
        date: impl Into<String>,
        time: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            year: year.into(),
        }
    }

    /// Renders the context as the prompt preamble shared by all stages.
    pub fn prompt_preamble(&self) -> String {
        format!(
            "Current date: {}. Current time: {}. Current year: {}.",
            self.date, self.time, self.year
        )
    }
}
