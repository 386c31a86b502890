use serde::Serialize;

/// Duration of one named stage, in milliseconds.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

/// Stage timings in the order they ran, plus the wall time of the call.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming {
            label: label.into(),
            elapsed_ms,
        });
    }

    /// Copy the stages of a nested call under `prefix/`.
    pub fn extend_prefixed(&mut self, prefix: &str, nested: &TimingBreakdown) {
        self.stages
            .extend(nested.stages.iter().map(|s| StageTiming {
                label: format!("{prefix}/{}", s.label),
                elapsed_ms: s.elapsed_ms,
            }));
    }
}
