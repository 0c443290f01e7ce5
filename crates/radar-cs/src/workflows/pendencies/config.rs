use serde::{Deserialize, Serialize};

use super::domain::CRITICAL_STATUS;

/// Knobs for the pendency engine. Day thresholds are product policy and stay
/// fixed in the rules themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendencyConfig {
    /// Scores the platform assigns before anyone has evaluated the account.
    pub default_score_sentinels: Vec<u8>,
    pub critical_status: String,
}

impl Default for PendencyConfig {
    fn default() -> Self {
        Self {
            default_score_sentinels: vec![0, 75],
            critical_status: CRITICAL_STATUS.to_string(),
        }
    }
}

impl PendencyConfig {
    /// Exact match only: 75.5 is a real evaluation, 75 is the placeholder.
    pub fn is_default_score(&self, score: Option<f64>) -> bool {
        match score {
            None => true,
            Some(score) => self
                .default_score_sentinels
                .iter()
                .any(|sentinel| f64::from(*sentinel) == score),
        }
    }
}
