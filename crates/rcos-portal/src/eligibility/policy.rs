use serde::{Deserialize, Serialize};

/// Whether deadline checks look at the deadline when the semester is not active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeadlineEnforcement {
    /// Deadlines are compared against "now" unconditionally.
    #[default]
    Always,
    /// Deadlines pass without inspection unless an active semester is supplied.
    ActiveSemesterOnly,
}

impl DeadlineEnforcement {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Some(Self::Always),
            "active-semester" | "active_semester" | "active" => Some(Self::ActiveSemesterOnly),
            _ => None,
        }
    }
}

/// Knobs controlling how the gate checks are composed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub deadline_enforcement: DeadlineEnforcement,
    /// Require an RPI role before a user may enroll.
    pub enrollment_requires_affiliation: bool,
}
