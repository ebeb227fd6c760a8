use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::Gate;
use super::directory::PortalDirectory;
use super::domain::SemesterId;
use super::service::{EligibilityRequest, EligibilityService, EligibilityServiceError};

/// One user's standing for a gate, flattened for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub user_id: String,
    pub email: String,
    pub passed: bool,
    pub fail_reason: String,
    pub fix: String,
}

/// Evaluate `gate` for every user in the directory, ordered by user id.
pub fn roster<D>(
    service: &EligibilityService<D>,
    gate: Gate,
    semester: Option<SemesterId>,
    at: Option<DateTime<Utc>>,
) -> Result<Vec<RosterRow>, EligibilityServiceError>
where
    D: PortalDirectory + 'static,
{
    let at = Some(at.unwrap_or_else(Utc::now));
    let mut users = service.directory().users()?;
    users.sort_by(|left, right| left.id.cmp(&right.id));

    let mut rows = Vec::with_capacity(users.len());
    for user in users {
        let request = EligibilityRequest {
            gate,
            user: user.id.clone(),
            semester: semester.clone(),
            project: None,
            at,
        };
        let report = service.evaluate(&request)?;
        rows.push(RosterRow {
            user_id: user.id.0,
            email: user.email,
            passed: report.result.passed,
            fail_reason: report.result.fail_reason,
            fix: report.result.fix,
        });
    }

    Ok(rows)
}

pub fn write_roster_csv<W: Write>(rows: &[RosterRow], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
