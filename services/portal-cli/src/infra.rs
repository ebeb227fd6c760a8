use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rcos_portal::config::AppConfig;
use rcos_portal::eligibility::{CheckCatalog, EligibilityService, Gate, PortalSnapshot};
use rcos_portal::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub(crate) fn load_service(
    snapshot: Option<PathBuf>,
    config: &AppConfig,
) -> Result<EligibilityService<PortalSnapshot>, AppError> {
    let path = snapshot.or_else(|| config.snapshot.clone()).ok_or_else(|| {
        AppError::Usage("no snapshot given; pass --snapshot or set APP_SNAPSHOT".to_string())
    })?;

    let snapshot = PortalSnapshot::load(&path)?;
    info!(
        path = %path.display(),
        users = snapshot.users.len(),
        semesters = snapshot.semesters.len(),
        "portal snapshot loaded"
    );

    Ok(EligibilityService::new(
        Arc::new(snapshot),
        Arc::new(CheckCatalog::new(config.eligibility)),
    ))
}

pub(crate) fn parse_gate(raw: &str) -> Result<Gate, String> {
    Gate::from_slug(raw).ok_or_else(|| {
        let known: Vec<&str> = Gate::ALL.iter().map(|gate| gate.slug()).collect();
        format!("unknown gate '{raw}' (expected one of: {})", known.join(", "))
    })
}

/// Accepts RFC 3339 instants, `YYYY-MM-DDTHH:MM` (UTC), or a bare date (midnight UTC).
pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as an RFC 3339 instant or YYYY-MM-DD"))
}
