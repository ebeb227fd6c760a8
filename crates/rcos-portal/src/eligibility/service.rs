use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::{CheckCatalog, Gate};
use super::check::{CheckContext, CheckResult};
use super::directory::{DirectoryError, PortalDirectory};
use super::domain::{ProjectId, SemesterId, UserId};

/// What to evaluate: a gate for one user, optionally pinned to a semester, project and instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRequest {
    pub gate: Gate,
    pub user: UserId,
    #[serde(default)]
    pub semester: Option<SemesterId>,
    #[serde(default)]
    pub project: Option<ProjectId>,
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

impl EligibilityRequest {
    pub fn new(gate: Gate, user: UserId) -> Self {
        Self {
            gate,
            user,
            semester: None,
            project: None,
            at: None,
        }
    }
}

/// Result of running a gate, with enough context to render a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub gate: Gate,
    pub user: UserId,
    pub semester: Option<SemesterId>,
    pub evaluated_at: DateTime<Utc>,
    pub result: CheckResult,
}

impl EligibilityReport {
    pub fn passed(&self) -> bool {
        self.result.passed
    }

    /// Message a view would flash to the user.
    pub fn message(&self) -> String {
        if self.result.passed {
            return format!("You are eligible to {}.", self.gate.slug().replace('-', " "));
        }
        format!("{}: {}", self.gate.denial_prefix(), self.result)
    }
}

/// Resolves portal records and runs gate checks against them.
pub struct EligibilityService<D> {
    directory: Arc<D>,
    catalog: Arc<CheckCatalog>,
}

impl<D> EligibilityService<D>
where
    D: PortalDirectory + 'static,
{
    pub fn new(directory: Arc<D>, catalog: Arc<CheckCatalog>) -> Self {
        Self { directory, catalog }
    }

    pub fn catalog(&self) -> &CheckCatalog {
        &self.catalog
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Evaluate a gate.
    ///
    /// Without an explicit semester the active semester at the evaluation instant is used; if
    /// none is active the checks see no semester at all. Unknown ids are errors, not
    /// ineligibility.
    pub fn evaluate(
        &self,
        request: &EligibilityRequest,
    ) -> Result<EligibilityReport, EligibilityServiceError> {
        let now = request.at.unwrap_or_else(Utc::now);
        let directory: &D = &self.directory;

        let user = directory
            .user(&request.user)?
            .ok_or_else(|| EligibilityServiceError::UnknownUser(request.user.clone()))?;

        let semester = match &request.semester {
            Some(id) => Some(
                directory
                    .semester(id)?
                    .ok_or_else(|| EligibilityServiceError::UnknownSemester(id.clone()))?,
            ),
            None => directory.active_semester(now)?,
        };

        let project = match &request.project {
            Some(id) => Some(
                directory
                    .project(id)?
                    .ok_or_else(|| EligibilityServiceError::UnknownProject(id.clone()))?,
            ),
            None => None,
        };

        let ctx = CheckContext::new(&user, directory)
            .with_semester(semester.as_ref())
            .with_project(project.as_ref())
            .at(now);

        let result = self.catalog.gate(request.gate).check(&ctx)?;

        info!(
            gate = %request.gate,
            user = %user.id,
            semester = semester.as_ref().map(|semester| semester.id.0.as_str()).unwrap_or("-"),
            passed = result.passed,
            "eligibility evaluated"
        );

        Ok(EligibilityReport {
            gate: request.gate,
            user: user.id,
            semester: semester.map(|semester| semester.id),
            evaluated_at: now,
            result,
        })
    }
}

/// Error raised by the eligibility service.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityServiceError {
    #[error("no user with id {0}")]
    UnknownUser(UserId),
    #[error("no semester with id {0}")]
    UnknownSemester(SemesterId),
    #[error("no project with id {0}")]
    UnknownProject(ProjectId),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
