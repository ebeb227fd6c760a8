use chrono::{DateTime, Utc};

use super::domain::{
    Enrollment, MentorApplication, Project, ProjectId, Semester, SemesterId, User, UserId,
};

/// Read-only access to the portal records the checks reason about.
///
/// Implementations must not mutate anything; checks call these lookups while evaluating.
pub trait PortalDirectory: Send + Sync {
    fn user(&self, id: &UserId) -> Result<Option<User>, DirectoryError>;
    fn users(&self) -> Result<Vec<User>, DirectoryError>;
    fn semester(&self, id: &SemesterId) -> Result<Option<Semester>, DirectoryError>;
    fn semesters(&self) -> Result<Vec<Semester>, DirectoryError>;
    fn project(&self, id: &ProjectId) -> Result<Option<Project>, DirectoryError>;
    fn owned_projects(&self, owner: &UserId) -> Result<Vec<Project>, DirectoryError>;
    fn enrollment(
        &self,
        user: &UserId,
        semester: &SemesterId,
    ) -> Result<Option<Enrollment>, DirectoryError>;
    fn mentor_application(
        &self,
        user: &UserId,
        semester: &SemesterId,
    ) -> Result<Option<MentorApplication>, DirectoryError>;

    /// First semester whose window contains `now`, in directory order.
    fn active_semester(&self, now: DateTime<Utc>) -> Result<Option<Semester>, DirectoryError> {
        Ok(self
            .semesters()?
            .into_iter()
            .find(|semester| semester.is_active_at(now)))
    }
}

/// Lookup failures. These are infrastructure errors and never count as ineligibility.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
    #[error("duplicate enrollment for user {user} in semester {semester}")]
    DuplicateEnrollment { user: UserId, semester: SemesterId },
}
