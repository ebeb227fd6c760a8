//! Eligibility checks for semester enrollment, project pitches and proposals, and mentor
//! applications.
//!
//! A [`Check`] runs its dependencies in order and then its own rule; the first unmet
//! condition wins and is reported as a [`CheckResult`] with a reason and, where one exists, a
//! fix the user can act on. Gates such as "can enroll" are composite checks built by
//! [`CheckCatalog`].

pub mod catalog;
pub mod check;
pub mod directory;
pub mod domain;
pub mod policy;
pub mod roster;
pub mod rules;
pub mod service;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use catalog::{default_catalog, CheckCatalog, Gate};
pub use check::{Check, CheckContext, CheckFailure, CheckResult, FailedCheck, Rule};
pub use directory::{DirectoryError, PortalDirectory};
pub use domain::{
    DeadlineKind, Enrollment, MentorApplication, Project, ProjectId, Semester, SemesterDeadlines,
    SemesterId, User, UserId, UserRole,
};
pub use policy::{DeadlineEnforcement, EligibilityPolicy};
pub use roster::{roster, write_roster_csv, RosterRow};
pub use service::{
    EligibilityReport, EligibilityRequest, EligibilityService, EligibilityServiceError,
};
pub use snapshot::{PortalSnapshot, SnapshotError};
