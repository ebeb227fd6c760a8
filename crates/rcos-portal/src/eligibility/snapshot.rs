use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::directory::{DirectoryError, PortalDirectory};
use super::domain::{
    Enrollment, MentorApplication, Project, ProjectId, Semester, SemesterId, User, UserId,
};

/// In-memory portal read model, typically loaded from a JSON export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub semesters: Vec<Semester>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
    #[serde(default)]
    pub mentor_applications: Vec<MentorApplication>,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("unable to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl PortalSnapshot {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl PortalDirectory for PortalSnapshot {
    fn user(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.iter().find(|user| &user.id == id).cloned())
    }

    fn users(&self) -> Result<Vec<User>, DirectoryError> {
        Ok(self.users.clone())
    }

    fn semester(&self, id: &SemesterId) -> Result<Option<Semester>, DirectoryError> {
        Ok(self
            .semesters
            .iter()
            .find(|semester| &semester.id == id)
            .cloned())
    }

    fn semesters(&self) -> Result<Vec<Semester>, DirectoryError> {
        Ok(self.semesters.clone())
    }

    fn project(&self, id: &ProjectId) -> Result<Option<Project>, DirectoryError> {
        Ok(self.projects.iter().find(|project| &project.id == id).cloned())
    }

    fn owned_projects(&self, owner: &UserId) -> Result<Vec<Project>, DirectoryError> {
        Ok(self
            .projects
            .iter()
            .filter(|project| project.is_owned_by(owner))
            .cloned()
            .collect())
    }

    fn enrollment(
        &self,
        user: &UserId,
        semester: &SemesterId,
    ) -> Result<Option<Enrollment>, DirectoryError> {
        let mut matches = self
            .enrollments
            .iter()
            .filter(|enrollment| &enrollment.user == user && &enrollment.semester == semester);

        let first = matches.next().cloned();
        if matches.next().is_some() {
            return Err(DirectoryError::DuplicateEnrollment {
                user: user.clone(),
                semester: semester.clone(),
            });
        }
        Ok(first)
    }

    fn mentor_application(
        &self,
        user: &UserId,
        semester: &SemesterId,
    ) -> Result<Option<MentorApplication>, DirectoryError> {
        Ok(self
            .mentor_applications
            .iter()
            .find(|application| &application.user == user && &application.semester == semester)
            .cloned())
    }
}
