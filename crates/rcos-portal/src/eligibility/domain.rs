use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for portal users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Semester identifier in `YYYYMM` form, e.g. `202209`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SemesterId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SemesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a member is affiliated with RPI or joins from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Rpi,
    External,
}

/// Portal account as seen by the eligibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default = "authenticated_by_default")]
    pub is_authenticated: bool,
    #[serde(default)]
    pub is_approved: bool,
    pub role: UserRole,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub discord_user_id: Option<String>,
    #[serde(default)]
    pub github_username: Option<String>,
}

fn authenticated_by_default() -> bool {
    true
}

impl User {
    /// A visitor without a session.
    pub fn anonymous() -> Self {
        Self {
            id: UserId("anonymous".to_string()),
            email: String::new(),
            is_authenticated: false,
            is_approved: false,
            role: UserRole::External,
            first_name: String::new(),
            last_name: String::new(),
            discord_user_id: None,
            github_username: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn has_discord(&self) -> bool {
        is_present(self.discord_user_id.as_deref())
    }

    pub fn has_github(&self) -> bool {
        is_present(self.github_username.as_deref())
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.map(|inner| !inner.trim().is_empty()).unwrap_or(false)
}

/// Named semester deadlines; every one is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterDeadlines {
    #[serde(default)]
    pub enrollment: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_pitch: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_proposal: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mentor_application: Option<DateTime<Utc>>,
}

/// Deadlines a check can be parametrized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    Enrollment,
    ProjectPitch,
    ProjectProposal,
    MentorApplication,
}

impl DeadlineKind {
    pub const ALL: [DeadlineKind; 4] = [
        DeadlineKind::Enrollment,
        DeadlineKind::ProjectPitch,
        DeadlineKind::ProjectProposal,
        DeadlineKind::MentorApplication,
    ];

    /// Human label used in failure messages.
    pub const fn label(self) -> &'static str {
        match self {
            DeadlineKind::Enrollment => "enrollment",
            DeadlineKind::ProjectPitch => "project pitch",
            DeadlineKind::ProjectProposal => "project proposal",
            DeadlineKind::MentorApplication => "mentor application",
        }
    }

    pub fn read(self, deadlines: &SemesterDeadlines) -> Option<DateTime<Utc>> {
        match self {
            DeadlineKind::Enrollment => deadlines.enrollment,
            DeadlineKind::ProjectPitch => deadlines.project_pitch,
            DeadlineKind::ProjectProposal => deadlines.project_proposal,
            DeadlineKind::MentorApplication => deadlines.mentor_application,
        }
    }
}

/// Academic term with its activity window and deadlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub id: SemesterId,
    pub name: String,
    /// First day of the semester (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the semester (inclusive).
    pub end_date: NaiveDate,
    /// Explicit activity flag; overrides the date window when set.
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub deadlines: SemesterDeadlines,
}

impl Semester {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if let Some(flag) = self.is_active {
            return flag;
        }
        let today = now.date_naive();
        self.start_date <= today && today <= self.end_date
    }

    pub fn deadline(&self, kind: DeadlineKind) -> Option<DateTime<Utc>> {
        kind.read(&self.deadlines)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub owner: Option<UserId>,
    #[serde(default)]
    pub is_approved: bool,
}

impl Project {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner.as_ref() == Some(user)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Links a user to a semester and optionally a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub user: UserId,
    pub semester: SemesterId,
    #[serde(default)]
    pub project: Option<ProjectId>,
    #[serde(default)]
    pub is_project_lead: bool,
    #[serde(default)]
    pub is_mentor: bool,
    #[serde(default)]
    pub is_coordinator: bool,
    #[serde(default)]
    pub is_faculty_advisor: bool,
}

impl Enrollment {
    pub fn leads(&self, project: &ProjectId) -> bool {
        self.is_project_lead && self.project.as_ref() == Some(project)
    }

    pub fn holds_leadership_role(&self) -> bool {
        self.is_mentor || self.is_coordinator || self.is_faculty_advisor
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorApplication {
    pub user: UserId,
    pub semester: SemesterId,
}
