use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::eligibility::directory::{DirectoryError, PortalDirectory};
use crate::eligibility::domain::{
    Enrollment, MentorApplication, Project, ProjectId, Semester, SemesterDeadlines, SemesterId,
    User, UserId, UserRole,
};
use crate::eligibility::snapshot::PortalSnapshot;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 15, 15, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn semester() -> Semester {
    Semester {
        id: SemesterId("202409".to_string()),
        name: "Fall 2024".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 9, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 20).expect("valid date"),
        is_active: None,
        deadlines: SemesterDeadlines {
            enrollment: Some(now() + Duration::days(1)),
            project_pitch: Some(now() + Duration::days(2)),
            project_proposal: Some(now() + Duration::days(3)),
            mentor_application: Some(now() + Duration::days(1)),
        },
    }
}

pub(super) fn past_semester() -> Semester {
    Semester {
        id: SemesterId("202401".to_string()),
        name: "Spring 2024".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 8).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2024, 4, 24).expect("valid date"),
        is_active: None,
        deadlines: SemesterDeadlines::default(),
    }
}

pub(super) fn member() -> User {
    User {
        id: UserId("alice".to_string()),
        email: "alice@rpi.edu".to_string(),
        is_authenticated: true,
        is_approved: true,
        role: UserRole::Rpi,
        first_name: "Alice".to_string(),
        last_name: "Liddell".to_string(),
        discord_user_id: Some("100200300".to_string()),
        github_username: Some("alice-l".to_string()),
    }
}

pub(super) fn external_member() -> User {
    User {
        id: UserId("bob".to_string()),
        email: "bob@example.com".to_string(),
        role: UserRole::External,
        first_name: "Bob".to_string(),
        last_name: "Builder".to_string(),
        discord_user_id: Some("400500600".to_string()),
        github_username: Some("bob-b".to_string()),
        ..member()
    }
}

pub(super) fn project(owner: Option<&str>) -> Project {
    Project {
        id: ProjectId("portal".to_string()),
        name: "Portal".to_string(),
        owner: owner.map(|id| UserId(id.to_string())),
        is_approved: true,
    }
}

pub(super) fn enrollment(user: &str, project: Option<&str>) -> Enrollment {
    Enrollment {
        user: UserId(user.to_string()),
        semester: semester().id,
        project: project.map(|id| ProjectId(id.to_string())),
        is_project_lead: false,
        is_mentor: false,
        is_coordinator: false,
        is_faculty_advisor: false,
    }
}

pub(super) fn mentor_application(user: &str) -> MentorApplication {
    MentorApplication {
        user: UserId(user.to_string()),
        semester: semester().id,
    }
}

pub(super) fn snapshot() -> PortalSnapshot {
    PortalSnapshot {
        users: vec![member(), external_member()],
        semesters: vec![past_semester(), semester()],
        projects: vec![project(Some("carol"))],
        enrollments: Vec::new(),
        mentor_applications: Vec::new(),
    }
}

/// Directory whose record lookups work but whose relationship queries are unavailable.
pub(super) struct FlakyDirectory {
    pub(super) inner: PortalSnapshot,
}

impl FlakyDirectory {
    fn unavailable() -> DirectoryError {
        DirectoryError::Unavailable("connection reset".to_string())
    }
}

impl PortalDirectory for FlakyDirectory {
    fn user(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        self.inner.user(id)
    }

    fn users(&self) -> Result<Vec<User>, DirectoryError> {
        self.inner.users()
    }

    fn semester(&self, id: &SemesterId) -> Result<Option<Semester>, DirectoryError> {
        self.inner.semester(id)
    }

    fn semesters(&self) -> Result<Vec<Semester>, DirectoryError> {
        self.inner.semesters()
    }

    fn project(&self, id: &ProjectId) -> Result<Option<Project>, DirectoryError> {
        self.inner.project(id)
    }

    fn owned_projects(&self, _owner: &UserId) -> Result<Vec<Project>, DirectoryError> {
        Err(Self::unavailable())
    }

    fn enrollment(
        &self,
        _user: &UserId,
        _semester: &SemesterId,
    ) -> Result<Option<Enrollment>, DirectoryError> {
        Err(Self::unavailable())
    }

    fn mentor_application(
        &self,
        _user: &UserId,
        _semester: &SemesterId,
    ) -> Result<Option<MentorApplication>, DirectoryError> {
        Err(Self::unavailable())
    }
}
