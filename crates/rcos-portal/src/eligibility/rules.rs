//! Leaf rules and the checks that wrap them.

use std::sync::Arc;

use super::check::{Check, CheckContext, CheckFailure, Rule};
use super::domain::{DeadlineKind, Semester, UserRole};
use super::policy::DeadlineEnforcement;

const DEADLINE_FORMAT: &str = "%-m/%-d %-I:%M %p";

struct Authenticated;

impl Rule for Authenticated {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        if !ctx.user.is_authenticated {
            return Err(check.fail(None, None));
        }
        Ok(())
    }
}

pub fn user_is_authenticated() -> Check {
    Check::new("user_is_authenticated")
        .with_fail_reason("You are not logged in.")
        .with_fix("Login!")
        .with_rule(Authenticated)
}

struct Approved;

impl Rule for Approved {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        if !ctx.user.is_approved {
            return Err(check.fail(None, None));
        }
        Ok(())
    }
}

pub fn user_approved(authenticated: Arc<Check>) -> Check {
    Check::new("user_approved")
        .with_fail_reason("Your account has not yet been approved.")
        .with_fix("Contact a Coordinator/Faculty Advisor to verify your identity.")
        .depends_on(authenticated)
        .with_rule(Approved)
}

struct ProfileComplete;

impl Rule for ProfileComplete {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        let user = ctx.user;
        let mut missing = Vec::new();
        if user.first_name.trim().is_empty() {
            missing.push("first name");
        }
        if user.last_name.trim().is_empty() {
            missing.push("last name");
        }
        if !user.has_discord() {
            missing.push("Discord account");
        }
        if !user.has_github() {
            missing.push("GitHub account");
        }

        if missing.is_empty() {
            return Ok(());
        }
        Err(check.fail(
            None,
            Some(format!(
                "On the profile page, enter your {}.",
                missing.join(", ")
            )),
        ))
    }
}

pub fn user_setup(approved: Arc<Check>) -> Check {
    Check::new("user_setup")
        .with_fail_reason("You have not completed your profile.")
        .with_fix(
            "On the profile page, fill out your details and link your GitHub and Discord accounts.",
        )
        .depends_on(approved)
        .with_rule(ProfileComplete)
}

struct Affiliated;

impl Rule for Affiliated {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        if ctx.user.role != UserRole::Rpi {
            return Err(check.fail(None, None));
        }
        Ok(())
    }
}

pub fn user_is_affiliated(approved: Arc<Check>) -> Check {
    Check::new("user_is_affiliated")
        .with_fail_reason("You are not an approved RPI student/faculty.")
        .depends_on(approved)
        .with_rule(Affiliated)
}

struct SemesterActive;

impl Rule for SemesterActive {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        let semester = required_semester(check, ctx)?;
        if !semester.is_active_at(ctx.now) {
            return Err(check.fail_because("Semester is not active."));
        }
        Ok(())
    }
}

pub fn semester_is_active() -> Check {
    Check::new("semester_is_active").with_rule(SemesterActive)
}

struct BeforeDeadline {
    kind: DeadlineKind,
    enforcement: DeadlineEnforcement,
}

impl Rule for BeforeDeadline {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        let Some(semester) = ctx.semester else {
            return Ok(());
        };

        if self.enforcement == DeadlineEnforcement::ActiveSemesterOnly
            && !semester.is_active_at(ctx.now)
        {
            return Ok(());
        }

        match semester.deadline(self.kind) {
            Some(deadline) if ctx.now > deadline => Err(check.fail_because(format!(
                "The {} deadline ({}) has passed.",
                self.kind.label(),
                deadline.format(DEADLINE_FORMAT)
            ))),
            _ => Ok(()),
        }
    }
}

pub fn before_semester_deadline(kind: DeadlineKind, enforcement: DeadlineEnforcement) -> Check {
    let name = match kind {
        DeadlineKind::Enrollment => "before_enrollment_deadline",
        DeadlineKind::ProjectPitch => "before_project_pitch_deadline",
        DeadlineKind::ProjectProposal => "before_project_proposal_deadline",
        DeadlineKind::MentorApplication => "before_mentor_application_deadline",
    };
    Check::new(name).with_rule(BeforeDeadline { kind, enforcement })
}

struct NotAlreadyEnrolled;

impl Rule for NotAlreadyEnrolled {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        let semester = required_semester(check, ctx)?;

        let owned = ctx.directory.owned_projects(&ctx.user.id)?;
        if owned.iter().any(|project| !project.is_approved) {
            return Err(check.fail_because("You have an unapproved project pending."));
        }

        let enrollment = ctx.directory.enrollment(&ctx.user.id, &semester.id)?;
        if enrollment.is_some_and(|enrollment| enrollment.project.is_some()) {
            return Err(check.fail(None, None));
        }
        Ok(())
    }
}

pub fn user_not_already_enrolled(semester_active: Arc<Check>) -> Check {
    Check::new("user_not_already_enrolled")
        .with_fail_reason("You're already enrolled on a project this semester.")
        .depends_on(semester_active)
        .with_rule(NotAlreadyEnrolled)
}

struct LeadOrOwner;

impl Rule for LeadOrOwner {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        let semester = required_semester(check, ctx)?;

        let Some(project) = ctx.project else {
            return Err(check.fail_because(format!(
                "You are not enrolled on a project for {semester}."
            )));
        };

        if project.is_owned_by(&ctx.user.id) {
            return Ok(());
        }

        let Some(enrollment) = ctx.directory.enrollment(&ctx.user.id, &semester.id)? else {
            return Err(check.fail_because(format!("You are not enrolled for {semester}.")));
        };

        if enrollment.leads(&project.id) {
            return Ok(());
        }
        Err(check.fail_because(format!(
            "You are not the owner or a current project lead of {project} for {semester}."
        )))
    }
}

pub fn user_is_project_lead_or_owner() -> Check {
    Check::new("user_is_project_lead_or_owner").with_rule(LeadOrOwner)
}

pub(crate) struct NoPriorMentorApplication;

impl Rule for NoPriorMentorApplication {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        let semester = required_semester(check, ctx)?;
        if ctx
            .directory
            .mentor_application(&ctx.user.id, &semester.id)?
            .is_some()
        {
            return Err(check.fail_because("You already applied to be a Mentor this semester."));
        }
        Ok(())
    }
}

struct LeadershipRole;

impl Rule for LeadershipRole {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        let semester = required_semester(check, ctx)?;
        let enrollment = ctx.directory.enrollment(&ctx.user.id, &semester.id)?;
        if enrollment.is_some_and(|enrollment| enrollment.holds_leadership_role()) {
            return Ok(());
        }
        Err(check.fail(None, None))
    }
}

pub fn user_has_leadership_role(semester_active: Arc<Check>) -> Check {
    Check::new("user_has_leadership_role")
        .with_fail_reason("You are not a Mentor, Coordinator, or Faculty Advisor this semester.")
        .depends_on(semester_active)
        .with_rule(LeadershipRole)
}

fn required_semester<'a>(
    check: &Check,
    ctx: &CheckContext<'a>,
) -> Result<&'a Semester, CheckFailure> {
    ctx.semester
        .ok_or_else(|| check.fail_because("No semester found."))
}
