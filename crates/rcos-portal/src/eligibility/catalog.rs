use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use super::check::Check;
use super::domain::DeadlineKind;
use super::policy::EligibilityPolicy;
use super::rules::{self, NoPriorMentorApplication};

/// User-facing permissions backed by a composite check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gate {
    Enroll,
    ProposeProject,
    PitchProject,
    SubmitProposal,
    ApplyAsMentor,
    ScheduleWorkshop,
}

impl Gate {
    pub const ALL: [Gate; 6] = [
        Gate::Enroll,
        Gate::ProposeProject,
        Gate::PitchProject,
        Gate::SubmitProposal,
        Gate::ApplyAsMentor,
        Gate::ScheduleWorkshop,
    ];

    pub const fn slug(self) -> &'static str {
        match self {
            Gate::Enroll => "enroll",
            Gate::ProposeProject => "propose-project",
            Gate::PitchProject => "pitch-project",
            Gate::SubmitProposal => "submit-proposal",
            Gate::ApplyAsMentor => "apply-as-mentor",
            Gate::ScheduleWorkshop => "schedule-workshop",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|gate| gate.slug() == normalized)
    }

    /// Lead-in for messages shown when the gate denies a user.
    pub const fn denial_prefix(self) -> &'static str {
        match self {
            Gate::Enroll => "You are not currently eligible to enroll",
            Gate::ProposeProject => "You are not currently eligible to propose new projects",
            Gate::PitchProject => "You are not currently eligible to pitch this project",
            Gate::SubmitProposal => {
                "You are not currently eligible to submit a proposal for this project"
            }
            Gate::ApplyAsMentor => "You are not currently eligible to apply as a Mentor",
            Gate::ScheduleWorkshop => "You are not currently eligible to schedule meetings",
        }
    }

    /// Whether the gate only makes sense with a project in context.
    pub const fn requires_project(self) -> bool {
        matches!(self, Gate::PitchProject | Gate::SubmitProposal)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Every gate composed from one shared set of leaf checks.
#[derive(Debug)]
pub struct CheckCatalog {
    policy: EligibilityPolicy,
    enroll: Arc<Check>,
    propose_project: Arc<Check>,
    pitch_project: Arc<Check>,
    submit_proposal: Arc<Check>,
    apply_as_mentor: Arc<Check>,
    schedule_workshop: Arc<Check>,
}

impl CheckCatalog {
    pub fn new(policy: EligibilityPolicy) -> Self {
        let enforcement = policy.deadline_enforcement;

        let authenticated = Arc::new(rules::user_is_authenticated());
        let approved = Arc::new(rules::user_approved(authenticated));
        let setup = Arc::new(rules::user_setup(approved.clone()));
        let affiliated = Arc::new(rules::user_is_affiliated(approved));
        let semester_active = Arc::new(rules::semester_is_active());
        let not_enrolled = Arc::new(rules::user_not_already_enrolled(
            semester_active.clone(),
        ));
        let lead_or_owner = Arc::new(rules::user_is_project_lead_or_owner());
        let leadership = Arc::new(rules::user_has_leadership_role(semester_active.clone()));

        let deadline = |kind| Arc::new(rules::before_semester_deadline(kind, enforcement));
        let enrollment_deadline = deadline(DeadlineKind::Enrollment);
        let pitch_deadline = deadline(DeadlineKind::ProjectPitch);
        let proposal_deadline = deadline(DeadlineKind::ProjectProposal);
        let mentor_deadline = deadline(DeadlineKind::MentorApplication);

        let mut enroll_dependencies = vec![setup.clone()];
        if policy.enrollment_requires_affiliation {
            enroll_dependencies.push(affiliated.clone());
        }
        enroll_dependencies.push(semester_active.clone());
        enroll_dependencies.push(enrollment_deadline);
        let enroll = Check::new("user_can_enroll").with_dependencies(enroll_dependencies);

        let propose_project = Check::new("user_can_propose_project")
            .with_fail_reason("You are not eligible to create projects at this time.")
            .with_dependencies([
                setup.clone(),
                semester_active.clone(),
                not_enrolled,
                pitch_deadline.clone(),
            ]);

        let pitch_project = Check::new("user_can_pitch_project").with_dependencies([
            setup.clone(),
            semester_active.clone(),
            pitch_deadline,
            lead_or_owner.clone(),
        ]);

        let submit_proposal = Check::new("user_can_submit_proposal").with_dependencies([
            setup.clone(),
            semester_active.clone(),
            proposal_deadline,
            lead_or_owner,
        ]);

        let apply_as_mentor = Check::new("user_can_apply_as_mentor")
            .with_dependencies([
                setup.clone(),
                affiliated,
                semester_active.clone(),
                mentor_deadline,
            ])
            .with_rule(NoPriorMentorApplication);

        let schedule_workshop = Check::new("user_can_schedule_workshop").with_dependencies([
            setup,
            semester_active,
            leadership,
        ]);

        Self {
            policy,
            enroll: Arc::new(enroll),
            propose_project: Arc::new(propose_project),
            pitch_project: Arc::new(pitch_project),
            submit_proposal: Arc::new(submit_proposal),
            apply_as_mentor: Arc::new(apply_as_mentor),
            schedule_workshop: Arc::new(schedule_workshop),
        }
    }

    pub fn policy(&self) -> EligibilityPolicy {
        self.policy
    }

    pub fn gate(&self, gate: Gate) -> &Arc<Check> {
        match gate {
            Gate::Enroll => &self.enroll,
            Gate::ProposeProject => &self.propose_project,
            Gate::PitchProject => &self.pitch_project,
            Gate::SubmitProposal => &self.submit_proposal,
            Gate::ApplyAsMentor => &self.apply_as_mentor,
            Gate::ScheduleWorkshop => &self.schedule_workshop,
        }
    }
}

impl Default for CheckCatalog {
    fn default() -> Self {
        Self::new(EligibilityPolicy::default())
    }
}

/// Process-wide catalog built with the default policy on first use.
pub fn default_catalog() -> &'static CheckCatalog {
    static CATALOG: OnceLock<CheckCatalog> = OnceLock::new();
    CATALOG.get_or_init(CheckCatalog::default)
}
