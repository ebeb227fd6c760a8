use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::directory::{DirectoryError, PortalDirectory};
use super::domain::{Project, Semester, User};

/// Fallback reason for checks that never configure their own.
pub const DEFAULT_FAIL_REASON: &str = "You are not eligible to do this at this time.";

/// Everything a check may look at while evaluating.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    pub user: &'a User,
    pub semester: Option<&'a Semester>,
    pub project: Option<&'a Project>,
    pub now: DateTime<Utc>,
    pub directory: &'a dyn PortalDirectory,
}

impl<'a> CheckContext<'a> {
    /// Context for `user` evaluated at the current instant, with no semester or project.
    pub fn new(user: &'a User, directory: &'a dyn PortalDirectory) -> Self {
        Self {
            user,
            semester: None,
            project: None,
            now: Utc::now(),
            directory,
        }
    }

    pub fn with_semester(mut self, semester: Option<&'a Semester>) -> Self {
        self.semester = semester;
        self
    }

    pub fn with_project(mut self, project: Option<&'a Project>) -> Self {
        self.project = project;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

impl fmt::Debug for CheckContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("user", &self.user.id)
            .field("semester", &self.semester.map(|semester| &semester.id))
            .field("project", &self.project.map(|project| &project.id))
            .field("now", &self.now)
            .finish()
    }
}

/// An unmet condition: what went wrong and, when known, how to fix it.
///
/// Only [`Check::fail`] creates these; [`Check::check`] turns them into a [`CheckResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCheck {
    reason: String,
    fix: Option<String>,
}

impl FailedCheck {
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn fix(&self) -> Option<&str> {
        self.fix.as_deref()
    }
}

/// Why `run` stopped early.
#[derive(Debug)]
pub enum CheckFailure {
    Ineligible(FailedCheck),
    Lookup(DirectoryError),
}

impl From<FailedCheck> for CheckFailure {
    fn from(value: FailedCheck) -> Self {
        Self::Ineligible(value)
    }
}

impl From<DirectoryError> for CheckFailure {
    fn from(value: DirectoryError) -> Self {
        Self::Lookup(value)
    }
}

/// The check-specific logic that runs once every dependency has passed.
pub trait Rule: Send + Sync {
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure>;
}

struct FnRule<F>(F);

impl<F> Rule for FnRule<F>
where
    F: Fn(&Check, &CheckContext<'_>) -> Result<(), CheckFailure> + Send + Sync,
{
    fn evaluate(&self, check: &Check, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        (self.0)(check, ctx)
    }
}

/// A named eligibility rule with ordered dependencies.
///
/// Evaluation is `dep_1 AND ... AND dep_n AND rule`, short-circuiting left to right. Checks
/// are immutable once built and are shared between gates through `Arc`.
pub struct Check {
    name: &'static str,
    fail_reason: &'static str,
    fix: Option<&'static str>,
    dependencies: Vec<Arc<Check>>,
    rule: Option<Box<dyn Rule>>,
}

impl Check {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fail_reason: DEFAULT_FAIL_REASON,
            fix: None,
            dependencies: Vec::new(),
            rule: None,
        }
    }

    pub fn with_fail_reason(mut self, fail_reason: &'static str) -> Self {
        self.fail_reason = fail_reason;
        self
    }

    pub fn with_fix(mut self, fix: &'static str) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn depends_on(mut self, dependency: Arc<Check>) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_dependencies<I>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = Arc<Check>>,
    {
        self.dependencies.extend(dependencies);
        self
    }

    pub fn with_rule<R>(mut self, rule: R) -> Self
    where
        R: Rule + 'static,
    {
        self.rule = Some(Box::new(rule));
        self
    }

    pub fn with_rule_fn<F>(self, rule: F) -> Self
    where
        F: Fn(&Check, &CheckContext<'_>) -> Result<(), CheckFailure> + Send + Sync + 'static,
    {
        self.with_rule(FnRule(rule))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fail_reason(&self) -> &'static str {
        self.fail_reason
    }

    pub fn fix(&self) -> Option<&'static str> {
        self.fix
    }

    pub fn dependencies(&self) -> &[Arc<Check>] {
        &self.dependencies
    }

    /// Build the failure for this check, falling back to the configured reason and fix.
    pub fn fail(&self, reason: Option<String>, fix: Option<String>) -> CheckFailure {
        CheckFailure::Ineligible(FailedCheck {
            reason: reason.unwrap_or_else(|| self.fail_reason.to_string()),
            fix: fix.or_else(|| self.fix.map(str::to_string)),
        })
    }

    pub fn fail_because(&self, reason: impl Into<String>) -> CheckFailure {
        self.fail(Some(reason.into()), None)
    }

    /// Evaluate dependencies in order, then this check's own rule.
    pub fn run(&self, ctx: &CheckContext<'_>) -> Result<(), CheckFailure> {
        for dependency in &self.dependencies {
            dependency.run(ctx)?;
        }

        trace!(check = self.name, user = %ctx.user.id, "evaluating rule");
        match &self.rule {
            Some(rule) => rule.evaluate(self, ctx),
            None => Ok(()),
        }
    }

    /// Run the check and report the outcome as a value.
    ///
    /// Ineligibility is never an `Err`; only directory lookup failures are.
    pub fn check(&self, ctx: &CheckContext<'_>) -> Result<CheckResult, DirectoryError> {
        match self.run(ctx) {
            Ok(()) => Ok(CheckResult::pass()),
            Err(CheckFailure::Ineligible(failed)) => {
                debug!(
                    check = self.name,
                    user = %ctx.user.id,
                    reason = %failed.reason,
                    "eligibility check failed"
                );
                Ok(CheckResult::from(failed))
            }
            Err(CheckFailure::Lookup(err)) => Err(err),
        }
    }

    pub fn passes(&self, ctx: &CheckContext<'_>) -> Result<bool, DirectoryError> {
        Ok(self.check(ctx)?.passed)
    }

    /// Pre-order listing of this check and its dependency tree as `(depth, name)` pairs.
    pub fn outline(&self) -> Vec<(usize, &'static str)> {
        let mut lines = Vec::new();
        self.collect_outline(0, &mut lines);
        lines
    }

    fn collect_outline(&self, depth: usize, lines: &mut Vec<(usize, &'static str)>) {
        lines.push((depth, self.name));
        for dependency in &self.dependencies {
            dependency.collect_outline(depth + 1, lines);
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("fail_reason", &self.fail_reason)
            .field("fix", &self.fix)
            .field(
                "dependencies",
                &self
                    .dependencies
                    .iter()
                    .map(|dependency| dependency.name)
                    .collect::<Vec<_>>(),
            )
            .field("has_rule", &self.rule.is_some())
            .finish()
    }
}

/// Outcome of [`Check::check`], suitable for rendering straight to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,
    pub fail_reason: String,
    pub fix: String,
}

impl CheckResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            fail_reason: String::new(),
            fix: String::new(),
        }
    }
}

impl From<FailedCheck> for CheckResult {
    fn from(value: FailedCheck) -> Self {
        Self {
            passed: false,
            fail_reason: value.reason,
            fix: value.fix.unwrap_or_default(),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fail_reason)?;
        if !self.fix.is_empty() {
            write!(f, " {}", self.fix)?;
        }
        Ok(())
    }
}
