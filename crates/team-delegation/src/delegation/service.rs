use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{AssignmentInsight, Member};
use super::engine::{AssignmentEngine, AssignmentPlan, EngineConfig};
use super::intake::{IntakeError, MemberForm, ProjectForm};
use super::roster::{DecisionRecord, RosterError, RosterRepository};

/// Service composing intake validation, the roster repository, and the engine.
pub struct DelegationService<R> {
    repository: Arc<R>,
    engine: Arc<AssignmentEngine>,
}

impl<R> DelegationService<R>
where
    R: RosterRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EngineConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(AssignmentEngine::from_config(config)),
        }
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.engine
    }

    /// Validate and store a new member.
    pub fn add_member(&self, form: MemberForm) -> Result<Member, DelegationServiceError> {
        let member = form.into_member()?;
        let stored = self.repository.add_member(member)?;
        info!(member = %stored.name(), "member added to roster");
        Ok(stored)
    }

    pub fn members(&self) -> Result<Vec<Member>, DelegationServiceError> {
        Ok(self.repository.members()?)
    }

    /// Replace the roster wholesale, e.g. from an import or demo dataset.
    pub fn seed(&self, members: Vec<Member>) -> Result<(), DelegationServiceError> {
        let count = members.len();
        self.repository.replace_members(members)?;
        info!(count, "roster seeded");
        Ok(())
    }

    /// Evaluate a project against the current roster and remember the decision.
    pub fn evaluate(&self, form: ProjectForm) -> Result<DecisionRecord, DelegationServiceError> {
        let demand = form.into_demand()?;
        let members = self.non_empty_roster()?;

        let decision = self.engine.evaluate(&demand, &members);
        info!(
            project = %demand.project_name,
            assignee = decision.assignee().unwrap_or("none"),
            "project evaluated"
        );

        let record = DecisionRecord {
            decision,
            recorded_at: Utc::now(),
            committed: false,
        };
        self.repository.record_decision(record.clone())?;
        Ok(record)
    }

    /// Score a project against the roster without recording anything.
    pub fn preview(
        &self,
        form: ProjectForm,
    ) -> Result<Vec<AssignmentInsight>, DelegationServiceError> {
        let demand = form.into_demand()?;
        let members = self.non_empty_roster()?;
        Ok(self.engine.preview(&demand, &members))
    }

    /// Assign a batch of tasks against the current roster.
    pub fn assign(&self, forms: Vec<ProjectForm>) -> Result<AssignmentPlan, DelegationServiceError> {
        let tasks = forms
            .into_iter()
            .map(ProjectForm::into_task)
            .collect::<Result<Vec<_>, _>>()?;
        let mut ids = HashSet::with_capacity(tasks.len());
        if let Some(task) = tasks.iter().find(|task| !ids.insert(task.id.as_str())) {
            return Err(DelegationServiceError::DuplicateTask(task.id.clone()));
        }
        let members = self.non_empty_roster()?;
        Ok(self.engine.plan(&tasks, &members))
    }

    pub fn last_decision(&self) -> Result<Option<DecisionRecord>, DelegationServiceError> {
        Ok(self.repository.last_decision()?)
    }

    /// Commit the last decision's assignments onto the roster as project load.
    pub fn commit_last_decision(&self) -> Result<Vec<Member>, DelegationServiceError> {
        let members = self
            .repository
            .commit_last_decision()
            .map_err(|error| match error {
                RosterError::NoDecision => DelegationServiceError::NoDecision,
                RosterError::AlreadyCommitted => DelegationServiceError::AlreadyCommitted,
                RosterError::UnknownMember(name) => DelegationServiceError::UnknownMember(name),
                other => DelegationServiceError::Roster(other),
            })?;
        info!("last decision committed to roster");
        Ok(members)
    }

    fn non_empty_roster(&self) -> Result<Vec<Member>, DelegationServiceError> {
        let members = self.repository.members()?;
        if members.is_empty() {
            return Err(DelegationServiceError::EmptyRoster);
        }
        Ok(members)
    }
}

/// Error raised by the delegation service.
#[derive(Debug, thiserror::Error)]
pub enum DelegationServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error("add at least one member before assigning work")]
    EmptyRoster,
    #[error("task id '{0}' appears more than once in the batch")]
    DuplicateTask(String),
    #[error("no decision has been evaluated yet")]
    NoDecision,
    #[error("the last decision was already committed")]
    AlreadyCommitted,
    #[error("member '{0}' is no longer on the roster")]
    UnknownMember(String),
}
