use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{AssignmentDecision, Member, ProjectLoad};

/// Evaluated decision kept for later review or commitment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRecord {
    pub decision: AssignmentDecision,
    pub recorded_at: DateTime<Utc>,
    pub committed: bool,
}

impl DecisionRecord {
    /// Add each assignment to its member's project load and mark the record committed.
    ///
    /// Every assignee is resolved before anything changes, so an error leaves both
    /// the record and the roster untouched.
    pub fn apply_to(&mut self, members: &mut [Member]) -> Result<(), RosterError> {
        if self.committed {
            return Err(RosterError::AlreadyCommitted);
        }

        let mut loads = Vec::with_capacity(self.decision.task_assignments().len());
        for assignment in self.decision.task_assignments() {
            let index = members
                .iter()
                .position(|member| member.name() == assignment.assignee)
                .ok_or_else(|| RosterError::UnknownMember(assignment.assignee.clone()))?;
            loads.push((
                index,
                ProjectLoad::new(
                    assignment.task.project_name.clone(),
                    assignment.task.duration_weeks,
                ),
            ));
        }

        for (index, load) in loads {
            members[index].commit_project(load);
        }
        self.committed = true;
        Ok(())
    }
}

/// Storage abstraction for the working roster and the most recent decision.
///
/// Implementations serialise access; callers receive cloned snapshots.
pub trait RosterRepository: Send + Sync {
    fn members(&self) -> Result<Vec<Member>, RosterError>;
    fn add_member(&self, member: Member) -> Result<Member, RosterError>;
    fn replace_members(&self, members: Vec<Member>) -> Result<(), RosterError>;
    fn last_decision(&self) -> Result<Option<DecisionRecord>, RosterError>;
    fn record_decision(&self, record: DecisionRecord) -> Result<(), RosterError>;
    /// Apply the last decision to the roster with [`DecisionRecord::apply_to`].
    ///
    /// Reading the decision, updating members and marking the record committed
    /// must happen under one critical section.
    fn commit_last_decision(&self) -> Result<Vec<Member>, RosterError>;
}

/// Error enumeration for roster storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("member '{0}' already exists")]
    Conflict(String),
    #[error("no decision has been evaluated yet")]
    NoDecision,
    #[error("the last decision was already committed")]
    AlreadyCommitted,
    #[error("member '{0}' is no longer on the roster")]
    UnknownMember(String),
    #[error("roster unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegation::domain::{ProjectDemand, SkillProfile, Task, TaskAssignment};

    fn record(assignees: &[&str]) -> DecisionRecord {
        let demand = ProjectDemand::new("Payments", SkillProfile::empty(), 3.0);
        let assignments = assignees
            .iter()
            .map(|name| TaskAssignment {
                task: Task::new("task-payments", "Payments", 3.0, SkillProfile::empty()),
                assignee: name.to_string(),
                utility_score: 0.5,
            })
            .collect();
        DecisionRecord {
            decision: AssignmentDecision::new(demand, Vec::new(), Vec::new(), assignments),
            recorded_at: Utc::now(),
            committed: false,
        }
    }

    fn roster() -> Vec<Member> {
        vec![
            Member::new("Ana", SkillProfile::empty(), 0.8, 0.5),
            Member::new("Bo", SkillProfile::empty(), 0.7, 0.5),
        ]
    }

    #[test]
    fn apply_to_commits_each_assignment_once() {
        let mut record = record(&["Bo"]);
        let mut members = roster();

        record.apply_to(&mut members).expect("commit applies");

        assert!(record.committed);
        assert_eq!(members[1].committed_weeks(), 3.0);
        assert_eq!(members[0].committed_weeks(), 0.0);
        assert!(matches!(
            record.apply_to(&mut members),
            Err(RosterError::AlreadyCommitted)
        ));
        assert_eq!(members[1].committed_weeks(), 3.0);
    }

    #[test]
    fn apply_to_is_all_or_nothing() {
        let mut record = record(&["Ana", "Gone"]);
        let mut members = roster();

        match record.apply_to(&mut members) {
            Err(RosterError::UnknownMember(name)) => assert_eq!(name, "Gone"),
            other => panic!("expected unknown member, got {other:?}"),
        }
        assert!(!record.committed);
        assert!(members.iter().all(|member| member.committed_weeks() == 0.0));
    }
}
