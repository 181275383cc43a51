use super::assigner::assign_greedy;
use super::balancer::{rebalance, Relocation};
use super::domain::{
    AssignmentDecision, AssignmentInsight, Member, ProjectDemand, Task, TaskAssignment,
};
use super::insights::InsightReporter;
use super::ledger::LoadLedger;
use super::scoring::{UtilityScorer, Weights};
use serde::Serialize;
use tracing::info;

/// Nominal planning window used when callers do not supply one.
pub const DEFAULT_CAPACITY_WEEKS: f64 = 12.0;

/// Engine construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineConfig {
    pub nominal_capacity_weeks: f64,
    pub weights: Weights,
    /// Admit candidates whose load would exceed nominal capacity.
    pub allow_overcommit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nominal_capacity_weeks: DEFAULT_CAPACITY_WEEKS,
            weights: Weights::balanced(),
            allow_overcommit: false,
        }
    }
}

/// Full result of one assignment batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentPlan {
    pub assignments: Vec<TaskAssignment>,
    pub unassigned: Vec<Task>,
    pub loads: LoadLedger,
    pub relocation: Option<Relocation>,
}

/// Greedy, capacity-capped task delegation with one balancing pass.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentEngine {
    config: EngineConfig,
    scorer: UtilityScorer,
}

impl AssignmentEngine {
    pub fn new(nominal_capacity_weeks: f64, weights: Weights) -> Self {
        Self::from_config(EngineConfig {
            nominal_capacity_weeks,
            weights,
            allow_overcommit: false,
        })
    }

    pub fn from_config(config: EngineConfig) -> Self {
        let scorer = UtilityScorer::new(config.nominal_capacity_weeks, config.weights);
        Self { config, scorer }
    }

    pub fn with_overcommit(mut self, allow_overcommit: bool) -> Self {
        self.config.allow_overcommit = allow_overcommit;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scorer(&self) -> &UtilityScorer {
        &self.scorer
    }

    /// Evaluate a whole demand as one task and explain every member's score.
    pub fn evaluate(&self, demand: &ProjectDemand, members: &[Member]) -> AssignmentDecision {
        let task = demand.to_task();
        let assignments = self.assign_tasks(std::slice::from_ref(&task), members);

        let recommended_team = assignments
            .iter()
            .map(|assignment| resolve_member(members, &assignment.assignee).clone())
            .collect();
        let insights = self.reporter().rank(&task, members);

        AssignmentDecision::new(demand.clone(), recommended_team, insights, assignments)
    }

    /// Score a demand against the roster without committing anything.
    pub fn preview(&self, demand: &ProjectDemand, members: &[Member]) -> Vec<AssignmentInsight> {
        self.reporter().rank(&demand.to_task(), members)
    }

    pub fn assign_tasks(&self, tasks: &[Task], members: &[Member]) -> Vec<TaskAssignment> {
        self.plan(tasks, members).assignments
    }

    /// Assign every task greedily, then run a single balancing pass.
    pub fn plan(&self, tasks: &[Task], members: &[Member]) -> AssignmentPlan {
        let ledger = LoadLedger::from_roster(members);
        if tasks.is_empty() || members.is_empty() {
            return AssignmentPlan {
                assignments: Vec::new(),
                unassigned: tasks.to_vec(),
                loads: ledger,
                relocation: None,
            };
        }

        let greedy = assign_greedy(
            &self.scorer,
            tasks,
            members,
            ledger,
            self.config.allow_overcommit,
        );
        let balanced = rebalance(
            &self.scorer,
            greedy.assignments,
            members,
            greedy.ledger,
            self.config.allow_overcommit,
        );

        info!(
            tasks = tasks.len(),
            members = members.len(),
            assigned = balanced.assignments.len(),
            unassigned = greedy.unassigned.len(),
            rebalanced = balanced.relocation.is_some(),
            "assignment batch complete"
        );

        AssignmentPlan {
            assignments: balanced.assignments,
            unassigned: greedy.unassigned,
            loads: balanced.ledger,
            relocation: balanced.relocation,
        }
    }

    fn reporter(&self) -> InsightReporter {
        InsightReporter::new(self.scorer)
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::from_config(EngineConfig::default())
    }
}

/// Assignees are always drawn from `members`; a miss means the engine itself is broken.
fn resolve_member<'a>(members: &'a [Member], name: &str) -> &'a Member {
    members
        .iter()
        .find(|member| member.name() == name)
        .unwrap_or_else(|| panic!("assignee '{name}' missing from the roster it was drawn from"))
}
