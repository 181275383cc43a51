use super::domain::{Member, Task, TaskAssignment};
use super::ledger::LoadLedger;
use super::scoring::{UtilityScore, UtilityScorer};
use std::cmp::Ordering;
use tracing::debug;

/// Result of the greedy pass, before balancing.
#[derive(Debug, Clone)]
pub(crate) struct GreedyOutcome {
    pub assignments: Vec<TaskAssignment>,
    pub unassigned: Vec<Task>,
    pub ledger: LoadLedger,
}

/// Urgency descending, then duration ascending. Stable for equal keys.
pub(crate) fn priority_order(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| {
        b.urgency
            .weight()
            .total_cmp(&a.urgency.weight())
            .then_with(|| {
                a.duration_weeks
                    .partial_cmp(&b.duration_weeks)
                    .unwrap_or(Ordering::Equal)
            })
    });
    sorted
}

pub(crate) fn within_capacity(load_weeks: f64, task: &Task, nominal_capacity_weeks: f64) -> bool {
    load_weeks + task.duration_weeks <= nominal_capacity_weeks
}

/// Greedy argmax over candidates that fit under the workload cap.
///
/// Skill-gated candidates are never selected. Ties keep the earliest roster entry.
pub(crate) fn select_best(
    scorer: &UtilityScorer,
    task: &Task,
    members: &[Member],
    ledger: &LoadLedger,
    allow_overcommit: bool,
) -> Option<(usize, UtilityScore)> {
    let mut best: Option<(usize, UtilityScore)> = None;

    for (index, member) in members.iter().enumerate() {
        let load = ledger.load(index);
        if !allow_overcommit && !within_capacity(load, task, scorer.nominal_capacity_weeks()) {
            continue;
        }

        let score = scorer.score(task, member, load);
        if !score.feasible {
            continue;
        }
        if score.beats(best.as_ref().map(|(_, incumbent)| incumbent)) {
            best = Some((index, score));
        }
    }

    best
}

pub(crate) fn assign_greedy(
    scorer: &UtilityScorer,
    tasks: &[Task],
    members: &[Member],
    mut ledger: LoadLedger,
    allow_overcommit: bool,
) -> GreedyOutcome {
    let mut assignments = Vec::with_capacity(tasks.len());
    let mut unassigned = Vec::new();

    for task in priority_order(tasks) {
        match select_best(scorer, &task, members, &ledger, allow_overcommit) {
            Some((index, score)) => {
                let assignee = members[index].name().to_string();
                debug!(
                    task = %task.id,
                    assignee = %assignee,
                    utility = score.value,
                    "task assigned"
                );
                ledger.add(index, task.duration_weeks);
                assignments.push(TaskAssignment {
                    task,
                    assignee,
                    utility_score: score.value,
                });
            }
            None => {
                debug!(task = %task.id, "no feasible member; task left unassigned");
                unassigned.push(task);
            }
        }
    }

    GreedyOutcome {
        assignments,
        unassigned,
        ledger,
    }
}
