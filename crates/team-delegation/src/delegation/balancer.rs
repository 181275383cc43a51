use super::assigner::within_capacity;
use super::domain::{Member, TaskAssignment, Urgency};
use super::ledger::LoadLedger;
use super::scoring::{UtilityScorer, THETA_MIN};
use serde::Serialize;
use tracing::info;

/// Load spread, as a share of nominal capacity, above which balancing kicks in.
pub const BALANCE_THRESHOLD: f64 = 0.3;

/// A low-urgency task moved from the busiest member to the idlest one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relocation {
    pub task_id: String,
    pub from: String,
    pub to: String,
    pub weeks: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct BalanceOutcome {
    pub assignments: Vec<TaskAssignment>,
    pub ledger: LoadLedger,
    pub relocation: Option<Relocation>,
}

/// Single corrective pass. Relocates at most one assignment.
///
/// The moved task is rescored against the destination's load after the move,
/// so its utility already counts the task itself; greedy scores use the load
/// before the task was added.
pub(crate) fn rebalance(
    scorer: &UtilityScorer,
    mut assignments: Vec<TaskAssignment>,
    members: &[Member],
    mut ledger: LoadLedger,
    allow_overcommit: bool,
) -> BalanceOutcome {
    let relocation = relocate_one(
        scorer,
        &mut assignments,
        members,
        &mut ledger,
        allow_overcommit,
    );
    BalanceOutcome {
        assignments,
        ledger,
        relocation,
    }
}

fn relocate_one(
    scorer: &UtilityScorer,
    assignments: &mut Vec<TaskAssignment>,
    members: &[Member],
    ledger: &mut LoadLedger,
    allow_overcommit: bool,
) -> Option<Relocation> {
    if assignments.len() < 2 {
        return None;
    }
    if ledger.spread() <= BALANCE_THRESHOLD * scorer.nominal_capacity_weeks() {
        return None;
    }

    let mut candidate: Option<(usize, usize, f64)> = None;
    for (position, assignment) in assignments.iter().enumerate() {
        if assignment.task.urgency != Urgency::Low {
            continue;
        }
        let Some(holder) = ledger.index_of(&assignment.assignee) else {
            continue;
        };
        let load = ledger.load(holder);
        if candidate.map_or(true, |(_, _, best)| load > best) {
            candidate = Some((position, holder, load));
        }
    }
    let (position, from, _) = candidate?;

    let to = ledger.least_loaded()?;
    if to == from {
        return None;
    }

    let task = &assignments[position].task;
    let fits = within_capacity(ledger.load(to), task, scorer.nominal_capacity_weeks());
    if !fits && !allow_overcommit {
        return None;
    }

    let destination = &members[to];
    let expertise = destination.expertise().level(task.primary_skill_domain());
    if expertise < THETA_MIN && !task.learning_opportunity {
        return None;
    }

    let original = assignments.remove(position);
    let weeks = original.task.duration_weeks;
    ledger.transfer(from, to, weeks);

    let utility = scorer.score(&original.task, destination, ledger.load(to));
    let relocation = Relocation {
        task_id: original.task.id.clone(),
        from: original.assignee.clone(),
        to: destination.name().to_string(),
        weeks,
    };

    info!(
        task = %relocation.task_id,
        from = %relocation.from,
        to = %relocation.to,
        weeks,
        "rebalanced low-urgency task"
    );

    assignments.push(TaskAssignment {
        task: original.task,
        assignee: destination.name().to_string(),
        utility_score: utility.value,
    });

    Some(relocation)
}
