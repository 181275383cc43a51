use super::super::domain::{clamp_unit, Member, Task};

/// Skill fit reported for tasks that list no requirements.
pub(crate) const NEUTRAL_SKILL_FIT: f64 = 0.5;

/// Objective alignment reported when a demand names no objectives.
pub(crate) const NEUTRAL_OBJECTIVE_ALIGNMENT: f64 = 0.4;

pub(crate) fn capacity_score(load_weeks: f64, nominal_capacity_weeks: f64) -> f64 {
    if nominal_capacity_weeks <= 0.0 {
        return 0.0;
    }
    clamp_unit(1.0 - load_weeks / nominal_capacity_weeks)
}

/// Requirement-weighted share of the task's skill vector the member covers.
pub(crate) fn skill_fit(member: &Member, task: &Task) -> f64 {
    if task.required_skills.is_empty() {
        return NEUTRAL_SKILL_FIT;
    }

    let mut achieved = 0.0;
    let mut total = 0.0;
    for (skill, demand) in task.required_skills.iter() {
        achieved += demand.min(member.expertise().level(skill));
        total += demand;
    }

    if total > 0.0 {
        achieved / total
    } else {
        0.0
    }
}

/// Unweighted stretch available to the member: `1 - skill_fit` on learning tasks.
pub(crate) fn growth_ratio(task: &Task, skill_fit: f64) -> f64 {
    if task.learning_opportunity && skill_fit < 1.0 {
        1.0 - skill_fit
    } else {
        0.0
    }
}

/// Average, over objectives, of the best member proficiency among skills the
/// objective mentions by word.
pub(crate) fn objective_alignment(member: &Member, objectives: &[String]) -> f64 {
    if objectives.is_empty() {
        return NEUTRAL_OBJECTIVE_ALIGNMENT;
    }

    let total: f64 = objectives
        .iter()
        .map(|objective| {
            let words: Vec<String> = objective
                .split(|ch: char| !ch.is_alphanumeric())
                .filter(|word| !word.is_empty())
                .map(str::to_lowercase)
                .collect();

            member
                .expertise()
                .iter()
                .filter(|(skill, _)| words.iter().any(|word| word == skill))
                .map(|(_, level)| level)
                .fold(0.0, f64::max)
        })
        .sum();

    total / objectives.len() as f64
}
