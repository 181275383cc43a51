mod rules;
mod weights;

pub use weights::{Weights, EXCLUDED_UTILITY, THETA_MIN};

pub(crate) use rules::objective_alignment;

use super::domain::{Member, Task};
use serde::{Deserialize, Serialize};

/// Stateless scorer for a single (task, member, load) triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityScorer {
    nominal_capacity_weeks: f64,
    weights: Weights,
}

impl UtilityScorer {
    pub fn new(nominal_capacity_weeks: f64, weights: Weights) -> Self {
        Self {
            nominal_capacity_weeks,
            weights,
        }
    }

    pub fn nominal_capacity_weeks(&self) -> f64 {
        self.nominal_capacity_weeks
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }

    /// Score `member` for `task` given the member's cumulative `load_weeks`.
    pub fn score(&self, task: &Task, member: &Member, load_weeks: f64) -> UtilityScore {
        let capacity = rules::capacity_score(load_weeks, self.nominal_capacity_weeks);
        let expertise = member.expertise().level(task.primary_skill_domain());
        let reliability = member.recent_performance();
        let skill_fit = rules::skill_fit(member, task);
        let growth = rules::growth_ratio(task, skill_fit);
        let learning_bonus = self.weights.learning * growth;

        let components = ScoreComponents {
            capacity,
            expertise,
            skill_fit,
            reliability,
            growth,
            learning_bonus,
        };

        if expertise < THETA_MIN && !task.learning_opportunity {
            return UtilityScore {
                value: EXCLUDED_UTILITY,
                feasible: false,
                components,
            };
        }

        let value = self.weights.capacity * capacity
            + self.weights.skill * expertise
            + self.weights.reliability * reliability
            + learning_bonus;

        UtilityScore {
            value,
            feasible: true,
            components,
        }
    }
}

/// Scalar utility plus the feasibility verdict that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityScore {
    /// Weighted utility, or [`EXCLUDED_UTILITY`] when the skill gate rejects the pairing.
    pub value: f64,
    pub feasible: bool,
    pub components: ScoreComponents,
}

impl UtilityScore {
    /// True when `self` should replace `incumbent` as the best candidate.
    pub fn beats(&self, incumbent: Option<&UtilityScore>) -> bool {
        match incumbent {
            None => true,
            Some(best) => match (self.feasible, best.feasible) {
                (true, false) => true,
                (false, true) => false,
                _ => self.value > best.value,
            },
        }
    }
}

/// Raw component values, before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub capacity: f64,
    pub expertise: f64,
    pub skill_fit: f64,
    pub reliability: f64,
    pub growth: f64,
    pub learning_bonus: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegation::domain::{SkillProfile, Urgency};

    fn scorer() -> UtilityScorer {
        UtilityScorer::new(12.0, Weights::balanced())
    }

    fn backend_task() -> Task {
        Task::new("t1", "API", 5.0, SkillProfile::new([("backend", 0.8)]))
            .with_urgency(Urgency::High)
    }

    #[test]
    fn score_combines_weighted_components() {
        let member = Member::new("Ana", SkillProfile::new([("backend", 0.9)]), 0.8, 0.5);

        let score = scorer().score(&backend_task(), &member, 3.0);

        assert!(score.feasible);
        let expected = 0.4 * 0.75 + 0.3 * 0.9 + 0.2 * 0.8;
        assert!((score.value - expected).abs() < 1e-9);
        assert_eq!(score.components.learning_bonus, 0.0);
    }

    #[test]
    fn skill_gate_forces_sentinel() {
        let member = Member::new("Bo", SkillProfile::new([("backend", 0.2)]), 1.0, 1.0);

        let score = scorer().score(&backend_task(), &member, 0.0);

        assert!(!score.feasible);
        assert_eq!(score.value, EXCLUDED_UTILITY);
        assert_eq!(score.components.expertise, 0.2);
    }

    #[test]
    fn learning_tasks_bypass_gate_and_award_bonus() {
        let member = Member::new("Bo", SkillProfile::new([("backend", 0.2)]), 0.5, 0.9);
        let task = backend_task().with_learning_opportunity(true);

        let score = scorer().score(&task, &member, 0.0);

        assert!(score.feasible);
        // skill fit 0.2 / 0.8 = 0.25, bonus = 0.1 * 0.75
        assert!((score.components.learning_bonus - 0.075).abs() < 1e-9);
        let expected = 0.4 + 0.3 * 0.2 + 0.2 * 0.5 + 0.075;
        assert!((score.value - expected).abs() < 1e-9);
    }

    #[test]
    fn expert_gets_no_learning_bonus() {
        let member = Member::new("Cy", SkillProfile::new([("backend", 1.0)]), 0.5, 0.9);
        let task = backend_task().with_learning_opportunity(true);

        let score = scorer().score(&task, &member, 0.0);

        assert_eq!(score.components.skill_fit, 1.0);
        assert_eq!(score.components.learning_bonus, 0.0);
    }

    #[test]
    fn feasible_scores_always_beat_excluded_ones() {
        let excluded = UtilityScore {
            value: EXCLUDED_UTILITY,
            feasible: false,
            components: scorer()
                .score(&backend_task(), &Member::new("x", SkillProfile::empty(), 0.0, 0.0), 0.0)
                .components,
        };
        let mut weak = excluded;
        weak.feasible = true;
        weak.value = -20.0;

        assert!(weak.beats(Some(&excluded)));
        assert!(!excluded.beats(Some(&weak)));
        assert!(!weak.beats(Some(&weak)));
        assert!(excluded.beats(None));
    }

    #[test]
    fn scoring_is_pure() {
        let member = Member::new("Ana", SkillProfile::new([("backend", 0.9)]), 0.8, 0.5);
        let task = backend_task();
        let first = scorer().score(&task, &member, 4.0);
        let second = scorer().score(&task, &member, 4.0);
        assert_eq!(first, second);
    }
}
