use super::domain::{AssignmentInsight, Member, Task};
use super::scoring::{objective_alignment, UtilityScore, UtilityScorer};

/// Read-only ranking of every member against a task, using committed load only.
#[derive(Debug, Clone, Copy)]
pub struct InsightReporter {
    scorer: UtilityScorer,
}

impl InsightReporter {
    pub fn new(scorer: UtilityScorer) -> Self {
        Self { scorer }
    }

    /// Insights ordered by descending utility; equal utilities keep roster order.
    pub fn rank(&self, task: &Task, members: &[Member]) -> Vec<AssignmentInsight> {
        let mut insights: Vec<AssignmentInsight> = members
            .iter()
            .map(|member| self.insight(task, member))
            .collect();

        insights.sort_by(|a, b| b.utility_score.total_cmp(&a.utility_score));
        insights
    }

    fn insight(&self, task: &Task, member: &Member) -> AssignmentInsight {
        let score = self.scorer.score(task, member, member.committed_weeks());
        let alignment = objective_alignment(member, &task.objectives);
        let narrative = narrative(task, member, &score, alignment);

        AssignmentInsight {
            member_name: member.name().to_string(),
            utility_score: score.value,
            feasible: score.feasible,
            capacity_score: score.components.capacity,
            expertise_score: score.components.expertise,
            skill_fit_score: score.components.skill_fit,
            reliability_score: score.components.reliability,
            growth_score: score.components.growth,
            objective_alignment: alignment,
            narrative,
        }
    }
}

fn narrative(task: &Task, member: &Member, score: &UtilityScore, alignment: f64) -> String {
    let components = &score.components;
    let mut text = format!(
        "capacity {:.2}, {} expertise {:.2}, skill fit {:.2}, perf {:.2}, objectives {:.2}",
        components.capacity,
        task.primary_skill_domain(),
        components.expertise,
        components.skill_fit,
        components.reliability,
        alignment,
    );

    if components.growth > 0.0 {
        text.push_str(&format!(
            "; stretch opportunity {:.2} (growth desire {:.2})",
            components.growth,
            member.growth_desire()
        ));
    }

    if !score.feasible {
        text.push_str("; excluded: below minimum skill for a non-learning task");
    }

    text
}
