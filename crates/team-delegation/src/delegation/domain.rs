use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Skill name reported as the primary domain when a task lists no requirements.
pub const GENERAL_SKILL: &str = "general";

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Case-insensitive, immutable mapping of skill name to proficiency in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct SkillProfile {
    levels: BTreeMap<String, f64>,
}

impl SkillProfile {
    pub fn new<I, K>(levels: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let levels = levels
            .into_iter()
            .map(|(skill, level)| (skill.as_ref().trim().to_lowercase(), clamp_unit(level)))
            .filter(|(skill, _)| !skill.is_empty())
            .collect();
        Self { levels }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Proficiency for `skill`, or 0.0 when the skill is not listed.
    pub fn level(&self, skill: &str) -> f64 {
        self.levels
            .get(&skill.trim().to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.levels
            .iter()
            .map(|(skill, level)| (skill.as_str(), *level))
    }
}

impl From<BTreeMap<String, f64>> for SkillProfile {
    fn from(value: BTreeMap<String, f64>) -> Self {
        Self::new(value)
    }
}

impl From<SkillProfile> for BTreeMap<String, f64> {
    fn from(value: SkillProfile) -> Self {
        value.levels
    }
}

/// Work a member has already committed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLoad {
    pub project_name: String,
    pub remaining_weeks: f64,
}

impl ProjectLoad {
    pub fn new(project_name: impl Into<String>, remaining_weeks: f64) -> Self {
        let remaining_weeks = if remaining_weeks.is_finite() {
            remaining_weeks.max(0.0)
        } else {
            0.0
        };
        Self {
            project_name: project_name.into(),
            remaining_weeks,
        }
    }
}

/// A team member available for delegation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    name: String,
    expertise: SkillProfile,
    recent_performance: f64,
    growth_desire: f64,
    current_projects: Vec<ProjectLoad>,
}

impl Member {
    pub fn new(
        name: impl Into<String>,
        expertise: SkillProfile,
        recent_performance: f64,
        growth_desire: f64,
    ) -> Self {
        Self {
            name: name.into(),
            expertise,
            recent_performance: clamp_unit(recent_performance),
            growth_desire: clamp_unit(growth_desire),
            current_projects: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expertise(&self) -> &SkillProfile {
        &self.expertise
    }

    pub fn recent_performance(&self) -> f64 {
        self.recent_performance
    }

    pub fn growth_desire(&self) -> f64 {
        self.growth_desire
    }

    pub fn current_projects(&self) -> &[ProjectLoad] {
        &self.current_projects
    }

    /// Record committed work on this member. The assignment engine never calls this;
    /// callers commit decisions explicitly.
    pub fn commit_project(&mut self, load: ProjectLoad) -> &mut Self {
        self.current_projects.push(load);
        self
    }

    pub fn with_project(mut self, load: ProjectLoad) -> Self {
        self.commit_project(load);
        self
    }

    pub fn committed_weeks(&self) -> f64 {
        self.current_projects
            .iter()
            .map(|project| project.remaining_weeks)
            .sum()
    }
}

/// Task urgency. Ordering follows the weight: `High > Medium > Low`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    pub const fn weight(self) -> f64 {
        match self {
            Self::Low => 0.3,
            Self::Medium => 0.6,
            Self::High => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "h" | "high" => Ok(Self::High),
            other => Err(format!("unknown urgency '{other}' (expected low, medium or high)")),
        }
    }
}

/// A unit of work handed to exactly one member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: String,
    pub project_name: String,
    pub duration_weeks: f64,
    pub required_skills: SkillProfile,
    pub urgency: Urgency,
    pub learning_opportunity: bool,
    pub objectives: Vec<String>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        project_name: impl Into<String>,
        duration_weeks: f64,
        required_skills: SkillProfile,
    ) -> Self {
        Self {
            id: id.into(),
            project_name: project_name.into(),
            duration_weeks,
            required_skills,
            urgency: Urgency::default(),
            learning_opportunity: false,
            objectives: Vec::new(),
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_learning_opportunity(mut self, learning_opportunity: bool) -> Self {
        self.learning_opportunity = learning_opportunity;
        self
    }

    pub fn with_objectives<I, S>(mut self, objectives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.objectives = objectives.into_iter().map(Into::into).collect();
        self
    }

    /// Skill with the highest required intensity. Ties go to the alphabetically
    /// first skill; tasks without requirements report [`GENERAL_SKILL`].
    pub fn primary_skill_domain(&self) -> &str {
        let mut primary: Option<(&str, f64)> = None;
        for (skill, level) in self.required_skills.iter() {
            match primary {
                Some((_, best)) if level <= best => {}
                _ => primary = Some((skill, level)),
            }
        }
        primary.map(|(skill, _)| skill).unwrap_or(GENERAL_SKILL)
    }
}

/// A whole project evaluated as a single task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDemand {
    pub project_name: String,
    pub required_skills: SkillProfile,
    pub duration_weeks: f64,
    pub urgency: Urgency,
    pub learning_opportunity: bool,
    pub objectives: Vec<String>,
}

impl ProjectDemand {
    pub fn new(
        project_name: impl Into<String>,
        required_skills: SkillProfile,
        duration_weeks: f64,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            required_skills,
            duration_weeks,
            urgency: Urgency::default(),
            learning_opportunity: false,
            objectives: Vec::new(),
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_learning_opportunity(mut self, learning_opportunity: bool) -> Self {
        self.learning_opportunity = learning_opportunity;
        self
    }

    pub fn with_objectives<I, S>(mut self, objectives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.objectives = objectives.into_iter().map(Into::into).collect();
        self
    }

    pub fn task_id(&self) -> String {
        format!("task-{}", slugify(&self.project_name))
    }

    pub fn to_task(&self) -> Task {
        Task {
            id: self.task_id(),
            project_name: self.project_name.clone(),
            duration_weeks: self.duration_weeks,
            required_skills: self.required_skills.clone(),
            urgency: self.urgency,
            learning_opportunity: self.learning_opportunity,
            objectives: self.objectives.clone(),
        }
    }
}

fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("untitled");
    }
    slug
}

/// One task committed to one member. The assignee is referenced by roster name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskAssignment {
    pub task: Task,
    pub assignee: String,
    pub utility_score: f64,
}

/// Explanation of how a single member scored against a demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentInsight {
    pub member_name: String,
    pub utility_score: f64,
    pub feasible: bool,
    pub capacity_score: f64,
    pub expertise_score: f64,
    pub skill_fit_score: f64,
    pub reliability_score: f64,
    pub growth_score: f64,
    pub objective_alignment: f64,
    pub narrative: String,
}

/// Outcome of evaluating a demand against a roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentDecision {
    demand: ProjectDemand,
    recommended_team: Vec<Member>,
    insights: Vec<AssignmentInsight>,
    task_assignments: Vec<TaskAssignment>,
}

impl AssignmentDecision {
    pub(crate) fn new(
        demand: ProjectDemand,
        recommended_team: Vec<Member>,
        insights: Vec<AssignmentInsight>,
        task_assignments: Vec<TaskAssignment>,
    ) -> Self {
        Self {
            demand,
            recommended_team,
            insights,
            task_assignments,
        }
    }

    pub fn demand(&self) -> &ProjectDemand {
        &self.demand
    }

    pub fn recommended_team(&self) -> &[Member] {
        &self.recommended_team
    }

    pub fn insights(&self) -> &[AssignmentInsight] {
        &self.insights
    }

    pub fn task_assignments(&self) -> &[TaskAssignment] {
        &self.task_assignments
    }

    /// Primary assignee name for a single-task decision.
    pub fn assignee(&self) -> Option<&str> {
        self.task_assignments
            .first()
            .map(|assignment| assignment.assignee.as_str())
            .or_else(|| self.recommended_team.first().map(Member::name))
    }
}
