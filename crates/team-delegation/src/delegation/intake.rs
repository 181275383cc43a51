//! Normalises free-form member and project input into engine value objects.
//!
//! Skill and project lists use one `key:value` pair per line. Lines that do not
//! split into exactly two parts are ignored; unparseable numbers fall back to a
//! default rather than failing the whole form.

use super::domain::{Member, ProjectDemand, ProjectLoad, SkillProfile, Task, Urgency};
use serde::{Deserialize, Serialize};

const DEFAULT_SKILL_LEVEL: f64 = 0.5;
const DEFAULT_PROJECT_WEEKS: f64 = 4.0;
const MIN_DURATION_WEEKS: f64 = 1.0;

pub fn parse_skills(raw: &str) -> SkillProfile {
    let pairs = key_value_lines(raw)
        .map(|(skill, level)| (skill.to_lowercase(), parse_or(level, DEFAULT_SKILL_LEVEL)))
        .collect::<Vec<_>>();
    SkillProfile::new(pairs)
}

/// Comma-separated objectives, trimmed and de-duplicated in first-seen order.
pub fn parse_objectives(raw: &str) -> Vec<String> {
    let mut objectives: Vec<String> = Vec::new();
    for objective in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !objectives.iter().any(|existing| existing == objective) {
            objectives.push(objective.to_string());
        }
    }
    objectives
}

pub fn parse_projects(raw: &str) -> Vec<ProjectLoad> {
    key_value_lines(raw)
        .map(|(name, weeks)| ProjectLoad::new(name, parse_or(weeks, DEFAULT_PROJECT_WEEKS)))
        .collect()
}

fn key_value_lines(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut parts = line.split(':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => Some((key.trim(), value.trim())),
                _ => None,
            }
        })
}

fn parse_or(value: &str, fallback: f64) -> f64 {
    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(fallback)
}

/// Intake validation failure naming the offending field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be at least {min} (got {value})")]
    BelowMinimum {
        field: &'static str,
        min: f64,
        value: f64,
    },
}

/// Member submission as entered by a person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberForm {
    pub name: String,
    pub performance: f64,
    pub growth: f64,
    /// One `skill:level` pair per line.
    #[serde(default)]
    pub skills_raw: String,
    /// One `project:weeks` pair per line.
    #[serde(default)]
    pub projects_raw: String,
}

impl MemberForm {
    pub fn into_member(self) -> Result<Member, IntakeError> {
        let name = require_text("name", &self.name)?;
        let performance = require_range("performance", self.performance, 0.0, 1.0)?;
        let growth = require_range("growth", self.growth, 0.0, 1.0)?;

        let mut member = Member::new(name, parse_skills(&self.skills_raw), performance, growth);
        for project in parse_projects(&self.projects_raw) {
            member.commit_project(project);
        }
        Ok(member)
    }
}

/// Project submission as entered by a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectForm {
    /// Explicit task identifier for batch submissions; derived from the name otherwise.
    #[serde(default)]
    pub task_id: Option<String>,
    pub project_name: String,
    pub duration_weeks: f64,
    /// One `skill:intensity` pair per line.
    #[serde(default)]
    pub required_skills_raw: String,
    /// Comma-separated objectives.
    #[serde(default)]
    pub objectives_raw: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub learning_opportunity: bool,
}

impl ProjectForm {
    pub fn new(project_name: impl Into<String>, duration_weeks: f64) -> Self {
        Self {
            task_id: None,
            project_name: project_name.into(),
            duration_weeks,
            required_skills_raw: String::new(),
            objectives_raw: String::new(),
            urgency: Urgency::default(),
            learning_opportunity: false,
        }
    }

    pub fn into_task(self) -> Result<Task, IntakeError> {
        let task_id = self
            .task_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        let demand = self.into_demand()?;
        let mut task = demand.to_task();
        if let Some(id) = task_id {
            task.id = id;
        }
        Ok(task)
    }

    pub fn into_demand(self) -> Result<ProjectDemand, IntakeError> {
        let project_name = require_text("project_name", &self.project_name)?;
        let duration = require_min("duration_weeks", self.duration_weeks, MIN_DURATION_WEEKS)?;

        Ok(
            ProjectDemand::new(project_name, parse_skills(&self.required_skills_raw), duration)
                .with_urgency(self.urgency)
                .with_learning_opportunity(self.learning_opportunity)
                .with_objectives(parse_objectives(&self.objectives_raw)),
        )
    }
}

fn require_text(field: &'static str, value: &str) -> Result<String, IntakeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(IntakeError::Blank { field })
    } else {
        Ok(trimmed.to_string())
    }
}

fn require_min(field: &'static str, value: f64, min: f64) -> Result<f64, IntakeError> {
    if value.is_finite() && value >= min {
        Ok(value)
    } else {
        Err(IntakeError::BelowMinimum { field, min, value })
    }
}

fn require_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, IntakeError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(IntakeError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}
