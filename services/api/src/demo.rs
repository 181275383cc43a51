use crate::infra::pairs_to_lines;
use clap::Args;
use std::path::PathBuf;
use team_delegation::delegation::{
    AssignmentDecision, AssignmentEngine, AssignmentPlan, EngineConfig, Member, ProjectDemand,
    ProjectForm, ProjectLoad, SkillProfile, Task, Urgency,
};
use team_delegation::error::AppError;
use team_delegation::import::RosterImporter;
use team_delegation::telemetry;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Roster CSV with columns name,performance,growth,skills,projects
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Project name; also used to derive the task id
    #[arg(long)]
    pub(crate) project: String,
    /// Estimated duration in weeks (at least 1)
    #[arg(long)]
    pub(crate) duration: f64,
    /// Required skills as comma-separated skill:intensity pairs
    #[arg(long, default_value = "")]
    pub(crate) skills: String,
    /// Urgency: low, medium or high
    #[arg(long, default_value = "medium")]
    pub(crate) urgency: Urgency,
    /// Mark the project as a learning opportunity
    #[arg(long)]
    pub(crate) learning: bool,
    /// Comma-separated business objectives
    #[arg(long, default_value = "")]
    pub(crate) objectives: String,
    /// Override the nominal capacity window in weeks
    #[arg(long, value_parser = parse_capacity)]
    pub(crate) capacity: Option<f64>,
    /// Log filter for diagnostics written to stderr
    #[arg(long, default_value = "warn")]
    pub(crate) log_level: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the nominal capacity window in weeks
    #[arg(long, value_parser = parse_capacity)]
    pub(crate) capacity: Option<f64>,
    /// Skip the single-project evaluation and only print the batch plan
    #[arg(long)]
    pub(crate) skip_evaluation: bool,
    /// Log filter for diagnostics written to stderr
    #[arg(long, default_value = "info")]
    pub(crate) log_level: String,
}

fn parse_capacity(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|weeks| weeks.is_finite() && *weeks > 0.0)
        .ok_or_else(|| format!("'{raw}' is not a positive number of weeks"))
}

fn engine_with_capacity(capacity: Option<f64>) -> AssignmentEngine {
    let mut config = EngineConfig::default();
    if let Some(weeks) = capacity {
        config.nominal_capacity_weeks = weeks;
    }
    AssignmentEngine::from_config(config)
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        roster,
        project,
        duration,
        skills,
        urgency,
        learning,
        objectives,
        capacity,
        log_level,
    } = args;

    telemetry::init_for_cli(&log_level)?;

    let members = RosterImporter::from_path(&roster)?;
    let demand = ProjectForm {
        required_skills_raw: pairs_to_lines(&skills),
        objectives_raw: objectives,
        urgency,
        learning_opportunity: learning,
        ..ProjectForm::new(project, duration)
    }
    .into_demand()?;

    let engine = engine_with_capacity(capacity);
    let decision = engine.evaluate(&demand, &members);
    println!(
        "Evaluated {} against {} members (capacity window {:.1} weeks)",
        demand.project_name,
        members.len(),
        engine.config().nominal_capacity_weeks
    );
    render_decision(&decision);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    telemetry::init_for_cli(&args.log_level)?;

    let engine = engine_with_capacity(args.capacity);
    let members = demo_roster();
    println!("Team delegation demo");
    println!("Roster:");
    for member in &members {
        println!(
            "  - {} | performance {:.2} | growth {:.2} | committed {:.1}w | skills {}",
            member.name(),
            member.recent_performance(),
            member.growth_desire(),
            member.committed_weeks(),
            format_skills(member.expertise())
        );
    }

    if !args.skip_evaluation {
        let demand = ProjectDemand::new(
            "Checkout Redesign",
            SkillProfile::new([("frontend", 0.7), ("design", 0.5)]),
            3.0,
        )
        .with_urgency(Urgency::High)
        .with_objectives(["Improve frontend conversion"]);
        println!("\nSingle project evaluation: {}", demand.project_name);
        render_decision(&engine.evaluate(&demand, &members));
    }

    println!("\nBatch plan");
    render_plan(&engine.plan(&demo_tasks(), &members));
    Ok(())
}

pub(crate) fn demo_roster() -> Vec<Member> {
    vec![
        Member::new(
            "Avery",
            SkillProfile::new([("backend", 0.9), ("data", 0.6)]),
            0.9,
            0.3,
        )
        .with_project(ProjectLoad::new("Billing Migration", 4.0)),
        Member::new(
            "Blake",
            SkillProfile::new([("frontend", 0.8), ("design", 0.7)]),
            0.75,
            0.6,
        ),
        Member::new(
            "Casey",
            SkillProfile::new([("backend", 0.5), ("frontend", 0.4)]),
            0.7,
            0.9,
        )
        .with_project(ProjectLoad::new("Support Rotation", 2.0)),
        Member::new("Devon", SkillProfile::new([("data", 0.85)]), 0.8, 0.5),
    ]
}

pub(crate) fn demo_tasks() -> Vec<Task> {
    vec![
        Task::new(
            "payments-api",
            "Payments",
            5.0,
            SkillProfile::new([("backend", 0.8)]),
        )
        .with_urgency(Urgency::High),
        Task::new(
            "dashboard",
            "Insights",
            4.0,
            SkillProfile::new([("data", 0.7), ("frontend", 0.3)]),
        ),
        Task::new(
            "landing-page",
            "Marketing Site",
            3.0,
            SkillProfile::new([("frontend", 0.6)]),
        ),
        Task::new(
            "log-cleanup",
            "Platform",
            2.0,
            SkillProfile::new([("backend", 0.4)]),
        )
        .with_urgency(Urgency::Low),
        Task::new(
            "etl-retry",
            "Insights",
            3.0,
            SkillProfile::new([("data", 0.6)]),
        )
        .with_urgency(Urgency::Low)
        .with_learning_opportunity(true),
    ]
}

fn render_decision(decision: &AssignmentDecision) {
    match decision.assignee() {
        Some(name) => println!("- Recommended assignee: {name}"),
        None => println!("- No member can take this project within capacity"),
    }
    println!("- Ranked insights:");
    for (rank, insight) in decision.insights().iter().enumerate() {
        let marker = if insight.feasible { "" } else { " (excluded)" };
        println!(
            "  {}. {} utility {:.3}{} | capacity {:.2} | fit {:.2} | reliability {:.2} | growth {:.2} | objectives {:.2}",
            rank + 1,
            insight.member_name,
            insight.utility_score,
            marker,
            insight.capacity_score,
            insight.skill_fit_score,
            insight.reliability_score,
            insight.growth_score,
            insight.objective_alignment
        );
        println!("     {}", insight.narrative);
    }
}

fn render_plan(plan: &AssignmentPlan) {
    println!("- Assignments:");
    for assignment in &plan.assignments {
        println!(
            "  - {} [{}] -> {} (utility {:.3}, {:.1}w)",
            assignment.task.id,
            assignment.task.urgency,
            assignment.assignee,
            assignment.utility_score,
            assignment.task.duration_weeks
        );
    }
    if plan.unassigned.is_empty() {
        println!("- Unassigned: none");
    } else {
        println!("- Unassigned:");
        for task in &plan.unassigned {
            println!("  - {} ({:.1}w)", task.id, task.duration_weeks);
        }
    }
    match &plan.relocation {
        Some(relocation) => println!(
            "- Balancing moved {} from {} to {} ({:.1}w)",
            relocation.task_id, relocation.from, relocation.to, relocation.weeks
        ),
        None => println!("- Balancing: no relocation needed"),
    }
    println!("- Load after planning:");
    for entry in plan.loads.entries() {
        println!("  - {}: {:.1}w", entry.member, entry.weeks);
    }
}

fn format_skills(profile: &SkillProfile) -> String {
    if profile.is_empty() {
        return "none".to_string();
    }
    profile
        .iter()
        .map(|(skill, level)| format!("{skill} {level:.2}"))
        .collect::<Vec<_>>()
        .join(", ")
}
