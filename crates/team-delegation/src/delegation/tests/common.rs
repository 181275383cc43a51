use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::delegation::domain::{Member, ProjectLoad, SkillProfile, Task, Urgency};
use crate::delegation::engine::{AssignmentEngine, EngineConfig};
use crate::delegation::intake::{MemberForm, ProjectForm};
use crate::delegation::roster::{DecisionRecord, RosterError, RosterRepository};
use crate::delegation::scoring::Weights;
use crate::delegation::service::DelegationService;

pub(super) const CAPACITY: f64 = 12.0;

pub(super) fn engine() -> AssignmentEngine {
    AssignmentEngine::new(CAPACITY, Weights::balanced())
}

pub(super) fn member(name: &str, backend: f64, performance: f64) -> Member {
    Member::new(name, SkillProfile::new([("backend", backend)]), performance, 0.5)
}

pub(super) fn backend_task(id: &str, urgency: Urgency, weeks: f64) -> Task {
    Task::new(id, "Platform", weeks, SkillProfile::new([("backend", 0.8)])).with_urgency(urgency)
}

/// Two members, one strong and one weak on backend work.
pub(super) fn scenario_members() -> Vec<Member> {
    vec![member("M1", 0.9, 0.8), member("M2", 0.2, 0.8)]
}

pub(super) fn mixed_roster() -> Vec<Member> {
    vec![
        member("Ana", 0.9, 0.9).with_project(ProjectLoad::new("billing", 4.0)),
        member("Bo", 0.6, 0.7),
        member("Cy", 0.4, 0.6).with_project(ProjectLoad::new("support", 2.0)),
        Member::new(
            "Di",
            SkillProfile::new([("frontend", 0.9), ("backend", 0.3)]),
            0.8,
            0.9,
        ),
    ]
}

pub(super) fn mixed_tasks() -> Vec<Task> {
    vec![
        backend_task("api", Urgency::High, 5.0),
        backend_task("cleanup", Urgency::Low, 3.0),
        backend_task("cache", Urgency::Medium, 4.0),
        backend_task("audit", Urgency::Low, 2.0),
        Task::new("ui", "Portal", 3.0, SkillProfile::new([("frontend", 0.7)]))
            .with_urgency(Urgency::Medium),
        Task::new("docs", "Portal", 1.0, SkillProfile::empty()).with_learning_opportunity(true),
    ]
}

pub(super) fn member_form(name: &str, skills: &str) -> MemberForm {
    MemberForm {
        name: name.to_string(),
        performance: 0.8,
        growth: 0.5,
        skills_raw: skills.to_string(),
        projects_raw: String::new(),
    }
}

pub(super) fn project_form(name: &str, weeks: f64) -> ProjectForm {
    let mut form = ProjectForm::new(name, weeks);
    form.required_skills_raw = "backend:0.8".to_string();
    form
}

#[derive(Default)]
struct RosterState {
    members: Vec<Member>,
    decision: Option<DecisionRecord>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRoster {
    state: Arc<Mutex<RosterState>>,
}

impl RosterRepository for MemoryRoster {
    fn members(&self) -> Result<Vec<Member>, RosterError> {
        Ok(self.state.lock().expect("roster mutex poisoned").members.clone())
    }

    fn add_member(&self, member: Member) -> Result<Member, RosterError> {
        let mut guard = self.state.lock().expect("roster mutex poisoned");
        if guard
            .members
            .iter()
            .any(|existing| existing.name() == member.name())
        {
            return Err(RosterError::Conflict(member.name().to_string()));
        }
        guard.members.push(member.clone());
        Ok(member)
    }

    fn replace_members(&self, members: Vec<Member>) -> Result<(), RosterError> {
        self.state.lock().expect("roster mutex poisoned").members = members;
        Ok(())
    }

    fn last_decision(&self) -> Result<Option<DecisionRecord>, RosterError> {
        Ok(self.state.lock().expect("roster mutex poisoned").decision.clone())
    }

    fn record_decision(&self, record: DecisionRecord) -> Result<(), RosterError> {
        self.state.lock().expect("roster mutex poisoned").decision = Some(record);
        Ok(())
    }

    fn commit_last_decision(&self) -> Result<Vec<Member>, RosterError> {
        let mut guard = self.state.lock().expect("roster mutex poisoned");
        let state = &mut *guard;
        let record = state.decision.as_mut().ok_or(RosterError::NoDecision)?;
        record.apply_to(&mut state.members)?;
        Ok(state.members.clone())
    }
}

pub(super) struct UnavailableRoster;

impl RosterRepository for UnavailableRoster {
    fn members(&self) -> Result<Vec<Member>, RosterError> {
        Err(RosterError::Unavailable("database offline".to_string()))
    }

    fn add_member(&self, _member: Member) -> Result<Member, RosterError> {
        Err(RosterError::Unavailable("database offline".to_string()))
    }

    fn replace_members(&self, _members: Vec<Member>) -> Result<(), RosterError> {
        Err(RosterError::Unavailable("database offline".to_string()))
    }

    fn last_decision(&self) -> Result<Option<DecisionRecord>, RosterError> {
        Err(RosterError::Unavailable("database offline".to_string()))
    }

    fn record_decision(&self, _record: DecisionRecord) -> Result<(), RosterError> {
        Err(RosterError::Unavailable("database offline".to_string()))
    }

    fn commit_last_decision(&self) -> Result<Vec<Member>, RosterError> {
        Err(RosterError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (DelegationService<MemoryRoster>, Arc<MemoryRoster>) {
    let repository = Arc::new(MemoryRoster::default());
    let service = DelegationService::new(repository.clone(), EngineConfig::default());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
