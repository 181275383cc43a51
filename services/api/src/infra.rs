use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use team_delegation::delegation::{DecisionRecord, Member, RosterError, RosterRepository};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct RosterState {
    members: Vec<Member>,
    decision: Option<DecisionRecord>,
}

/// Process-local roster store. Contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRosterRepository {
    state: Arc<Mutex<RosterState>>,
}

impl InMemoryRosterRepository {
    fn lock(&self) -> Result<MutexGuard<'_, RosterState>, RosterError> {
        self.state
            .lock()
            .map_err(|_| RosterError::Unavailable("roster lock poisoned".to_string()))
    }
}

impl RosterRepository for InMemoryRosterRepository {
    fn members(&self) -> Result<Vec<Member>, RosterError> {
        Ok(self.lock()?.members.clone())
    }

    fn add_member(&self, member: Member) -> Result<Member, RosterError> {
        let mut guard = self.lock()?;
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
        self.lock()?.members = members;
        Ok(())
    }

    fn last_decision(&self) -> Result<Option<DecisionRecord>, RosterError> {
        Ok(self.lock()?.decision.clone())
    }

    fn record_decision(&self, record: DecisionRecord) -> Result<(), RosterError> {
        self.lock()?.decision = Some(record);
        Ok(())
    }

    fn commit_last_decision(&self) -> Result<Vec<Member>, RosterError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let record = state.decision.as_mut().ok_or(RosterError::NoDecision)?;
        record.apply_to(&mut state.members)?;
        Ok(state.members.clone())
    }
}

/// Converts the CLI form `backend:0.8,ux:0.5` into the line-based intake format.
pub(crate) fn pairs_to_lines(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
