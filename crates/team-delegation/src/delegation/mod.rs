//! Utility-scored task delegation: scoring, greedy assignment, balancing, and insights.

mod assigner;
pub mod balancer;
pub mod domain;
mod engine;
mod insights;
pub mod intake;
mod ledger;
pub mod roster;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use balancer::{Relocation, BALANCE_THRESHOLD};
pub use domain::{
    AssignmentDecision, AssignmentInsight, Member, ProjectDemand, ProjectLoad, SkillProfile, Task,
    TaskAssignment, Urgency, GENERAL_SKILL,
};
pub use engine::{AssignmentEngine, AssignmentPlan, EngineConfig, DEFAULT_CAPACITY_WEEKS};
pub use insights::InsightReporter;
pub use intake::{IntakeError, MemberForm, ProjectForm};
pub use ledger::{LedgerEntry, LoadLedger};
pub use roster::{DecisionRecord, RosterError, RosterRepository};
pub use router::delegation_router;
pub use scoring::{UtilityScore, UtilityScorer, Weights, EXCLUDED_UTILITY, THETA_MIN};
pub use service::{DelegationService, DelegationServiceError};
