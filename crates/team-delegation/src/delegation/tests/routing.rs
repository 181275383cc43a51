use super::common::*;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::delegation::engine::EngineConfig;
use crate::delegation::router::{
    add_member_handler, commit_handler, delegation_router, evaluate_handler,
    last_decision_handler, members_handler,
};
use crate::delegation::service::DelegationService;

fn json_request(uri: &str, body: serde_json::Value) -> Request<axum::body::Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serialize body"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn add_member_handler_returns_created() {
    let (service, _) = build_service();

    let response = add_member_handler::<MemoryRoster>(
        State(Arc::new(service)),
        axum::Json(member_form("Ana", "backend:0.9")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["name"], json!("Ana"));
    assert_eq!(payload["expertise"]["backend"], json!(0.9));
}

#[tokio::test]
async fn add_member_handler_returns_conflict_on_duplicate() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    service
        .add_member(member_form("Ana", "backend:0.9"))
        .expect("first insert");

    let response = add_member_handler::<MemoryRoster>(
        State(service),
        axum::Json(member_form("Ana", "backend:0.5")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn evaluate_handler_rejects_empty_roster() {
    let (service, _) = build_service();

    let response = evaluate_handler::<MemoryRoster>(
        State(Arc::new(service)),
        axum::Json(project_form("Payments", 4.0)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("at least one member"));
}

#[tokio::test]
async fn members_handler_reports_unavailable_repository() {
    let service = DelegationService::new(Arc::new(UnavailableRoster), EngineConfig::default());

    let response = members_handler::<UnavailableRoster>(State(Arc::new(service))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn last_decision_handler_returns_not_found_before_evaluation() {
    let (service, _) = build_service();

    let response = last_decision_handler::<MemoryRoster>(State(Arc::new(service))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn commit_handler_requires_a_decision() {
    let (service, _) = build_service();

    let response = commit_handler::<MemoryRoster>(State(Arc::new(service))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn evaluate_route_returns_decision_with_insights() {
    let (service, _) = build_service();
    service.seed(scenario_members()).expect("seeded");
    let router = delegation_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/v1/assignments/evaluate",
            json!({
                "project_name": "Payments",
                "duration_weeks": 4.0,
                "required_skills_raw": "backend:0.8",
                "urgency": "high"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let decision = &payload["decision"];
    assert_eq!(decision["task_assignments"][0]["assignee"], json!("M1"));
    assert_eq!(decision["insights"].as_array().map(Vec::len), Some(2));
    assert_eq!(decision["insights"][1]["feasible"], json!(false));
    assert_eq!(payload["committed"], json!(false));
}

#[tokio::test]
async fn tasks_route_returns_plan() {
    let (service, _) = build_service();
    service.seed(scenario_members()).expect("seeded");
    let router = delegation_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/v1/assignments/tasks",
            json!([
                {"task_id": "T2", "project_name": "Payments", "duration_weeks": 5.0,
                 "required_skills_raw": "backend:0.8", "urgency": "low"},
                {"task_id": "T1", "project_name": "Payments", "duration_weeks": 5.0,
                 "required_skills_raw": "backend:0.8", "urgency": "high"}
            ]),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["assignments"][0]["task"]["id"], json!("T1"));
    assert_eq!(payload["assignments"][1]["assignee"], json!("M1"));
    assert_eq!(payload["unassigned"].as_array().map(Vec::len), Some(0));
    assert!(payload["relocation"].is_null());
}

#[tokio::test]
async fn tasks_route_rejects_duplicate_task_ids() {
    let (service, _) = build_service();
    service.seed(scenario_members()).expect("seeded");
    let router = delegation_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/v1/assignments/tasks",
            json!([
                {"project_name": "Payments", "duration_weeks": 2.0,
                 "required_skills_raw": "backend:0.8"},
                {"project_name": "Payments", "duration_weeks": 3.0,
                 "required_skills_raw": "backend:0.8"}
            ]),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("task-payments"));
}

#[tokio::test]
async fn commit_route_conflicts_on_second_commit() {
    let (service, _) = build_service();
    service.seed(scenario_members()).expect("seeded");
    service
        .evaluate(project_form("Payments", 4.0))
        .expect("evaluation succeeds");
    let service = Arc::new(service);

    let first = commit_handler::<MemoryRoster>(State(service.clone())).await;
    let second = commit_handler::<MemoryRoster>(State(service)).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn members_route_lists_roster() {
    let (service, _) = build_service();
    service.seed(scenario_members()).expect("seeded");
    let router = delegation_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/v1/members")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));
}
