//! Templates, calendar, notifications, usage, analytics, and `/me`.

mod common;

use axum::http::StatusCode;
use reelcraft_db::models::notification::CreateNotification;
use reelcraft_db::models::usage::CreateUsageLog;
use reelcraft_db::repositories::{NotificationRepo, UsageRepo};
use serde_json::json;
use sqlx::PgPool;

use common::{body_data, build_test_app, seed_user, send, token_for, TestApp};

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

fn template_body() -> serde_json::Value {
    json!({
        "name": "Product teaser",
        "category": "launch",
        "aspect_ratio": "9:16",
        "brief": {"product": "Cold brew", "audience": "Commuters"},
        "scene_outline": [
            {"description": "Condensation on the can", "duration_secs": 4},
            {"description": "First sip on the platform"}
        ]
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn use_template_creates_project_with_scenes(pool: PgPool) {
    let app = build_test_app(pool).await;
    let response = app.post("/api/v1/templates", template_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let template_id = body_data(response).await["id"].as_i64().unwrap();

    let response = app
        .post(&format!("/api/v1/templates/{template_id}/use"), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let project = body_data(response).await;
    assert_eq!(project["name"], "Product teaser");
    assert_eq!(project["aspect_ratio"], "9:16");
    assert_eq!(project["status"], "draft");
    assert_eq!(project["brief"]["product"], "Cold brew");

    let scenes = body_data(
        app.get(&format!("/api/v1/projects/{}/scenes", project["id"]))
            .await,
    )
    .await;
    let scenes = scenes.as_array().unwrap();
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0]["description"], "Condensation on the can");
    assert_eq!(scenes[0]["duration_secs"], 4);

    let template = body_data(app.get(&format!("/api/v1/templates/{template_id}")).await).await;
    assert_eq!(template["use_count"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn members_cannot_publish_public_templates(pool: PgPool) {
    let app = build_test_app(pool).await;
    let mut body = template_body();
    body["is_public"] = json!(true);

    let response = app.post("/api/v1/templates", body.clone()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = seed_user(app.pool(), "admin@example.com", "admin").await;
    let response = send(
        app.router(),
        "POST",
        "/api/v1/templates",
        Some(&token_for(&admin)),
        Some(body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let template_id = body_data(response).await["id"].as_i64().unwrap();

    // Public templates are visible to everyone.
    let listed = body_data(app.get("/api/v1/templates?category=launch").await).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == template_id));

    // But only the author can change them.
    let response = app
        .put(
            &format!("/api/v1/templates/{template_id}"),
            json!({"name": "Hijacked"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_templates_are_hidden_from_others(pool: PgPool) {
    let app = build_test_app(pool).await;
    let template_id = body_data(app.post("/api/v1/templates", template_body()).await).await["id"]
        .as_i64()
        .unwrap();
    let other = app.token_for_new_user("other@example.com").await;

    let response = send(
        app.router(),
        "POST",
        &format!("/api/v1/templates/{template_id}/use"),
        Some(&other),
        Some(json!({})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn calendar_range_filter(pool: PgPool) {
    let app = build_test_app(pool).await;
    for (title, starts_at) in [
        ("March launch", "2026-03-10T09:00:00Z"),
        ("April review", "2026-04-02T15:00:00Z"),
    ] {
        let response = app
            .post(
                "/api/v1/calendar/events",
                json!({"title": title, "event_type": "launch", "starts_at": starts_at}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let events = body_data(
        app.get("/api/v1/calendar/events?from=2026-04-01T00:00:00Z&to=2026-04-30T00:00:00Z")
            .await,
    )
    .await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "April review");

    let response = app
        .get("/api/v1/calendar/events?from=2026-05-01T00:00:00Z&to=2026-04-01T00:00:00Z")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn calendar_event_validation(pool: PgPool) {
    let app = build_test_app(pool).await;

    let response = app
        .post(
            "/api/v1/calendar/events",
            json!({
                "title": "Backwards",
                "starts_at": "2026-03-10T10:00:00Z",
                "ends_at": "2026-03-10T09:00:00Z"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post(
            "/api/v1/calendar/events",
            json!({"title": "Party", "event_type": "party", "starts_at": "2026-03-10T10:00:00Z"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Moving the start past an existing end is checked against merged values.
    let event = body_data(
        app.post(
            "/api/v1/calendar/events",
            json!({
                "title": "Shoot",
                "starts_at": "2026-03-10T09:00:00Z",
                "ends_at": "2026-03-10T12:00:00Z"
            }),
        )
        .await,
    )
    .await;
    let response = app
        .put(
            &format!("/api/v1/calendar/events/{}", event["id"]),
            json!({"starts_at": "2026-03-10T13:00:00Z"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

async fn seed_notification(app: &TestApp, title: &str) -> i64 {
    NotificationRepo::create(
        app.pool(),
        &CreateNotification {
            user_id: app.user.id,
            event_type: "generation.completed".to_string(),
            title: title.to_string(),
            body: None,
            entity_type: Some("generation".to_string()),
            entity_id: Some(1),
        },
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn notification_read_state(pool: PgPool) {
    let app = build_test_app(pool).await;
    let first = seed_notification(&app, "Your video is ready").await;
    seed_notification(&app, "Your image is ready").await;
    seed_notification(&app, "Your voiceover is ready").await;

    let count = body_data(app.get("/api/v1/notifications/unread-count").await).await;
    assert_eq!(count["unread_count"], 3);

    let response = app
        .post(&format!("/api/v1/notifications/{first}/read"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Already read: nothing to mark.
    let response = app
        .post(&format!("/api/v1/notifications/{first}/read"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let unread = body_data(app.get("/api/v1/notifications?unread_only=true").await).await;
    assert_eq!(unread.as_array().unwrap().len(), 2);
    let page = body_data(app.get("/api/v1/notifications?limit=1").await).await;
    assert_eq!(page.as_array().unwrap().len(), 1);

    let marked = body_data(app.post("/api/v1/notifications/read-all", json!({})).await).await;
    assert_eq!(marked["marked_count"], 2);
    let count = body_data(app.get("/api/v1/notifications/unread-count").await).await;
    assert_eq!(count["unread_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn notifications_are_private(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = seed_notification(&app, "Mine").await;
    let other = app.token_for_new_user("other@example.com").await;

    let response = send(
        app.router(),
        "POST",
        &format!("/api/v1/notifications/{id}/read"),
        Some(&other),
        Some(json!({})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Usage, analytics, profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn usage_report_sums_spend(pool: PgPool) {
    let app = build_test_app(pool).await;
    for (service, cents) in [("video", 400), ("llm", 1), ("video", 600)] {
        UsageRepo::create(
            app.pool(),
            &CreateUsageLog {
                user_id: app.user.id,
                project_id: None,
                generation_id: None,
                service,
                model: "fake".to_string(),
                units: 1,
                cost_cents: cents,
            },
        )
        .await
        .unwrap();
    }

    let report = body_data(app.get("/api/v1/usage?days=7").await).await;
    assert_eq!(report["days"], 7);
    assert_eq!(report["total_cents"], 1001);
    assert_eq!(report["today"]["spent_cents"], 1001);
    assert_eq!(report["today"]["budget_cents"], 2000);
    assert_eq!(report["today"]["remaining_cents"], 999);

    let budget = body_data(app.get("/api/v1/usage/budget").await).await;
    assert_eq!(budget["remaining_cents"], 999);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exhausted_budget_blocks_generation(pool: PgPool) {
    let app = build_test_app(pool).await;
    app.put("/api/v1/me", json!({"daily_budget_cents": 100}))
        .await;
    let project = body_data(
        app.post("/api/v1/projects", json!({"name": "Pricey"}))
            .await,
    )
    .await;
    let id = project["id"].as_i64().unwrap();
    let scene = body_data(
        app.post(
            &format!("/api/v1/projects/{id}/scenes"),
            json!({"description": "Eight seconds of drone footage"}),
        )
        .await,
    )
    .await;
    app.put(
        &format!("/api/v1/scenes/{}", scene["id"]),
        json!({"is_approved": true}),
    )
    .await;
    app.post(
        &format!("/api/v1/projects/{id}/advance"),
        json!({"to": "prompts_pending"}),
    )
    .await;

    let response = app
        .post(&format!("/api/v1/projects/{id}/generate"), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let project = body_data(app.get(&format!("/api/v1/projects/{id}")).await).await;
    assert_eq!(project["status"], "prompts_pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn analytics_overview_counts_projects(pool: PgPool) {
    let app = build_test_app(pool).await;
    for name in ["One", "Two"] {
        app.post("/api/v1/projects", json!({"name": name})).await;
    }

    let overview = body_data(app.get("/api/v1/analytics/overview").await).await;

    let by_status = overview["projects_by_status"].as_array().unwrap();
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0]["status"], "draft");
    assert_eq!(by_status[0]["count"], 2);
    assert_eq!(overview["spend_last_30_days_cents"], 0);
    assert_eq!(overview["campaign_performance"]["impressions"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_update(pool: PgPool) {
    let app = build_test_app(pool).await;

    let response = app
        .put(
            "/api/v1/me",
            json!({"display_name": "Casey", "daily_budget_cents": 5000}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_data(response).await;
    assert_eq!(me["display_name"], "Casey");
    assert_eq!(me["daily_budget_cents"], 5000);
    assert_eq!(me["role"], "member");

    let response = app
        .put("/api/v1/me", json!({"daily_budget_cents": -1}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
