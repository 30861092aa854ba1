//! Project CRUD and the six-step workflow driven over HTTP.

mod common;

use axum::http::StatusCode;
use reelcraft_ai::OperationStatus;
use serde_json::json;
use sqlx::PgPool;

use common::{body_data, body_json, build_test_app, send, TestApp};

const STRATEGY_REPLY: &str = r#"{
  "headline": "Own the trail",
  "core_message": "Grip that keeps up with you",
  "narrative_arc": ["hook", "struggle", "triumph"],
  "recommended_scene_count": 2
}"#;

const SCENES_REPLY: &str = r#"{"scenes": [
  {"description": "Runner laces up at the trailhead", "duration_secs": 6},
  {"description": "Sprint through a muddy switchback", "duration_secs": 8}
]}"#;

fn project_body() -> serde_json::Value {
    json!({
        "name": "Trail shoe launch",
        "brief": {
            "product": "Trail running shoe",
            "audience": "Weekend runners"
        }
    })
}

async fn create_project(app: &TestApp) -> i64 {
    let response = app.post("/api/v1/projects", project_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_data(response).await["id"].as_i64().unwrap()
}

async fn advance_to(app: &TestApp, id: i64, to: &str) {
    let response = app
        .post(&format!("/api/v1/projects/{id}/advance"), json!({"to": to}))
        .await;
    assert_eq!(response.status(), StatusCode::OK, "advance to {to}");
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_get_update_delete(pool: PgPool) {
    let app = build_test_app(pool).await;

    let response = app.post("/api/v1/projects", project_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project = body_data(response).await;
    assert_eq!(project["status"], "draft");
    assert_eq!(project["current_step"], 1);
    assert_eq!(project["aspect_ratio"], "16:9");
    let id = project["id"].as_i64().unwrap();

    let fetched = body_data(app.get(&format!("/api/v1/projects/{id}")).await).await;
    assert_eq!(fetched["name"], "Trail shoe launch");

    let response = app
        .put(
            &format!("/api/v1/projects/{id}"),
            json!({"name": "Trail shoe relaunch", "aspect_ratio": "9:16"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_data(response).await;
    assert_eq!(updated["name"], "Trail shoe relaunch");
    assert_eq!(updated["aspect_ratio"], "9:16");

    let listed = body_data(app.get("/api/v1/projects").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app.delete(&format!("/api/v1/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(&format!("/api/v1/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let listed = body_data(app.get("/api/v1/projects").await).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_aspect_ratio_is_rejected(pool: PgPool) {
    let app = build_test_app(pool).await;

    let response = app
        .post(
            "/api/v1/projects",
            json!({"name": "Odd shape", "aspect_ratio": "5:4"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_name_is_rejected(pool: PgPool) {
    let app = build_test_app(pool).await;

    let response = app.post("/api/v1/projects", json!({"name": ""})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_users_project_is_not_found(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;
    let other = app.token_for_new_user("other@example.com").await;

    let response = send(
        app.router(),
        "GET",
        &format!("/api/v1/projects/{id}"),
        Some(&other),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], format!("Project with id {id} not found"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_brand_kit_reference_is_rejected(pool: PgPool) {
    let app = build_test_app(pool).await;
    let other = app.token_for_new_user("other@example.com").await;
    let response = send(
        app.router(),
        "POST",
        "/api/v1/brand-kits",
        Some(&other),
        Some(json!({"name": "Not yours"})),
    )
    .await;
    let kit_id = body_data(response).await["id"].as_i64().unwrap();

    let response = app
        .post(
            "/api/v1/projects",
            json!({"name": "Borrowed kit", "brand_kit_id": kit_id}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn brief_submission_requires_product_and_audience(pool: PgPool) {
    let app = build_test_app(pool).await;
    let response = app
        .post("/api/v1/projects", json!({"name": "No brief yet"}))
        .await;
    let id = body_data(response).await["id"].as_i64().unwrap();

    let response = app
        .post(&format!("/api/v1/projects/{id}/brief/submit"), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let project = body_data(app.get(&format!("/api/v1/projects/{id}")).await).await;
    assert_eq!(project["status"], "draft");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn brief_cannot_be_submitted_twice(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;

    let response = app
        .post(&format!("/api/v1/projects/{id}/brief/submit"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_data(response).await["status"], "strategy_pending");

    let response = app
        .post(&format!("/api/v1/projects/{id}/brief/submit"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_workflow_through_generation(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;

    // Step 1 -> 2
    app.post(&format!("/api/v1/projects/{id}/brief/submit"), json!({}))
        .await;

    // Step 2 -> 3: strategy from the LLM
    app.text.reply(STRATEGY_REPLY);
    let response = app
        .post(&format!("/api/v1/projects/{id}/strategy"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let project = body_data(response).await;
    assert_eq!(project["status"], "scenes_pending");
    assert_eq!(project["strategy"]["headline"], "Own the trail");

    // Scene breakdown
    app.text.reply(SCENES_REPLY);
    let response = app
        .post(&format!("/api/v1/projects/{id}/scenes/generate"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let scenes = body_data(response).await;
    let scenes = scenes.as_array().unwrap().clone();
    assert_eq!(scenes.len(), 2);

    // Confirm fails until every scene is approved.
    let response = app
        .post(&format!("/api/v1/projects/{id}/scenes/confirm"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for scene in &scenes {
        let response = app
            .put(
                &format!("/api/v1/scenes/{}", scene["id"]),
                json!({"is_approved": true}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Step 3 -> 4
    let response = app
        .post(&format!("/api/v1/projects/{id}/scenes/confirm"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_data(response).await["status"], "prompts_pending");

    // Step 4 -> 5: one video job per approved scene.
    let response = app
        .post(&format!("/api/v1/projects/{id}/generate"), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let batch = body_data(response).await;
    let generations = batch["generations"].as_array().unwrap().clone();
    assert_eq!(generations.len(), 2);
    assert!(generations.iter().all(|g| g["status"] == "processing"));
    assert!(batch["estimated_cost_cents"].as_i64().unwrap() > 0);

    let project = body_data(app.get(&format!("/api/v1/projects/{id}")).await).await;
    assert_eq!(project["status"], "generating");

    // Scenes are frozen while generating.
    let response = app
        .put(
            &format!("/api/v1/scenes/{}", scenes[0]["id"]),
            json!({"description": "Too late"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let response = app
        .post(
            &format!("/api/v1/projects/{id}/scenes"),
            json!({"description": "One more"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Polling each generation once completes the batch.
    for generation in &generations {
        app.video.script_poll(OperationStatus::Succeeded {
            video_uri: "https://vendor.example/clip.mp4".to_string(),
        });
        let response = app
            .get(&format!("/api/v1/generations/{}", generation["id"]))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let polled = body_data(response).await;
        assert_eq!(polled["status"], "completed");
        assert!(polled["output_url"].is_string());
    }

    let project = body_data(app.get(&format!("/api/v1/projects/{id}")).await).await;
    assert_eq!(project["status"], "post_production");
    assert_eq!(app.store.keys().len(), 2);

    let listed = body_data(
        app.get(&format!("/api/v1/projects/{id}/generations?kind=video"))
            .await,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn llm_failure_maps_to_bad_gateway(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;
    app.post(&format!("/api/v1/projects/{id}/brief/submit"), json!({}))
        .await;

    // No canned reply queued: the fake errors.
    let response = app
        .post(&format!("/api/v1/projects/{id}/strategy"), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");
    let project = body_data(app.get(&format!("/api/v1/projects/{id}")).await).await;
    assert_eq!(project["status"], "strategy_pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn advance_defaults_to_next_step(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;

    let response = app
        .post(&format!("/api/v1/projects/{id}/advance"), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let project = body_data(response).await;
    assert_eq!(project["status"], "strategy_pending");
    assert_eq!(project["current_step"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn advance_never_moves_backwards(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;
    advance_to(&app, id, "scenes_pending").await;

    let response = app
        .post(
            &format!("/api/v1/projects/{id}/advance"),
            json!({"to": "draft"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .post(
            &format!("/api/v1/projects/{id}/advance"),
            json!({"to": "scenes_pending"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completed_project_cannot_advance(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;
    advance_to(&app, id, "completed").await;

    let response = app
        .post(&format!("/api/v1/projects/{id}/advance"), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_requires_prompts_pending(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;

    let response = app
        .post(&format!("/api/v1/projects/{id}/generate"), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_without_approved_scenes_is_rejected(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;
    app.post(
        &format!("/api/v1/projects/{id}/scenes"),
        json!({"description": "Not yet approved"}),
    )
    .await;
    advance_to(&app, id, "prompts_pending").await;

    let response = app
        .post(&format!("/api/v1/projects/{id}/generate"), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scene_durations_are_snapped(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;

    let response = app
        .post(
            &format!("/api/v1/projects/{id}/scenes"),
            json!({"description": "Hero shot", "duration_secs": 30}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_data(response).await["duration_secs"], 8);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_generation_kind_filter_is_rejected(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;

    let response = app
        .get(&format!("/api/v1/projects/{id}/generations?kind=hologram"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn storyboard_image_is_stored(pool: PgPool) {
    let app = build_test_app(pool).await;
    let id = create_project(&app).await;
    let scene = body_data(
        app.post(
            &format!("/api/v1/projects/{id}/scenes"),
            json!({"description": "Hero shot"}),
        )
        .await,
    )
    .await;

    let response = app
        .post(&format!("/api/v1/scenes/{}/image", scene["id"]), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let generation = body_data(response).await;
    assert_eq!(generation["kind"], "image");
    assert_eq!(generation["status"], "completed");
    assert_eq!(app.store.keys().len(), 1);
}
