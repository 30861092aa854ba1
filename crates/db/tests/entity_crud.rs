//! Integration tests for the repository layer against a real database:
//! - Workflow status writes keep `current_step` in sync and are guarded
//! - Scene durations are snapped on every write
//! - Generation status compare-and-set semantics
//! - Default brand kit exclusivity
//! - Ownership scoping, cascades, and aggregates

use assert_matches::assert_matches;
use reelcraft_core::generation::{
    record_poll_failure, PollFailure, KIND_VIDEO, STATUS_COMPLETED, STATUS_FAILED,
    STATUS_PROCESSING, STATUS_QUEUED,
};
use reelcraft_core::workflow::ProjectStatus;
use reelcraft_db::models::brand::{CreateBrandKit, UpdateBrandKit};
use reelcraft_db::models::generation::CreateGeneration;
use reelcraft_db::models::project::CreateProject;
use reelcraft_db::models::scene::{CreateScene, UpdateScene};
use reelcraft_db::models::template::{CreateTemplate, OutlineScene};
use reelcraft_db::models::usage::CreateUsageLog;
use reelcraft_db::models::user::CreateUser;
use reelcraft_db::repositories::{
    ApiKeyRepo, BrandKitRepo, GenerationRepo, ProjectRepo, SceneRepo, TemplateRepo, UsageRepo,
    UserRepo,
};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: None,
            role: None,
            daily_budget_cents: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        brief: None,
        brand_kit_id: None,
        campaign_id: None,
        aspect_ratio: None,
    }
}

fn new_scene(description: &str, duration: Option<i32>) -> CreateScene {
    CreateScene {
        description: description.to_string(),
        sort_order: None,
        duration_secs: duration,
        audio_config: None,
    }
}

fn new_video(user_id: i64, project_id: i64, scene_id: i64, batch: Uuid) -> CreateGeneration {
    CreateGeneration {
        user_id,
        project_id,
        scene_id: Some(scene_id),
        batch_id: Some(batch),
        kind: KIND_VIDEO.to_string(),
        status: STATUS_QUEUED.to_string(),
        provider: "veo".to_string(),
        model: "veo-3.0-generate-001".to_string(),
        prompt: Some("A runner at dawn".to_string()),
        negative_prompt: None,
        estimated_cost_cents: 400,
        duration_secs: Some(8),
    }
}

fn new_kit(name: &str, is_default: bool) -> CreateBrandKit {
    CreateBrandKit {
        name: name.to_string(),
        primary_color: Some("#112233".to_string()),
        secondary_color: None,
        accent_color: None,
        font_family: None,
        logo_url: None,
        watermark_position: None,
        watermark_opacity: None,
        is_default: Some(is_default),
    }
}

// ---------------------------------------------------------------------------
// Projects and workflow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_starts_in_draft(pool: PgPool) {
    let user = new_user(&pool, "draft@test.io").await;
    let project = ProjectRepo::create(&pool, user, &new_project("Launch"))
        .await
        .unwrap();
    assert_eq!(project.status, "draft");
    assert_eq!(project.current_step, 1);
    assert_eq!(project.aspect_ratio, "16:9");
    assert_eq!(project.brief, serde_json::json!({}));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_status_writes_step_and_respects_guard(pool: PgPool) {
    let user = new_user(&pool, "flow@test.io").await;
    let project = ProjectRepo::create(&pool, user, &new_project("Flow"))
        .await
        .unwrap();

    let moved = ProjectRepo::set_status(
        &pool,
        project.id,
        &[ProjectStatus::Draft],
        ProjectStatus::StrategyPending,
    )
    .await
    .unwrap()
    .expect("guard should match");
    assert_eq!(moved.status, "strategy_pending");
    assert_eq!(moved.current_step, 2);

    // Guard no longer matches: the project already left draft.
    let stale = ProjectRepo::set_status(
        &pool,
        project.id,
        &[ProjectStatus::Draft],
        ProjectStatus::StrategyPending,
    )
    .await
    .unwrap();
    assert!(stale.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_complete_with_video_requires_post_production(pool: PgPool) {
    let user = new_user(&pool, "final@test.io").await;
    let project = ProjectRepo::create(&pool, user, &new_project("Final"))
        .await
        .unwrap();

    let early = ProjectRepo::complete_with_video(&pool, project.id, "https://cdn/x.mp4")
        .await
        .unwrap();
    assert!(early.is_none());

    ProjectRepo::set_status(
        &pool,
        project.id,
        &ProjectStatus::PostProduction.predecessors(),
        ProjectStatus::PostProduction,
    )
    .await
    .unwrap()
    .unwrap();
    let done = ProjectRepo::complete_with_video(&pool, project.id, "https://cdn/x.mp4")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(done.status, "completed");
    assert_eq!(done.current_step, 6);
    assert_eq!(done.final_video_url.as_deref(), Some("https://cdn/x.mp4"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_projects_are_scoped_to_owner(pool: PgPool) {
    let alice = new_user(&pool, "alice@test.io").await;
    let bob = new_user(&pool, "bob@test.io").await;
    let project = ProjectRepo::create(&pool, alice, &new_project("Private"))
        .await
        .unwrap();

    assert!(ProjectRepo::find_for_user(&pool, project.id, bob)
        .await
        .unwrap()
        .is_none());
    assert!(!ProjectRepo::soft_delete(&pool, project.id, bob).await.unwrap());
    assert!(ProjectRepo::soft_delete(&pool, project.id, alice).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scene_durations_are_snapped(pool: PgPool) {
    let user = new_user(&pool, "scenes@test.io").await;
    let project = ProjectRepo::create(&pool, user, &new_project("Snap"))
        .await
        .unwrap();

    let a = SceneRepo::create(&pool, project.id, &new_scene("a", Some(5)))
        .await
        .unwrap();
    let b = SceneRepo::create(&pool, project.id, &new_scene("b", Some(30)))
        .await
        .unwrap();
    let c = SceneRepo::create(&pool, project.id, &new_scene("c", None))
        .await
        .unwrap();
    assert_eq!((a.duration_secs, b.duration_secs, c.duration_secs), (6, 8, 8));
    assert_eq!((a.sort_order, b.sort_order, c.sort_order), (0, 1, 2));

    let updated = SceneRepo::update(
        &pool,
        a.id,
        &UpdateScene {
            duration_secs: Some(1),
            is_approved: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.duration_secs, 4);

    assert_eq!(SceneRepo::approval_counts(&pool, project.id).await.unwrap(), (3, 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_scenes_keeps_order(pool: PgPool) {
    let user = new_user(&pool, "replace@test.io").await;
    let project = ProjectRepo::create(&pool, user, &new_project("Replace"))
        .await
        .unwrap();
    SceneRepo::create(&pool, project.id, &new_scene("old", None))
        .await
        .unwrap();

    let scenes = SceneRepo::replace_for_project(
        &pool,
        project.id,
        &[new_scene("first", Some(4)), new_scene("second", Some(7))],
    )
    .await
    .unwrap();
    assert_eq!(scenes.len(), 2);

    let listed = SceneRepo::list_for_project(&pool, project.id).await.unwrap();
    let descriptions: Vec<_> = listed.iter().map(|s| s.description.as_str()).collect();
    assert_eq!(descriptions, vec!["first", "second"]);
    assert_eq!(listed[1].duration_secs, 8);
}

// ---------------------------------------------------------------------------
// Generations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generation_lifecycle_compare_and_set(pool: PgPool) {
    let user = new_user(&pool, "gen@test.io").await;
    let project = ProjectRepo::create(&pool, user, &new_project("Gen"))
        .await
        .unwrap();
    let scene = SceneRepo::create(&pool, project.id, &new_scene("shot", None))
        .await
        .unwrap();
    let batch = Uuid::new_v4();
    let generation = GenerationRepo::create(&pool, &new_video(user, project.id, scene.id, batch))
        .await
        .unwrap();
    assert_eq!(generation.status, STATUS_QUEUED);
    assert!(generation.started_at.is_none());

    // Completing a queued row is refused.
    assert!(GenerationRepo::mark_completed(&pool, generation.id, "u", "k")
        .await
        .unwrap()
        .is_none());

    let processing = GenerationRepo::mark_processing(&pool, generation.id, "operations/abc")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(processing.status, STATUS_PROCESSING);
    assert_eq!(processing.operation_name.as_deref(), Some("operations/abc"));
    assert!(processing.started_at.is_some());

    let pollable = GenerationRepo::list_pollable(&pool, 10).await.unwrap();
    assert_eq!(pollable.len(), 1);

    let done = GenerationRepo::mark_completed(&pool, generation.id, "https://cdn/v.mp4", "key")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(done.status, STATUS_COMPLETED);
    assert!(done.completed_at.is_some());

    assert_eq!(
        GenerationRepo::batch_statuses(&pool, batch).await.unwrap(),
        vec![STATUS_COMPLETED.to_string()]
    );
    let latest = GenerationRepo::latest_completed_videos(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].id, generation.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_third_poll_failure_marks_failed(pool: PgPool) {
    let user = new_user(&pool, "retry@test.io").await;
    let project = ProjectRepo::create(&pool, user, &new_project("Retry"))
        .await
        .unwrap();
    let scene = SceneRepo::create(&pool, project.id, &new_scene("shot", None))
        .await
        .unwrap();
    let generation =
        GenerationRepo::create(&pool, &new_video(user, project.id, scene.id, Uuid::new_v4()))
            .await
            .unwrap();
    let mut row = GenerationRepo::mark_processing(&pool, generation.id, "operations/x")
        .await
        .unwrap()
        .unwrap();

    for attempt in 1..=3 {
        let (next, give_up) = match record_poll_failure(row.retry_count) {
            PollFailure::Retry { retry_count } => (retry_count, false),
            PollFailure::GiveUp { retry_count } => (retry_count, true),
        };
        row = GenerationRepo::record_poll_failure(
            &pool,
            row.id,
            row.retry_count,
            next,
            "upstream 500",
            give_up,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(row.retry_count, attempt);
        let expected = if attempt < 3 { STATUS_PROCESSING } else { STATUS_FAILED };
        assert_eq!(row.status, expected);
    }
    assert_eq!(row.error_message.as_deref(), Some("upstream 500"));

    // A stale retry count no longer matches.
    let stale = GenerationRepo::record_poll_failure(&pool, row.id, 0, 1, "late", false)
        .await
        .unwrap();
    assert!(stale.is_none());
}

// ---------------------------------------------------------------------------
// Brand kits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_one_default_brand_kit(pool: PgPool) {
    let user = new_user(&pool, "brand@test.io").await;
    let first = BrandKitRepo::create(&pool, user, &new_kit("First", true))
        .await
        .unwrap();
    let second = BrandKitRepo::create(&pool, user, &new_kit("Second", true))
        .await
        .unwrap();

    let default = BrandKitRepo::find_default(&pool, user).await.unwrap().unwrap();
    assert_eq!(default.id, second.id);

    BrandKitRepo::update(
        &pool,
        first.id,
        user,
        &UpdateBrandKit {
            is_default: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    let kits = BrandKitRepo::list_for_user(&pool, user).await.unwrap();
    let defaults: Vec<_> = kits.iter().filter(|k| k.is_default).map(|k| k.id).collect();
    assert_eq!(defaults, vec![first.id]);
    assert_eq!(kits[0].watermark_position, "bottom_right");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_default_update_on_missing_kit_keeps_current_default(pool: PgPool) {
    let user = new_user(&pool, "brand-miss@test.io").await;
    let other = new_user(&pool, "brand-other@test.io").await;
    let kit = BrandKitRepo::create(&pool, user, &new_kit("Main", true))
        .await
        .unwrap();
    let foreign = BrandKitRepo::create(&pool, other, &new_kit("Theirs", false))
        .await
        .unwrap();

    let make_default = UpdateBrandKit {
        is_default: Some(true),
        ..Default::default()
    };
    for missing in [999_999, foreign.id] {
        let updated = BrandKitRepo::update(&pool, missing, user, &make_default)
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    let default = BrandKitRepo::find_default(&pool, user).await.unwrap().unwrap();
    assert_eq!(default.id, kit.id);
    let foreign = BrandKitRepo::find_by_id(&pool, foreign.id).await.unwrap().unwrap();
    assert!(!foreign.is_default);
}

// ---------------------------------------------------------------------------
// Templates, usage, API keys
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_templates_visible_to_others(pool: PgPool) {
    let owner = new_user(&pool, "owner@test.io").await;
    let other = new_user(&pool, "other@test.io").await;
    let template = TemplateRepo::create(
        &pool,
        owner,
        &CreateTemplate {
            name: "Product teaser".to_string(),
            description: None,
            category: Some("ecommerce".to_string()),
            aspect_ratio: Some("9:16".to_string()),
            brief: None,
            scene_outline: Some(vec![OutlineScene {
                description: "Unboxing".to_string(),
                duration_secs: Some(6),
            }]),
            is_public: Some(true),
        },
    )
    .await
    .unwrap();
    assert_eq!(template.outline().len(), 1);

    let visible = TemplateRepo::list_visible(&pool, other, None).await.unwrap();
    assert_eq!(visible.len(), 1);
    // Visible is not the same as owned.
    assert!(!TemplateRepo::delete(&pool, template.id, other).await.unwrap());

    TemplateRepo::increment_use_count(&pool, template.id).await.unwrap();
    let reloaded = TemplateRepo::find_visible(&pool, template.id, other)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.use_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_usage_spent_today(pool: PgPool) {
    let user = new_user(&pool, "usage@test.io").await;
    for cents in [100, 250] {
        UsageRepo::create(
            &pool,
            &CreateUsageLog {
                user_id: user,
                project_id: None,
                generation_id: None,
                service: "video",
                model: "veo".to_string(),
                units: 1,
                cost_cents: cents,
            },
        )
        .await
        .unwrap();
    }
    assert_eq!(UsageRepo::spent_today(&pool, user).await.unwrap(), 350);
    let series = UsageRepo::daily_series(&pool, user, 7).await.unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].calls, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revoked_api_key_does_not_authenticate(pool: PgPool) {
    let user = new_user(&pool, "keys@test.io").await;
    let key = ApiKeyRepo::create(&pool, user, "ci", "hash-1", "rc_abcdefg")
        .await
        .unwrap();

    let found = ApiKeyRepo::authenticate(&pool, "hash-1").await.unwrap();
    assert_matches!(found, Some(k) if k.user_id == user && k.last_used_at.is_some());

    assert!(ApiKeyRepo::revoke(&pool, key.id, user).await.unwrap());
    assert!(ApiKeyRepo::authenticate(&pool, "hash-1").await.unwrap().is_none());
    assert!(!ApiKeyRepo::revoke(&pool, key.id, user).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    new_user(&pool, "dup@test.io").await;
    let result = UserRepo::create(
        &pool,
        &CreateUser {
            email: "dup@test.io".to_string(),
            display_name: None,
            role: None,
            daily_budget_cents: None,
        },
    )
    .await;
    assert!(result.is_err(), "Duplicate email should fail");
}
