mod common;

use assert_matches::assert_matches;
use reelcraft_core::error::CoreError;
use reelcraft_core::workflow::ProjectStatus;
use reelcraft_db::repositories::{ProjectRepo, SceneRepo};
use reelcraft_pipeline::creative::{generate_scenes, generate_strategy, optimize_prompt};
use reelcraft_pipeline::PipelineError;
use sqlx::PgPool;

use common::{harness, seed_approved_scene, seed_project, seed_user};

const STRATEGY_REPLY: &str = r#"```json
{
  "headline": "Own the trail",
  "core_message": "Grip that keeps up with you",
  "target_emotion": "confidence",
  "visual_style": "golden hour, handheld",
  "narrative_arc": ["hook", "struggle", "triumph"],
  "hooks": ["Mud? Bring it."],
  "recommended_scene_count": 3
}
```"#;

const SCENES_REPLY: &str = r#"{"scenes": [
  {"description": "Runner laces up at the trailhead", "duration_secs": 5,
   "voiceover_script": "Every trail starts here."},
  {"description": "Sprint through a muddy switchback", "duration_secs": 30},
  {"description": "   "}
]}"#;

const PROMPT_REPLY: &str = r#"{"prompt": "Cinematic close-up, runner lacing trail shoes, golden hour",
  "negative_prompt": "blurry, text, watermark"}"#;

#[sqlx::test(migrations = "../../db/migrations")]
async fn strategy_then_scenes(pool: PgPool) {
    let h = harness(pool.clone());
    let user = seed_user(&pool, "creative@example.com", None).await;
    let project = seed_project(&pool, user.id, ProjectStatus::StrategyPending).await;

    h.text.reply(STRATEGY_REPLY);
    let project = generate_strategy(&h.ctx, user.id, project.id).await.unwrap();
    assert_eq!(project.status, "scenes_pending");
    assert_eq!(project.strategy.as_ref().unwrap()["headline"], "Own the trail");

    h.text.reply(SCENES_REPLY);
    let scenes = generate_scenes(&h.ctx, user.id, project.id).await.unwrap();
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].duration_secs, 6);
    assert_eq!(scenes[1].duration_secs, 8);
    assert_eq!(
        scenes[0].audio().script(),
        Some("Every trail starts here.")
    );
    assert!(!scenes[0].is_approved);

    // Regenerating replaces rather than appends.
    h.text.reply(SCENES_REPLY);
    generate_scenes(&h.ctx, user.id, project.id).await.unwrap();
    assert_eq!(SceneRepo::list_for_project(&pool, project.id).await.unwrap().len(), 2);
    assert_eq!(h.text.calls(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn strategy_can_be_regenerated_before_scenes(pool: PgPool) {
    let h = harness(pool.clone());
    let user = seed_user(&pool, "regen@example.com", None).await;
    let project = seed_project(&pool, user.id, ProjectStatus::ScenesPending).await;

    h.text.reply(STRATEGY_REPLY);
    let project = generate_strategy(&h.ctx, user.id, project.id).await.unwrap();
    assert_eq!(project.status, "scenes_pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn strategy_rejected_in_draft(pool: PgPool) {
    let h = harness(pool.clone());
    let user = seed_user(&pool, "draft@example.com", None).await;
    let project = seed_project(&pool, user.id, ProjectStatus::Draft).await;

    let result = generate_strategy(&h.ctx, user.id, project.id).await;
    assert_matches!(result, Err(PipelineError::Core(CoreError::Conflict(_))));
    assert_eq!(h.text.calls(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unreadable_strategy_leaves_project_untouched(pool: PgPool) {
    let h = harness(pool.clone());
    let user = seed_user(&pool, "junk@example.com", None).await;
    let project = seed_project(&pool, user.id, ProjectStatus::StrategyPending).await;

    h.text.reply("I'm sorry, I can't help with that.");
    let result = generate_strategy(&h.ctx, user.id, project.id).await;
    assert_matches!(result, Err(PipelineError::Core(CoreError::Internal(_))));

    let project = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(project.status, "strategy_pending");
    assert!(project.strategy.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scenes_require_a_strategy(pool: PgPool) {
    let h = harness(pool.clone());
    let user = seed_user(&pool, "nostrat@example.com", None).await;
    let project = seed_project(&pool, user.id, ProjectStatus::ScenesPending).await;

    let result = generate_scenes(&h.ctx, user.id, project.id).await;
    assert_matches!(result, Err(PipelineError::Core(CoreError::Conflict(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn identical_prompt_requests_hit_the_cache(pool: PgPool) {
    let h = harness(pool.clone());
    let user = seed_user(&pool, "cache@example.com", None).await;
    let project = seed_project(&pool, user.id, ProjectStatus::PromptsPending).await;
    let first = seed_approved_scene(&pool, project.id, "Runner laces up").await;
    let second = seed_approved_scene(&pool, project.id, "Runner laces up").await;

    h.text.reply(PROMPT_REPLY);
    let first = optimize_prompt(&h.ctx, user.id, first.id).await.unwrap();
    let second = optimize_prompt(&h.ctx, user.id, second.id).await.unwrap();

    assert_eq!(h.text.calls(), 1);
    assert_eq!(first.optimized_prompt, second.optimized_prompt);
    assert_eq!(
        second.negative_prompt.as_deref(),
        Some("blurry, text, watermark")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_users_cannot_touch_a_project(pool: PgPool) {
    let h = harness(pool.clone());
    let owner = seed_user(&pool, "owner@example.com", None).await;
    let stranger = seed_user(&pool, "stranger@example.com", None).await;
    let project = seed_project(&pool, owner.id, ProjectStatus::StrategyPending).await;

    let result = generate_strategy(&h.ctx, stranger.id, project.id).await;
    assert_matches!(
        result,
        Err(PipelineError::Core(CoreError::NotFound { entity: "Project", .. }))
    );
}
