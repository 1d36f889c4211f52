//! Loop behavior against scripted collaborators.

mod test_utils;

use manimate_core::AnimationRequest;
use manimate_error::{LlmErrorKind, PipelineErrorKind, RenderErrorKind, ScriptStage, ValidationErrorKind};
use manimate_pipeline::{AnimationPipeline, PipelineSettings};
use std::time::Duration;
use test_utils::{
    MockGateway, MockRenderer, MockReply, MockStore, scene_json, scene_source, script_json,
};

fn settings(max_attempts: u32, review: bool) -> anyhow::Result<PipelineSettings> {
    Ok(PipelineSettings::builder()
        .max_attempts(max_attempts)
        .review_enabled(review)
        .brief_timeout(Duration::from_secs(5))
        .build()?)
}

fn plain_request(prompt: &str) -> anyhow::Result<AnimationRequest> {
    Ok(AnimationRequest::builder()
        .user_prompt(prompt)
        .use_enhancement(false)
        .build()?)
}

#[tokio::test]
async fn renders_on_first_attempt() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![MockReply::Structured(scene_json("CircleScene"), "resp_gen")]);
    let renderer = MockRenderer::new(vec![MockRenderer::rendered("out/CircleScene.mp4")]);
    let store = MockStore::new();
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer.clone(), store.clone(), settings(3, false)?);

    let result = pipeline.run(&plain_request("draw a circle")?).await?;

    assert_eq!(*result.attempt(), 1);
    assert_eq!(result.entry_point(), "CircleScene");
    assert_eq!(result.artifact_path().to_str(), Some("out/CircleScene.mp4"));
    assert!(result.archived_at().is_some());
    assert_eq!(gateway.call_count(), 1);
    assert_eq!(renderer.render_count(), 1);
    assert_eq!(renderer.check_count(), 1);

    let calls = gateway.calls();
    assert!(calls[0].active_continuation().is_none());
    assert!(calls[0].schema().is_some());
    assert!(calls[0].input().contains("draw a circle"));

    let persisted = store.persisted();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].prompt, "draw a circle");
    assert_eq!(persisted[0].attempt, 1);
    assert_eq!(persisted[0].max_attempts, 3);
    Ok(())
}

#[tokio::test]
async fn repairs_until_render_succeeds() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![
        MockReply::Structured(scene_json("CircleScene"), "resp_gen"),
        MockReply::Structured(scene_json("CircleScene"), "resp_fix1"),
        MockReply::Structured(scene_json("CircleScene"), "resp_fix2"),
    ]);
    let renderer = MockRenderer::new(vec![
        MockRenderer::failed("NameError: name 'Circl' is not defined"),
        MockRenderer::failed("TypeError: unexpected keyword 'colour'"),
        MockRenderer::rendered("out/CircleScene.mp4"),
    ]);
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer.clone(), MockStore::new(), settings(3, false)?);

    let result = pipeline.run(&plain_request("draw a circle")?).await?;

    assert_eq!(*result.attempt(), 3);
    assert_eq!(gateway.call_count(), 3);
    assert_eq!(renderer.render_count(), 3);

    let calls = gateway.calls();
    assert!(calls[1].input().contains("NameError: name 'Circl' is not defined"));
    assert!(calls[1].input().contains("**Attempt:** 2/3"));
    assert!(calls[2].input().contains("TypeError: unexpected keyword 'colour'"));
    assert!(calls[2].input().contains("**Attempt:** 3/3"));
    assert_eq!(gateway.continuation_of(1), "resp_gen");
    assert_eq!(gateway.continuation_of(2), "resp_fix1");
    Ok(())
}

#[tokio::test]
async fn exhausted_budget_reports_last_diagnostic() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![
        MockReply::Structured(scene_json("CircleScene"), "resp_gen"),
        MockReply::Structured(scene_json("CircleScene"), "resp_fix1"),
        MockReply::Structured(scene_json("CircleScene"), "resp_fix2"),
    ]);
    let renderer = MockRenderer::new(vec![
        MockRenderer::failed("first"),
        MockRenderer::failed("second"),
        MockRenderer::failed("third"),
    ]);
    let store = MockStore::new();
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer.clone(), store.clone(), settings(3, false)?);

    let err = pipeline
        .run(&plain_request("draw a circle")?)
        .await
        .expect_err("all renders fail");

    match &err.kind {
        PipelineErrorKind::RenderExhausted {
            attempts,
            max_attempts,
            entry_point,
            diagnostic,
        } => {
            assert_eq!(*attempts, 3);
            assert_eq!(*max_attempts, 3);
            assert_eq!(entry_point, "CircleScene");
            assert_eq!(diagnostic, "third");
        }
        other => panic!("unexpected failure: {other}"),
    }
    // One generation and two repairs; no repair after the final attempt.
    assert_eq!(gateway.call_count(), 3);
    assert_eq!(renderer.render_count(), 3);
    assert!(store.persisted().is_empty());
    Ok(())
}

#[tokio::test]
async fn single_attempt_budget_never_repairs() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![MockReply::Structured(scene_json("CircleScene"), "resp_gen")]);
    let renderer = MockRenderer::new(vec![MockRenderer::failed("boom")]);
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer.clone(), MockStore::new(), settings(1, false)?);

    let err = pipeline
        .run(&plain_request("draw a circle")?)
        .await
        .expect_err("render fails");

    assert!(matches!(err.kind, PipelineErrorKind::RenderExhausted { attempts: 1, .. }));
    assert_eq!(gateway.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn script_without_scene_fails_before_render() -> anyhow::Result<()> {
    let source = "class Helper:\n    pass\n\nclass Other(object):\n    pass\n";
    let gateway = MockGateway::new(vec![MockReply::Structured(script_json("Helper", source), "resp_gen")]);
    let renderer = MockRenderer::new(vec![MockRenderer::rendered("never.mp4")]);
    let pipeline = AnimationPipeline::new(gateway, renderer.clone(), MockStore::new(), settings(3, false)?);

    let err = pipeline
        .run(&plain_request("draw a circle")?)
        .await
        .expect_err("no scene class");

    assert_eq!(
        err.kind,
        PipelineErrorKind::Validation {
            stage: ScriptStage::Generation,
            kind: ValidationErrorKind::NoEntryPoint,
        }
    );
    assert_eq!(renderer.render_count(), 0);
    Ok(())
}

#[tokio::test]
async fn declared_name_is_corrected_before_render() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![MockReply::Structured(
        script_json("CircleAnimation", &scene_source("DrawCircle")),
        "resp_gen",
    )]);
    let renderer = MockRenderer::new(vec![MockRenderer::rendered("out/DrawCircle.mp4")]);
    let pipeline = AnimationPipeline::new(gateway, renderer.clone(), MockStore::new(), settings(3, false)?);

    let result = pipeline.run(&plain_request("draw a circle")?).await?;

    assert_eq!(result.entry_point(), "DrawCircle");
    assert_eq!(renderer.jobs()[0].entry_point(), "DrawCircle");
    Ok(())
}

#[tokio::test]
async fn empty_review_continuation_keeps_generation_context() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![
        MockReply::Structured(scene_json("CircleScene"), "resp_gen"),
        MockReply::Structured(scene_json("CircleScene"), ""),
        MockReply::Structured(scene_json("CircleScene"), "resp_fix"),
    ]);
    let renderer = MockRenderer::new(vec![
        MockRenderer::failed("IndexError"),
        MockRenderer::rendered("out/CircleScene.mp4"),
    ]);
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer, MockStore::new(), settings(3, true)?);

    let result = pipeline.run(&plain_request("draw a circle")?).await?;

    assert_eq!(*result.attempt(), 2);
    assert_eq!(gateway.call_count(), 3);
    assert_eq!(gateway.continuation_of(1), "resp_gen");
    assert_eq!(gateway.continuation_of(2), "resp_gen");
    Ok(())
}

#[tokio::test]
async fn review_failure_is_not_fatal() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![
        MockReply::Structured(scene_json("CircleScene"), "resp_gen"),
        MockReply::Error(LlmErrorKind::Transport("connection reset".to_string())),
    ]);
    let renderer = MockRenderer::new(vec![MockRenderer::rendered("out/CircleScene.mp4")]);
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer.clone(), MockStore::new(), settings(3, true)?);

    let result = pipeline.run(&plain_request("draw a circle")?).await?;

    assert_eq!(*result.attempt(), 1);
    assert_eq!(result.entry_point(), "CircleScene");
    assert_eq!(gateway.call_count(), 2);
    assert_eq!(renderer.render_count(), 1);
    Ok(())
}

#[tokio::test]
async fn invalid_review_keeps_generated_script() -> anyhow::Result<()> {
    let ambiguous = "from manim import *\n\nclass A(Scene):\n    def construct(self):\n        pass\n\nclass B(Scene):\n    def construct(self):\n        pass\n";
    let gateway = MockGateway::new(vec![
        MockReply::Structured(scene_json("CircleScene"), "resp_gen"),
        MockReply::Structured(script_json("Declared", ambiguous), "resp_review"),
        MockReply::Structured(scene_json("CircleScene"), "resp_fix"),
    ]);
    let renderer = MockRenderer::new(vec![
        MockRenderer::failed("AttributeError"),
        MockRenderer::rendered("out/CircleScene.mp4"),
    ]);
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer.clone(), MockStore::new(), settings(3, true)?);

    let result = pipeline.run(&plain_request("draw a circle")?).await?;

    assert_eq!(result.entry_point(), "CircleScene");
    assert_eq!(*result.attempt(), 2);
    assert_eq!(gateway.call_count(), 3);
    assert_eq!(gateway.continuation_of(2), "resp_gen");

    let jobs = renderer.jobs();
    assert_eq!(jobs[0].entry_point(), "CircleScene");
    assert!(jobs[0].source_code().contains("class CircleScene(Scene)"));
    assert!(!jobs[0].source_code().contains("class A(Scene)"));
    Ok(())
}

#[tokio::test]
async fn reviewed_script_is_rendered() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![
        MockReply::Structured(scene_json("CircleScene"), "resp_gen"),
        MockReply::Structured(scene_json("BetterCircle"), "resp_review"),
    ]);
    let renderer = MockRenderer::new(vec![MockRenderer::rendered("out/BetterCircle.mp4")]);
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer.clone(), MockStore::new(), settings(3, true)?);

    let result = pipeline.run(&plain_request("draw a circle")?).await?;

    assert_eq!(result.entry_point(), "BetterCircle");
    assert_eq!(gateway.continuation_of(1), "resp_gen");
    assert!(gateway.calls()[1].input().contains("class CircleScene(Scene)"));
    Ok(())
}

#[tokio::test]
async fn archive_failure_keeps_success() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![MockReply::Structured(scene_json("CircleScene"), "resp_gen")]);
    let renderer = MockRenderer::new(vec![MockRenderer::rendered("out/CircleScene.mp4")]);
    let pipeline = AnimationPipeline::new(gateway, renderer, MockStore::failing(), settings(3, false)?);

    let result = pipeline.run(&plain_request("draw a circle")?).await?;

    assert_eq!(*result.attempt(), 1);
    assert!(result.script_path().is_none());
    assert_eq!(result.artifact_path().to_str(), Some("out/CircleScene.mp4"));
    Ok(())
}

#[tokio::test]
async fn repair_failure_aborts_without_another_render() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![
        MockReply::Structured(scene_json("CircleScene"), "resp_gen"),
        MockReply::Error(LlmErrorKind::Http {
            status_code: 500,
            message: "upstream".to_string(),
        }),
    ]);
    let renderer = MockRenderer::new(vec![
        MockRenderer::failed("first"),
        MockRenderer::rendered("never.mp4"),
    ]);
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer.clone(), MockStore::new(), settings(3, false)?);

    let err = pipeline
        .run(&plain_request("draw a circle")?)
        .await
        .expect_err("repair fails");

    assert!(matches!(
        err.kind,
        PipelineErrorKind::RepairFailed {
            attempt: 1,
            cause: LlmErrorKind::Http { status_code: 500, .. }
        }
    ));
    assert_eq!(renderer.render_count(), 1);
    Ok(())
}

#[tokio::test]
async fn invalid_repair_is_a_validation_failure() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![
        MockReply::Structured(scene_json("CircleScene"), "resp_gen"),
        MockReply::Structured(script_json("Fixed", "x = 1\n"), "resp_fix"),
    ]);
    let renderer = MockRenderer::new(vec![MockRenderer::failed("first")]);
    let pipeline = AnimationPipeline::new(gateway, renderer.clone(), MockStore::new(), settings(3, false)?);

    let err = pipeline
        .run(&plain_request("draw a circle")?)
        .await
        .expect_err("repaired script has no scene");

    assert!(matches!(
        err.kind,
        PipelineErrorKind::Validation { stage: ScriptStage::Repair, .. }
    ));
    assert_eq!(renderer.render_count(), 1);
    Ok(())
}

#[tokio::test]
async fn renderer_fault_is_fatal() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![MockReply::Structured(scene_json("CircleScene"), "resp_gen")]);
    let renderer = MockRenderer::new(vec![Err(RenderErrorKind::Workspace("read-only".to_string()))]);
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer, MockStore::new(), settings(3, false)?);

    let err = pipeline
        .run(&plain_request("draw a circle")?)
        .await
        .expect_err("renderer faults");

    assert!(matches!(err.kind, PipelineErrorKind::RendererFault { attempt: 1, .. }));
    assert_eq!(gateway.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn missing_tooling_stops_before_any_call() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![MockReply::Structured(scene_json("CircleScene"), "resp_gen")]);
    let renderer = MockRenderer::unavailable("Manim not installed");
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer.clone(), MockStore::new(), settings(3, false)?);

    let err = pipeline
        .run(&plain_request("draw a circle")?)
        .await
        .expect_err("tool missing");

    assert_eq!(err.kind, PipelineErrorKind::Precondition("Manim not installed".to_string()));
    assert_eq!(gateway.call_count(), 0);
    assert_eq!(renderer.render_count(), 0);
    Ok(())
}

#[tokio::test]
async fn generation_failure_is_fatal() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![MockReply::Error(LlmErrorKind::SchemaMismatch {
        schema: "generated_script".to_string(),
        message: "missing field `code`".to_string(),
    })]);
    let renderer = MockRenderer::new(Vec::new());
    let pipeline = AnimationPipeline::new(gateway, renderer.clone(), MockStore::new(), settings(3, false)?);

    let err = pipeline
        .run(&plain_request("draw a circle")?)
        .await
        .expect_err("generation fails");

    assert!(matches!(err.kind, PipelineErrorKind::GenerationFailed(LlmErrorKind::SchemaMismatch { .. })));
    assert_eq!(renderer.render_count(), 0);
    Ok(())
}

#[tokio::test]
async fn brief_seeds_generation_context() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![
        MockReply::Text("CORE CONCEPT: circles".to_string(), "resp_brief"),
        MockReply::Structured(scene_json("CircleScene"), "resp_gen"),
    ]);
    let renderer = MockRenderer::new(vec![MockRenderer::rendered("out/CircleScene.mp4")]);
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer, MockStore::new(), settings(3, false)?);

    pipeline.run(&AnimationRequest::new("draw a circle")).await?;

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].schema().is_none());
    assert!(calls[1].input().contains("CORE CONCEPT: circles"));
    assert_eq!(gateway.continuation_of(1), "resp_brief");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn brief_timeout_is_fatal() -> anyhow::Result<()> {
    let gateway = MockGateway::new(vec![MockReply::Hang]);
    let renderer = MockRenderer::new(vec![MockRenderer::rendered("never.mp4")]);
    let pipeline = AnimationPipeline::new(gateway.clone(), renderer.clone(), MockStore::new(), settings(3, false)?);

    let err = pipeline
        .run(&AnimationRequest::new("draw a circle"))
        .await
        .expect_err("brief times out");

    assert!(matches!(err.kind, PipelineErrorKind::BriefFailed(LlmErrorKind::Timeout(_))));
    assert_eq!(gateway.call_count(), 1);
    assert_eq!(renderer.render_count(), 0);
    Ok(())
}
