use serde_json::json;
use serde_json::Value;

use super::*;
use crate::domain::models::OverallStory;

fn session() -> Session {
    Session {
        session_id: "s-1".to_string(),
        user_prompt: "A hero wakes.".to_string(),
        characters: vec![json!({"name": "Mira"}), json!({"name": "Dog"})],
        overall_story: OverallStory::Structured(json!({"title": "Dawn"})),
        protagonist_name: "Mira".to_string(),
        init_response: json!({}),
    }
}

fn scene_with_choices() -> Scene {
    Scene::from_response(&json!({
        "panels": ["p1", "p2", "p3", "p4", "p5"],
        "narrative": ["n1", "n2", "n3", "n4", "n5"],
        "choices": [{"choice_id": "a", "text": "Flee"}, {"choice_id": "b", "text": "Fight"}]
    }))
    .unwrap()
}

#[test]
fn it_resolves_choice_text_not_id() {
    let scene = scene_with_choices();
    assert_eq!(resolve_decision(&scene, Some("b"), "").unwrap(), "Fight");
}

#[test]
fn it_prefers_selected_choice_over_custom_answer() {
    let scene = scene_with_choices();
    assert_eq!(
        resolve_decision(&scene, Some("a"), "I write my own").unwrap(),
        "Flee"
    );
}

#[test]
fn it_trims_custom_answers() {
    let scene = scene_with_choices();
    assert_eq!(
        resolve_decision(&scene, None, "  Befriend the dragon \n").unwrap(),
        "Befriend the dragon"
    );
}

#[test]
fn it_rejects_missing_decisions() {
    let scene = scene_with_choices();
    let err = resolve_decision(&scene, None, "   ").unwrap_err();
    assert_eq!(
        err,
        WizardError::Validation("Please select a choice or write your own ending".to_string())
    );
}

#[test]
fn it_rejects_dangling_choice_ids() {
    let scene = scene_with_choices();
    let err = resolve_decision(&scene, Some("z"), "fallback").unwrap_err();
    assert!(matches!(err, WizardError::DataShape(_)));
}

#[test]
fn it_assembles_defaults_when_state_is_empty() {
    let payload = ContinuationPayload::assemble(
        &session(),
        &SceneState::default(),
        &[],
        "Fight".to_string(),
    )
    .unwrap();

    assert_eq!(payload.session_id, "s-1");
    assert_eq!(payload.overall_story, r#"{"title":"Dawn"}"#);
    assert_eq!(payload.characters, payload.character_profile);
    assert_eq!(payload.decision_history, vec!["Fight"]);
    assert_eq!(payload.decision_count, 1);
    assert_eq!(payload.current_scene, 2);
    assert_eq!(payload.phase, DEFAULT_PHASE);
    assert_eq!(payload.story_phase, DEFAULT_STORY_PHASE);
    assert!(!payload.is_complete);
}

#[test]
fn it_carries_scene_state_forward() {
    let state = SceneState {
        overall_story: Some(OverallStory::Text("The hero fled.".to_string())),
        decision_history: Some(vec!["Flee".to_string()]),
        decision_count: Some(1),
        current_scene: Some(2),
        phase: Some("scene_in_progress".to_string()),
        story_phase: Some("rising_action".to_string()),
        is_complete: Some(false),
    };

    let payload = ContinuationPayload::assemble(
        &session(),
        &state,
        &["ignored".to_string()],
        "Fight".to_string(),
    )
    .unwrap();

    assert_eq!(payload.overall_story, "The hero fled.");
    assert_eq!(payload.decision_history, vec!["Flee", "Fight"]);
    assert_eq!(payload.decision_count, 2);
    assert_eq!(payload.current_scene, 3);
    assert_eq!(payload.phase, "scene_in_progress");
    assert_eq!(payload.story_phase, "rising_action");
}

#[test]
fn it_falls_back_to_local_history() {
    let payload = ContinuationPayload::assemble(
        &session(),
        &SceneState::default(),
        &["Flee".to_string()],
        "Hide".to_string(),
    )
    .unwrap();

    assert_eq!(payload.decision_history, vec!["Flee", "Hide"]);
}

#[test]
fn it_serializes_every_field() {
    let value = ContinuationPayload::assemble(
        &session(),
        &SceneState::default(),
        &[],
        "Fight".to_string(),
    )
    .unwrap()
    .to_value()
    .unwrap();

    let object = value.as_object().unwrap();
    for field in [
        "session_id",
        "user_prompt",
        "overall_story",
        "character_profile",
        "characters",
        "protagonist_name",
        "current_scene",
        "decision_history",
        "phase",
        "decision_count",
        "story_phase",
        "is_complete",
    ] {
        assert!(object.contains_key(field), "missing {field}");
    }
    assert!(matches!(object["overall_story"], Value::String(_)));
}

#[test]
fn it_rejects_counters_that_cannot_advance() {
    let state = SceneState {
        current_scene: Some(u64::MAX),
        ..SceneState::default()
    };
    assert_eq!(
        ContinuationPayload::assemble(&session(), &state, &[], "Fight".to_string()).unwrap_err(),
        WizardError::DataShape(format!("current_scene {} cannot be advanced", u64::MAX))
    );

    let state = SceneState {
        decision_count: Some(u64::MAX),
        ..SceneState::default()
    };
    assert!(matches!(
        ContinuationPayload::assemble(&session(), &state, &[], "Fight".to_string()),
        Err(WizardError::DataShape(_))
    ));
}
