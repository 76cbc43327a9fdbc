use atelier::export::SubmissionStore;
use atelier::gateway::{GatewayError, InspirationGateway};
use atelier::session::{
    ArtisticExperience, FinalAssessment, Gender, Group, InteractionKind, ParticipantInfoForm,
    SessionEngine, SessionError, Stage, DRAWING_PROMPTS,
};
use atelier::shared::ParticipantId;
use std::fs;
use tempfile::tempdir;

struct CannedGateway {
    verbal: &'static str,
    visual: &'static str,
}

impl InspirationGateway for CannedGateway {
    fn request_verbal_hint(&self, _caption: &str) -> Result<String, GatewayError> {
        Ok(self.verbal.to_string())
    }

    fn request_visual_hint(&self, _caption: &str) -> Result<String, GatewayError> {
        Ok(self.visual.to_string())
    }
}

struct UnreachableGateway;

impl InspirationGateway for UnreachableGateway {
    fn request_verbal_hint(&self, _caption: &str) -> Result<String, GatewayError> {
        Err(GatewayError::Request("connection refused".to_string()))
    }

    fn request_visual_hint(&self, _caption: &str) -> Result<String, GatewayError> {
        Err(GatewayError::Request("connection refused".to_string()))
    }
}

fn canned() -> CannedGateway {
    CannedGateway {
        verbal: "try drawing a spiral staircase",
        visual: "https://img.example/inspiration.png",
    }
}

fn info_form() -> ParticipantInfoForm {
    ParticipantInfoForm {
        age: 21,
        gender: Gender::Other,
        field_of_study: Some("design".to_string()),
        gpa: Some(3.5),
        creative_mood: Some(6),
        current_mood: 5,
        artistic_experience: ArtisticExperience::Beginner,
    }
}

fn engine_with_id(raw: &str) -> SessionEngine {
    SessionEngine::start(ParticipantId::parse(raw).expect("participant id"), 100)
        .expect("start session")
}

fn engine_at_inspiration() -> SessionEngine {
    let mut engine = engine_with_id("42");
    engine.submit_consent(true).expect("consent");
    engine.submit_participant_info(info_form()).expect("info");
    engine.acknowledge_group().expect("group");
    engine.acknowledge_instructions().expect("instructions");
    engine.submit_drawing(0, vec![1, 2, 3]).expect("drawing 1");
    engine.submit_caption(0, "sun").expect("caption 1");
    engine
}

fn engine_at_final_assessment() -> SessionEngine {
    let mut engine = engine_at_inspiration();
    engine.skip_inspiration().expect("skip");
    engine.submit_drawing(1, vec![4, 5, 6]).expect("drawing 2");
    engine.submit_caption(1, "moon").expect("caption 2");
    engine
}

#[test]
fn declined_consent_is_a_validation_error() {
    let mut engine = engine_with_id("42");
    let err = engine.submit_consent(false).expect_err("must decline");
    assert!(matches!(err, SessionError::Validation { .. }));
    assert_eq!(engine.record().stage, Stage::Consent);
    assert!(!engine.record().consent_given);
}

#[test]
fn consent_unlocks_participant_info_and_nothing_else() {
    let mut engine = engine_with_id("42");
    let view = engine.submit_consent(true).expect("consent");
    assert_eq!(view.stage, Stage::ParticipantInfo);

    let repeat = engine.submit_consent(true).expect_err("stage complete");
    assert!(matches!(
        repeat,
        SessionError::StageLocked {
            stage: Stage::Consent
        }
    ));
}

#[test]
fn participant_info_assigns_group_from_parity_exactly_once() {
    let mut engine = engine_with_id("42");
    engine.submit_consent(true).expect("consent");
    let view = engine.submit_participant_info(info_form()).expect("info");
    assert_eq!(view.stage, Stage::GroupAssignment);
    assert_eq!(view.group, Group::Visual);

    let view = engine.acknowledge_group().expect("acknowledge");
    assert_eq!(view.stage, Stage::Instructions);
    assert_eq!(view.group, Group::Visual);
    assert_eq!(view.drawing_prompts, DRAWING_PROMPTS);
}

#[test]
fn non_numeric_participant_id_blocks_group_assignment() {
    let mut engine = engine_with_id("abc123");
    engine.submit_consent(true).expect("consent");
    let err = engine
        .submit_participant_info(info_form())
        .expect_err("non-numeric id");
    match err {
        SessionError::InvalidParticipantId { participant_id } => {
            assert_eq!(participant_id, "abc123");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(engine.record().stage, Stage::ParticipantInfo);
    assert!(engine.record().demographics.is_none());
    assert_eq!(engine.record().group, Group::Unassigned);
}

#[test]
fn out_of_range_participant_info_fields_are_rejected() {
    let mut engine = engine_with_id("42");
    engine.submit_consent(true).expect("consent");

    let mut too_young = info_form();
    too_young.age = 12;
    assert!(matches!(
        engine.submit_participant_info(too_young),
        Err(SessionError::Validation { .. })
    ));

    let mut bad_gpa = info_form();
    bad_gpa.gpa = Some(4.5);
    assert!(matches!(
        engine.submit_participant_info(bad_gpa),
        Err(SessionError::Validation { .. })
    ));

    let mut bad_mood = info_form();
    bad_mood.current_mood = 11;
    assert!(matches!(
        engine.submit_participant_info(bad_mood),
        Err(SessionError::Validation { .. })
    ));

    engine.submit_participant_info(info_form()).expect("valid form");
}

#[test]
fn empty_drawing_is_rejected() {
    let mut engine = engine_with_id("42");
    engine.submit_consent(true).expect("consent");
    engine.submit_participant_info(info_form()).expect("info");
    engine.acknowledge_group().expect("group");
    engine.acknowledge_instructions().expect("instructions");

    let err = engine.submit_drawing(0, Vec::new()).expect_err("empty canvas");
    assert!(matches!(err, SessionError::Validation { .. }));
    assert_eq!(engine.record().stage, Stage::FirstDrawing);
}

#[test]
fn caption_requires_a_prior_drawing_for_that_slot() {
    let mut engine = engine_with_id("42");
    engine.submit_consent(true).expect("consent");
    engine.submit_participant_info(info_form()).expect("info");
    engine.acknowledge_group().expect("group");
    engine.acknowledge_instructions().expect("instructions");

    let err = engine.submit_caption(0, "sun").expect_err("no drawing yet");
    assert!(matches!(err, SessionError::InvalidTransition { .. }));
}

#[test]
fn blank_caption_is_a_validation_error() {
    let mut engine = engine_with_id("42");
    engine.submit_consent(true).expect("consent");
    engine.submit_participant_info(info_form()).expect("info");
    engine.acknowledge_group().expect("group");
    engine.acknowledge_instructions().expect("instructions");
    engine.submit_drawing(0, vec![1]).expect("drawing");

    let err = engine.submit_caption(0, "").expect_err("blank caption");
    assert!(matches!(err, SessionError::Validation { .. }));
    let err = engine.submit_caption(0, "   ").expect_err("whitespace caption");
    assert!(matches!(err, SessionError::Validation { .. }));

    let view = engine.submit_caption(0, "a bird").expect("caption");
    assert_eq!(view.stage, Stage::Inspiration);
    assert_eq!(view.captions[0].as_deref(), Some("a bird"));
}

#[test]
fn failed_gateway_call_records_nothing() {
    let mut engine = engine_at_inspiration();
    let err = engine
        .request_inspiration(InteractionKind::VerbalPrompt, &UnreachableGateway)
        .expect_err("gateway down");
    assert!(matches!(err, SessionError::Gateway(_)));
    assert!(engine.record().ai_interactions.is_empty());
    assert_eq!(engine.record().stage, Stage::Inspiration);
}

#[test]
fn successful_gateway_calls_append_one_interaction_each() {
    let mut engine = engine_at_inspiration();
    let gateway = canned();

    let view = engine
        .request_inspiration(InteractionKind::VerbalPrompt, &gateway)
        .expect("verbal hint");
    assert_eq!(view.ai_interactions.len(), 1);
    assert_eq!(view.ai_interactions[0].kind, InteractionKind::VerbalPrompt);
    assert_eq!(view.ai_interactions[0].content, gateway.verbal);
    assert_eq!(view.stage, Stage::Inspiration);

    let view = engine
        .request_inspiration(InteractionKind::VisualPrompt, &gateway)
        .expect("visual hint");
    assert_eq!(view.ai_interactions.len(), 2);
    assert_eq!(view.ai_interactions[1].kind, InteractionKind::VisualPrompt);
    assert_eq!(view.ai_interactions[1].content, gateway.visual);
}

#[test]
fn second_drawing_needs_inspiration_or_explicit_skip() {
    let mut engine = engine_at_inspiration();
    let err = engine.finish_inspiration().expect_err("nothing obtained");
    assert!(matches!(err, SessionError::InvalidTransition { .. }));

    let view = engine.skip_inspiration().expect("skip");
    assert_eq!(view.stage, Stage::SecondDrawing);
    assert!(view.inspiration_skipped);
}

#[test]
fn finish_inspiration_advances_after_a_recorded_interaction() {
    let mut engine = engine_at_inspiration();
    engine
        .request_inspiration(InteractionKind::VisualPrompt, &canned())
        .expect("hint");
    let view = engine.finish_inspiration().expect("finish");
    assert_eq!(view.stage, Stage::SecondDrawing);
    assert!(!view.inspiration_skipped);
}

#[test]
fn final_assessment_ratings_are_range_checked() {
    let mut engine = engine_at_final_assessment();
    let err = engine
        .submit_final_assessment(FinalAssessment {
            self_creativity: 0,
            satisfaction: 8,
            ai_influence: 2,
        })
        .expect_err("rating below range");
    assert!(matches!(err, SessionError::Validation { .. }));
    assert!(engine.record().final_assessment.is_none());

    engine
        .submit_final_assessment(FinalAssessment {
            self_creativity: 7,
            satisfaction: 8,
            ai_influence: 2,
        })
        .expect("valid ratings");
}

#[test]
fn submit_all_requires_a_stored_final_assessment() {
    let dir = tempdir().expect("tempdir");
    let store = SubmissionStore::new(dir.path().join("results"));
    let mut engine = engine_at_final_assessment();

    let err = engine.submit_all(&store, 200).expect_err("no assessment yet");
    assert!(matches!(err, SessionError::Validation { .. }));
    assert!(!store.results_path().exists());
}

#[test]
fn submit_all_is_terminal_and_appends_exactly_one_row() {
    let dir = tempdir().expect("tempdir");
    let store = SubmissionStore::new(dir.path().join("results"));
    let mut engine = engine_at_final_assessment();
    engine
        .submit_final_assessment(FinalAssessment {
            self_creativity: 7,
            satisfaction: 8,
            ai_influence: 2,
        })
        .expect("assessment");

    let view = engine.submit_all(&store, 200).expect("submit");
    assert_eq!(view.stage, Stage::Submitted);
    assert!(view.submitted);

    let repeat = engine.submit_all(&store, 201).expect_err("already submitted");
    assert!(matches!(
        repeat,
        SessionError::StageLocked {
            stage: Stage::FinalAssessment
        }
    ));

    let contents = fs::read_to_string(store.results_path()).expect("read results");
    assert_eq!(contents.lines().count(), 2, "header plus one row");
}

#[test]
fn event_log_traces_session_progress() {
    let dir = tempdir().expect("tempdir");
    let mut engine = engine_with_id("42").with_event_log_root(dir.path());
    engine.submit_consent(true).expect("consent");
    engine.submit_participant_info(info_form()).expect("info");

    let log = fs::read_to_string(dir.path().join("logs/session.log")).expect("read log");
    assert!(log.contains("consent accepted"));
    assert!(log.contains("group `visual` assigned from participant id parity"));
    assert!(log.contains(engine.session_id()));
}

#[test]
fn session_ids_are_unique_per_start() {
    let a = engine_with_id("42");
    let b = engine_with_id("42");
    assert_ne!(a.session_id(), b.session_id());
    assert!(a.session_id().starts_with("session-"));
}
