use atelier::export::{header_line, SubmissionStore};
use atelier::gateway::{GatewayError, InspirationGateway};
use atelier::session::{
    ArtisticExperience, FinalAssessment, Gender, Group, InteractionKind, ParticipantInfoForm,
    SessionEngine, Stage,
};
use atelier::shared::ParticipantId;
use std::fs;
use tempfile::tempdir;

struct StubGateway;

impl InspirationGateway for StubGateway {
    fn request_verbal_hint(&self, _caption: &str) -> Result<String, GatewayError> {
        Ok("sketch it at dawn".to_string())
    }

    fn request_visual_hint(&self, caption: &str) -> Result<String, GatewayError> {
        Ok(format!("https://img.example/{caption}.png"))
    }
}

#[test]
fn even_participant_runs_the_full_visual_session() {
    let dir = tempdir().expect("tempdir");
    let export_root = dir.path().join("results");
    let store = SubmissionStore::new(&export_root);

    let mut engine = SessionEngine::start(
        ParticipantId::parse("42").expect("participant id"),
        1_700_000_000,
    )
    .expect("start session")
    .with_event_log_root(dir.path().join("state"));

    engine.submit_consent(true).expect("consent");
    let view = engine
        .submit_participant_info(ParticipantInfoForm {
            age: 24,
            gender: Gender::Female,
            field_of_study: Some("physics".to_string()),
            gpa: Some(3.8),
            creative_mood: Some(7),
            current_mood: 6,
            artistic_experience: ArtisticExperience::None,
        })
        .expect("participant info");
    assert_eq!(view.group, Group::Visual);

    engine.acknowledge_group().expect("group screen");
    engine.acknowledge_instructions().expect("instructions");
    engine.submit_drawing(0, vec![10, 20, 30]).expect("first drawing");
    engine.submit_caption(0, "sun").expect("first caption");

    let view = engine
        .request_inspiration(InteractionKind::VisualPrompt, &StubGateway)
        .expect("visual inspiration");
    assert_eq!(view.ai_interactions.len(), 1);
    assert_eq!(
        view.ai_interactions[0].content,
        "https://img.example/sun.png"
    );

    engine.finish_inspiration().expect("continue to drawing");
    engine.submit_drawing(1, vec![40, 50, 60]).expect("second drawing");
    engine.submit_caption(1, "moon").expect("second caption");
    engine
        .submit_final_assessment(FinalAssessment {
            self_creativity: 7,
            satisfaction: 8,
            ai_influence: 2,
        })
        .expect("final assessment");

    let view = engine.submit_all(&store, 1_700_000_500).expect("submit all");
    assert_eq!(view.stage, Stage::Submitted);
    assert!(view.submitted);

    let contents = fs::read_to_string(store.results_path()).expect("read results");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2, "header plus exactly one row");
    assert_eq!(lines[0], header_line());

    let row = lines[1];
    assert!(row.starts_with("42,24,female,physics,3.80,7,6,none,visual,"));
    assert!(row.contains(",sun,"));
    assert!(row.contains(",moon,"));
    assert!(row.contains("visual_prompt"));
    assert!(row.contains("https://img.example/sun.png"));

    let drawings: Vec<_> = fs::read_dir(export_root.join("drawings"))
        .expect("drawings dir")
        .map(|entry| entry.expect("entry").file_name().into_string().expect("name"))
        .collect();
    assert_eq!(drawings.len(), 2);
    assert!(drawings.iter().all(|name| name.starts_with("42_")));

    let log = fs::read_to_string(dir.path().join("state/logs/session.log")).expect("session log");
    assert!(log.contains("group `visual` assigned from participant id parity"));
    assert!(log.contains("submission appended"));
}

#[test]
fn odd_participant_is_assigned_the_verbal_group() {
    let mut engine = SessionEngine::start(
        ParticipantId::parse("41").expect("participant id"),
        1_700_000_000,
    )
    .expect("start session");

    engine.submit_consent(true).expect("consent");
    let view = engine
        .submit_participant_info(ParticipantInfoForm {
            age: 30,
            gender: Gender::Male,
            field_of_study: None,
            gpa: None,
            creative_mood: None,
            current_mood: 5,
            artistic_experience: ArtisticExperience::Advanced,
        })
        .expect("participant info");
    assert_eq!(view.group, Group::Verbal);
}
