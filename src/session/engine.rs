use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::export::{SubmissionStore, SubmittedRow};
use crate::gateway::InspirationGateway;
use crate::session::error::SessionError;
use crate::session::group::assign_group;
use crate::session::record::{
    AiInteraction, ArtisticExperience, Demographics, Drawing, FinalAssessment, Gender, Group,
    InteractionKind, SelfAssessment, SessionRecord, AGE_MAX, AGE_MIN, GPA_MAX, RATING_MAX,
    RATING_MIN,
};
use crate::session::stage::{advance, Stage};
use crate::shared::ids::ParticipantId;
use crate::shared::logging::append_session_log_line;

pub const DRAWING_PROMPTS: [&str; 3] = ["transformation", "balance", "motion"];

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SESSION_SUFFIX_SPACE: u32 = 36 * 36 * 36 * 36;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfoForm {
    pub age: u8,
    pub gender: Gender,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub gpa: Option<f32>,
    #[serde(default)]
    pub creative_mood: Option<u8>,
    pub current_mood: u8,
    pub artistic_experience: ArtisticExperience,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: String,
    pub participant_id: String,
    pub stage: Stage,
    pub group: Group,
    pub drawing_prompts: [&'static str; 3],
    pub captions: [Option<String>; 2],
    pub drawings_done: [bool; 2],
    pub ai_interactions: Vec<AiInteraction>,
    pub inspiration_skipped: bool,
    pub final_assessment: Option<FinalAssessment>,
    pub submitted: bool,
}

#[derive(Debug)]
pub struct SessionEngine {
    session_id: String,
    record: SessionRecord,
    event_log_root: Option<PathBuf>,
}

impl SessionEngine {
    pub fn start(participant_id: ParticipantId, now: i64) -> Result<Self, SessionError> {
        let session_id = generate_session_id(now)?;
        Ok(Self {
            session_id,
            record: SessionRecord::new(participant_id),
            event_log_root: None,
        })
    }

    pub fn with_event_log_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.event_log_root = Some(root.into());
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.session_id.clone(),
            participant_id: self.record.participant_id.as_str().to_string(),
            stage: self.record.stage,
            group: self.record.group,
            drawing_prompts: DRAWING_PROMPTS,
            captions: [
                self.record.caption(0).map(str::to_string),
                self.record.caption(1).map(str::to_string),
            ],
            drawings_done: [
                self.record.drawings[0].is_some(),
                self.record.drawings[1].is_some(),
            ],
            ai_interactions: self.record.ai_interactions.clone(),
            inspiration_skipped: self.record.inspiration_skipped,
            final_assessment: self.record.final_assessment,
            submitted: self.record.submitted,
        }
    }

    pub fn submit_consent(&mut self, agreed: bool) -> Result<SessionView, SessionError> {
        self.expect_stage(Stage::Consent)?;
        if !agreed {
            return Err(validation("consent", "participation requires consent"));
        }
        self.record.consent_given = true;
        advance(&mut self.record, Stage::ParticipantInfo)?;
        self.log("consent accepted");
        Ok(self.view())
    }

    pub fn submit_participant_info(
        &mut self,
        form: ParticipantInfoForm,
    ) -> Result<SessionView, SessionError> {
        self.expect_stage(Stage::ParticipantInfo)?;
        validate_participant_info(&form)?;
        // Parity must resolve before anything is stored so a non-numeric id
        // leaves the record at the info stage for correction.
        let group = assign_group(&self.record.participant_id)?;
        self.record.demographics = Some(Demographics {
            age: form.age,
            gender: form.gender,
            field_of_study: form.field_of_study,
            gpa: form.gpa,
        });
        self.record.self_assessment = Some(SelfAssessment {
            creative_mood: form.creative_mood,
            current_mood: form.current_mood,
            artistic_experience: form.artistic_experience,
        });
        advance(&mut self.record, Stage::GroupAssignment)?;
        self.record.group = group;
        self.log(&format!("group `{group}` assigned from participant id parity"));
        Ok(self.view())
    }

    pub fn acknowledge_group(&mut self) -> Result<SessionView, SessionError> {
        self.expect_stage(Stage::GroupAssignment)?;
        advance(&mut self.record, Stage::Instructions)?;
        Ok(self.view())
    }

    pub fn acknowledge_instructions(&mut self) -> Result<SessionView, SessionError> {
        self.expect_stage(Stage::Instructions)?;
        self.record.instructions_acknowledged = true;
        advance(&mut self.record, Stage::FirstDrawing)?;
        Ok(self.view())
    }

    pub fn submit_drawing(
        &mut self,
        slot: usize,
        pixel_data: Vec<u8>,
    ) -> Result<SessionView, SessionError> {
        let (required, next) = match slot {
            0 => (Stage::FirstDrawing, Stage::FirstCaption),
            1 => (Stage::SecondDrawing, Stage::SecondCaption),
            other => {
                return Err(validation("slot", format!("unknown drawing slot {other}")));
            }
        };
        self.expect_stage(required)?;
        if pixel_data.is_empty() {
            return Err(validation(
                "pixel_data",
                "draw something on the canvas to proceed",
            ));
        }
        self.record.drawings[slot] = Some(Drawing {
            pixel_data,
            caption: None,
        });
        advance(&mut self.record, next)?;
        self.log(&format!("drawing {} captured", slot + 1));
        Ok(self.view())
    }

    pub fn submit_caption(
        &mut self,
        slot: usize,
        caption: &str,
    ) -> Result<SessionView, SessionError> {
        let (required, next) = match slot {
            0 => (Stage::FirstCaption, Stage::Inspiration),
            1 => (Stage::SecondCaption, Stage::FinalAssessment),
            other => {
                return Err(validation("slot", format!("unknown caption slot {other}")));
            }
        };
        self.expect_stage(required)?;
        let caption = caption.trim();
        if caption.is_empty() {
            return Err(validation("caption", "enter a caption before submitting"));
        }
        let Some(drawing) = self.record.drawings[slot].as_mut() else {
            return Err(validation(
                "caption",
                format!("no drawing captured for slot {slot}"),
            ));
        };
        drawing.caption = Some(caption.to_string());
        advance(&mut self.record, next)?;
        self.log(&format!("caption {} submitted", slot + 1));
        Ok(self.view())
    }

    pub fn request_inspiration(
        &mut self,
        kind: InteractionKind,
        gateway: &dyn InspirationGateway,
    ) -> Result<SessionView, SessionError> {
        self.expect_stage(Stage::Inspiration)?;
        let Some(caption) = self.record.caption(0).map(str::to_string) else {
            return Err(validation("caption", "no caption recorded for slot 0"));
        };
        let content = match kind {
            InteractionKind::VerbalPrompt => gateway.request_verbal_hint(&caption),
            InteractionKind::VisualPrompt => gateway.request_visual_hint(&caption),
        };
        let content = match content {
            Ok(content) => content,
            Err(err) => {
                self.log(&format!("inspiration request failed: {err}"));
                return Err(SessionError::from(err));
            }
        };
        self.record.ai_interactions.push(AiInteraction { kind, content });
        self.log(&format!("{kind} inspiration recorded"));
        Ok(self.view())
    }

    pub fn skip_inspiration(&mut self) -> Result<SessionView, SessionError> {
        self.expect_stage(Stage::Inspiration)?;
        self.record.inspiration_skipped = true;
        advance(&mut self.record, Stage::SecondDrawing)?;
        self.log("inspiration skipped");
        Ok(self.view())
    }

    pub fn finish_inspiration(&mut self) -> Result<SessionView, SessionError> {
        self.expect_stage(Stage::Inspiration)?;
        advance(&mut self.record, Stage::SecondDrawing)?;
        Ok(self.view())
    }

    pub fn submit_final_assessment(
        &mut self,
        assessment: FinalAssessment,
    ) -> Result<SessionView, SessionError> {
        self.expect_stage(Stage::FinalAssessment)?;
        validate_rating("self_creativity", assessment.self_creativity)?;
        validate_rating("satisfaction", assessment.satisfaction)?;
        validate_rating("ai_influence", assessment.ai_influence)?;
        self.record.final_assessment = Some(assessment);
        Ok(self.view())
    }

    pub fn submit_all(
        &mut self,
        store: &SubmissionStore,
        now: i64,
    ) -> Result<SessionView, SessionError> {
        self.expect_stage(Stage::FinalAssessment)?;
        if self.record.final_assessment.is_none() {
            return Err(validation(
                "final_assessment",
                "complete the final self-assessments before submitting",
            ));
        }
        let row: SubmittedRow = match store.append_submission(&self.record, now) {
            Ok(row) => row,
            Err(err) => {
                self.log(&format!("submission export failed: {err}"));
                return Err(SessionError::from(err));
            }
        };
        advance(&mut self.record, Stage::Submitted)?;
        self.record.submitted = true;
        self.log(&format!(
            "submission appended to `{}`",
            row.results_path.display()
        ));
        Ok(self.view())
    }

    fn expect_stage(&self, required: Stage) -> Result<(), SessionError> {
        if self.record.stage == required {
            return Ok(());
        }
        if self.record.stage.index() > required.index() {
            return Err(SessionError::StageLocked { stage: required });
        }
        Err(SessionError::InvalidTransition {
            from: self.record.stage,
            to: required,
        })
    }

    fn log(&self, line: &str) {
        let Some(root) = self.event_log_root.as_deref() else {
            return;
        };
        let _ = append_session_log_line(root, &format!("{} {}", self.session_id, line));
    }
}

fn validation(field: &str, reason: impl Into<String>) -> SessionError {
    SessionError::Validation {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn validate_rating(field: &str, value: u8) -> Result<(), SessionError> {
    if (RATING_MIN..=RATING_MAX).contains(&value) {
        return Ok(());
    }
    Err(validation(
        field,
        format!("must be between {RATING_MIN} and {RATING_MAX}"),
    ))
}

fn validate_participant_info(form: &ParticipantInfoForm) -> Result<(), SessionError> {
    if !(AGE_MIN..=AGE_MAX).contains(&form.age) {
        return Err(validation(
            "age",
            format!("must be between {AGE_MIN} and {AGE_MAX}"),
        ));
    }
    if let Some(gpa) = form.gpa {
        if !(0.0..=GPA_MAX).contains(&gpa) {
            return Err(validation("gpa", format!("must be between 0.0 and {GPA_MAX}")));
        }
    }
    if let Some(mood) = form.creative_mood {
        validate_rating("creative_mood", mood)?;
    }
    validate_rating("current_mood", form.current_mood)?;
    Ok(())
}

fn base36_encode_u64(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut encoded = Vec::new();
    while value > 0 {
        encoded.push(BASE36_ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    encoded.iter().rev().collect()
}

fn base36_encode_fixed_u32(mut value: u32, width: usize) -> String {
    let mut encoded = vec!['0'; width];
    for idx in (0..width).rev() {
        encoded[idx] = BASE36_ALPHABET[(value % 36) as usize] as char;
        value /= 36;
    }
    encoded.into_iter().collect()
}

fn generate_session_id(now: i64) -> Result<String, SessionError> {
    let timestamp = u64::try_from(now).map_err(|_| {
        SessionError::SessionId("session start requires a non-negative timestamp".to_string())
    })?;
    let mut bytes = [0_u8; 4];
    getrandom::getrandom(&mut bytes).map_err(|err| SessionError::SessionId(err.to_string()))?;
    let sample = u32::from_le_bytes(bytes) % SESSION_SUFFIX_SPACE;
    Ok(format!(
        "session-{}-{}",
        base36_encode_u64(timestamp),
        base36_encode_fixed_u32(sample, 4)
    ))
}
