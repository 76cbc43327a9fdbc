use serde::{Deserialize, Serialize};

use crate::session::stage::Stage;
use crate::shared::ids::ParticipantId;

pub const AGE_MIN: u8 = 13;
pub const AGE_MAX: u8 = 100;
pub const GPA_MAX: f32 = 4.0;
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtisticExperience {
    None,
    Beginner,
    Intermediate,
    Advanced,
}

impl ArtisticExperience {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtisticExperience::None => "none",
            ArtisticExperience::Beginner => "beginner",
            ArtisticExperience::Intermediate => "intermediate",
            ArtisticExperience::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for ArtisticExperience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Verbal,
    Visual,
    Unassigned,
}

impl Group {
    pub fn as_str(self) -> &'static str {
        match self {
            Group::Verbal => "verbal",
            Group::Visual => "visual",
            Group::Unassigned => "unassigned",
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    VerbalPrompt,
    VisualPrompt,
}

impl InteractionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::VerbalPrompt => "verbal_prompt",
            InteractionKind::VisualPrompt => "visual_prompt",
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub age: u8,
    pub gender: Gender,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub gpa: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfAssessment {
    #[serde(default)]
    pub creative_mood: Option<u8>,
    pub current_mood: u8,
    pub artistic_experience: ArtisticExperience,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub pixel_data: Vec<u8>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInteraction {
    pub kind: InteractionKind,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalAssessment {
    pub self_creativity: u8,
    pub satisfaction: u8,
    pub ai_influence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub demographics: Option<Demographics>,
    #[serde(default)]
    pub self_assessment: Option<SelfAssessment>,
    pub group: Group,
    pub drawings: [Option<Drawing>; 2],
    #[serde(default)]
    pub ai_interactions: Vec<AiInteraction>,
    #[serde(default)]
    pub final_assessment: Option<FinalAssessment>,
    pub stage: Stage,
    pub consent_given: bool,
    pub instructions_acknowledged: bool,
    pub inspiration_skipped: bool,
    pub submitted: bool,
}

impl SessionRecord {
    pub fn new(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            demographics: None,
            self_assessment: None,
            group: Group::Unassigned,
            drawings: [None, None],
            ai_interactions: Vec::new(),
            final_assessment: None,
            stage: Stage::Consent,
            consent_given: false,
            instructions_acknowledged: false,
            inspiration_skipped: false,
            submitted: false,
        }
    }

    pub fn caption(&self, slot: usize) -> Option<&str> {
        self.drawings
            .get(slot)
            .and_then(|drawing| drawing.as_ref())
            .and_then(|drawing| drawing.caption.as_deref())
    }
}
