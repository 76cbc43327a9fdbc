use serde::{Deserialize, Serialize};

use crate::session::error::SessionError;
use crate::session::record::SessionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Consent,
    ParticipantInfo,
    GroupAssignment,
    Instructions,
    FirstDrawing,
    FirstCaption,
    Inspiration,
    SecondDrawing,
    SecondCaption,
    FinalAssessment,
    Submitted,
}

pub const STAGE_ORDER: [Stage; 11] = [
    Stage::Consent,
    Stage::ParticipantInfo,
    Stage::GroupAssignment,
    Stage::Instructions,
    Stage::FirstDrawing,
    Stage::FirstCaption,
    Stage::Inspiration,
    Stage::SecondDrawing,
    Stage::SecondCaption,
    Stage::FinalAssessment,
    Stage::Submitted,
];

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Consent => "consent",
            Stage::ParticipantInfo => "participant_info",
            Stage::GroupAssignment => "group_assignment",
            Stage::Instructions => "instructions",
            Stage::FirstDrawing => "first_drawing",
            Stage::FirstCaption => "first_caption",
            Stage::Inspiration => "inspiration",
            Stage::SecondDrawing => "second_drawing",
            Stage::SecondCaption => "second_caption",
            Stage::FinalAssessment => "final_assessment",
            Stage::Submitted => "submitted",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Stage::Consent => 0,
            Stage::ParticipantInfo => 1,
            Stage::GroupAssignment => 2,
            Stage::Instructions => 3,
            Stage::FirstDrawing => 4,
            Stage::FirstCaption => 5,
            Stage::Inspiration => 6,
            Stage::SecondDrawing => 7,
            Stage::SecondCaption => 8,
            Stage::FinalAssessment => 9,
            Stage::Submitted => 10,
        }
    }

    pub fn successor(self) -> Option<Stage> {
        match self {
            Stage::Consent => Some(Stage::ParticipantInfo),
            Stage::ParticipantInfo => Some(Stage::GroupAssignment),
            Stage::GroupAssignment => Some(Stage::Instructions),
            Stage::Instructions => Some(Stage::FirstDrawing),
            Stage::FirstDrawing => Some(Stage::FirstCaption),
            Stage::FirstCaption => Some(Stage::Inspiration),
            Stage::Inspiration => Some(Stage::SecondDrawing),
            Stage::SecondDrawing => Some(Stage::SecondCaption),
            Stage::SecondCaption => Some(Stage::FinalAssessment),
            Stage::FinalAssessment => Some(Stage::Submitted),
            Stage::Submitted => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Submitted)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn can_enter(record: &SessionRecord, target: Stage) -> bool {
    match target {
        Stage::Consent => true,
        Stage::ParticipantInfo => record.consent_given,
        Stage::GroupAssignment => record.participant_id.as_str().parse::<i64>().is_ok(),
        Stage::Instructions => record.demographics.is_some() && record.self_assessment.is_some(),
        Stage::FirstDrawing => record.instructions_acknowledged,
        Stage::FirstCaption => record.drawings[0].is_some(),
        Stage::Inspiration => record
            .caption(0)
            .is_some_and(|caption| !caption.trim().is_empty()),
        Stage::SecondDrawing => !record.ai_interactions.is_empty() || record.inspiration_skipped,
        Stage::SecondCaption => record.drawings[1].is_some(),
        Stage::FinalAssessment => record
            .caption(1)
            .is_some_and(|caption| !caption.trim().is_empty()),
        Stage::Submitted => record.final_assessment.is_some(),
    }
}

pub fn advance(record: &mut SessionRecord, target: Stage) -> Result<(), SessionError> {
    if record.submitted || target.index() <= record.stage.index() {
        return Err(SessionError::StageLocked { stage: target });
    }
    if record.stage.successor() != Some(target) || !can_enter(record, target) {
        return Err(SessionError::InvalidTransition {
            from: record.stage,
            to: target,
        });
    }
    record.stage = target;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_matches_successor_chain() {
        for window in STAGE_ORDER.windows(2) {
            assert_eq!(window[0].successor(), Some(window[1]));
        }
        assert_eq!(Stage::Submitted.successor(), None);
        assert!(Stage::Submitted.is_terminal());
    }

    #[test]
    fn stage_index_is_strictly_increasing() {
        for (expected, stage) in STAGE_ORDER.iter().enumerate() {
            assert_eq!(stage.index(), expected);
        }
    }
}
