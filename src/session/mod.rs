pub mod engine;
pub mod error;
pub mod group;
pub mod record;
pub mod stage;

pub use engine::{ParticipantInfoForm, SessionEngine, SessionView, DRAWING_PROMPTS};
pub use error::SessionError;
pub use group::assign_group;
pub use record::{
    AiInteraction, ArtisticExperience, Demographics, Drawing, FinalAssessment, Gender, Group,
    InteractionKind, SelfAssessment, SessionRecord,
};
pub use stage::{advance, can_enter, Stage, STAGE_ORDER};
