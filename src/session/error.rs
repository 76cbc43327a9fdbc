use crate::export::ExportError;
use crate::gateway::GatewayError;
use crate::session::stage::Stage;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("stage transition `{from}` -> `{to}` is invalid")]
    InvalidTransition { from: Stage, to: Stage },
    #[error("stage `{stage}` is already complete and cannot be re-entered")]
    StageLocked { stage: Stage },
    #[error("participant id `{participant_id}` does not parse as a base-10 integer")]
    InvalidParticipantId { participant_id: String },
    #[error("invalid `{field}`: {reason}")]
    Validation { field: String, reason: String },
    #[error("failed to generate session id: {0}")]
    SessionId(String),
    #[error("inspiration gateway call failed: {0}")]
    Gateway(#[from] GatewayError),
    #[error("submission export failed: {0}")]
    Export(#[from] ExportError),
}
