pub mod ids;
pub mod logging;

pub use ids::ParticipantId;
pub use logging::{append_session_log_line, session_log_path};
