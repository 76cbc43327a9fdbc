use crate::session::error::SessionError;
use crate::session::record::Group;
use crate::shared::ids::ParticipantId;

pub fn assign_group(participant_id: &ParticipantId) -> Result<Group, SessionError> {
    let numeric: i64 = participant_id.as_str().parse().map_err(|_| {
        SessionError::InvalidParticipantId {
            participant_id: participant_id.as_str().to_string(),
        }
    })?;
    if numeric % 2 == 0 {
        Ok(Group::Visual)
    } else {
        Ok(Group::Verbal)
    }
}
