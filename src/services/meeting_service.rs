use crate::utils::token::generate_room_id;

/// Builds join links on the third-party meeting provider. Only a random room
/// name is generated; the provider creates the room on first join.
#[derive(Clone)]
pub struct MeetingService {
    base_url: String,
}

impl MeetingService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn new_room_url(&self) -> String {
        format!("{}/{}", self.base_url, generate_room_id())
    }
}
