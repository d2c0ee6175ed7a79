use rand::{distributions::Alphanumeric, thread_rng, Rng};

pub const PASSCODE_LENGTH: usize = 8;
const ROOM_ID_LENGTH: usize = 16;

pub fn generate_access_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Eight uppercase alphanumerics, e.g. `ABC12345`.
pub fn generate_passcode() -> String {
    generate_access_token(PASSCODE_LENGTH).to_ascii_uppercase()
}

pub fn generate_room_id() -> String {
    format!(
        "jobportal-{}",
        generate_access_token(ROOM_ID_LENGTH).to_ascii_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passcode_shape() {
        let code = generate_passcode();
        assert_eq!(code.len(), PASSCODE_LENGTH);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn room_ids_differ() {
        assert_ne!(generate_room_id(), generate_room_id());
    }
}
