use std::borrow::Cow;

use validator::ValidationError;

use crate::models::profile::Role;

pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<Role>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("role");
        err.message = Some(Cow::from("Role must be either student or admin"));
        err
    })
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("This field is required"));
        return Err(err);
    }
    Ok(())
}
