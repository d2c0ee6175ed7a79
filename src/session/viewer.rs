use std::ops::Deref;

use serde::Serialize;

use crate::models::profile::{Profile, Role};

/// Profile of a signed-in admin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AdminProfile(Profile);

/// Profile of a signed-in student.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StudentProfile(Profile);

impl Deref for AdminProfile {
    type Target = Profile;

    fn deref(&self) -> &Profile {
        &self.0
    }
}

impl Deref for StudentProfile {
    type Target = Profile;

    fn deref(&self) -> &Profile {
        &self.0
    }
}

/// The role is inspected once, here; downstream code receives the scoped
/// profile type instead of a role string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", content = "profile", rename_all = "lowercase")]
pub enum Viewer {
    Admin(AdminProfile),
    Student(StudentProfile),
}

impl From<Profile> for Viewer {
    fn from(profile: Profile) -> Self {
        match profile.role {
            Role::Admin => Viewer::Admin(AdminProfile(profile)),
            Role::Student => Viewer::Student(StudentProfile(profile)),
        }
    }
}

impl Viewer {
    pub fn profile(&self) -> &Profile {
        match self {
            Viewer::Admin(admin) => &admin.0,
            Viewer::Student(student) => &student.0,
        }
    }

    pub fn into_profile(self) -> Profile {
        match self {
            Viewer::Admin(AdminProfile(p)) | Viewer::Student(StudentProfile(p)) => p,
        }
    }

    pub fn as_admin(&self) -> Option<&AdminProfile> {
        match self {
            Viewer::Admin(admin) => Some(admin),
            Viewer::Student(_) => None,
        }
    }

    pub fn as_student(&self) -> Option<&StudentProfile> {
        match self {
            Viewer::Student(student) => Some(student),
            Viewer::Admin(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(role: Role) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: "x@example.com".into(),
            role,
            full_name: "X".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn role_picks_the_variant() {
        let admin = Viewer::from(profile(Role::Admin));
        assert!(admin.as_admin().is_some());
        assert!(admin.as_student().is_none());

        let student = Viewer::from(profile(Role::Student));
        assert!(student.as_student().is_some());
        assert_eq!(student.profile().role, Role::Student);
    }
}
