//! Who is signed in and with which profile.

pub mod client;
pub mod reconcile;
pub mod reconciler;
pub mod state;
pub mod viewer;

pub use client::{AuthClient, SessionEvent, SessionEventKind};
pub use reconciler::{Outcome, SessionReconciler};
pub use state::AuthState;
pub use viewer::{AdminProfile, StudentProfile, Viewer};
