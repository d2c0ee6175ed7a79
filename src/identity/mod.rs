//! External identity/session provider.

pub mod memory;
pub mod provider;
pub mod remote;

pub use memory::MemoryIdentity;
pub use provider::{AuthUser, IdentityProvider, Session, SignUp, SignupMetadata};
pub use remote::RemoteIdentity;

#[cfg(test)]
pub use provider::MockIdentityProvider;
