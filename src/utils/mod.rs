pub mod crypto;
pub mod jwt;
pub mod time;
pub mod token;
pub mod validation;
