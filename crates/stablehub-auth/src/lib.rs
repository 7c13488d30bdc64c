//! # stablehub-auth
//!
//! Authentication primitives for StableHub.
//!
//! ## Modules
//!
//! - `jwt`: validation (and, for tooling and tests, issuance) of the member
//!   session tokens minted by the external auth service
//! - `password`: Argon2id hashing of share-link passwords and the share
//!   password policy

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, SharePasswordPolicy};
