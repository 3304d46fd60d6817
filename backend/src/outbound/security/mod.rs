//! Security primitive adapters: password generation and hashing.

mod argon2_hasher;
mod random_password;

pub use argon2_hasher::Argon2PasswordHasher;
pub use random_password::OsRandomPasswordGenerator;
