//! Entity definitions (database row mappings).

pub mod account;
pub mod driver;
pub mod user;

pub use account::AccountEntity;
pub use driver::DriverEntity;
pub use user::UserEntity;

/// Joins a previous-password history into the stored column form
/// (comma-separated, most recent first; empty when no history is retained).
pub fn join_password_history(history: &[String]) -> String {
    history.join(",")
}

/// Splits the stored previous-password column back into a history list.
pub fn split_password_history(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
