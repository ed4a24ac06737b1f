//! Chat-log message roles and limits.

use crate::error::CoreError;

pub const CHAT_ROLE_USER: &str = "user";
pub const CHAT_ROLE_ASSISTANT: &str = "assistant";
pub const CHAT_ROLE_SYSTEM: &str = "system";

const VALID_CHAT_ROLES: &[&str] = &[CHAT_ROLE_USER, CHAT_ROLE_ASSISTANT, CHAT_ROLE_SYSTEM];

/// Default and maximum page size for chat history.
pub const DEFAULT_HISTORY_LIMIT: i64 = 100;
pub const MAX_HISTORY_LIMIT: i64 = 500;

pub fn validate_chat_role(role: &str) -> Result<(), CoreError> {
    if VALID_CHAT_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid chat role '{role}'. Must be one of: {VALID_CHAT_ROLES:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_pass() {
        assert!(validate_chat_role("user").is_ok());
        assert!(validate_chat_role("assistant").is_ok());
        assert!(validate_chat_role("system").is_ok());
    }

    #[test]
    fn unknown_role_fails() {
        assert!(validate_chat_role("tool").is_err());
        assert!(validate_chat_role("").is_err());
    }
}
