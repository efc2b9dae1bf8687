// ABOUTME: Username rules shared by the availability check and the claim endpoint
// ABOUTME: Length and reserved-word checks; the database unique index has the final say

pub const MIN_USERNAME_LENGTH: usize = 3;

pub const RESERVED_USERNAMES: &[&str] = &[
    "admin", "test", "user", "billa", "support", "api", "www", "mail", "ftp",
];

pub const TOO_SHORT_MESSAGE: &str = "Username must be at least 3 characters";
pub const INVALID_CHARS_MESSAGE: &str =
    "Username may only contain letters, numbers and underscores";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameRejection {
    TooShort,
    Reserved,
    InvalidCharacters,
}

impl UsernameRejection {
    /// Message surfaced to the form. Reserved names get none, like a taken name.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            UsernameRejection::TooShort => Some(TOO_SHORT_MESSAGE),
            UsernameRejection::Reserved => None,
            UsernameRejection::InvalidCharacters => Some(INVALID_CHARS_MESSAGE),
        }
    }
}

pub fn normalize(username: &str) -> String {
    username.to_lowercase()
}

pub fn is_reserved(username: &str) -> bool {
    let lowered = normalize(username);
    RESERVED_USERNAMES.contains(&lowered.as_str())
}

/// Length and reserved-word checks, returning the lower-cased name.
pub fn precheck(username: &str) -> Result<String, UsernameRejection> {
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(UsernameRejection::TooShort);
    }

    if is_reserved(username) {
        return Err(UsernameRejection::Reserved);
    }

    Ok(normalize(username))
}

/// Stricter rules for actually claiming a name: the stored form is `[a-z0-9_]+`.
pub fn validate_claim(username: &str) -> Result<String, UsernameRejection> {
    let normalized = precheck(username)?;

    let valid_chars = normalized
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid_chars {
        return Err(UsernameRejection::InvalidCharacters);
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_usernames_rejected_with_message() {
        for candidate in ["", "a", "ab", "Zé"] {
            let rejection = precheck(candidate).unwrap_err();
            assert_eq!(rejection, UsernameRejection::TooShort);
            assert_eq!(rejection.message(), Some(TOO_SHORT_MESSAGE));
        }
    }

    #[test]
    fn test_reserved_usernames_case_insensitive() {
        for candidate in ["admin", "ADMIN", "Support", "wWw", "billa"] {
            assert_eq!(precheck(candidate), Err(UsernameRejection::Reserved));
        }
        assert_eq!(UsernameRejection::Reserved.message(), None);
    }

    #[test]
    fn test_reserved_match_is_exact() {
        assert_eq!(precheck("admin1"), Ok("admin1".to_string()));
        assert_eq!(precheck("testing"), Ok("testing".to_string()));
    }

    #[test]
    fn test_precheck_lowercases() {
        assert_eq!(precheck("Alice_99"), Ok("alice_99".to_string()));
    }

    #[test]
    fn test_claim_rejects_invalid_characters() {
        assert_eq!(
            validate_claim("bad name"),
            Err(UsernameRejection::InvalidCharacters)
        );
        assert_eq!(
            validate_claim("dash-name"),
            Err(UsernameRejection::InvalidCharacters)
        );
        assert_eq!(validate_claim("Good_Name"), Ok("good_name".to_string()));
    }
}
