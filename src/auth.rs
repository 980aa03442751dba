//! Login gate for the analysis form.
//!
//! The credentials are baked into the binary and visible to anyone who opens
//! it; this is a soft gate for demo deployments, not an authentication
//! boundary. Do not reuse this pattern where real access control is needed.

/// Shown inline on the login screen when a pair does not match.
pub const LOGIN_ERROR: &str = "بيانات الدخول غير صحيحة. تأكد من الحروف والمسافات.";

/// Accepted (username, password) pairs after normalization.
const ACCEPTED: [(&str, &str); 2] = [("ADMIN1", "ADMIN1"), ("ADMIN", "ADMIN6787")];

/// Check a credential pair against the fixed accepted pairs.
///
/// Both fields are trimmed and upper-cased; the password additionally has all
/// internal whitespace removed, so "admin 6787" passes for "ADMIN6787".
pub fn verify(username: &str, password: &str) -> bool {
    let user = username.trim().to_uppercase();
    let pass: String = password
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    ACCEPTED.iter().any(|(u, p)| user == *u && pass == *p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_fixed_pairs() {
        assert!(verify("ADMIN1", "ADMIN1"));
        assert!(verify("ADMIN", "ADMIN6787"));
    }

    #[test]
    fn normalizes_case_and_surrounding_whitespace() {
        assert!(verify(" admin1 ", "admin1"));
        assert!(verify("Admin", "  Admin6787  "));
    }

    #[test]
    fn strips_internal_whitespace_from_password_only() {
        assert!(verify("ADMIN", "admin 6787"));
        assert!(verify("ADMIN1", "AD MIN 1"));
        // Internal whitespace in the username is not stripped.
        assert!(!verify("AD MIN", "ADMIN6787"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!verify("", ""));
        assert!(!verify("ADMIN", "ADMIN1"));
        assert!(!verify("ADMIN1", "ADMIN6787"));
        assert!(!verify("admin2", "admin2"));
        assert!(!verify("ADMIN", ""));
    }
}
