//! Fair invite code generation.

use rand::Rng;

/// Uppercase alphanumeric alphabet used for invite codes.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Invite codes are 8 characters, matching the platform's public
/// enrollment links.
pub const INVITE_CODE_LEN: usize = 8;

/// Generate a cryptographically random 8-character uppercase
/// alphanumeric invite code.
///
/// Uniqueness across fairs is enforced by the store's UNIQUE index;
/// callers retry generation on a collision.
pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_has_expected_length() {
        assert_eq!(generate_invite_code().len(), INVITE_CODE_LEN);
    }

    #[test]
    fn code_is_uppercase_alphanumeric() {
        for _ in 0..100 {
            let code = generate_invite_code();
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
                "unexpected character in invite code: {code}"
            );
        }
    }

    #[test]
    fn codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| generate_invite_code()).collect();
        // 36^8 possibilities — 50 draws colliding down to one value
        // would mean a broken generator.
        assert!(codes.len() > 1);
    }
}
