//! Invitation token generation.

use rand_core::{OsRng, RngCore};

/// Generate an invitation token: 32 bytes from the OS RNG, hex encoded with
/// an `inv_` prefix.
///
/// The token is a bearer credential for account activation, so the bytes
/// must come from a cryptographically secure source. Hex keeps it URL-safe.
pub fn generate_invitation_token() -> String {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    format!("inv_{}", hex::encode(secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_prefix_and_length() {
        let token = generate_invitation_token();
        assert!(token.starts_with("inv_"));
        // "inv_" + 64 hex chars
        assert_eq!(token.len(), 68);
    }

    #[test]
    fn token_body_is_lowercase_hex() {
        let token = generate_invitation_token();
        assert!(token["inv_".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn tokens_are_unique() {
        use std::collections::HashSet;
        let tokens: HashSet<String> = (0..100).map(|_| generate_invitation_token()).collect();
        assert_eq!(tokens.len(), 100);
    }
}
