// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! PBKDF2 password hashes
//!
//! Hashes are stored as `pbkdf2-sha256$<iterations>$<base64 salt>$<base64 hash>`.
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};
use std::num::NonZeroU32;

const SCHEME: &str = "pbkdf2-sha256";
const DEFAULT_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = digest::SHA256_OUTPUT_LEN;

static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

#[derive(Debug, thiserror::Error)]
#[error("Failed to generate a random salt")]
pub struct PasswordError;

/// Hash the password with a new random salt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_iterations(password, DEFAULT_ITERATIONS)
}

fn hash_password_with_iterations(password: &str, iterations: u32) -> Result<String, PasswordError> {
    let iterations = NonZeroU32::new(iterations).ok_or(PasswordError)?;

    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| PasswordError)?;

    let mut hash = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(ALGORITHM, iterations, &salt, password.as_bytes(), &mut hash);

    Ok(format!(
        "{SCHEME}${iterations}${}${}",
        base64::encode(salt),
        base64::encode(hash)
    ))
}

/// Check the password against a hash created by [`hash_password`]
///
/// Hashes that can not be parsed never match.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let Some((iterations, salt, hash)) = parse(encoded) else {
        log::debug!("Stored password hash has an unknown format");
        return false;
    };

    pbkdf2::verify(ALGORITHM, iterations, &salt, password.as_bytes(), &hash).is_ok()
}

/// Spend the work of a [`verify_password`] call for a user that does not exist
///
/// Never matches. Keeps failed logins of unknown users as slow as those of known users.
pub fn verify_unknown_user(password: &str) -> bool {
    if let Some(iterations) = NonZeroU32::new(DEFAULT_ITERATIONS) {
        let mut hash = [0u8; CREDENTIAL_LEN];
        pbkdf2::derive(ALGORITHM, iterations, &[0u8; SALT_LEN], password.as_bytes(), &mut hash);
    }

    false
}

fn parse(encoded: &str) -> Option<(NonZeroU32, Vec<u8>, Vec<u8>)> {
    let mut parts = encoded.split('$');

    if parts.next()? != SCHEME {
        return None;
    }

    let iterations = parts.next()?.parse().ok()?;
    let salt = base64::decode(parts.next()?).ok()?;
    let hash = base64::decode(parts.next()?).ok()?;

    if parts.next().is_some() || hash.len() != CREDENTIAL_LEN {
        return None;
    }

    Some((iterations, salt, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_roundtrip() {
        let encoded = hash_password_with_iterations("correct horse", 1_000).unwrap();

        assert!(encoded.starts_with("pbkdf2-sha256$1000$"));
        assert!(verify_password("correct horse", &encoded));
        assert!(!verify_password("battery staple", &encoded));
        assert!(!verify_password("", &encoded));
    }

    #[test]
    fn salts_differ() {
        let first = hash_password_with_iterations("pw", 1_000).unwrap();
        let second = hash_password_with_iterations("pw", 1_000).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn default_iterations_are_encoded() {
        let encoded = hash_password("pw").unwrap();

        assert!(encoded.starts_with("pbkdf2-sha256$100000$"));
        assert!(verify_password("pw", &encoded));
    }

    #[test]
    fn malformed_hashes_never_match() {
        for encoded in [
            "",
            "!",
            "pbkdf2-sha256",
            "pbkdf2-sha256$0$AAAA$AAAA",
            "pbkdf2-sha256$1000$not base64$AAAA",
            "pbkdf2-sha512$1000$AAAA$AAAA",
            "pbkdf2-sha256$1000$AAAA$AAAA",
        ] {
            assert!(!verify_password("pw", encoded), "{encoded}");
        }
    }

    #[test]
    fn unknown_users_never_match() {
        assert!(!verify_unknown_user("pw"));
        assert!(!verify_unknown_user(""));
    }

    #[test]
    fn zero_iterations_are_rejected() {
        assert!(hash_password_with_iterations("pw", 0).is_err());
    }
}
