// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use chrono::Utc;
use db_storage::users::{User, UserId};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Claims of the bearer tokens issued by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the user the token was issued to
    pub sub: UserId,
    /// Username at the time the token was issued
    pub name: String,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expires at (unix timestamp)
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("The token has expired")]
    Expired,
    #[error("The token is invalid, {0}")]
    Invalid(jsonwebtoken::errors::Error),
    #[error("Failed to sign token, {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 signed bearer tokens
pub struct TokenContext {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenContext").finish_non_exhaustive()
    }
}

impl TokenContext {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for the given user which is valid for `lifetime`
    pub fn issue(&self, user: &User, lifetime: Duration) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let lifetime = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);

        let claims = Claims {
            sub: user.id,
            name: user.username.clone(),
            iat,
            exp: iat.saturating_add(lifetime),
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify the signature and expiry of the token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(TokenError::Expired),
            Err(e) => Err(TokenError::Invalid(e)),
        }
    }
}
