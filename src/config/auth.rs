//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum HS256 signing secret length, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Token signing and session cookie settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: SecretString,

    /// Access token lifetime in seconds; also the cookie `Max-Age`
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,

    /// Adds `Secure` to the session cookie
    #[serde(default)]
    pub cookie_secure: bool,

    /// `iss` claim written and required on tokens
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl AuthConfig {
    /// Production additionally requires secure cookies.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("CAMPUS__AUTH__JWT_SECRET"));
        }
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort(MIN_JWT_SECRET_LEN));
        }
        if self.token_ttl_secs <= 0 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        if *environment == Environment::Production && !self.cookie_secure {
            return Err(ValidationError::InsecureCookieInProduction);
        }
        Ok(())
    }
}

fn default_token_ttl() -> i64 {
    8 * 3600
}

fn default_issuer() -> String {
    "campus".to_string()
}
