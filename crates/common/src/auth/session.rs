//! Signed session cookie helpers
//!
//! The session credential is the provider access token, carried in a signed
//! http-only cookie. Signing keeps the client from minting or altering the
//! cookie; verification of the token itself is the provider's job.

use crate::config::AuthConfig;
use crate::errors::{AppError, Result};
use tower_cookies::cookie::time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies, Key};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "accessToken";

/// Build the cookie signing key from configuration.
///
/// `Key::from` wants enough material for both the signing and encryption
/// halves, so the secret must be at least 64 bytes; fail fast at startup
/// instead of panicking inside the cookie jar.
pub fn cookie_key(config: &AuthConfig) -> Result<Key> {
    if config.cookie_secret.len() < 64 {
        return Err(AppError::Configuration {
            message: "auth.cookie_secret must be at least 64 bytes".to_string(),
        });
    }
    Ok(Key::from(config.cookie_secret.as_bytes()))
}

/// Set the signed session cookie: http-only, SameSite=Strict, bounded max-age.
pub fn issue(cookies: &Cookies, key: &Key, token: &str, config: &AuthConfig) {
    let cookie = Cookie::build((SESSION_COOKIE, token.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.secure_cookies)
        .max_age(Duration::seconds(config.session_max_age_secs as i64))
        .build();
    cookies.signed(key).add(cookie);
}

/// Read the session token, verifying the signature. A missing or tampered
/// cookie reads as absent.
pub fn read(cookies: &Cookies, key: &Key) -> Option<String> {
    cookies
        .signed(key)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
}

/// Instruct the client to drop the session cookie.
pub fn clear(cookies: &Cookies) {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookies.remove(cookie);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            cookie_secret: "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
                .to_string(),
            session_max_age_secs: 3600,
            secure_cookies: false,
        }
    }

    #[test]
    fn test_key_requires_long_secret() {
        let mut config = test_config();
        config.cookie_secret = "short".to_string();
        assert!(cookie_key(&config).is_err());
        // 32 bytes is still too short for a full signing + encryption key
        config.cookie_secret = "0123456789abcdef0123456789abcdef".to_string();
        assert!(cookie_key(&config).is_err());
        assert!(cookie_key(&test_config()).is_ok());
    }

    #[test]
    fn test_issue_and_read_round_trip() {
        let config = test_config();
        let key = cookie_key(&config).unwrap();
        let cookies = Cookies::default();

        issue(&cookies, &key, "tok-123", &config);
        assert_eq!(read(&cookies, &key).as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_tampered_cookie_reads_as_absent() {
        let config = test_config();
        let key = cookie_key(&config).unwrap();
        let cookies = Cookies::default();

        // unsigned value planted directly in the jar
        cookies.add(Cookie::new(SESSION_COOKIE, "forged"));
        assert!(read(&cookies, &key).is_none());
    }

    #[test]
    fn test_clear_removes_cookie() {
        let config = test_config();
        let key = cookie_key(&config).unwrap();
        let cookies = Cookies::default();

        issue(&cookies, &key, "tok-123", &config);
        clear(&cookies);
        assert!(read(&cookies, &key).is_none());
    }
}
