//! Signed session cookies and the extractors built on them.
//!
//! The cookie value is `<user_id>.<hex hmac-sha256(secret, user_id)>`. A
//! cookie that fails verification is treated as absent.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use glossa_core::{Error, Result, User};

use crate::error::ApiError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "glossa_session";

/// Signs and verifies session cookies.
#[derive(Clone)]
pub struct SessionSigner {
    secret: Arc<Vec<u8>>,
    secure: bool,
}

impl SessionSigner {
    /// `secure` adds the `Secure` attribute to issued cookies.
    pub fn new(secret: &str, secure: bool) -> Self {
        Self {
            secret: Arc::new(secret.as_bytes().to_vec()),
            secure,
        }
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| Error::Internal(format!("invalid session key: {}", e)))
    }

    /// Signed cookie value for a user.
    pub fn sign(&self, user_id: i64) -> Result<String> {
        let mut mac = self.mac()?;
        mac.update(user_id.to_string().as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("{}.{}", user_id, signature))
    }

    /// User id carried by a cookie value, if the signature checks out.
    pub fn verify(&self, value: &str) -> Option<i64> {
        let (id, signature) = value.split_once('.')?;
        let user_id: i64 = id.parse().ok()?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac().ok()?;
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(user_id)
    }

    /// `Set-Cookie` value that logs the user in.
    pub fn login_cookie(&self, user_id: i64) -> Result<String> {
        let value = self.sign(user_id)?;
        Ok(self.cookie(&value, None))
    }

    /// `Set-Cookie` value that clears the session.
    pub fn logout_cookie(&self) -> String {
        self.cookie("", Some(0))
    }

    fn cookie(&self, value: &str, max_age: Option<u64>) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/",
            SESSION_COOKIE, value
        );
        if let Some(age) = max_age {
            cookie.push_str(&format!("; Max-Age={}", age));
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Verified user id from the request's `Cookie` headers.
    pub fn user_id_from_headers(&self, headers: &HeaderMap) -> Option<i64> {
        cookie_value(headers, SESSION_COOKIE).and_then(|v| self.verify(v))
    }
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

// =============================================================================
// EXTRACTORS
// =============================================================================

/// The logged-in user, if any.
///
/// A valid session whose user no longer exists is rejected with 403.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Some(user_id) = state.sessions.user_id_from_headers(&parts.headers) else {
            return Ok(CurrentUser(None));
        };

        match state.users.find_by_id(user_id).await? {
            Some(user) => Ok(CurrentUser(Some(user))),
            None => Err(ApiError::Forbidden(
                "Session refers to an unknown user".to_string(),
            )),
        }
    }
}

/// Extractor that requires a logged-in user.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await? {
            CurrentUser(Some(user)) => Ok(RequireUser(user)),
            CurrentUser(None) => Err(ApiError::Unauthorized("Login required".to_string())),
        }
    }
}
