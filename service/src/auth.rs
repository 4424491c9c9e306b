use crate::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use rand::{distributions::Alphanumeric, Rng};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

pub const SESSION_COOKIE: &str = "admin_session";

/// Operator identity check, swappable for a real identity provider.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Single operator account taken from config.
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &abi::AdminConfig) -> Self {
        Self::new(&config.username, &config.password)
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Issued admin session tokens. Sessions live for the process lifetime or
/// until logout.
#[derive(Clone, Default)]
pub struct SessionStore(Arc<Mutex<HashSet<String>>>);

impl SessionStore {
    pub fn issue(&self) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        self.0.lock().unwrap().insert(token.clone());
        token
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.lock().unwrap().contains(token)
    }

    pub fn revoke(&self, token: &str) {
        self.0.lock().unwrap().remove(token);
    }
}

/// Extractor proving the request carries a valid admin session; anything
/// else is bounced to the login page.
pub struct AdminSession {
    token: String,
}

impl AdminSession {
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        match jar.get(SESSION_COOKIE) {
            Some(cookie) if state.sessions.contains(cookie.value()) => Ok(Self {
                token: cookie.value().to_string(),
            }),
            _ => Err(Redirect::to("/admin/login").into_response()),
        }
    }
}
