//! # Bearer Tokens
//!
//! The cart never logs in or refreshes anything. Whoever owns the session
//! hands it a [`TokenProvider`] and the HTTP client asks it for a token on
//! every request.

/// Environment variable read by [`EnvToken`].
pub const TOKEN_ENV_VAR: &str = "FOLIO_TOKEN";

/// Supplies the bearer token for API requests.
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` when the shopper is not signed in.
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token (CLI flag, tests).
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        let token = self.0.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

/// Reads the token from the environment at call time, so a token exported
/// after startup is picked up by the next request.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        EnvToken { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        EnvToken::new(TOKEN_ENV_VAR)
    }
}

impl TokenProvider for EnvToken {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}
