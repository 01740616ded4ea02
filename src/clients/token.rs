/// Environment variable holding the delegated user token.
pub const TOKEN_ENV_VAR: &str = "DATABRICKS_TOKEN";

/// Source of the per-user delegated (OBO) access token.
///
/// `None` means no token is available, e.g. when running outside the
/// hosting environment.
pub trait TokenProvider: Send + Sync {
    fn user_token(&self) -> Option<String>;
}

/// Token captured from `DATABRICKS_TOKEN` at startup.
#[derive(Clone, Default)]
pub struct EnvTokenProvider {
    token: Option<String>,
}

impl EnvTokenProvider {
    pub fn from_env() -> Self {
        let token = std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self { token }
    }
}

impl TokenProvider for EnvTokenProvider {
    fn user_token(&self) -> Option<String> {
        self.token.clone()
    }
}

// Never print the token itself.
impl std::fmt::Debug for EnvTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvTokenProvider")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Fixed token, or none at all.
#[derive(Clone, Default)]
pub struct StaticTokenProvider(pub Option<String>);

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl TokenProvider for StaticTokenProvider {
    fn user_token(&self) -> Option<String> {
        self.0.clone()
    }
}
