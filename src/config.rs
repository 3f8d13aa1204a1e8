use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// Secret the identity tokens are signed with. There is no baked-in
    /// fallback; the process refuses to start without it.
    pub token_secret: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?,
            token_secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
        })
    }
}
