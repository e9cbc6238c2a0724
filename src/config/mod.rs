use std::env;

use crate::currency::LocaleFormat;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Auth (optional — API is open when AUTH_SECRET is unset)
    pub auth_secret: Option<String>,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub token_ttl_hours: i64,

    // Amount formatting for CSV and form round trips
    pub locale: LocaleFormat,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = LocaleFormat::default();
        let locale = LocaleFormat::new(
            env_char("LOCALE_DECIMAL_SEPARATOR", defaults.decimal_separator)?,
            env_char("LOCALE_THOUSANDS_SEPARATOR", defaults.thousands_separator)?,
            env::var("LOCALE_FRACTION_DIGITS")
                .unwrap_or_else(|_| defaults.fraction_digits.to_string())
                .parse()?,
        )?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            auth_secret: env::var("AUTH_SECRET").ok().filter(|s| !s.is_empty()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".into())
                .parse()
                .unwrap_or(24),

            locale,
        })
    }

    /// Returns true if login can issue tokens.
    pub fn has_login(&self) -> bool {
        self.auth_secret.is_some() && self.admin_password.is_some()
    }
}

fn env_char(key: &str, default: char) -> anyhow::Result<char> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(anyhow::anyhow!("{key} must be a single character, got {raw:?}")),
            }
        }
    }
}
