/// Configuration management
use serde::Deserialize;

fn default_root() -> String {
    "/".to_string()
}

fn default_cookie_ttl_days() -> i64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    /// Mount point of the application, prefixed to every auth route.
    #[serde(default = "default_root")]
    pub root: String,
    /// Forward expiry of the session cookie, in days.
    #[serde(default = "default_cookie_ttl_days")]
    pub cookie_ttl_days: i64,
    /// Sender name prepended to outgoing SMS messages.
    pub sms_sender: String,
    /// Auto-register a guest account when a request carries no usable
    /// credentials, instead of redirecting to the login page.
    #[serde(default)]
    pub auto_register: bool,
    // SMTP is optional; without it email notifications fall back to the log.
    pub smtp_host: Option<String>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// SMTP settings, when the environment carries a complete set.
    pub fn smtp(&self) -> Option<SmtpConfig> {
        Some(SmtpConfig {
            host: self.smtp_host.clone()?,
            username: self.smtp_username.clone()?,
            password: self.smtp_password.clone()?,
            from: self.smtp_from.clone()?,
        })
    }
}
