//! Outgoing mail over SMTP, configured through system settings.

use std::{collections::HashMap, time::Duration};

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use sea_orm::DatabaseConnection;

use crate::server::{data::setting::SettingRepository, error::Error};

pub const DEFAULT_SITE_NAME: &str = "LLM Price Hub";

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Boolean system setting, accepting `1`, `true`, `yes` and `on`
pub fn setting_flag(value: Option<&String>, default: bool) -> bool {
    match value {
        Some(value) => matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// SMTP connection settings read from the `smtp_*` system settings
#[derive(Clone, Debug, PartialEq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// STARTTLS on a plain connection
    pub use_tls: bool,
    /// Implicit TLS, takes precedence over `use_tls`
    pub use_ssl: bool,
    pub sender: String,
}

impl SmtpSettings {
    /// Returns `None` unless host, a non-zero port and a sender (or username) are set
    pub fn from_map(settings: &HashMap<String, String>) -> Option<Self> {
        let host = non_empty(settings.get("smtp_host"))?;
        let port = non_empty(settings.get("smtp_port"))?
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)?;
        let username = non_empty(settings.get("smtp_username"));
        let sender = non_empty(settings.get("smtp_sender")).or_else(|| username.clone())?;

        Some(Self {
            host,
            port,
            username,
            password: non_empty(settings.get("smtp_password")),
            use_tls: setting_flag(settings.get("smtp_use_tls"), true),
            use_ssl: setting_flag(settings.get("smtp_use_ssl"), false),
            sender,
        })
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, Error> {
        let builder = if self.use_ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
        } else if self.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host)
        };

        let builder = builder.port(self.port).timeout(Some(SMTP_TIMEOUT));

        let builder = match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(builder.build())
    }
}

pub struct EmailService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EmailService<'a> {
    /// Creates a new instance of [`EmailService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn smtp_settings(&self) -> Result<Option<SmtpSettings>, Error> {
        let settings = SettingRepository::new(self.db).all().await?;

        Ok(SmtpSettings::from_map(&settings))
    }

    /// Configured `site_name`, used in subjects and bodies
    pub async fn site_name(&self) -> Result<String, Error> {
        Ok(SettingRepository::new(self.db)
            .get("site_name")
            .await?
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()))
    }

    /// Sends a plain text mail.
    ///
    /// Returns `Ok(false)` when SMTP is not configured or delivery fails; delivery errors are
    /// logged, only database errors are returned.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<bool, Error> {
        let Some(settings) = self.smtp_settings().await? else {
            tracing::debug!("SMTP not configured, skipping mail to {}", to);

            return Ok(false);
        };

        match deliver(&settings, to, subject, body).await {
            Ok(()) => {
                tracing::debug!("Sent mail \"{}\" to {}", subject, to);

                Ok(true)
            }
            Err(e) => {
                tracing::error!("Failed to send email to {}: {}", to, e);

                Ok(false)
            }
        }
    }
}

async fn deliver(settings: &SmtpSettings, to: &str, subject: &str, body: &str) -> Result<(), Error> {
    let message = Message::builder()
        .from(settings.sender.parse::<Mailbox>()?)
        .to(to.parse::<Mailbox>()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())?;

    settings.transport()?.send(message).await?;

    Ok(())
}
