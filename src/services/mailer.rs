//! Outgoing notification mail

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::SmtpConfig;
use crate::errors::{Result, SiteGlueError};

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a plain text mail
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

fn parse_mailbox(addr: &str) -> Result<Mailbox> {
    addr.parse()
        .map_err(|e| SiteGlueError::mail(format!("invalid address '{}': {}", addr, e)))
}

/// Build a text/plain message
pub fn build_message(from: &str, to: &str, subject: &str, body: &str) -> Result<Message> {
    Message::builder()
        .from(parse_mailbox(from)?)
        .to(parse_mailbox(to)?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| SiteGlueError::mail(format!("failed to build message: {}", e)))
}

pub struct SmtpMailer {
    from: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, from: &str) -> Result<Self> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| SiteGlueError::mail(format!("failed to create SMTP transport: {}", e)))?
        } else {
            // 本地 MTA，无 TLS
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let mut builder = builder.port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            from: from.to_string(),
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let message = build_message(&self.from, to, subject, body)?;

        self.transport.send(message).await.map_err(|e| {
            error!("SMTP delivery to {} failed: {}", to, e);
            SiteGlueError::mail(format!("failed to send mail: {}", e))
        })?;

        info!(to = %to, subject = subject, "Mail sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_message() {
        let message = build_message(
            "site@example.net",
            "author@example.net",
            "[webmention] https://other.example/post",
            "{\"secret\":\"x\"}",
        )
        .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("To: author@example.net"));
        assert!(raw.contains("Subject: [webmention] https://other.example/post"));
    }

    #[test]
    fn test_invalid_address() {
        let err = build_message("site@example.net", "not an address", "s", "b").unwrap_err();
        assert!(matches!(err, SiteGlueError::Mail(_)));
    }
}
