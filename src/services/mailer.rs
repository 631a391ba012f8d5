//! Outbound mail for temporary credentials
//!
//! Fire-and-forget: callers never learn whether delivery succeeded.
//! With SMTP configured the message goes out over a TLS transport; without
//! it, the would-be mail is logged so development setups keep working.

use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::SmtpConfig;

pub struct Mailer {
    smtp: Option<SmtpConfig>,
}

impl Mailer {
    pub fn new(smtp: Option<SmtpConfig>) -> Self {
        Self { smtp }
    }

    /// Dispatch a temporary credential to an account holder.
    pub async fn send_temporary_credential(&self, to: &str, username: &str, temp_password: &str) {
        let Some(ref smtp) = self.smtp else {
            info!(
                to = to,
                username = username,
                "SMTP not configured; temporary credential mail logged instead of sent"
            );
            return;
        };

        let body = format!(
            "A temporary password was issued for account \"{}\".\n\n\
             Temporary password: {}\n\n\
             It expires in 72 hours and must be changed at first login.",
            username, temp_password
        );

        if let Err(err) = self.send(smtp, to, "Union Registry password reset", &body).await {
            warn!(to = to, error = %err, "Failed to send temporary credential mail");
        }
    }

    async fn send(
        &self,
        smtp: &SmtpConfig,
        to: &str,
        subject: &str,
        body: &str,
    ) -> anyhow::Result<()> {
        let from: Mailbox = smtp.from.parse()?;
        let to: Mailbox = to.parse()?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .body(body.to_string())?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        transport.send(email).await?;
        Ok(())
    }
}
