//! Transactional email: welcome mail on signup and password-reset links.
//!
//! Messages are multipart alternative (HTML + plain text) so the reset
//! link survives text-only clients. The welcome mail is best-effort at the
//! call site; the reset mail's result decides whether the stored reset
//! token survives.

use anyhow::Result;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::EmailConfig;

/// Service for sending transactional emails
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Check if email sending is configured and enabled
    pub fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    /// Send the post-signup welcome email. Callers treat failure as
    /// non-fatal; here an unconfigured transport just skips the send.
    pub async fn send_welcome(
        &self,
        to_email: &str,
        name: &str,
        account_url: &str,
    ) -> Result<()> {
        if !self.is_enabled() {
            tracing::warn!("Email not configured, skipping welcome email to {}", to_email);
            return Ok(());
        }

        let first_name = first_name(name);
        let subject = "Welcome to the Trailbook family!";
        let html = render_welcome_html(first_name, account_url);
        let text = render_welcome_text(first_name, account_url);

        self.send_email(to_email, subject, &html, &text).await
    }

    /// Send a password-reset link (valid for 10 minutes). Unlike the
    /// welcome mail this must fail loudly: the caller rolls back the
    /// stored reset token when the send does not go out.
    pub async fn send_password_reset(
        &self,
        to_email: &str,
        name: &str,
        reset_url: &str,
    ) -> Result<()> {
        if !self.is_enabled() {
            anyhow::bail!("email transport is not configured");
        }

        let first_name = first_name(name);
        let subject = "Your password reset token (valid for 10 minutes)";
        let html = render_reset_html(first_name, reset_url);
        let text = render_reset_text(first_name, reset_url);

        self.send_email(to_email, subject, &html, &text).await
    }

    /// Send an email with HTML and plain text versions
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<()> {
        let smtp_host = self
            .config
            .smtp_host
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("SMTP host not configured"))?;
        let from_address = self
            .config
            .from_address
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("From address not configured"))?;

        let from: Mailbox = format!("{} <{}>", self.config.from_name, from_address).parse()?;
        let to: Mailbox = to_email.parse()?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        let mailer = if self.config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer
        };

        mailer.build().send(email).await?;

        tracing::info!(to = %to_email, subject = %subject, "Email sent");

        Ok(())
    }
}

fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

fn render_welcome_html(first_name: &str, account_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; color: #333;">
  <h2>Welcome, {first_name}!</h2>
  <p>We're glad to have you on board. Your next adventure is a few clicks away.</p>
  <p><a href="{account_url}" style="display:inline-block;padding:10px 18px;background:#55c57a;color:#fff;text-decoration:none;border-radius:4px;">Visit your account</a></p>
  <p>Happy travelling!</p>
</body>
</html>"#
    )
}

fn render_welcome_text(first_name: &str, account_url: &str) -> String {
    format!(
        "Welcome, {first_name}!\n\n\
         We're glad to have you on board. Visit your account at:\n{account_url}\n\n\
         Happy travelling!"
    )
}

fn render_reset_html(first_name: &str, reset_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; color: #333;">
  <h2>Hi {first_name},</h2>
  <p>Forgot your password? Submit a new one with the link below. The link is valid for 10 minutes.</p>
  <p><a href="{reset_url}" style="display:inline-block;padding:10px 18px;background:#55c57a;color:#fff;text-decoration:none;border-radius:4px;">Reset your password</a></p>
  <p>If you didn't request a reset, you can safely ignore this email.</p>
</body>
</html>"#
    )
}

fn render_reset_text(first_name: &str, reset_url: &str) -> String {
    format!(
        "Hi {first_name},\n\n\
         Forgot your password? Submit a new one at the link below \
         (valid for 10 minutes):\n{reset_url}\n\n\
         If you didn't request a reset, you can safely ignore this email."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_name_takes_the_leading_word() {
        assert_eq!(first_name("Ada Lovelace"), "Ada");
        assert_eq!(first_name("Cher"), "Cher");
        assert_eq!(first_name(""), "");
    }

    #[test]
    fn reset_templates_carry_the_link() {
        let url = "https://example.com/api/v1/users/resetPassword/abc123";
        assert!(render_reset_html("Ada", url).contains(url));
        assert!(render_reset_text("Ada", url).contains(url));
        assert!(render_reset_text("Ada", url).contains("10 minutes"));
    }

    #[test]
    fn unconfigured_mailer_is_disabled() {
        let mailer = Mailer::new(EmailConfig::default());
        assert!(!mailer.is_enabled());
    }

    #[tokio::test]
    async fn reset_send_fails_without_transport() {
        let mailer = Mailer::new(EmailConfig::default());
        // Welcome degrades to a skip; reset must surface the failure
        assert!(mailer.send_welcome("a@b.co", "A", "http://x").await.is_ok());
        assert!(mailer
            .send_password_reset("a@b.co", "A", "http://x")
            .await
            .is_err());
    }
}
