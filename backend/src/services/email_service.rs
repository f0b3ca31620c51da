use crate::config::EmailConfig;
use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::str::FromStr;

/// Outbound account-notification sender.
///
/// The account lifecycle only depends on this interface; the SMTP transport
/// below is one implementation of it.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_activation_email(&self, email: &str, activation_link: &str) -> ServiceResult<()>;

    async fn send_password_reset_email(&self, email: &str, reset_link: &str) -> ServiceResult<()>;

    async fn send_password_reset_success_email(&self, email: &str) -> ServiceResult<()>;
}

#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new EmailService instance
    pub fn new(config: EmailConfig) -> ServiceResult<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| ServiceError::external_service(format!("Invalid SMTP host: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, config })
    }

    /// Sends a generic email
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> ServiceResult<()> {
        let from_mailbox = Mailbox::from_str(&format!(
            "{} <{}>",
            self.config.from_name, self.config.from_email
        ))
        .map_err(|e| ServiceError::external_service(format!("Invalid from email: {e}")))?;

        let to_mailbox = Mailbox::from_str(to_email)
            .map_err(|e| ServiceError::external_service(format!("Invalid recipient email: {e}")))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_content.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_content.to_string()),
                    ),
            )
            .map_err(|e| ServiceError::external_service(format!("Failed to build email: {e}")))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| ServiceError::external_service(format!("Failed to send email: {e}")))?;

        Ok(())
    }

    fn build_link_html(&self, heading: &str, lead: &str, cta: &str, link: &str) -> String {
        format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <meta charset="UTF-8">
                <title>{}</title>
            </head>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #2c3e50;">{}</h2>

                    <p>{}</p>

                    <div style="text-align: center; margin: 30px 0;">
                        <a href="{}"
                           style="background-color: #3498db; color: white; padding: 12px 30px;
                                  text-decoration: none; border-radius: 5px; display: inline-block;">
                            {}
                        </a>
                    </div>

                    <p>Or copy and paste this link into your browser:</p>
                    <p style="word-break: break-all; color: #7f8c8d;">{}</p>

                    <hr style="border: none; border-top: 1px solid #ecf0f1; margin: 30px 0;">

                    <p style="font-size: 12px; color: #7f8c8d;">
                        If you didn't request this email, you can safely ignore it.
                    </p>
                </div>
            </body>
            </html>
            "#,
            heading, heading, lead, link, cta, link
        )
    }

    fn build_link_text(&self, heading: &str, lead: &str, link: &str) -> String {
        format!(
            r#"{}

{}

{}

If you didn't request this email, you can safely ignore it.
            "#,
            heading, lead, link
        )
    }
}

#[async_trait]
impl EmailSender for EmailService {
    async fn send_activation_email(&self, email: &str, activation_link: &str) -> ServiceResult<()> {
        let heading = "Activate your account";
        let lead = "Thanks for registering. Click the button below to activate your account:";

        let html = self.build_link_html(heading, lead, "Activate Account", activation_link);
        let text = self.build_link_text(heading, lead, activation_link);

        self.send_email(email, heading, &html, &text).await
    }

    async fn send_password_reset_email(&self, email: &str, reset_link: &str) -> ServiceResult<()> {
        let heading = "Reset your password";
        let lead = "We received a request to reset your password. Click the button below to choose a new one:";

        let html = self.build_link_html(heading, lead, "Reset Password", reset_link);
        let text = self.build_link_text(heading, lead, reset_link);

        self.send_email(email, heading, &html, &text).await
    }

    async fn send_password_reset_success_email(&self, email: &str) -> ServiceResult<()> {
        let subject = "Your password has been changed";
        let html = format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <meta charset="UTF-8">
                <title>{}</title>
            </head>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #2c3e50;">{}</h2>

                    <p>Your password was reset successfully. If this wasn't you, contact support immediately.</p>
                </div>
            </body>
            </html>
            "#,
            subject, subject
        );
        let text = format!(
            "{}\n\nYour password was reset successfully. If this wasn't you, contact support immediately.\n",
            subject
        );

        self.send_email(email, subject, &html, &text).await
    }
}
