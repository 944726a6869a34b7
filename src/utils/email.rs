use ecotrack_config::EmailConfig;
use ecotrack_core::AppError;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info, instrument};

use crate::modules::otp::model::OtpPurpose;

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Sends a one-time code. With delivery disabled the send is logged and
    /// treated as successful, so local setups work without an SMTP server.
    #[instrument(skip(self, code))]
    pub async fn send_otp_email(
        &self,
        to_email: &str,
        to_name: &str,
        code: &str,
        purpose: OtpPurpose,
        ttl_minutes: i64,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            info!(purpose = purpose.as_str(), "Email delivery disabled, OTP not sent");
            debug!(code, "Undelivered OTP code");
            return Ok(());
        }

        let subject = otp_subject(purpose);
        let text_body = otp_text_body(to_name, code, purpose, ttl_minutes);
        let html_body = otp_html_body(to_name, code, purpose, ttl_minutes);

        self.send_email(to_email, subject, &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        // lettre's SMTP transport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        info!("Email sent");
        Ok(())
    }
}

fn otp_subject(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::VerifyEmail => "Verify your EcoTrack email",
        OtpPurpose::Login => "Your EcoTrack login code",
    }
}

fn otp_action(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::VerifyEmail => "verify your email address",
        OtpPurpose::Login => "sign in to your account",
    }
}

fn otp_text_body(name: &str, code: &str, purpose: OtpPurpose, ttl_minutes: i64) -> String {
    format!(
        "Hi {},\n\n\
         Use this code to {}:\n\n\
         {}\n\n\
         The code expires in {} minutes.\n\n\
         If you didn't request this, you can ignore this email.\n\n\
         The EcoTrack Team",
        name,
        otp_action(purpose),
        code,
        ttl_minutes
    )
}

fn otp_html_body(name: &str, code: &str, purpose: OtpPurpose, ttl_minutes: i64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{subject}</title>
</head>
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f1f5f2;">
    <table width="600" cellpadding="0" cellspacing="0" align="center" style="background-color: #ffffff; border-radius: 8px;">
        <tr>
            <td style="background-color: #2f855a; padding: 24px; text-align: center;">
                <h1 style="margin: 0; color: #ffffff; font-size: 26px;">EcoTrack</h1>
            </td>
        </tr>
        <tr>
            <td style="padding: 32px 28px; color: #444444; font-size: 16px; line-height: 1.5;">
                <p>Hi <strong>{name}</strong>,</p>
                <p>Use this code to {action}:</p>
                <p style="font-size: 32px; font-weight: bold; letter-spacing: 8px; text-align: center; color: #2f855a;">{code}</p>
                <p><strong>The code expires in {ttl_minutes} minutes.</strong></p>
                <p style="font-size: 14px;">If you didn't request this, you can ignore this email.</p>
            </td>
        </tr>
    </table>
</body>
</html>"#,
        subject = otp_subject(purpose),
        name = name,
        action = otp_action(purpose),
        code = code,
        ttl_minutes = ttl_minutes,
    )
}
