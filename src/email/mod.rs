//! Verification-code email delivery via SES

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SES-backed mailer. Sender address comes from configuration, never a literal.
#[derive(Clone)]
pub struct EmailService {
    ses: SesClient,
    from: String,
}

impl EmailService {
    pub fn new(ses: SesClient, from: String) -> Self {
        Self { ses, from }
    }

    pub async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), BoxError> {
        let subject = Content::builder().data("Your MokoMarket verification code").build()?;

        let body_text = format!(
            "Your verification code is: {code}\n\
             Valid for 10 minutes.\n\n\
             If you did not sign up for MokoMarket, you can ignore this email."
        );

        let body = Body::builder()
            .text(Content::builder().data(body_text).build()?)
            .build();

        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;

        tracing::info!(to = to, "Verification code sent");
        Ok(())
    }
}
