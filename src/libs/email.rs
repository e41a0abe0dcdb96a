//! Outgoing mail for backups and digests.

use crate::libs::config::EmailConfig;
use crate::libs::messages::Message;
use crate::{msg_error, msg_success};
use anyhow::Result;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

#[derive(Debug, Clone, PartialEq)]
pub enum EmailBody {
    Text(String),
    Html(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: EmailBody,
    pub attachment: Option<EmailAttachment>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<()>;
}

/// Sends through an SMTP relay with STARTTLS, authenticating as the sender.
pub struct SmtpMailer {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let credentials = Credentials::new(config.from_email.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(SmtpMailer {
            config: config.clone(),
            transport,
        })
    }
}

/// MIME message from `from` to the email's recipient.
pub fn build_message(from: &str, email: &Email) -> Result<lettre::Message> {
    let builder = lettre::Message::builder()
        .from(from.parse::<Mailbox>()?)
        .to(email.to.parse::<Mailbox>()?)
        .subject(email.subject.clone());

    let body = match &email.body {
        EmailBody::Text(text) => SinglePart::plain(text.clone()),
        EmailBody::Html(html) => SinglePart::html(html.clone()),
    };

    let message = match &email.attachment {
        None => builder.singlepart(body)?,
        Some(attachment) => {
            let content_type = ContentType::parse(&attachment.content_type)?;
            let part = Attachment::new(attachment.filename.clone()).body(attachment.content.clone(), content_type);
            builder.multipart(MultiPart::mixed().singlepart(body).singlepart(part))?
        }
    };

    Ok(message)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &Email) -> Result<()> {
        let message = build_message(&self.config.from_email, email)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Sends and reports the outcome through the message macros.
pub async fn send_logged(mailer: &dyn Mailer, email: &Email) -> Result<()> {
    match mailer.send(email).await {
        Ok(()) => {
            msg_success!(Message::EmailSent(email.subject.clone()));
            Ok(())
        }
        Err(e) => {
            msg_error!(Message::EmailSendFailed(email.subject.clone(), e.to_string()));
            Err(e)
        }
    }
}
