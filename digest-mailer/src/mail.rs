use jobdigest_core::{CoreError, MailError};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

/// Sends the digest over SMTP with STARTTLS and LOGIN credentials.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
    host: String,
    port: u16,
}

impl Mailer {
    pub fn new(
        host: &str,
        port: u16,
        sender_address: &str,
        sender_password: &str,
        recipient_address: &str,
    ) -> Result<Self, CoreError> {
        let sender: Mailbox = sender_address.parse().map_err(|_| {
            CoreError::Mail(MailError::InvalidAddress {
                address: sender_address.to_string(),
            })
        })?;
        let recipient: Mailbox = recipient_address.parse().map_err(|_| {
            CoreError::Mail(MailError::InvalidAddress {
                address: recipient_address.to_string(),
            })
        })?;

        let credentials = Credentials::new(
            sender_address.to_string(),
            sender_password.to_string(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| {
                CoreError::Mail(MailError::ConnectionFailed {
                    host: host.to_string(),
                    reason: e.to_string(),
                })
            })?
            .port(port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            sender,
            recipient,
            host: host.to_string(),
            port,
        })
    }

    pub async fn send(&self, subject: &str, body: &str) -> Result<(), CoreError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| {
                CoreError::Mail(MailError::SendFailed {
                    reason: e.to_string(),
                })
            })?;

        info!(
            "Sending digest to {} via {}:{}",
            self.recipient, self.host, self.port
        );
        self.transport.send(message).await.map_err(|e| {
            let reason = e.to_string();
            if reason.to_lowercase().contains("authentication") || reason.contains("535") {
                CoreError::Mail(MailError::AuthenticationFailed {
                    sender: self.sender.to_string(),
                })
            } else {
                CoreError::Mail(MailError::SendFailed { reason })
            }
        })?;
        info!("Digest sent to {}", self.recipient);
        Ok(())
    }
}
