use abi::{Error, MailConfig, Reservation};
use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

/// Confirmation sink. One attempt per reservation, failures are the
/// caller's to log.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_confirmation(&self, rsvp: &Reservation, operator: &str) -> Result<(), Error>;
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(config: &MailConfig) -> Result<Self, Error> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| Error::NotifyError(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let from = config
            .from
            .parse()
            .map_err(|_| Error::NotifyError(format!("invalid sender address {}", config.from)))?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_confirmation(&self, rsvp: &Reservation, operator: &str) -> Result<(), Error> {
        let requester: Mailbox = rsvp
            .email
            .parse()
            .map_err(|_| Error::NotifyError(format!("invalid recipient {}", rsvp.email)))?;
        let operator: Mailbox = operator
            .parse()
            .map_err(|_| Error::NotifyError(format!("invalid operator address {operator}")))?;

        let phone = if rsvp.phone.is_empty() {
            "not provided"
        } else {
            rsvp.phone.as_str()
        };
        let body = format!(
            "Hello {},\n\nyour reservation is confirmed.\n\n  Field: {}\n  Date:  {}\n  Time:  {}\n  Phone: {}\n\nThank you for booking with us.\n",
            rsvp.name, rsvp.field, rsvp.date, rsvp.time, phone
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(requester)
            .to(operator)
            .subject(format!("Reservation confirmation #{}", rsvp.id))
            .body(body)
            .map_err(|e| Error::NotifyError(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::NotifyError(e.to_string()))?;
        Ok(())
    }
}
