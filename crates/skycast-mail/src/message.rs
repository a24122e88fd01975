use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::Message;

use crate::DeliveryError;

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| DeliveryError::InvalidAddress(format!("{:?}: {}", address, e)))
}

/// Build a plain-text email.
///
/// `from` and `to` accept either a bare address or `Name <address>`.
pub fn build_message(
    from: &str,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<Message, DeliveryError> {
    Message::builder()
        .from(parse_mailbox(from)?)
        .to(parse_mailbox(to)?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| DeliveryError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    #[test]
    fn test_builds_plain_text_message() {
        let message = build_message(
            "reports@example.com",
            "a@x.com",
            "Hourly Weather Report",
            "Weather report for Paris:{}",
        )
        .unwrap();

        let raw = formatted(&message);
        assert!(raw.contains("From: reports@example.com"));
        assert!(raw.contains("To: a@x.com"));
        assert!(raw.contains("Subject: Hourly Weather Report"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(raw.contains("Weather report for Paris:{}"));
    }

    #[test]
    fn test_accepts_display_name() {
        let message = build_message(
            "Skycast <reports@example.com>",
            "a@x.com",
            "subject",
            "body",
        )
        .unwrap();
        assert!(formatted(&message).contains("reports@example.com"));
    }

    #[test]
    fn test_rejects_invalid_recipient() {
        let err = build_message("reports@example.com", "not an address", "s", "b").unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidAddress(_)));
    }

    #[test]
    fn test_rejects_empty_sender() {
        let err = build_message("", "a@x.com", "s", "b").unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidAddress(_)));
    }
}
