use hickory_proto::op::{Message, MessageType};
use hoopoe_domain::DomainError;

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes an upstream reply and checks it answers the query we sent.
    pub fn parse(response_bytes: &[u8], expected_id: u16) -> Result<Message, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "upstream sent a query instead of a response".to_string(),
            ));
        }

        if message.id() != expected_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response id {} does not match query id {}",
                message.id(),
                expected_id
            )));
        }

        Ok(message)
    }

    pub fn has_answers(message: &Message) -> bool {
        !message.answers().is_empty()
    }
}
