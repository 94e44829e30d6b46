use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};

/// Builds the messages sent back to clients.
pub struct ReplyBuilder;

impl ReplyBuilder {
    /// Relays an upstream answer under the client's id and question. Every
    /// answer record takes the name the client asked for, in its original
    /// case, so rewrites stay invisible.
    pub fn answer(request: &Message, upstream: &Message) -> Message {
        let mut reply = Self::base(request);
        reply.set_response_code(upstream.response_code());

        let owner = request.queries().first().map(|q| q.name().clone());
        let answers = upstream.answers().iter().cloned().map(|mut record| {
            if let Some(name) = &owner {
                record.set_name(name.clone());
            }
            record
        });
        reply.add_answers(answers);

        reply
    }

    pub fn error(request: &Message, code: ResponseCode) -> Message {
        let mut reply = Self::base(request);
        reply.set_response_code(code);
        reply
    }

    /// FORMERR for a datagram too broken to decode, keyed on the raw id.
    pub fn format_error(raw: &[u8]) -> Option<Message> {
        let id = u16::from_be_bytes([*raw.first()?, *raw.get(1)?]);

        let mut reply = Message::new();
        reply
            .set_id(id)
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Query)
            .set_response_code(ResponseCode::FormErr);
        Some(reply)
    }

    fn base(request: &Message) -> Message {
        let mut reply = Message::new();
        reply
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(request.op_code())
            .set_recursion_desired(request.recursion_desired())
            .set_recursion_available(true);
        reply.add_queries(request.queries().iter().cloned());
        reply
    }
}
