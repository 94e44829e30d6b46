pub mod message_builder;
pub mod reply_builder;
pub mod response_parser;

pub use message_builder::MessageBuilder;
pub use reply_builder::ReplyBuilder;
pub use response_parser::ResponseParser;
