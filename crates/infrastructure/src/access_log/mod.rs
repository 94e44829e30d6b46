pub mod emitter;
pub mod writer;

pub use emitter::AccessLogEmitter;
pub use writer::AccessLogWriter;
