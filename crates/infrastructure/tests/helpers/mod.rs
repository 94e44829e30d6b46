mod dns_server_mock;
mod mock_transport;

pub use dns_server_mock::MockDnsServer;
pub use mock_transport::{MockTransport, ServerBehavior};
