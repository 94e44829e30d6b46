pub mod forwarding;
pub mod load_balancer;
pub mod server;
pub mod transport;

pub use forwarding::{MessageBuilder, ReplyBuilder, ResponseParser};
pub use load_balancer::{LoadBalancedForwarder, Strategy, UpstreamPool};
pub use server::DnsServerHandler;
pub use transport::{DnsTransport, UdpTransport};
