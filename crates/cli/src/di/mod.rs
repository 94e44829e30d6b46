mod dns;

pub use dns::{DnsServices, Policy};
