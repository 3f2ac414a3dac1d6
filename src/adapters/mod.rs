pub mod forwarder;
pub mod http_handler;

pub use forwarder::StubForwarder;
pub use http_handler::GatewayHttpHandler;
