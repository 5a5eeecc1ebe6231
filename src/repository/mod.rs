//! Repository layer: access to the remote library API

pub mod http;
pub mod transport;

pub use http::HttpTransport;
pub use transport::{encode_component, ApiRequest, Method, Transport};

#[cfg(test)]
pub use transport::MockTransport;
