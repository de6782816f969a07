//! REST transport boundary
//!
//! Endpoint path builders and the HTTP transport trait with its reqwest
//! implementation.

mod endpoints;
mod transport;

pub use endpoints::Endpoints;
pub use transport::{HttpTransport, Method, RestTransport};
