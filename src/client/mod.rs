//! ArgoCD API client
//!
//! [`RequestExecutor`] performs and normalizes single API calls over a
//! pluggable [`Transport`]; `models` maps applications to and from the wire.

pub mod executor;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod transport;

pub use executor::{ApiRequest, RequestExecutor};
#[cfg(test)]
pub use mock::MockTransport;
#[allow(unused_imports)]
pub use transport::{
    HttpMethod, HttpTransport, Transport, TransportError, TransportRequest, TransportResponse,
};
