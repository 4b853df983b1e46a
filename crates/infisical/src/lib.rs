//! infisical - Read-only client for the Infisical secrets API
//!
//! Exchanges universal-auth credentials for an access token, trying each
//! configured region in order until one accepts them, then lists every
//! secret of a project environment in a single recursive call.
//!
//! The client that comes out of [`InfisicalClient::initialize`] is bound to
//! the region that issued its token; secrets are always fetched from there.

pub mod client;
pub mod credentials;
pub mod error;
pub mod transport;

pub use client::{AccessToken, InfisicalClient};
pub use credentials::Credentials;
pub use error::ClientError;
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
