//! Request dispatch
//!
//! Turns an endpoint URL, a method and a payload into an OAuth-signed
//! request, hands it to a transport, and classifies what comes back.
//!
//! ```text
//! Dispatcher::prepare ──► HttpTransport::execute ──► classify
//!   (sign, encode)          (reqwest / mock)          (2xx/3xx or ApiError)
//! ```

mod dispatch;
pub mod oauth;
mod transport;
mod types;

pub use dispatch::{classify, Dispatcher, CONTENT_TYPE_FORM, CONTENT_TYPE_JSON};
pub use oauth::OAuthSigner;
pub use transport::{
    AsyncHttpTransport, AsyncReqwestTransport, HttpTransport, ReqwestTransport, TransportError,
};
pub use types::{
    Body, HttpRequest, HttpResponse, Method, QueryParams, ResponseMeta, TransportConfig,
    DEFAULT_TIMEOUT,
};

#[cfg(test)]
pub use transport::tests::{MockAsyncTransport, MockTransport};
