//! Endpoint template table
//!
//! Every API operation is addressed by a symbolic name (`record`,
//! `search`, ...) mapped to a path template. Each API family contributes a
//! static set of names; the client assembles them once into an immutable
//! [`EndpointTable`].
//!
//! ```text
//! "record" + [layer=com.example, id=42]
//!     │
//!     ▼  records/{layer}/{id}.json
//! records/com.example/42.json
//!     │
//!     ▼  {scheme}://{host}:{port}/{version}/
//! http://api.simplegeo.com:80/1.0/records/com.example/42.json
//! ```

mod error;
mod table;
mod template;

pub use error::EndpointError;
pub use table::{ApiFamily, EndpointTable, EndpointTableBuilder};
pub use template::Template;
