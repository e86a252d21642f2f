//! Backend access: HTTP transport, wire types, error translation.

pub mod account;
pub mod api;
pub mod branch;
pub mod declaration;
pub mod discount;
pub mod error;
pub mod lookup;
pub mod types;
pub mod vendor;

pub use account::SessionApi;
pub use api::ApiClient;
pub use error::{ApiError, ErrorKind};
