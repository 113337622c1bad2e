pub mod admin;
pub mod auth;
pub mod fields;
pub mod transport;

pub use crate::domain::model::{Conditions, Metadata, QueryParams};
pub use crate::domain::ports::AdminApi;
pub use crate::utils::error::Result;
pub use fields::AdminResource;
pub use transport::{TransportHttp, TransportOptions};
