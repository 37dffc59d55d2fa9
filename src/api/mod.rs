/*!
 * API Module
 * HTTP client for the portfolio backend REST API
 */
pub mod cache;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod request;
pub mod session;
pub mod upload;

pub use cache::RevalidateCache;
pub use client::{decode_response, parse, ApiClient};
pub use endpoints::ListQuery;
pub use error::ApiError;
pub use request::ApiRequest;
pub use session::{Session, TOKEN_KEY};
pub use upload::{upload_image, validate_image, ImageFile, UploadError};
