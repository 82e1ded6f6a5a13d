//! HTTP protocol layer module
//!
//! Response builders and request body handling shared by the API routes.

pub mod body;
pub mod response;

// Re-export commonly used items
pub use body::read_body;
pub use response::{
    apply_allow_header, apply_common_headers, build_health_response, build_options_response,
    json_response,
};
