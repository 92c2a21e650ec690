pub mod cache_control;
pub mod request_id;

pub use cache_control::CacheControl;
pub use request_id::RequestId;
