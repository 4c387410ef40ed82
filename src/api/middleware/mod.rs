//! HTTP middleware

mod timing;

pub use timing::request_timing;
