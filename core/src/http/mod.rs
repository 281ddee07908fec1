pub mod cancel;
pub mod client;
pub mod fetcher;

pub use cancel::CancelToken;
pub use client::{ReqwestClient, TokioSleeper};
pub use fetcher::{Fetcher, RetryPolicy, USER_AGENT};
