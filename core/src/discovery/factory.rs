use crate::config::Config;
use crate::discovery::{Discoverer, Prober};
use crate::http::{CancelToken, Fetcher};

/// Builds a single-use discoverer backed by the real GitHub client.
///
/// Each call gets its own cancellation token, so a deadline firing in one
/// discovery never affects another.
pub fn create_discoverer(config: &Config) -> Discoverer {
    let fetcher = Fetcher::github(config.request_timeout())
        .with_policy(config.retry_policy())
        .with_token(config.resolve_token().as_deref())
        .with_cancel(CancelToken::new());

    let prober = Prober::new(fetcher).with_api_base(config.api_base_url.clone());

    Discoverer::new(prober)
        .with_concurrency(config.concurrency)
        .with_deadline(config.deadline())
}
