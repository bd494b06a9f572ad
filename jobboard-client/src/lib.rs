pub mod api;
pub mod metrics;
pub mod scraper;

pub use api::JobBoardClient;
pub use metrics::{ApiMetrics, MetricsCollector};
pub use scraper::PageScraper;
