pub mod extractor;
pub mod keywords;
pub mod prober;
pub mod score;

pub use extractor::{NO_TITLE_SENTINEL, PageMetrics, extract_metrics};
pub use keywords::top_keywords;
pub use prober::{FetchConfig, FetchedPage, ProbeError, SiteProber, WellKnownProbes};
pub use score::{ScoreSignals, calculate_score};
