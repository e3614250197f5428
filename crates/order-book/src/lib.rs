//! costscope Order Book Store & Analytics
//!
//! Holds the latest depth snapshot for one instrument plus a bounded history
//! of past snapshots, and derives execution-quality signals from them:
//!
//! - **market impact**: distance of the average fill price from the touch
//! - **slippage**: same walk, infinite when the book is too thin
//! - **maker/taker ratio**: level-by-level price drift across history
//!
//! Feed records enter as [`FeedUpdate`]s (or raw JSON). Every accepted update
//! is published to registered [`EventSink`]s as a sequence of
//! [`AnalyticsEvent`]s.

pub mod analytics;
pub mod config;
pub mod cost;
pub mod events;
pub mod feed;
pub mod monitor;
pub mod processor;

pub use analytics::{BookWalk, NEUTRAL_MAKER_RATIO, single_side_mid_proxy};
pub use config::{ConfigError, ProcessorConfig, load_config, load_config_from_str, load_default_config};
pub use cost::{CostRequest, TradeCostEstimate};
pub use events::{AnalyticsEvent, EventSink};
pub use feed::FeedUpdate;
pub use monitor::{LatencyMonitor, LatencySample};
pub use processor::{OrderBookProcessor, UPDATE_OPERATION};
