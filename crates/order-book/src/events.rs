//! Analytics notifications and the sink port they are delivered through

use costscope_core::OrderBookSnapshot;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

/// Emitted by the processor after every accepted update, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalyticsEvent {
    SnapshotUpdated(OrderBookSnapshot),
    /// Impact at the configured reference quantity and side
    MarketImpactUpdated(f64),
    /// Slippage at the configured reference quantity and side
    SlippageUpdated(f64),
    MakerTakerRatioUpdated(f64),
}

impl AnalyticsEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyticsEvent::SnapshotUpdated(_) => "snapshot",
            AnalyticsEvent::MarketImpactUpdated(_) => "market_impact",
            AnalyticsEvent::SlippageUpdated(_) => "slippage",
            AnalyticsEvent::MakerTakerRatioUpdated(_) => "maker_taker_ratio",
        }
    }
}

/// Synchronous event sink
///
/// Called on the updating thread with no processor lock held. Implementations
/// must not block; channel-backed sinks hand the event off and return.
pub trait EventSink: Send + Sync {
    fn send(&self, event: &AnalyticsEvent);
}

impl<F> EventSink for F
where
    F: Fn(&AnalyticsEvent) + Send + Sync,
{
    fn send(&self, event: &AnalyticsEvent) {
        self(event)
    }
}

impl EventSink for mpsc::UnboundedSender<AnalyticsEvent> {
    fn send(&self, event: &AnalyticsEvent) {
        if mpsc::UnboundedSender::send(self, event.clone()).is_err() {
            debug!("Dropping {} event: receiver closed", event.kind());
        }
    }
}

impl EventSink for broadcast::Sender<AnalyticsEvent> {
    fn send(&self, event: &AnalyticsEvent) {
        // Non-blocking; errors only mean there are no subscribers right now
        if broadcast::Sender::send(self, event.clone()).is_err() {
            trace!("No subscribers for {} event", event.kind());
        }
    }
}
