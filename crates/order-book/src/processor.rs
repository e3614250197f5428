use std::sync::Arc;
use std::time::Instant;

use costscope_core::{
    BoundedHistory, Error, OrderBookSnapshot, PriceLevel, Quantity, Result, Side,
};
use log::{debug, warn};
use parking_lot::{Mutex, RwLock};

use crate::analytics;
use crate::config::ProcessorConfig;
use crate::events::{AnalyticsEvent, EventSink};
use crate::feed::FeedUpdate;
use crate::monitor::LatencyMonitor;

/// Latency monitor key for accepted updates
pub const UPDATE_OPERATION: &str = "update";

struct BookState {
    current: OrderBookSnapshot,
    history: BoundedHistory<OrderBookSnapshot>,
}

/// Thread-safe store of the latest snapshot plus a bounded history, with
/// book-walk analytics on top.
///
/// Share it behind an `Arc`. Every operation takes the book lock once and
/// releases it before returning; sinks are notified with no lock held.
pub struct OrderBookProcessor {
    config: ProcessorConfig,
    state: Mutex<BookState>,
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
    latency: LatencyMonitor,
}

impl OrderBookProcessor {
    pub fn new() -> Self {
        Self::build(ProcessorConfig::default())
    }

    /// Create a processor from validated configuration
    pub fn with_config(config: ProcessorConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::invalid_configuration(e.to_string()))?;
        Ok(Self::build(config))
    }

    fn build(config: ProcessorConfig) -> Self {
        OrderBookProcessor {
            state: Mutex::new(BookState {
                current: OrderBookSnapshot::default(),
                history: BoundedHistory::new(config.history_size),
            }),
            sinks: RwLock::new(Vec::new()),
            latency: LatencyMonitor::new(config.latency_history_size),
            config,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Register a sink for every subsequent update
    pub fn subscribe<S: EventSink + 'static>(&self, sink: S) {
        self.sinks.write().push(Arc::new(sink));
    }

    pub fn subscriber_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Install `snapshot` as the current book and notify subscribers.
    ///
    /// Rejects snapshots carrying negative prices or quantities, leaving the
    /// previous book in place.
    pub fn update(&self, snapshot: OrderBookSnapshot) -> Result<()> {
        let started = Instant::now();

        if let Err(e) = validate_levels(&snapshot) {
            warn!(
                "Rejected snapshot for {}/{} at {}: {}",
                snapshot.exchange, snapshot.symbol, snapshot.timestamp, e
            );
            return Err(e);
        }

        let published = {
            let mut state = self.state.lock();
            let evicted = state.history.push(snapshot.clone());
            state.current = snapshot;
            if evicted > 0 {
                debug!("History full, evicted {} snapshot(s)", evicted);
            }
            state.current.clone()
        };

        let quantity = self.config.reference_quantity;
        let side = self.config.reference_side;
        let impact = self.market_impact(quantity, side);
        let slippage = self.slippage(quantity, side);
        let ratio = self.maker_taker_ratio();

        debug!(
            "Book {}/{} @ {}: impact={:.6} slippage={:.6} maker_ratio={:.3}",
            published.exchange, published.symbol, published.timestamp, impact, slippage, ratio
        );

        self.publish(&[
            AnalyticsEvent::SnapshotUpdated(published),
            AnalyticsEvent::MarketImpactUpdated(impact),
            AnalyticsEvent::SlippageUpdated(slippage),
            AnalyticsEvent::MakerTakerRatioUpdated(ratio),
        ]);

        self.latency
            .record_duration(UPDATE_OPERATION, started.elapsed());
        Ok(())
    }

    /// Parse a decoded feed record and apply it
    pub fn process_update(&self, update: &FeedUpdate) -> Result<()> {
        let snapshot = update.to_snapshot().inspect_err(|e| {
            warn!(
                "Rejected feed record for {}/{} at {}: {}",
                update.exchange, update.symbol, update.timestamp, e
            )
        })?;
        self.update(snapshot)
    }

    /// Decode a raw JSON feed record and apply it
    pub fn process_json(&self, raw: &str) -> Result<()> {
        let update = FeedUpdate::from_json(raw).inspect_err(|e| warn!("{}", e))?;
        self.process_update(&update)
    }

    pub fn current_snapshot(&self) -> OrderBookSnapshot {
        self.state.lock().current.clone()
    }

    /// Relative distance of the average fill price from the best price of
    /// the queried side. See [`analytics::market_impact`].
    pub fn market_impact(&self, quantity: Quantity, side: Side) -> f64 {
        let state = self.state.lock();
        analytics::market_impact(&state.current, quantity, side)
    }

    /// See [`analytics::slippage`]. `+∞` when the book is too thin.
    pub fn slippage(&self, quantity: Quantity, side: Side) -> f64 {
        let state = self.state.lock();
        analytics::slippage(&state.current, quantity, side)
    }

    pub fn maker_taker_ratio(&self) -> f64 {
        let state = self.state.lock();
        analytics::maker_taker_ratio(state.history.iter())
    }

    /// Current snapshot and maker/taker ratio read under one lock
    pub fn snapshot_with_ratio(&self) -> (OrderBookSnapshot, f64) {
        let state = self.state.lock();
        (
            state.current.clone(),
            analytics::maker_taker_ratio(state.history.iter()),
        )
    }

    pub fn history_len(&self) -> usize {
        self.state.lock().history.len()
    }

    /// Retained snapshots, oldest first
    pub fn history(&self) -> Vec<OrderBookSnapshot> {
        self.state.lock().history.to_vec()
    }

    pub fn latency(&self) -> &LatencyMonitor {
        &self.latency
    }

    fn publish(&self, events: &[AnalyticsEvent]) {
        // Sinks may subscribe from inside a callback
        let sinks: Vec<Arc<dyn EventSink>> = self.sinks.read().clone();
        if sinks.is_empty() {
            return;
        }
        for event in events {
            for sink in &sinks {
                sink.send(event);
            }
        }
    }
}

impl Default for OrderBookProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_levels(snapshot: &OrderBookSnapshot) -> Result<()> {
    let check = |side: &str, levels: &[PriceLevel]| -> Result<()> {
        for (i, level) in levels.iter().enumerate() {
            if level.price.is_sign_negative() && !level.price.is_zero() {
                return Err(Error::invalid_input(format!(
                    "{side} level {i}: negative price {}",
                    level.price
                )));
            }
            if level.quantity.is_sign_negative() && !level.quantity.is_zero() {
                return Err(Error::invalid_input(format!(
                    "{side} level {i}: negative quantity {}",
                    level.quantity
                )));
            }
        }
        if analytics::checked_depth_notional(levels).is_none() {
            return Err(Error::invalid_input(format!(
                "{side} depth notional exceeds the decimal range"
            )));
        }
        Ok(())
    };
    check("ask", &snapshot.asks)?;
    check("bid", &snapshot.bids)
}
