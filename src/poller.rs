use chrono::{DateTime, Local};

use crate::api::{HistoryPoint, StatsOutcome, StatsSample};
use crate::ringbuf::RollingWindow;

#[derive(Debug, Clone)]
struct LiveEntry {
    captured_at: DateTime<Local>,
    point: HistoryPoint,
}

/// Read-only view of what the poller has published. Displays borrow this;
/// only [`LivePoller`] can change it.
#[derive(Debug, Clone)]
pub struct LiveFeed {
    current: StatsSample,
    live: bool,
    window: RollingWindow<LiveEntry>,
}

impl LiveFeed {
    fn new(capacity: usize) -> Self {
        Self {
            current: StatsSample::default(),
            live: false,
            window: RollingWindow::new(capacity),
        }
    }

    pub fn current(&self) -> &StatsSample {
        &self.current
    }

    /// Whether the latest sample came from the backend.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Recent samples, oldest first.
    pub fn points(&self) -> impl DoubleEndedIterator<Item = &HistoryPoint> + ExactSizeIterator {
        self.window.iter().map(|e| &e.point)
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    fn publish(&mut self, outcome: StatsOutcome, captured_at: DateTime<Local>) {
        self.current = outcome.sample;
        self.live = outcome.live;

        // Never let a wall-clock step backwards reorder the window.
        let captured_at = match self.window.back() {
            Some(last) if last.captured_at > captured_at => last.captured_at,
            _ => captured_at,
        };
        self.window.push(LiveEntry {
            captured_at,
            point: HistoryPoint {
                time: captured_at.format("%H:%M:%S").to_string(),
                cpu: outcome.sample.cpu,
                ram: outcome.sample.ram,
                disk: outcome.sample.disk,
            },
        });
    }
}

/// Identifies one poll cycle so late results can be told apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTicket(u64);

/// Owns the live feed and serializes poll cycles: at most one fetch is
/// outstanding, and results are only accepted for the outstanding ticket.
#[derive(Debug)]
pub struct LivePoller {
    feed: LiveFeed,
    running: bool,
    next_ticket: u64,
    in_flight: Option<CycleTicket>,
    completed: u64,
}

impl LivePoller {
    /// A stopped poller with an empty window of `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            feed: LiveFeed::new(capacity),
            running: false,
            next_ticket: 0,
            in_flight: None,
            completed: 0,
        }
    }

    pub fn feed(&self) -> &LiveFeed {
        &self.feed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> Option<CycleTicket> {
        self.in_flight
    }

    #[cfg(test)]
    pub fn completed_cycles(&self) -> u64 {
        self.completed
    }

    /// Start polling and open the first cycle right away.
    pub fn start(&mut self) -> Option<CycleTicket> {
        if !self.running {
            tracing::info!("live polling started");
            self.running = true;
        }
        self.begin_cycle()
    }

    /// Stop polling. A fetch still in flight is abandoned; its result will be ignored.
    pub fn stop(&mut self) {
        if self.running {
            tracing::info!(cycles = self.completed, "live polling stopped");
        }
        self.running = false;
        self.in_flight = None;
    }

    /// Open a new cycle, unless stopped or the previous one is still in flight.
    pub fn begin_cycle(&mut self) -> Option<CycleTicket> {
        if !self.running {
            return None;
        }
        if let Some(pending) = self.in_flight {
            tracing::debug!(ticket = pending.0, "previous poll still in flight, skipping tick");
            return None;
        }
        let ticket = CycleTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    /// Publish the result of cycle `ticket`. Returns false if the result was
    /// stale and discarded.
    pub fn complete_cycle(
        &mut self,
        ticket: CycleTicket,
        outcome: StatsOutcome,
        captured_at: DateTime<Local>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            tracing::debug!(ticket = ticket.0, "discarding stale poll result");
            return false;
        }
        self.in_flight = None;
        self.feed.publish(outcome, captured_at);
        self.completed += 1;
        tracing::debug!(
            live = outcome.live,
            cpu = outcome.sample.cpu,
            ram = outcome.sample.ram,
            disk = outcome.sample.disk,
            window = self.feed.len(),
            "poll cycle complete"
        );
        true
    }
}
