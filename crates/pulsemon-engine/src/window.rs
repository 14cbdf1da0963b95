use crate::error::{MonitorError, Result};
use crate::tally::OutcomeTally;
use chrono::{DateTime, Duration, Utc};
use pulsemon_common::types::Event;
use std::collections::VecDeque;

/// Window bound, fixed for the buffer's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBound {
    /// Keep the last N events.
    Count(usize),
    /// Keep events within the last T seconds of the reference instant.
    Seconds(u64),
}

/// Bounded ordered collection of recent events. Owns the eviction policy and
/// keeps the [`OutcomeTally`] synchronized with every structural change.
#[derive(Debug)]
pub struct EventBuffer {
    bound: WindowBound,
    events: VecDeque<Event>,
    tally: OutcomeTally,
}

impl EventBuffer {
    pub fn new(bound: WindowBound) -> Result<Self> {
        match bound {
            WindowBound::Count(0) => {
                return Err(MonitorError::Config("window size must be > 0".to_string()))
            }
            WindowBound::Seconds(0) => {
                return Err(MonitorError::Config(
                    "window duration must be > 0 seconds".to_string(),
                ))
            }
            _ => {}
        }
        Ok(Self {
            bound,
            events: VecDeque::new(),
            tally: OutcomeTally::default(),
        })
    }

    /// Appends at the tail and evicts from the head per the configured bound.
    /// The tally is updated in the same call, so no caller ever observes the
    /// buffer and tally out of sync.
    pub fn push(&mut self, event: Event, now: DateTime<Utc>) {
        self.tally.record(&event);
        self.events.push_back(event);
        match self.bound {
            WindowBound::Count(max) => {
                while self.events.len() > max {
                    if let Some(evicted) = self.events.pop_front() {
                        self.tally.forget(&evicted);
                    }
                }
            }
            WindowBound::Seconds(_) => self.evict(now),
        }
    }

    /// Time-based eviction: drops head events strictly older than
    /// `now - window`. An event sitting exactly on the boundary is retained.
    /// No-op for count-bounded buffers.
    pub fn evict(&mut self, now: DateTime<Utc>) {
        let WindowBound::Seconds(window_secs) = self.bound else {
            return;
        };
        let cutoff = now - Duration::seconds(window_secs as i64);
        while let Some(front) = self.events.front() {
            if front.timestamp >= cutoff {
                break;
            }
            if let Some(evicted) = self.events.pop_front() {
                self.tally.forget(&evicted);
            }
        }
    }

    pub fn bound(&self) -> WindowBound {
        self.bound
    }

    pub fn tally(&self) -> &OutcomeTally {
        &self.tally
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
