//! Location sources. The platform surface is three operations: ask for
//! permission, start updates, and query the best-known fix. Updates arrive
//! asynchronously and are collapsed last-write-wins; nothing ever blocks
//! waiting for a fix.

use std::sync::mpsc::Receiver;

use crate::coords::GeoCoordinate;

pub trait LocationService {
    /// Ask the platform for permission to read the location. A no-op for
    /// sources that do not need one.
    fn request_permission(&mut self) {}

    /// Begin delivering fixes. Before this is called `current_fix` is `None`.
    fn start_updates(&mut self);

    /// The best-known fix right now, if any has arrived.
    fn current_fix(&mut self) -> Option<GeoCoordinate>;
}

/// A source pinned to one coordinate, standing in for a positioning device
/// on machines that have none.
pub struct FixedLocation {
    fix: Option<GeoCoordinate>,
    started: bool,
}

impl FixedLocation {
    pub fn new(fix: GeoCoordinate) -> Self {
        Self {
            fix: Some(fix),
            started: false,
        }
    }

    /// A source that never produces a fix.
    pub fn unavailable() -> Self {
        Self {
            fix: None,
            started: false,
        }
    }
}

impl LocationService for FixedLocation {
    fn start_updates(&mut self) {
        self.started = true;
    }

    fn current_fix(&mut self) -> Option<GeoCoordinate> {
        if self.started {
            self.fix
        } else {
            None
        }
    }
}

/// A source fed by a channel of fixes. Queued updates are drained on every
/// query and only the newest one is kept.
pub struct FeedLocation {
    feed: Receiver<GeoCoordinate>,
    last: Option<GeoCoordinate>,
    started: bool,
}

impl FeedLocation {
    pub fn new(feed: Receiver<GeoCoordinate>) -> Self {
        Self {
            feed,
            last: None,
            started: false,
        }
    }
}

impl LocationService for FeedLocation {
    fn start_updates(&mut self) {
        self.started = true;
    }

    fn current_fix(&mut self) -> Option<GeoCoordinate> {
        if !self.started {
            return None;
        }
        if let Some(update) = self.feed.try_iter().last() {
            self.last = Some(update);
        }
        self.last
    }
}
