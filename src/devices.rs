use std::collections::VecDeque;

use crate::{
    event::{KeyEvent, OutputAction},
    timer::Timestamp,
};

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for delivering the scanned key events,
/// in the order they were scanned.
pub trait EventSource {
    fn poll(&mut self) -> Option<KeyEvent>;
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for sending the resolved actions to the host
pub trait ActionSink {
    fn dispatch(&mut self, action: OutputAction);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the firmware's monotonic clock
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Will buffer scanned events until the main loop gets to them.
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    events: VecDeque<KeyEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: KeyEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Extend<KeyEvent> for EventQueue {
    fn extend<T: IntoIterator<Item = KeyEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

impl EventSource for EventQueue {
    fn poll(&mut self) -> Option<KeyEvent> {
        self.events.pop_front()
    }
}

/// Collects the dispatched actions, used when the host wants the
/// whole output at once.
impl ActionSink for Vec<OutputAction> {
    fn dispatch(&mut self, action: OutputAction) {
        self.push(action);
    }
}
