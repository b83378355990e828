use crate::error::Result;
use crate::input::InputEvent;
use std::collections::VecDeque;

/// Something the host asks the mounted view to handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Display refresh opportunity, stamped with wall-clock milliseconds
    Frame(f64),
    Input(InputEvent),
    /// The container's client size changed, in surface pixels
    Resize(usize, usize),
    /// The host is removing the view
    Close,
}

/// Source of frame callbacks and input for the render loop
pub trait DisplayScheduler {
    /// Blocks until the next event is due
    fn next_event(&mut self) -> Result<HostEvent>;
}

/// Scheduler fed from a queue, closing once the queue runs dry
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    queue: VecDeque<HostEvent>,
    now_ms: f64,
    step_ms: f64,
}

impl ManualScheduler {
    /// Frames queued with [`frames`](Self::frames) start at `start_ms` and
    /// advance by `step_ms` each
    pub fn new(start_ms: f64, step_ms: f64) -> Self {
        ManualScheduler {
            queue: VecDeque::new(),
            now_ms: start_ms,
            step_ms,
        }
    }

    /// Queues `count` frames
    pub fn frames(&mut self, count: u64) -> &mut Self {
        for _ in 0..count {
            self.queue.push_back(HostEvent::Frame(self.now_ms));
            self.now_ms += self.step_ms;
        }
        self
    }

    pub fn push(&mut self, event: HostEvent) -> &mut Self {
        self.queue.push_back(event);
        self
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl DisplayScheduler for ManualScheduler {
    fn next_event(&mut self) -> Result<HostEvent> {
        Ok(self.queue.pop_front().unwrap_or(HostEvent::Close))
    }
}
