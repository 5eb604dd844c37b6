//! The event-source side of the platform boundary.

use std::time::Duration;

use crate::event::ViewEvent;
use crate::view::ViewId;

/// Pulls raw events out of the platform.
///
/// An implementation drains whatever the windowing system has pending
/// into `events`, blocking for at most `timeout` (`None` blocks until
/// something arrives). The toolkit dispatches the drained batch in
/// order.
pub trait EventLoop {
    fn poll(&mut self, timeout: Option<Duration>, events: &mut Vec<(ViewId, ViewEvent)>);
}
