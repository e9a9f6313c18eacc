// LogBridge - brings the background process's log stream into shell state
//
// The launcher daemon pushes *full* log snapshots (not incremental deltas)
// over a subscription channel; each delivery replaces the displayed text
// wholesale. Because messages emitted before subscription would otherwise be
// lost, attaching always requests an immediate replay of the current
// snapshot. Release is scoped: the subscription handle unsubscribes on drop,
// on every teardown path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Callback receiving each full log snapshot.
pub type LogHandler = Box<dyn Fn(&str) + Send + Sync>;

/// Opaque subscription identity returned by [`LogChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogToken(u64);

/// Push channel of full log snapshots from the background process.
///
/// Delivery is synchronous and unbuffered; message frequency is a
/// human-readable operator tail, not a telemetry stream, so no backpressure
/// handling is provided.
pub trait LogChannel: Send + Sync {
    /// Register a handler for future snapshot deliveries.
    fn subscribe(&self, handler: LogHandler) -> LogToken;

    /// Remove a previously registered handler. Unknown tokens are ignored.
    fn unsubscribe(&self, token: LogToken);

    /// Force a re-delivery of the current snapshot to all subscribers.
    fn request_replay(&self);
}

struct ChannelInner {
    next_token: u64,
    handlers: HashMap<LogToken, LogHandler>,
    snapshot: String,
}

/// In-process [`LogChannel`] implementation.
///
/// The embedding process feeds it via [`publish`](Self::publish); the shell
/// side only sees the trait. Handlers run under the registry lock and must
/// not call back into the channel.
pub struct InProcessLogChannel {
    inner: Mutex<ChannelInner>,
}

impl InProcessLogChannel {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ChannelInner {
                next_token: 0,
                handlers: HashMap::new(),
                snapshot: String::new(),
            }),
        }
    }

    /// Replace the current snapshot and deliver it to all subscribers.
    pub fn publish<S: Into<String>>(&self, text: S) {
        let mut inner = self.inner.lock().unwrap();
        inner.snapshot = text.into();
        for handler in inner.handlers.values() {
            handler(&inner.snapshot);
        }
    }
}

impl Default for InProcessLogChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LogChannel for InProcessLogChannel {
    fn subscribe(&self, handler: LogHandler) -> LogToken {
        let mut inner = self.inner.lock().unwrap();
        let token = LogToken(inner.next_token);
        inner.next_token += 1;
        inner.handlers.insert(token, handler);
        tracing::debug!("Log subscriber {:?} attached", token);
        token
    }

    fn unsubscribe(&self, token: LogToken) {
        let mut inner = self.inner.lock().unwrap();
        if inner.handlers.remove(&token).is_none() {
            tracing::debug!("Unsubscribe for unknown log token {:?}", token);
        }
    }

    fn request_replay(&self) {
        let inner = self.inner.lock().unwrap();
        for handler in inner.handlers.values() {
            handler(&inner.snapshot);
        }
    }
}

/// Attaches snapshot handlers to a [`LogChannel`] with scoped release.
pub struct LogBridge;

impl LogBridge {
    /// Subscribe `on_update` and immediately request a replay so the
    /// consumer starts from the current snapshot instead of an empty tail.
    ///
    /// The returned guard unsubscribes when dropped; hold it for exactly the
    /// consumer's lifetime.
    #[must_use = "dropping the subscription immediately detaches the handler"]
    pub fn attach<F>(channel: Arc<dyn LogChannel>, on_update: F) -> LogSubscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let token = channel.subscribe(Box::new(on_update));
        channel.request_replay();
        LogSubscription {
            channel,
            token: Some(token),
        }
    }
}

/// RAII guard pairing one subscription with the consumer's lifetime.
pub struct LogSubscription {
    channel: Arc<dyn LogChannel>,
    token: Option<LogToken>,
}

impl LogSubscription {
    /// Explicit detach, equivalent to dropping the guard.
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(token) = self.token.take() {
            self.channel.unsubscribe(token);
            tracing::debug!("Log subscriber {:?} detached", token);
        }
    }
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn collecting_channel() -> (Arc<InProcessLogChannel>, Arc<Mutex<Vec<String>>>) {
        (
            Arc::new(InProcessLogChannel::new()),
            Arc::new(Mutex::new(Vec::new())),
        )
    }

    #[test]
    fn test_snapshots_replace_wholesale() {
        let (channel, seen) = collecting_channel();
        let seen_clone = Arc::clone(&seen);
        let _sub = LogBridge::attach(channel.clone(), move |text| {
            seen_clone.lock().unwrap().push(text.to_string());
        });

        channel.publish("line1");
        channel.publish("line2");

        let seen = seen.lock().unwrap();
        // Initial replay of the empty snapshot, then one delivery per push
        assert_eq!(*seen, vec!["", "line1", "line2"]);
        assert_eq!(seen.last().unwrap(), "line2");
    }

    #[test]
    fn test_attach_replays_buffered_snapshot() {
        let (channel, seen) = collecting_channel();
        channel.publish("early message");

        let seen_clone = Arc::clone(&seen);
        let _sub = LogBridge::attach(channel.clone(), move |text| {
            seen_clone.lock().unwrap().push(text.to_string());
        });

        // Exactly one initial delivery, carrying the pre-attach snapshot
        assert_eq!(*seen.lock().unwrap(), vec!["early message"]);
    }

    #[test]
    fn test_detach_stops_delivery() {
        let (channel, seen) = collecting_channel();
        let seen_clone = Arc::clone(&seen);
        let sub = LogBridge::attach(channel.clone(), move |text| {
            seen_clone.lock().unwrap().push(text.to_string());
        });

        channel.publish("before detach");
        sub.detach();
        channel.publish("after detach");

        assert_eq!(*seen.lock().unwrap(), vec!["", "before detach"]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (channel, _) = collecting_channel();
        let deliveries = Arc::new(AtomicUsize::new(0));

        {
            let deliveries = Arc::clone(&deliveries);
            let _sub = LogBridge::attach(channel.clone(), move |_| {
                deliveries.fetch_add(1, Ordering::SeqCst);
            });
            channel.publish("inside scope");
        }

        channel.publish("outside scope");
        // replay + one publish inside the scope, nothing after
        assert_eq!(deliveries.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_independent_subscribers() {
        let (channel, _) = collecting_channel();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let first_clone = Arc::clone(&first);
        let sub1 = LogBridge::attach(channel.clone(), move |_| {
            first_clone.fetch_add(1, Ordering::SeqCst);
        });
        let second_clone = Arc::clone(&second);
        let _sub2 = LogBridge::attach(channel.clone(), move |_| {
            second_clone.fetch_add(1, Ordering::SeqCst);
        });

        channel.publish("both");
        sub1.detach();
        channel.publish("second only");

        // first: own replay + second subscriber's replay + "both"
        assert_eq!(first.load(Ordering::SeqCst), 3);
        // second: own replay + "both" + "second only"
        assert_eq!(second.load(Ordering::SeqCst), 3);
    }
}
