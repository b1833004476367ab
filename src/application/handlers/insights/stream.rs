//! Streaming delivery loop for one subscription.
//!
//! The loop waits on the first of:
//! - the subscription's cancellation token (client went away)
//! - the heartbeat timer
//! - the next event from the broker
//!
//! It ends on cancellation or once the broker closes the channel. Dropping
//! the stream drops the subscription, which unregisters it.

use std::time::Duration;

use async_stream::stream;
use futures::Stream;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::adapters::broker::Subscription;
use crate::domain::foundation::Timestamp;
use crate::domain::insights::InsightEvent;

/// Default keep-alive period.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(15);

/// One item of the delivery stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    /// First frame, sent as soon as the subscription is live.
    Connected(Timestamp),
    /// Keep-alive tick.
    Heartbeat(Timestamp),
    /// An insight event for the subscribed user.
    Insight(InsightEvent),
}

/// Turns a subscription into a stream of frames.
pub fn insight_stream(mut subscription: Subscription, heartbeat: Duration) -> impl Stream<Item = StreamFrame> {
    stream! {
        let user_id = subscription.user_id().clone();
        let token = subscription.token().clone();
        debug!(user_id = %user_id, "Insight stream connected");
        yield StreamFrame::Connected(Timestamp::now());

        let mut ticker = interval_at(Instant::now() + heartbeat, heartbeat);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let frame = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                event = subscription.recv() => event.map(StreamFrame::Insight),
                _ = ticker.tick() => Some(StreamFrame::Heartbeat(Timestamp::now())),
            };
            match frame {
                Some(frame) => yield frame,
                None => break,
            }
        }

        debug!(user_id = %user_id, "Insight stream disconnected");
    }
}
