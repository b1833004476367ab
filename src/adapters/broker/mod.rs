//! Insight broker - per-user publish/subscribe for insight events.
//!
//! # Components
//!
//! - [`InsightBroker`] - Cloneable handle sending commands to the loop
//! - [`Subscription`] - Receiving end handed to stream consumers
//!
//! Subscription teardown is driven by cancellation: when the caller's token
//! fires (or the handle is dropped) a watcher task sends `Unsubscribe`, and
//! the loop closes the channel.

mod actor;
mod subscription;

pub use subscription::{Subscription, SubscriptionId};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::insights::InsightEvent;

use actor::BrokerCommand;

/// Default command queue capacity.
pub const DEFAULT_COMMAND_CAPACITY: usize = 1024;

/// Broker errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// The broker loop has stopped.
    #[error("insight broker is closed")]
    Closed,
}

impl From<BrokerError> for DomainError {
    fn from(err: BrokerError) -> Self {
        DomainError::new(ErrorCode::BrokerClosed, err.to_string())
    }
}

impl<T> From<mpsc::error::SendError<T>> for BrokerError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        BrokerError::Closed
    }
}

/// Handle to the broker loop.
///
/// Cheap to clone. The loop stops once every handle and every live
/// subscription watcher has been dropped.
#[derive(Debug, Clone)]
pub struct InsightBroker {
    commands: mpsc::Sender<BrokerCommand>,
}

impl InsightBroker {
    /// Spawns the broker loop on the current runtime.
    ///
    /// Producers wait when `command_capacity` commands are queued.
    pub fn spawn(command_capacity: usize) -> Self {
        let (commands, receiver) = mpsc::channel(command_capacity.max(1));
        tokio::spawn(actor::run(receiver));
        Self { commands }
    }

    /// Registers a subscription for `user_id` with a buffer of `buffer` events.
    ///
    /// The handle is usable immediately: registration is queued ahead of any
    /// later publish. The subscription ends when `cancel` fires or the
    /// handle is dropped.
    pub async fn subscribe(
        &self,
        user_id: UserId,
        buffer: usize,
        cancel: &CancellationToken,
    ) -> Result<Subscription, BrokerError> {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let id = SubscriptionId::new();
        let token = cancel.child_token();

        self.commands
            .send(BrokerCommand::Subscribe {
                user_id: user_id.clone(),
                id,
                sender,
            })
            .await?;

        let commands = self.commands.clone();
        let watched = token.clone();
        let watched_user = user_id.clone();
        tokio::spawn(async move {
            watched.cancelled().await;
            let _ = commands
                .send(BrokerCommand::Unsubscribe {
                    user_id: watched_user,
                    id,
                })
                .await;
        });

        Ok(Subscription::new(id, user_id, receiver, token))
    }

    /// Unregisters a subscription; its channel is closed by the loop.
    pub async fn unsubscribe(&self, user_id: UserId, id: SubscriptionId) -> Result<(), BrokerError> {
        self.commands
            .send(BrokerCommand::Unsubscribe { user_id, id })
            .await?;
        Ok(())
    }

    /// Queues an event for every live subscription of `event.user_id`.
    ///
    /// Delivery is best effort: subscribers with a full buffer miss it.
    pub async fn publish(&self, event: InsightEvent) -> Result<(), BrokerError> {
        self.commands.send(BrokerCommand::Publish(event)).await?;
        Ok(())
    }

    /// Number of live subscriptions for a user.
    pub async fn subscriber_count(&self, user_id: &UserId) -> Result<usize, BrokerError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(BrokerCommand::SubscriberCount {
                user_id: user_id.clone(),
                reply,
            })
            .await?;
        response.await.map_err(|_| BrokerError::Closed)
    }
}
