use std::fmt::Debug;

use flume::{Sender, TrySendError};
use tracing::{debug, error, warn};

use crate::task;

/// Sends reconcile messages to the frontend without blocking the caller
#[derive(Debug)]
pub struct MessageSender<T> {
    sender: Sender<T>,
}

impl<T> Clone for MessageSender<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T> MessageSender<T>
where
    T: Debug + Send + Sync + 'static,
{
    pub fn new(sender: Sender<T>) -> Self {
        Self { sender }
    }

    pub fn send(&self, message: T) {
        debug!("send: {message:?}");
        match self.sender.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => {
                warn!("unable to send, queue is full, sending async");

                let me = self.clone();
                task::spawn(async move { me.send_async(message).await });
            }
            Err(TrySendError::Disconnected(message)) => {
                error!("unable to send {message:?}, nobody is listening");
            }
        }
    }

    pub async fn send_async(&self, message: T) {
        if let Err(error) = self.sender.send_async(message).await {
            error!("unable to send message to account manager listener: {error}");
        }
    }
}
