use std::fmt;

use async_channel::{Receiver, Sender, TryRecvError, TrySendError};

use crate::analytics::encoder::Fragment;

/// Creates the producer and consumer halves of an unbounded FIFO fragment queue.
pub fn unbounded() -> (EventQueue, QueueReceiver) {
    let (sender, receiver) = async_channel::unbounded();
    (EventQueue { sender }, QueueReceiver { receiver })
}

/// Producer half. Cheap to clone and safe to use from any thread; enqueueing never blocks.
#[derive(Clone)]
pub struct EventQueue {
    sender: Sender<Fragment>,
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl EventQueue {
    /// Appends `fragment`. Returns `false` when the consumer is gone and the fragment was dropped.
    pub fn enqueue(&self, fragment: Fragment) -> bool {
        match self.sender.try_send(fragment) {
            Ok(()) => true,
            Err(TrySendError::Closed(fragment)) => {
                log::debug!("collector queue closed; dropping fragment `{fragment}`");
                false
            }
            Err(TrySendError::Full(fragment)) => {
                log::debug!("collector queue full; dropping fragment `{fragment}`");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Consumer half, owned by the dispatcher.
pub struct QueueReceiver {
    receiver: Receiver<Fragment>,
}

impl fmt::Debug for QueueReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueReceiver")
            .field("len", &self.len())
            .finish()
    }
}

impl QueueReceiver {
    /// Takes the oldest fragment without waiting.
    pub fn try_dequeue(&self) -> Option<Fragment> {
        match self.receiver.try_recv() {
            Ok(fragment) => Some(fragment),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    /// Waits for the next fragment. Resolves to `None` once every producer is dropped and the
    /// queue has been drained.
    pub async fn dequeue(&self) -> Option<Fragment> {
        self.receiver.recv().await.ok()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
