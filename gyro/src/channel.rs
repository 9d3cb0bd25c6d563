//! Publish/subscribe topics for the single-threaded sensor loop.
//!
//! A publish appends the record to every subscriber's inbox right away;
//! there is no intermediate step. Publishing never blocks: when a
//! subscriber's inbox is full the record is dropped for that subscriber.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};
use thiserror::Error;
use tracing::trace;

/// Every published record names the topic it belongs to, so publishes
/// can be traced uniformly.
pub trait TracedMessage {
    fn topic(&self) -> &'static str;
}

#[derive(Debug)]
pub struct Topic<T: Clone + TracedMessage> {
    subscribers: Rc<RefCell<Vec<Inbox<T>>>>,
}

type Inbox<T> = Rc<RefCell<InnerSubscriber<T>>>;

impl<T: Clone + TracedMessage> Default for Topic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + TracedMessage> Topic<T> {
    pub fn new() -> Self {
        Topic {
            subscribers: Rc::new(RefCell::new(vec![])),
        }
    }

    pub fn publisher(&self) -> Publisher<T> {
        Publisher {
            subscribers: self.subscribers.clone(),
        }
    }

    pub fn subscriber(&self, inbox_capacity: impl Into<Option<usize>>) -> Subscriber<T> {
        let rc = Rc::new(RefCell::new(InnerSubscriber {
            inbox: VecDeque::new(),
            inbox_capacity: inbox_capacity.into(),
            dropped: 0,
        }));
        self.subscribers.borrow_mut().push(rc.clone());
        Subscriber(rc)
    }
}

#[derive(Debug)]
pub struct Publisher<T> {
    subscribers: Rc<RefCell<Vec<Inbox<T>>>>,
}

impl<T: Clone + TracedMessage> Publisher<T> {
    /// Delivers to every subscriber with room. Subscribers that are full
    /// miss this record and the call reports `QueueFull`; the others still
    /// receive it.
    pub fn publish(&mut self, item: T) -> Result<(), ChannelError> {
        let subscribers = self.subscribers.borrow();
        let mut result = Ok(());

        for s in subscribers.iter() {
            let mut s_inner = s.borrow_mut();

            if let Some(inbox_capacity) = s_inner.inbox_capacity {
                if s_inner.inbox.len() >= inbox_capacity {
                    s_inner.dropped += 1;
                    trace!(topic = item.topic(), "Subscriber inbox full, record dropped");
                    result = Err(ChannelError::QueueFull);
                    continue;
                }
            }

            s_inner.inbox.push_back(item.clone());
        }

        trace!(topic = item.topic(), subscribers = subscribers.len(), "publish");
        result
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

#[derive(Debug)]
pub struct Subscriber<T>(Rc<RefCell<InnerSubscriber<T>>>);

#[derive(Debug)]
pub struct InnerSubscriber<T> {
    inbox: VecDeque<T>,
    inbox_capacity: Option<usize>,
    dropped: usize,
}

impl<T> Subscriber<T> {
    pub fn recv(&mut self) -> Option<T> {
        let mut inner = self.0.borrow_mut();
        inner.inbox.pop_front()
    }

    /// Takes everything currently queued, oldest first
    pub fn drain(&mut self) -> Vec<T> {
        let mut inner = self.0.borrow_mut();
        inner.inbox.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().inbox.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().inbox.is_empty()
    }

    /// Number of records this subscriber missed because its inbox was full
    pub fn dropped(&self) -> usize {
        self.0.borrow().dropped
    }

    pub fn clear(&mut self) {
        let mut inner = self.0.borrow_mut();
        inner.inbox.clear();
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Queue full")]
    QueueFull,
}
