//! Bounded double-ended buffer of token snapshots
//!
//! A ring of preallocated [`Token`] slots. Pushing copies the attributes of a
//! live token into a slot (reusing its buffers), popping copies them back out,
//! so a queued snapshot never changes when the live token does.

use thiserror::Error;

use crate::token::Token;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Token queue full (capacity {capacity})")]
    Full { capacity: usize },
    #[error("Token queue cannot grow beyond {max} slots")]
    MaxCapacity { max: usize },
    #[error("Token queue empty")]
    Empty,
}

/// What a push does on a full queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Reject the push, queue unchanged
    #[default]
    Throw,
    /// Make room by evicting the element at the opposite end
    DropOldest,
    /// Ignore the pushed element
    DropNewest,
    /// Double the capacity, up to a hard maximum
    Grow,
}

#[derive(Debug, Clone)]
pub struct TokenQueue {
    slots: Vec<Token>,
    head: usize,
    len: usize,
    policy: OverflowPolicy,
    max_capacity: usize,
}

impl TokenQueue {
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self::with_max_capacity(capacity, policy, capacity)
    }

    /// A queue that may grow to `max_capacity` under [`OverflowPolicy::Grow`]
    pub fn with_max_capacity(capacity: usize, policy: OverflowPolicy, max_capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![Token::default(); capacity],
            head: 0,
            len: 0,
            policy,
            max_capacity: max_capacity.max(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    #[inline]
    fn slot(&self, i: usize) -> usize {
        (self.head + i) % self.slots.len()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Element `i` from the front
    pub fn get(&self, i: usize) -> Option<&Token> {
        if i < self.len {
            Some(&self.slots[self.slot(i)])
        } else {
            None
        }
    }

    pub fn peek_front(&self) -> Option<&Token> {
        self.get(0)
    }

    pub fn peek_front_mut(&mut self) -> Option<&mut Token> {
        if self.len > 0 {
            Some(&mut self.slots[self.head])
        } else {
            None
        }
    }

    pub fn peek_back(&self) -> Option<&Token> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> + '_ {
        (0..self.len).map(move |i| &self.slots[self.slot(i)])
    }

    fn grow(&mut self) -> Result<(), QueueError> {
        let cap = self.slots.len();
        if cap >= self.max_capacity {
            return Err(QueueError::MaxCapacity {
                max: self.max_capacity,
            });
        }
        let new_cap = (cap * 2).min(self.max_capacity);
        self.slots.rotate_left(self.head);
        self.slots.resize_with(new_cap, Token::default);
        self.head = 0;
        tracing::debug!(from = cap, to = new_cap, "token queue grown");
        Ok(())
    }

    /// Make room for one element; `Ok(false)` means drop the pushed one
    fn make_room(&mut self, at_front: bool) -> Result<bool, QueueError> {
        if self.len < self.slots.len() {
            return Ok(true);
        }
        match self.policy {
            OverflowPolicy::Throw => Err(QueueError::Full {
                capacity: self.slots.len(),
            }),
            OverflowPolicy::DropOldest => {
                if at_front {
                    // the back is what gets evicted
                    self.len -= 1;
                } else {
                    self.head = self.slot(1);
                    self.len -= 1;
                }
                Ok(true)
            }
            OverflowPolicy::DropNewest => Ok(false),
            OverflowPolicy::Grow => self.grow().map(|_| true),
        }
    }

    /// Snapshot `token` at the back
    pub fn push_back(&mut self, token: &Token) -> Result<(), QueueError> {
        if self.make_room(false)? {
            let i = self.slot(self.len);
            self.slots[i].clone_from(token);
            self.len += 1;
        }
        Ok(())
    }

    /// Snapshot `token` at the front
    pub fn push_front(&mut self, token: &Token) -> Result<(), QueueError> {
        if self.make_room(true)? {
            let cap = self.slots.len();
            self.head = (self.head + cap - 1) % cap;
            self.slots[self.head].clone_from(token);
            self.len += 1;
        }
        Ok(())
    }

    /// Copy the front snapshot into `into` and remove it
    pub fn pop_front(&mut self, into: &mut Token) -> Result<(), QueueError> {
        if self.len == 0 {
            return Err(QueueError::Empty);
        }
        into.clone_from(&self.slots[self.head]);
        self.head = self.slot(1);
        self.len -= 1;
        Ok(())
    }

    /// Copy the back snapshot into `into` and remove it
    pub fn pop_back(&mut self, into: &mut Token) -> Result<(), QueueError> {
        if self.len == 0 {
            return Err(QueueError::Empty);
        }
        let i = self.slot(self.len - 1);
        into.clone_from(&self.slots[i]);
        self.len -= 1;
        Ok(())
    }

    /// Keep the first `len` elements
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }
}
