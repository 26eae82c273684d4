//! Thread-safe circular buffer of the most recently pushed values.

use std::{
    convert::Infallible,
    mem,
    sync::{Mutex, MutexGuard},
};

/// Control-flow signal returned by a [`RingBuffer::walk`] visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Keep walking towards older values.
    Continue,
    /// End the walk before all values have been visited.
    ///
    /// Stopping early is ordinary control flow, not a failure;
    /// [`RingBuffer::copy_into`] stops this way once its destination is
    /// full. A genuine visitor failure is reported by returning `Err`.
    Stop,
}

/// How a [`RingBuffer::walk`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Every stored value was visited.
    Completed,
    /// The visitor returned [`Visit::Stop`] before the oldest value.
    Stopped,
}

/// Point-in-time summary of a buffer's contents.
///
/// When the buffer is empty, `newest` and `oldest` are `T::default()` and
/// `count` is 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview<T> {
    /// The most recently pushed value still stored.
    pub newest: T,
    /// The oldest value still stored.
    pub oldest: T,
    /// The number of values currently stored.
    pub count: usize,
}

/// A fixed-capacity collection of recent values.
///
/// Pushing into a full buffer evicts the oldest value; steady-state pushes
/// never allocate. All operations are safe for concurrent use from multiple
/// threads, serialized by one exclusive lock per buffer. The lock is
/// deliberately a plain mutex rather than a reader/writer lock, so frequent
/// walks cannot starve pushes.
///
/// A capacity of 0 is legal and yields a buffer that stores nothing.
#[derive(Debug)]
pub struct RingBuffer<T> {
    inner: Mutex<Inner<T>>,
}

#[derive(Debug)]
struct Inner<T> {
    /// Fully allocated at construction; length equals the capacity.
    buf: Vec<T>,
    /// Index for the next write. Walk backwards from here to read.
    cur: usize,
    /// Count of live values, at most `buf.len()`.
    len: usize,
}

impl<T: Clone + Default> RingBuffer<T> {
    /// Creates an empty buffer with a pre-allocated, fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                buf: vec![T::default(); capacity],
                cur: 0,
                len: 0,
            }),
        }
    }

    /// Pushes a value, evicting and returning the oldest stored value if the
    /// buffer was full.
    ///
    /// This is O(1) and never allocates. Pushing into a zero-capacity buffer
    /// is a no-op returning `None`.
    pub fn push(&self, value: T) -> Option<T> {
        let mut inner = self.lock();
        let cap = inner.buf.len();
        if cap == 0 {
            return None;
        }

        let cur = inner.cur;
        let evicted = if inner.len == cap {
            // The slot at the write cursor holds the oldest live value.
            Some(mem::replace(&mut inner.buf[cur], value))
        } else {
            inner.buf[cur] = value;
            None
        };

        if inner.len < cap {
            inner.len += 1;
        }
        inner.cur = (cur + 1) % cap;

        evicted
    }

    /// Calls `visit` for each stored value, newest first, oldest last.
    ///
    /// The visitor ends the walk early by returning [`Visit::Stop`]
    /// (yielding `Ok(Walk::Stopped)`), or fails it by returning `Err`, which
    /// is propagated as-is. The buffer's lock is held for the whole walk, so
    /// the visitor must not call back into this buffer or the walk
    /// deadlocks.
    pub fn walk<E, F>(&self, mut visit: F) -> Result<Walk, E>
    where
        F: FnMut(&T) -> Result<Visit, E>,
    {
        let inner = self.lock();
        let cap = inner.buf.len();
        for i in 0..inner.len {
            // Reads go backwards from one before the write cursor,
            // wrapping around when necessary.
            let idx = (inner.cur + cap - 1 - i) % cap;
            match visit(&inner.buf[idx])? {
                Visit::Continue => {}
                Visit::Stop => return Ok(Walk::Stopped),
            }
        }
        Ok(Walk::Completed)
    }

    /// Returns the newest and oldest stored values and the stored count.
    pub fn overview(&self) -> Overview<T> {
        let inner = self.lock();
        if inner.len == 0 {
            return Overview {
                newest: T::default(),
                oldest: T::default(),
                count: 0,
            };
        }

        let cap = inner.buf.len();
        // The read head is the value just before the write cursor; the read
        // tail is len-1 values further back.
        let head = (inner.cur + cap - 1) % cap;
        let tail = (head + cap - (inner.len - 1)) % cap;

        Overview {
            newest: inner.buf[head].clone(),
            oldest: inner.buf[tail].clone(),
            count: inner.len,
        }
    }

    /// Copies the most recent values into `dst`, newest first, and returns
    /// the number of values copied.
    ///
    /// Stops once `dst` is full; a destination larger than the stored count
    /// is simply left partially filled. The buffer is not modified.
    pub fn copy_into(&self, dst: &mut [T]) -> usize {
        let mut copied = 0;
        // The visitor is infallible; a full destination stops the walk
        // without failing it.
        let _: Result<Walk, Infallible> = self.walk(|value| {
            if copied >= dst.len() {
                return Ok(Visit::Stop);
            }
            dst[copied] = value.clone();
            copied += 1;
            Ok(Visit::Continue)
        });
        copied
    }

    /// Copies up to the `n` most recent values into a newly allocated `Vec`,
    /// newest first. The buffer is not modified.
    pub fn take(&self, n: usize) -> Vec<T> {
        let mut dst = vec![T::default(); n];
        let copied = self.copy_into(&mut dst);
        dst.truncate(copied);
        dst
    }

    /// Resizes the buffer to the given capacity, preserving the most recent
    /// values in logical order.
    ///
    /// Shrinking below the current count drops the oldest values as
    /// necessary and returns them, newest-to-oldest among themselves.
    /// Growing never drops anything. A capacity of 0 is ignored and the call
    /// is a no-op returning an empty `Vec`, so callers cannot accidentally
    /// zero a buffer.
    pub fn resize(&self, capacity: usize) -> Vec<T> {
        // Safety first.
        if capacity == 0 {
            return Vec::new();
        }

        let mut inner = self.lock();
        let old_cap = inner.buf.len();
        let retain = inner.len.min(capacity);

        // Move the `retain` most recent values into the new storage so the
        // newest lands in the last filled slot, walking both sides
        // backwards.
        let mut buf = vec![T::default(); capacity];
        for i in 0..retain {
            let idx = (inner.cur + old_cap - 1 - i) % old_cap;
            buf[retain - 1 - i] = mem::take(&mut inner.buf[idx]);
        }

        // If we resized smaller than the stored count, capture the values
        // that no longer fit, continuing backwards from the retained set.
        let mut dropped = Vec::with_capacity(inner.len - retain);
        for i in retain..inner.len {
            let idx = (inner.cur + old_cap - 1 - i) % old_cap;
            dropped.push(mem::take(&mut inner.buf[idx]));
        }

        if !dropped.is_empty() {
            tracing::debug!(
                dropped = dropped.len(),
                capacity,
                "resize dropped oldest values"
            );
        }

        // The next write cursor wraps to 0 only if the buffer is now
        // exactly full.
        inner.buf = buf;
        inner.cur = retain % capacity;
        inner.len = retain;

        dropped
    }

    /// Returns the number of values currently stored.
    pub fn len(&self) -> usize {
        self.lock().len
    }

    /// Returns `true` if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the buffer's current capacity.
    pub fn capacity(&self) -> usize {
        self.lock().buf.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().expect("mutex should not be poisoned")
    }
}
