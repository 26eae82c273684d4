//! Registry of independently locked ring buffers, keyed by category.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::RingBuffer;

/// A set of [`RingBuffer`]s keyed by category, sharing one default capacity.
///
/// The registry's own lock guards only the category map and the default
/// capacity, and is held only for the brief lookup or insert, so pushes into
/// buffers of different categories never serialize against each other. Each
/// buffer carries its own lock.
///
/// Once a category's buffer has been created it is never removed, and its
/// identity is never replaced; handles returned to callers stay live for as
/// long as any holder keeps them.
#[derive(Debug)]
pub struct BufferRegistry<T> {
    inner: Mutex<RegistryInner<T>>,
}

#[derive(Debug)]
struct RegistryInner<T> {
    /// Capacity for any buffer created from now on.
    capacity: usize,
    buffers: HashMap<String, Arc<RingBuffer<T>>>,
}

impl<T: Clone + Default> BufferRegistry<T> {
    /// Creates an empty registry whose buffers will each have the given
    /// capacity. A capacity below 1 is normalized up to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                capacity: capacity.max(1),
                buffers: HashMap::new(),
            }),
        }
    }

    /// Returns the buffer for the given category, creating it with the
    /// current default capacity if absent.
    ///
    /// Every later call with the same category returns a handle to the same
    /// underlying buffer.
    pub fn get_or_create(&self, category: &str) -> Arc<RingBuffer<T>> {
        let mut inner = self.lock();
        let capacity = inner.capacity;
        Arc::clone(
            inner
                .buffers
                .entry(category.to_string())
                .or_insert_with(|| Arc::new(RingBuffer::new(capacity))),
        )
    }

    /// Returns a point-in-time copy of every category and its buffer handle.
    ///
    /// Categories created afterwards do not appear in an already-returned
    /// copy; the handles themselves remain live references.
    pub fn get_all(&self) -> HashMap<String, Arc<RingBuffer<T>>> {
        self.lock().buffers.clone()
    }

    /// Resizes every buffer in the registry to the new capacity and makes it
    /// the default for buffers created afterwards.
    ///
    /// Returns the values each buffer dropped, keyed by category. A capacity
    /// of 0 is ignored and the call is a no-op returning an empty map.
    pub fn resize_all(&self, capacity: usize) -> HashMap<String, Vec<T>> {
        // Safety first.
        if capacity == 0 {
            return HashMap::new();
        }

        let mut inner = self.lock();
        inner.capacity = capacity;

        let mut dropped = HashMap::with_capacity(inner.buffers.len());
        for (category, buffer) in &inner.buffers {
            dropped.insert(category.clone(), buffer.resize(capacity));
        }

        tracing::debug!(capacity, buffers = dropped.len(), "resized all buffers");

        dropped
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner<T>> {
        self.inner.lock().expect("mutex should not be poisoned")
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::{Visit, Walk};

    fn contents(rb: &RingBuffer<i64>) -> Vec<i64> {
        let mut res = Vec::new();
        let _: Result<Walk, Infallible> = rb.walk(|v| {
            res.push(*v);
            Ok(Visit::Continue)
        });
        res
    }

    #[test]
    fn get_or_create_is_idempotent_per_category() {
        let registry = BufferRegistry::new(100);

        let foo1 = registry.get_or_create("foo");
        foo1.push(123);
        foo1.push(456);

        // Get it again, it's the same ring buffer.
        let foo2 = registry.get_or_create("foo");
        assert!(Arc::ptr_eq(&foo1, &foo2));
        foo2.push(789);

        assert_eq!(contents(&foo1), contents(&foo2));
        assert_eq!(contents(&foo1), vec![789, 456, 123]);
    }

    #[test]
    fn resize_all_aggregates_dropped_values_per_category() {
        let registry = BufferRegistry::new(100);

        let foo = registry.get_or_create("foo");
        foo.push(123);
        foo.push(456);

        let bar = registry.get_or_create("bar");
        for v in 1..=6 {
            bar.push(v);
        }

        let dropped = registry.resize_all(2);
        assert_eq!(dropped.len(), 2);
        // "foo" held only 2 values, so a resize to 2 drops nothing.
        assert_eq!(dropped["foo"], Vec::<i64>::new());
        assert_eq!(dropped["bar"], vec![4, 3, 2, 1]);

        assert_eq!(contents(&foo), vec![456, 123]);
        assert_eq!(contents(&bar), vec![6, 5]);
    }

    #[test]
    fn resize_all_updates_default_for_new_buffers() {
        let registry = BufferRegistry::<i64>::new(100);
        let old = registry.get_or_create("old");
        assert_eq!(old.capacity(), 100);

        registry.resize_all(2);

        assert_eq!(old.capacity(), 2);
        assert_eq!(registry.get_or_create("new").capacity(), 2);
    }

    #[test]
    fn resize_all_to_zero_is_a_noop() {
        let registry = BufferRegistry::new(3);
        let foo = registry.get_or_create("foo");
        foo.push(1);

        let dropped = registry.resize_all(0);
        assert!(dropped.is_empty());
        assert_eq!(foo.capacity(), 3);
        assert_eq!(contents(&foo), vec![1]);

        // The default capacity is untouched too.
        assert_eq!(registry.get_or_create("bar").capacity(), 3);
    }

    #[test]
    fn default_capacity_is_normalized_to_at_least_one() {
        let registry = BufferRegistry::<i64>::new(0);
        let buffer = registry.get_or_create("any");
        assert_eq!(buffer.capacity(), 1);

        buffer.push(1);
        assert_eq!(buffer.push(2), Some(1));
        assert_eq!(contents(&buffer), vec![2]);
    }

    #[test]
    fn get_all_is_a_point_in_time_copy() {
        let registry = BufferRegistry::new(10);
        registry.get_or_create("a").push(1);

        let all = registry.get_all();
        assert_eq!(all.len(), 1);

        // Categories created afterwards don't appear in the earlier copy.
        registry.get_or_create("b");
        assert!(!all.contains_key("b"));
        assert_eq!(registry.get_all().len(), 2);

        // But handles in the copy are live references.
        registry.get_or_create("a").push(2);
        assert_eq!(contents(&all["a"]), vec![2, 1]);
    }
}
