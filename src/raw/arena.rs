use alloc::vec::Vec;

use super::handle::Handle;

/// A flat slot store with a free list.
///
/// Every tree node lives in one slot and is addressed by its [`Handle`];
/// freed slots are recycled before the slot vector grows. The [`lift`]/
/// [`put`] pair takes an element out of its slot and installs a replacement
/// under the *same* handle, which is what lets the tree rewrite a node in
/// place without touching any link that points at it.
///
/// [`lift`]: Arena::lift
/// [`put`]: Arena::put
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[handle.to_index()] = Some(element);
            handle
        } else {
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Takes the element out of a slot and frees the handle.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn free(&mut self, handle: Handle) {
        drop(self.take(handle));
    }

    /// Takes the element out of a slot while keeping the handle reserved.
    ///
    /// The slot stays allocated but empty until [`put`](Arena::put) refills
    /// it; accessing the handle in between is a bug.
    pub(crate) fn lift(&mut self, handle: Handle) -> T {
        self.slots[handle.to_index()].take().expect("`Arena::lift()` - `handle` is invalid!")
    }

    /// Refills a slot emptied by [`lift`](Arena::lift).
    pub(crate) fn put(&mut self, handle: Handle, element: T) {
        let slot = &mut self.slots[handle.to_index()];
        debug_assert!(slot.is_none(), "`Arena::put()` - slot is already occupied!");
        *slot = Some(element);
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
