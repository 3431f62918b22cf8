use std::sync::Arc;

/// Shared-ownership handle over a single payload.
///
/// The count is atomic, so handles may cross threads. The payload is
/// dropped when the last handle goes away.
#[derive(Debug)]
pub struct SharedHandle<T = i64> {
    inner: Arc<T>,
}

impl<T> SharedHandle<T> {
    pub fn new(payload: T) -> Self {
        SharedHandle {
            inner: Arc::new(payload),
        }
    }

    /// Number of live handles sharing this payload
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Another owning handle; bumps the count by one
    pub fn duplicate(&self) -> Self {
        SharedHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn payload(&self) -> &T {
        &self.inner
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for SharedHandle<T> {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}
