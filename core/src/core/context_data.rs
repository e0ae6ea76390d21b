// verge_checkout/src/core/context_data.rs
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, interior-mutable state handed to every handler of a flow run.
///
/// IMPORTANT: Lock guards obtained from this struct are blocking and MUST NOT
/// be held across `.await` suspension points. Copy what you need out of the
/// guard, drop it, then await the gateway or backend.
#[derive(Debug)]
pub struct ContextData<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    ContextData(Arc::new(RwLock::new(data)))
  }

  /// The returned guard MUST be dropped before any `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  /// The returned guard MUST be dropped before any `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Read guard narrowed to one field, e.g. `run.map_read(|r| &r.phase)`.
  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&T) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }

  /// Consumes the handle and returns the data if this is the last reference.
  pub fn try_unwrap(self) -> Result<T, Self> {
    Arc::try_unwrap(self.0).map(RwLock::into_inner).map_err(ContextData)
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    ContextData(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for ContextData<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_the_same_data() {
    let a = ContextData::new(vec![1]);
    let b = a.clone();
    b.write().push(2);
    assert_eq!(*a.read(), vec![1, 2]);
    assert_eq!(*a.map_read(|v| &v[1]), 2);
  }

  #[test]
  fn try_unwrap_only_succeeds_for_last_handle() {
    let a = ContextData::new(5u32);
    let b = a.clone();
    let a = a.try_unwrap().expect_err("b still holds a reference");
    drop(b);
    assert_eq!(a.try_unwrap().ok(), Some(5));
  }
}
