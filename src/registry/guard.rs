//! Scoped restoration guard.

use std::fmt;

use super::Registry;

/// Removes its registration from the registry when dropped.
///
/// Restoration runs on every exit path out of the guard's scope, including
/// panic unwinding. Call [`persist`](RegistryGuard::persist) to keep the
/// registration alive until [`Registry::unregister`], or
/// [`release`](RegistryGuard::release) to restore before scope exit.
#[must_use = "dropping the guard immediately removes the registration"]
pub struct RegistryGuard {
    registry: Registry,
    id: u64,
    armed: bool,
}

impl RegistryGuard {
    pub(crate) fn new(registry: Registry, id: u64) -> Self {
        Self {
            registry,
            id,
            armed: true,
        }
    }

    /// Restore now instead of at scope exit.
    pub fn release(mut self) {
        self.restore();
    }

    /// Defuse the guard: the registration stays active until
    /// [`Registry::unregister`].
    pub fn persist(mut self) {
        self.armed = false;
    }

    fn restore(&mut self) {
        if self.armed {
            self.armed = false;
            self.registry.remove(self.id);
        }
    }
}

impl Drop for RegistryGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

impl fmt::Debug for RegistryGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryGuard")
            .field("id", &self.id)
            .field("armed", &self.armed)
            .finish()
    }
}
