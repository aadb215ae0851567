//! State change notifications
//!
//! The session calls every registered listener synchronously, right after
//! the mutation it reports. Listeners must not block.

use vaddrust_types::{CameraState, DeviceInfo, Field};

use crate::session::SessionState;

#[cfg_attr(test, mockall::automock)]
pub trait StateListener {
    /// A reply updated `field`; `state` already holds the new value
    fn on_field_changed(&mut self, field: Field, state: &CameraState);

    /// The camera answered `version`
    fn on_identified(&mut self, info: &DeviceInfo);

    /// The session moved to a new lifecycle state
    fn on_status(&mut self, status: SessionState);
}

/// Listener list owned by the session
#[derive(Default)]
pub(crate) struct Listeners {
    inner: Vec<Box<dyn StateListener + Send>>,
}

impl Listeners {
    pub(crate) fn push(&mut self, listener: Box<dyn StateListener + Send>) {
        self.inner.push(listener);
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }

    pub(crate) fn field_changed(&mut self, field: Field, state: &CameraState) {
        for listener in &mut self.inner {
            listener.on_field_changed(field, state);
        }
    }

    pub(crate) fn identified(&mut self, info: &DeviceInfo) {
        for listener in &mut self.inner {
            listener.on_identified(info);
        }
    }

    pub(crate) fn status(&mut self, status: SessionState) {
        for listener in &mut self.inner {
            listener.on_status(status);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("count", &self.inner.len()).finish()
    }
}
