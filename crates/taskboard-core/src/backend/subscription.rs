//! Live listener guard.

use std::fmt;

/// Owns the release action of one live listener.
///
/// Released exactly once, by `cancel()` or on drop.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Release the listener now
    pub fn cancel(mut self) {
        self.release_now();
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_cancel_releases_once() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let sub = Subscription::new(move || counter.set(counter.get() + 1));
        assert!(sub.is_active());
        sub.cancel();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_drop_releases() {
        let count = Rc::new(Cell::new(0));
        {
            let counter = count.clone();
            let _sub = Subscription::new(move || counter.set(counter.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }
}
