//! Detachable host registrations (event listeners, panel bindings).

use smallvec::SmallVec;

/// Something registered with the host that must be undone on teardown.
///
/// `detach` may be called more than once; every call after the first is a no-op.
pub trait Subscription {
    fn detach(&mut self);
}

/// Closure-backed subscription that runs its release once.
pub struct OnDetach<F: FnOnce()> {
    release: Option<F>,
}

impl<F: FnOnce()> OnDetach<F> {
    pub fn new(release: F) -> Self {
        Self {
            release: Some(release),
        }
    }
}

impl<F: FnOnce()> Subscription for OnDetach<F> {
    fn detach(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Owns every live subscription of one mount. Detaches them on drop.
#[derive(Default)]
pub struct Subscriptions {
    active: SmallVec<[Box<dyn Subscription>; 8]>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sub: Box<dyn Subscription>) {
        self.active.push(sub);
    }

    pub fn push_fn(&mut self, release: impl FnOnce() + 'static) {
        self.push(Box::new(OnDetach::new(release)));
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Take over every registration in `other`, leaving it empty. Nothing is detached.
    pub fn append(&mut self, other: &mut Subscriptions) {
        self.active.extend(other.active.drain(..));
    }

    /// Detach in reverse registration order. Returns how many were detached.
    pub fn detach_all(&mut self) -> usize {
        let n = self.active.len();
        while let Some(mut sub) = self.active.pop() {
            sub.detach();
        }
        n
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.detach_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn detach_all_runs_each_release_once() {
        let count = Rc::new(Cell::new(0));
        let mut subs = Subscriptions::new();
        for _ in 0..3 {
            let c = count.clone();
            subs.push_fn(move || c.set(c.get() + 1));
        }
        assert_eq!(subs.detach_all(), 3);
        assert_eq!(subs.detach_all(), 0);
        assert_eq!(count.get(), 3);
        assert!(subs.is_empty());
    }

    #[test]
    fn append_moves_without_detaching() {
        let count = Rc::new(Cell::new(0));
        let mut owner = Subscriptions::new();
        {
            let mut staged = Subscriptions::new();
            for _ in 0..2 {
                let c = count.clone();
                staged.push_fn(move || c.set(c.get() + 1));
            }
            owner.append(&mut staged);
            assert!(staged.is_empty());
        }
        assert_eq!(count.get(), 0);
        assert_eq!(owner.detach_all(), 2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn staged_registrations_are_released_when_setup_fails() {
        fn register(
            subs: &mut Subscriptions,
            count: &Rc<Cell<u32>>,
            fail_at: usize,
        ) -> Result<(), ()> {
            for i in 0..3 {
                if i == fail_at {
                    return Err(());
                }
                let c = count.clone();
                subs.push_fn(move || c.set(c.get() + 1));
            }
            Ok(())
        }
        let count = Rc::new(Cell::new(0));
        let mut owner = Subscriptions::new();
        let result = {
            let mut staged = Subscriptions::new();
            register(&mut staged, &count, 2).map(|()| owner.append(&mut staged))
        };
        assert!(result.is_err());
        assert_eq!(count.get(), 2);
        assert!(owner.is_empty());
    }

    #[test]
    fn drop_detaches() {
        let count = Rc::new(Cell::new(0));
        {
            let mut subs = Subscriptions::new();
            let c = count.clone();
            subs.push_fn(move || c.set(c.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }
}
