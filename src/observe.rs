//! Shared, observable models for forms over reference-like records.
use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::Result;

/// Marker for records whose form binds through [`Observed`]; use `#[derive(Observable)]`.
pub trait Observable {}

type Observer<T> = Box<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    value: RwLock<T>,
    observers: RwLock<Vec<Observer<T>>>,
}

/// Cloneable handle to one model instance; clones see the same value.
pub struct Observed<T> {
    inner: Arc<Shared<T>>,
}

impl<T> Clone for Observed<T> {
    fn clone(&self) -> Self {
        Observed {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observed").field(&*self.inner.value.read()).finish()
    }
}

impl<T> Observed<T> {
    pub fn new(value: T) -> Self {
        Observed {
            inner: Arc::new(Shared {
                value: RwLock::new(value),
                observers: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.value.read()
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.read().clone()
    }

    /// Observers run after every successful change, with the new value.
    /// They must not modify the model themselves.
    pub fn subscribe(&self, observer: impl Fn(&T) + Send + Sync + 'static) {
        self.inner.observers.write().push(Box::new(observer));
    }

    /// Applies `change`; observers are notified only when it succeeds.
    pub fn update<R>(&self, change: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let result = {
            let mut value = self.inner.value.write();
            change(&mut *value)
        };
        if result.is_ok() {
            self.notify();
        }
        result
    }

    pub fn set(&self, value: T) {
        *self.inner.value.write() = value;
        self.notify();
    }

    fn notify(&self) {
        let value = self.inner.value.read();
        let observers = self.inner.observers.read();
        tracing::trace!(observers = observers.len(), "observed model changed");
        for observer in observers.iter() {
            observer(&*value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrototypeError;
    use crate::ui::FieldPath;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn clones_share_state_and_notify() {
        let model = Observed::new(1_u32);
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        model.subscribe(move |v| {
            counter.store(*v as usize, Ordering::SeqCst);
        });
        let other = model.clone();
        other.update(|v| {
            *v = 7;
            Ok(())
        })
        .unwrap();
        assert_eq!(model.get(), 7);
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn failed_updates_do_not_notify() {
        let model = Observed::new(String::from("a"));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        model.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let result: Result = model.update(|_| Err(PrototypeError::ReadOnly(FieldPath::from("a"))));
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        model.set("b".into());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
