use crate::error::{PrototypeError, Result};
use crate::ui::FieldPath;

type Getter<'a, T> = Box<dyn Fn() -> T + 'a>;
type Setter<'a, T> = Box<dyn Fn(T) -> Result + 'a>;

/// Get/set pair over a value stored elsewhere.
///
/// Generated settings screens use it to present `Option<T>` members as plain
/// `T`, substituting the zero value when nothing is stored.
pub struct Binding<'a, T> {
    get: Getter<'a, T>,
    set: Option<Setter<'a, T>>,
}

impl<'a, T> Binding<'a, T> {
    pub fn new(get: impl Fn() -> T + 'a, set: impl Fn(T) -> Result + 'a) -> Self {
        Binding {
            get: Box::new(get),
            set: Some(Box::new(set)),
        }
    }

    pub fn read_only(get: impl Fn() -> T + 'a) -> Self {
        Binding {
            get: Box::new(get),
            set: None,
        }
    }

    pub fn constant(value: T) -> Self
    where
        T: Clone + 'a,
    {
        Self::read_only(move || value.clone())
    }

    pub fn get(&self) -> T {
        (self.get)()
    }

    pub fn set(&self, value: T) -> Result {
        match &self.set {
            Some(set) => set(value),
            None => Err(PrototypeError::ReadOnly(FieldPath::root())),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.set.is_none()
    }
}
