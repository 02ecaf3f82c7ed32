//! Small ordered set over a closed enum.
use std::fmt;
use std::marker::PhantomData;

/// A closed enum with at most eight variants, listed in declaration order.
pub trait Flag: Copy + Eq + 'static {
    const ALL: &'static [Self];

    fn bit(self) -> u8 {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        1 << index
    }
}

/// Iteration always follows `Flag::ALL`, never insertion order.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FlagSet<F: Flag> {
    bits: u8,
    _flag: PhantomData<F>,
}

impl<F: Flag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: Flag> FlagSet<F> {
    pub fn empty() -> Self {
        Self {
            bits: 0,
            _flag: PhantomData,
        }
    }

    pub fn insert(&mut self, flag: F) {
        self.bits |= flag.bit();
    }

    pub fn remove(&mut self, flag: F) {
        self.bits &= !flag.bit();
    }

    pub fn contains(&self, flag: F) -> bool {
        self.bits & flag.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        F::ALL.iter().copied().filter(|f| self.contains(*f))
    }
}

impl<F: Flag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl<F: Flag + fmt::Debug> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Values that occur more than once, in source order, with the first
/// occurrence of each distinct value removed.
pub fn duplicates<T: Copy + Eq>(values: &[T]) -> Vec<T> {
    let mut seen: Vec<T> = Vec::with_capacity(values.len());
    let mut repeated = Vec::new();
    for value in values {
        if seen.contains(value) {
            repeated.push(*value);
        } else {
            seen.push(*value);
        }
    }
    repeated
}
