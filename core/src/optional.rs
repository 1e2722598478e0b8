use std::hash::{Hash, Hasher};

use crate::attempt::Attempt;
use crate::cause::{Cause, IllegalState};

/// Value fed to the hasher for every [`Optional::Empty`], regardless of the element type.
pub const EMPTY_HASH_SENTINEL: u64 = 0;

/// A value that may be absent.
///
/// Absence carries no reason; use [`Attempt`] when the cause matters.
#[derive(Default, Clone, Copy, Debug, Eq, Ord, PartialOrd)]
pub enum Optional<T> {
  #[default]
  Empty,
  Present(T),
}

/// Bare absence marker: equal to every [`Optional::Empty`], whatever its element type.
#[derive(Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Absent;

impl<T> Optional<T> {
  #[inline]
  pub const fn some(value: T) -> Self { Self::Present(value) }
  #[inline]
  pub const fn empty() -> Self { Self::Empty }
  /// Absorbs absence: `None` becomes [`Empty`](Self::Empty).
  #[inline]
  pub fn from_nullable(value: Option<T>) -> Self {
    match value {
      Some(value) => Self::Present(value),
      None => Self::Empty,
    }
  }
  /// Takes the first element of `sequence`, if any. Further elements are never pulled.
  #[inline]
  pub fn from_sequence(sequence: impl IntoIterator<Item=T>) -> Self {
    Self::from_nullable(sequence.into_iter().next())
  }


  #[inline]
  pub const fn is_present(&self) -> bool { matches!(self, Self::Present(_)) }
  #[inline]
  pub const fn is_empty(&self) -> bool { !self.is_present() }

  /// Returns the value.
  ///
  /// # Panics
  ///
  /// Panics with [`IllegalState::Empty`] if `self` is empty.
  #[inline]
  #[track_caller]
  pub fn get(self) -> T {
    match self {
      Self::Present(value) => value,
      Self::Empty => panic!("{}", IllegalState::Empty),
    }
  }
  #[inline]
  pub fn try_get(self) -> Result<T, IllegalState> {
    match self {
      Self::Present(value) => Ok(value),
      Self::Empty => Err(IllegalState::Empty),
    }
  }
  #[inline]
  pub const fn as_ref(&self) -> Optional<&T> {
    match self {
      Self::Present(value) => Optional::Present(value),
      Self::Empty => Optional::Empty,
    }
  }
  #[inline]
  pub fn as_mut(&mut self) -> Optional<&mut T> {
    match self {
      Self::Present(value) => Optional::Present(value),
      Self::Empty => Optional::Empty,
    }
  }

  /// Returns the value, or `default` when empty. `default` is already evaluated; see
  /// [get_or_else_with](Self::get_or_else_with) for a deferred default.
  #[inline]
  pub fn get_or_else(self, default: T) -> T {
    match self {
      Self::Present(value) => value,
      Self::Empty => default,
    }
  }
  #[inline]
  pub fn get_or_else_with(self, default: impl FnOnce() -> T) -> T {
    match self {
      Self::Present(value) => value,
      Self::Empty => default(),
    }
  }
  /// Returns `self` untouched if present, otherwise `alternative`.
  #[inline]
  pub fn or_else(self, alternative: Optional<T>) -> Self {
    match self {
      present @ Self::Present(_) => present,
      Self::Empty => alternative,
    }
  }
  #[inline]
  pub fn or_else_with(self, alternative: impl FnOnce() -> Optional<T>) -> Self {
    match self {
      present @ Self::Present(_) => present,
      Self::Empty => alternative(),
    }
  }


  #[inline]
  pub fn map<V>(self, f: impl FnOnce(T) -> V) -> Optional<V> {
    match self {
      Self::Present(value) => Optional::Present(f(value)),
      Self::Empty => Optional::Empty,
    }
  }
  #[inline]
  pub fn flat_map<V>(self, f: impl FnOnce(T) -> Optional<V>) -> Optional<V> {
    match self {
      Self::Present(value) => f(value),
      Self::Empty => Optional::Empty,
    }
  }
  /// Binds into an [`Attempt`]; an empty `self` becomes a [`NoSuchElement`](crate::cause::NoSuchElement) failure.
  #[inline]
  pub fn flat_map_attempt<V>(self, f: impl FnOnce(T) -> Attempt<V>) -> Attempt<V> {
    match self {
      Self::Present(value) => f(value),
      Self::Empty => Attempt::Failure(Cause::no_such_element()),
    }
  }
  #[inline]
  pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
    match self {
      Self::Present(value) => if predicate(&value) {
        Self::Present(value)
      } else {
        tracing::trace!("optional filter rejected value");
        Self::Empty
      },
      Self::Empty => Self::Empty,
    }
  }


  /// Converts into an [`Attempt`]; an empty `self` becomes a [`NoSuchElement`](crate::cause::NoSuchElement) failure.
  #[inline]
  pub fn to_attempt(self) -> Attempt<T> {
    match self {
      Self::Present(value) => Attempt::Success(value),
      Self::Empty => Attempt::Failure(Cause::no_such_element()),
    }
  }
  #[inline]
  pub fn into_option(self) -> Option<T> {
    match self {
      Self::Present(value) => Some(value),
      Self::Empty => None,
    }
  }

  /// Iterates over the value, if any. Every call starts a fresh traversal.
  #[inline]
  pub fn iter(&self) -> Iter<'_, T> { Iter(self.as_ref().into_option()) }
  #[inline]
  pub fn iter_mut(&mut self) -> IterMut<'_, T> { IterMut(self.as_mut().into_option()) }
}

impl<T> Optional<Optional<T>> {
  #[inline]
  pub fn flatten(self) -> Optional<T> { self.flat_map(|inner| inner) }
}

impl<T> Optional<Attempt<T>> {
  /// Collapses into an [`Attempt`]; an empty `self` becomes a [`NoSuchElement`](crate::cause::NoSuchElement) failure.
  #[inline]
  pub fn flatten_attempt(self) -> Attempt<T> { self.flat_map_attempt(|inner| inner) }
  /// Swaps the layers, keeping both the emptiness and the failure cause.
  #[inline]
  pub fn transpose(self) -> Attempt<Optional<T>> {
    match self {
      Self::Present(Attempt::Success(value)) => Attempt::Success(Optional::Present(value)),
      Self::Present(Attempt::Failure(cause)) => Attempt::Failure(cause),
      Self::Empty => Attempt::Success(Optional::Empty),
    }
  }
}


impl<T> From<Option<T>> for Optional<T> {
  #[inline]
  fn from(value: Option<T>) -> Self { Self::from_nullable(value) }
}
impl<T> From<Optional<T>> for Option<T> {
  #[inline]
  fn from(optional: Optional<T>) -> Self { optional.into_option() }
}
impl<T> From<Absent> for Optional<T> {
  #[inline]
  fn from(_: Absent) -> Self { Self::Empty }
}

impl<T> FromIterator<T> for Optional<T> {
  #[inline]
  fn from_iter<I: IntoIterator<Item=T>>(iter: I) -> Self { Self::from_sequence(iter) }
}


/// Emptiness is compared by discriminant only, so two empties are equal whatever their element types.
///
/// The right-hand element type is inferred from the operand. A bare `Optional::empty()` leaves it open, so write
/// `Optional::<T>::empty()` or compare against [`Absent`] instead.
impl<T: PartialEq<U>, U> PartialEq<Optional<U>> for Optional<T> {
  #[inline]
  fn eq(&self, other: &Optional<U>) -> bool {
    match (self, other) {
      (Self::Present(value), Optional::Present(other)) => value == other,
      (Self::Empty, Optional::Empty) => true,
      _ => false,
    }
  }
}
impl<T> PartialEq<Absent> for Optional<T> {
  #[inline]
  fn eq(&self, _: &Absent) -> bool { self.is_empty() }
}
impl<T> PartialEq<Optional<T>> for Absent {
  #[inline]
  fn eq(&self, other: &Optional<T>) -> bool { other.is_empty() }
}

impl<T: Hash> Hash for Optional<T> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    match self {
      Self::Present(value) => value.hash(state),
      Self::Empty => state.write_u64(EMPTY_HASH_SENTINEL),
    }
  }
}


/// Iterator over a borrowed [`Optional`].
#[derive(Clone, Debug)]
pub struct Iter<'a, T>(pub(crate) Option<&'a T>);
impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> { self.0.take() }
  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    let len = usize::from(self.0.is_some());
    (len, Some(len))
  }
}
impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Iterator over a mutably borrowed [`Optional`].
#[derive(Debug)]
pub struct IterMut<'a, T>(pub(crate) Option<&'a mut T>);
impl<'a, T> Iterator for IterMut<'a, T> {
  type Item = &'a mut T;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> { self.0.take() }
  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    let len = usize::from(self.0.is_some());
    (len, Some(len))
  }
}
impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// Owning iterator over an [`Optional`].
#[derive(Clone, Debug)]
pub struct IntoIter<T>(pub(crate) Option<T>);
impl<T> Iterator for IntoIter<T> {
  type Item = T;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> { self.0.take() }
  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    let len = usize::from(self.0.is_some());
    (len, Some(len))
  }
}
impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Optional<T> {
  type Item = T;
  type IntoIter = IntoIter<T>;
  #[inline]
  fn into_iter(self) -> Self::IntoIter { IntoIter(self.into_option()) }
}
impl<'a, T> IntoIterator for &'a Optional<T> {
  type Item = &'a T;
  type IntoIter = Iter<'a, T>;
  #[inline]
  fn into_iter(self) -> Self::IntoIter { self.iter() }
}
impl<'a, T> IntoIterator for &'a mut Optional<T> {
  type Item = &'a mut T;
  type IntoIter = IterMut<'a, T>;
  #[inline]
  fn into_iter(self) -> Self::IntoIter { self.iter_mut() }
}
