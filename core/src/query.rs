//! Comprehension-shaped combinators shared by [`Optional`] and [`Attempt`].
//!
//! [`Query`] exposes `select`, `select_many` and `where`, the three shapes chained bindings desugar onto. The
//! [`comprehend!`](crate::comprehend) macro provides that chained-binding syntax. Because `select_many` lets the
//! selector decide which container family the chain continues in, a single chain can mix optionals and
//! attempts without unwrapping at each step.

use tracing::trace;

use crate::attempt::Attempt;
use crate::cause::Cause;
use crate::optional::Optional;

/// Short-circuit state of a container: why a chain stopped producing values.
#[derive(Clone, Debug)]
pub enum Halt {
  /// The source was an empty [`Optional`].
  Empty,
  /// The source was a failed [`Attempt`].
  Failed(Cause),
}

/// Container vocabulary for comprehensions.
pub trait Query: Sized {
  type Item;
  /// The same container family, holding `V` instead.
  type Rebind<V>: Query<Item=V>;

  fn unit(value: Self::Item) -> Self;
  /// Creates the short-circuit state of this family from the `halt` of any source family.
  fn halted(halt: Halt) -> Self;
  fn into_flow(self) -> Result<Self::Item, Halt>;

  fn select<V>(self, f: impl FnOnce(Self::Item) -> V) -> Self::Rebind<V>;
  fn r#where(self, predicate: impl FnOnce(&Self::Item) -> bool) -> Self;

  /// Binds the value into the container `f` produces. The result takes `f`'s family: a halt of `self` is
  /// converted with [`Query::halted`].
  #[inline]
  fn select_many<M: Query>(self, f: impl FnOnce(Self::Item) -> M) -> M {
    match self.into_flow() {
      Ok(value) => f(value),
      Err(halt) => M::halted(halt),
    }
  }

  /// Binds the value into the container `collection` produces, then combines the source value with the bound
  /// one using `result`.
  #[inline]
  fn select_many_with<M: Query, R>(
    self,
    collection: impl FnOnce(&Self::Item) -> M,
    result: impl FnOnce(Self::Item, M::Item) -> R,
  ) -> M::Rebind<R> {
    match self.into_flow() {
      Ok(value) => {
        let bound = collection(&value);
        bound.select(|inner| result(value, inner))
      }
      Err(halt) => <M::Rebind<R>>::halted(halt),
    }
  }
}

impl<T> Query for Optional<T> {
  type Item = T;
  type Rebind<V> = Optional<V>;

  #[inline]
  fn unit(value: T) -> Self { Optional::Present(value) }
  #[inline]
  fn halted(halt: Halt) -> Self {
    if let Halt::Failed(cause) = halt {
      trace!(%cause, "discarding cause while continuing as optional");
    }
    Optional::Empty
  }
  #[inline]
  fn into_flow(self) -> Result<T, Halt> {
    match self {
      Optional::Present(value) => Ok(value),
      Optional::Empty => Err(Halt::Empty),
    }
  }

  #[inline]
  fn select<V>(self, f: impl FnOnce(T) -> V) -> Optional<V> { self.map(f) }
  #[inline]
  fn r#where(self, predicate: impl FnOnce(&T) -> bool) -> Self { self.filter(predicate) }
}

impl<T> Query for Attempt<T> {
  type Item = T;
  type Rebind<V> = Attempt<V>;

  #[inline]
  fn unit(value: T) -> Self { Attempt::Success(value) }
  #[inline]
  fn halted(halt: Halt) -> Self {
    match halt {
      Halt::Failed(cause) => Attempt::Failure(cause),
      Halt::Empty => Attempt::Failure(Cause::no_such_element()),
    }
  }
  #[inline]
  fn into_flow(self) -> Result<T, Halt> {
    match self {
      Attempt::Success(value) => Ok(value),
      Attempt::Failure(cause) => Err(Halt::Failed(cause)),
    }
  }

  #[inline]
  fn select<V>(self, f: impl FnOnce(T) -> V) -> Attempt<V> { self.map(f) }
  #[inline]
  fn r#where(self, predicate: impl FnOnce(&T) -> bool) -> Self { self.filter(predicate) }
}


/// Conversions from any finite sequence into a container holding its first element.
pub trait SequenceExt: IntoIterator + Sized {
  /// First element, or [`Optional::Empty`].
  #[inline]
  fn to_optional(self) -> Optional<Self::Item> { Optional::from_sequence(self) }
  /// First element, or a [`NoSuchElement`](crate::cause::NoSuchElement) failure.
  #[inline]
  fn to_attempt(self) -> Attempt<Self::Item> { Attempt::from_sequence(self) }
}
impl<I: IntoIterator> SequenceExt for I {}


/// Chained bindings over [`Query`] containers.
///
/// Clauses are separated by `;`:
/// - `from PAT in EXPR` binds the value of the container `EXPR`,
/// - `where COND` keeps the last bound value only if `COND` holds; inside `COND` the binder refers to the value
///   by reference,
/// - `select EXPR` ends the chain, producing the final value.
///
/// ```
/// use scando_core::prelude::*;
///
/// let sum = comprehend! {
///   from a in Attempt::success(2);
///   where *a > 1;
///   from b in Optional::some(a * 10);
///   select a + b
/// };
/// assert_eq!(sum, Optional::some(22));
/// ```
#[macro_export]
macro_rules! comprehend {
  (from $binder:pat_param in $source:expr ; select $result:expr $(;)?) => {
    $crate::query::Query::select($source, |$binder| $result)
  };
  (from $binder:pat_param in $source:expr ; where $condition:expr ; $($tail:tt)*) => {
    $crate::comprehend! {
      from $binder in $crate::query::Query::r#where($source, |item| { let $binder = item; $condition }) ;
      $($tail)*
    }
  };
  (from $binder:pat_param in $source:expr ; $($tail:tt)+) => {
    $crate::query::Query::select_many($source, |$binder| $crate::comprehend! { $($tail)+ })
  };
}
