use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace, warn};

use crate::cause::{Cause, IllegalState, NoSuchElement, Panicked};
use crate::optional::{IntoIter, Iter, IterMut, Optional};

/// Outcome of a computation: a value, or the [`Cause`] it failed with.
#[derive(Clone, Debug)]
pub enum Attempt<T> {
  Success(T),
  Failure(Cause),
}

impl<T> Attempt<T> {
  #[inline]
  pub const fn success(value: T) -> Self { Self::Success(value) }
  #[inline]
  pub fn failure(cause: impl Into<Cause>) -> Self { Self::Failure(cause.into()) }

  /// Runs `thunk`, turning an `Err` it returns or a panic it raises into a [`Failure`](Self::Failure).
  ///
  /// This is the only place where errors are captured: combinators such as [map](Self::map) let panics
  /// propagate.
  pub fn evaluate<E: Into<Cause>>(thunk: impl FnOnce() -> Result<T, E>) -> Self {
    match panic::catch_unwind(AssertUnwindSafe(thunk)) {
      Ok(Ok(value)) => Self::Success(value),
      Ok(Err(error)) => {
        let cause = error.into();
        debug!(%cause, "evaluation failed; capturing cause");
        Self::Failure(cause)
      }
      Err(payload) => Self::from_panic(payload),
    }
  }
  /// Runs `thunk` that cannot return an error; only a panic it raises becomes a [`Failure`](Self::Failure).
  pub fn evaluate_value(thunk: impl FnOnce() -> T) -> Self {
    match panic::catch_unwind(AssertUnwindSafe(thunk)) {
      Ok(value) => Self::Success(value),
      Err(payload) => Self::from_panic(payload),
    }
  }
  fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
    let panicked = Panicked::from_payload(payload);
    warn!(cause = %panicked, "evaluation panicked; capturing panic as cause");
    Self::Failure(Cause::new(panicked))
  }

  /// Takes the first element of `sequence`, or fails with [`NoSuchElement`] when there is none.
  #[inline]
  pub fn from_sequence(sequence: impl IntoIterator<Item=T>) -> Self {
    match sequence.into_iter().next() {
      Some(value) => Self::Success(value),
      None => Self::Failure(Cause::new(NoSuchElement)),
    }
  }


  #[inline]
  pub const fn is_success(&self) -> bool { matches!(self, Self::Success(_)) }
  #[inline]
  pub const fn is_failure(&self) -> bool { !self.is_success() }

  /// Returns the value.
  ///
  /// # Panics
  ///
  /// Panics with [`IllegalState::NotSucceeded`] if `self` is a failure.
  #[inline]
  #[track_caller]
  pub fn get(self) -> T {
    match self {
      Self::Success(value) => value,
      Self::Failure(_) => panic!("{}", IllegalState::NotSucceeded),
    }
  }
  #[inline]
  pub fn try_get(self) -> Result<T, IllegalState> {
    match self {
      Self::Success(value) => Ok(value),
      Self::Failure(_) => Err(IllegalState::NotSucceeded),
    }
  }
  /// Returns the cause.
  ///
  /// # Panics
  ///
  /// Panics with [`IllegalState::NotSucceeded`] if `self` is a success.
  #[inline]
  #[track_caller]
  pub fn cause(&self) -> &Cause {
    match self {
      Self::Failure(cause) => cause,
      Self::Success(_) => panic!("{}", IllegalState::NotSucceeded),
    }
  }
  #[inline]
  pub fn try_cause(&self) -> Result<&Cause, IllegalState> {
    match self {
      Self::Failure(cause) => Ok(cause),
      Self::Success(_) => Err(IllegalState::NotSucceeded),
    }
  }
  #[inline]
  pub fn as_ref(&self) -> Attempt<&T> {
    match self {
      Self::Success(value) => Attempt::Success(value),
      Self::Failure(cause) => Attempt::Failure(cause.clone()),
    }
  }

  #[inline]
  pub fn get_or_else(self, default: T) -> T {
    match self {
      Self::Success(value) => value,
      Self::Failure(_) => default,
    }
  }
  #[inline]
  pub fn get_or_else_with(self, default: impl FnOnce(Cause) -> T) -> T {
    match self {
      Self::Success(value) => value,
      Self::Failure(cause) => default(cause),
    }
  }
  #[inline]
  pub fn or_else(self, alternative: Attempt<T>) -> Self {
    match self {
      success @ Self::Success(_) => success,
      Self::Failure(_) => alternative,
    }
  }
  #[inline]
  pub fn or_else_with(self, alternative: impl FnOnce() -> Attempt<T>) -> Self {
    match self {
      success @ Self::Success(_) => success,
      Self::Failure(_) => alternative(),
    }
  }


  #[inline]
  pub fn map<V>(self, f: impl FnOnce(T) -> V) -> Attempt<V> {
    match self {
      Self::Success(value) => Attempt::Success(f(value)),
      Self::Failure(cause) => Attempt::Failure(cause),
    }
  }
  #[inline]
  pub fn flat_map<V>(self, f: impl FnOnce(T) -> Attempt<V>) -> Attempt<V> {
    match self {
      Self::Success(value) => f(value),
      Self::Failure(cause) => Attempt::Failure(cause),
    }
  }
  /// Binds into an [`Optional`]; the cause of a failed `self` is discarded.
  #[inline]
  pub fn flat_map_optional<V>(self, f: impl FnOnce(T) -> Optional<V>) -> Optional<V> {
    match self {
      Self::Success(value) => f(value),
      Self::Failure(cause) => {
        trace!(%cause, "discarding cause while binding into optional");
        Optional::Empty
      }
    }
  }
  /// Keeps a success whose value satisfies `predicate`; a rejected value becomes a [`NoSuchElement`] failure.
  #[inline]
  pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
    match self {
      Self::Success(value) => if predicate(&value) {
        Self::Success(value)
      } else {
        trace!("attempt filter rejected value");
        Self::Failure(Cause::new(NoSuchElement))
      },
      failure @ Self::Failure(_) => failure,
    }
  }
  #[inline]
  pub fn recover(self, f: impl FnOnce(Cause) -> T) -> Self {
    match self {
      success @ Self::Success(_) => success,
      Self::Failure(cause) => Self::Success(f(cause)),
    }
  }
  #[inline]
  pub fn recover_with(self, f: impl FnOnce(Cause) -> Attempt<T>) -> Self {
    match self {
      success @ Self::Success(_) => success,
      Self::Failure(cause) => f(cause),
    }
  }
  /// Dispatches to exactly one of `on_success` or `on_failure`.
  #[inline]
  pub fn transform<V>(
    self,
    on_success: impl FnOnce(T) -> Attempt<V>,
    on_failure: impl FnOnce(Cause) -> Attempt<V>,
  ) -> Attempt<V> {
    match self {
      Self::Success(value) => on_success(value),
      Self::Failure(cause) => on_failure(cause),
    }
  }


  /// Converts into an [`Optional`], discarding the cause of a failure.
  #[inline]
  pub fn to_optional(self) -> Optional<T> {
    match self {
      Self::Success(value) => Optional::Present(value),
      Self::Failure(_) => Optional::Empty,
    }
  }
  #[inline]
  pub fn into_result(self) -> Result<T, Cause> {
    match self {
      Self::Success(value) => Ok(value),
      Self::Failure(cause) => Err(cause),
    }
  }

  /// Iterates over the value of a success. Every call starts a fresh traversal.
  #[inline]
  pub fn iter(&self) -> Iter<'_, T> {
    match self {
      Self::Success(value) => Iter(Some(value)),
      Self::Failure(_) => Iter(None),
    }
  }
  #[inline]
  pub fn iter_mut(&mut self) -> IterMut<'_, T> {
    match self {
      Self::Success(value) => IterMut(Some(value)),
      Self::Failure(_) => IterMut(None),
    }
  }
}

impl<T> Attempt<Attempt<T>> {
  #[inline]
  pub fn flatten(self) -> Attempt<T> { self.flat_map(|inner| inner) }
}

impl<T> Attempt<Optional<T>> {
  /// Collapses into an [`Optional`]; the cause of a failed `self` is discarded.
  #[inline]
  pub fn flatten_optional(self) -> Optional<T> { self.flat_map_optional(|inner| inner) }
  /// Swaps the layers, keeping both the failure cause and the emptiness.
  #[inline]
  pub fn transpose(self) -> Optional<Attempt<T>> {
    match self {
      Self::Success(Optional::Present(value)) => Optional::Present(Attempt::Success(value)),
      Self::Success(Optional::Empty) => Optional::Empty,
      Self::Failure(cause) => Optional::Present(Attempt::Failure(cause)),
    }
  }
}


impl<T, E: Into<Cause>> From<Result<T, E>> for Attempt<T> {
  #[inline]
  fn from(result: Result<T, E>) -> Self {
    match result {
      Ok(value) => Self::Success(value),
      Err(error) => Self::Failure(error.into()),
    }
  }
}
impl<T> From<Attempt<T>> for Result<T, Cause> {
  #[inline]
  fn from(attempt: Attempt<T>) -> Self { attempt.into_result() }
}

impl<T> FromIterator<T> for Attempt<T> {
  #[inline]
  fn from_iter<I: IntoIterator<Item=T>>(iter: I) -> Self { Self::from_sequence(iter) }
}


// Causes are compared by identity: a failure only equals a failure carrying the same error object.
impl<T: PartialEq<U>, U> PartialEq<Attempt<U>> for Attempt<T> {
  #[inline]
  fn eq(&self, other: &Attempt<U>) -> bool {
    match (self, other) {
      (Self::Success(value), Attempt::Success(other)) => value == other,
      (Self::Failure(cause), Attempt::Failure(other)) => cause.ptr_eq(other),
      _ => false,
    }
  }
}
impl<T: Eq> Eq for Attempt<T> {}


impl<T> IntoIterator for Attempt<T> {
  type Item = T;
  type IntoIter = IntoIter<T>;
  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    match self {
      Self::Success(value) => IntoIter(Some(value)),
      Self::Failure(_) => IntoIter(None),
    }
  }
}
impl<'a, T> IntoIterator for &'a Attempt<T> {
  type Item = &'a T;
  type IntoIter = Iter<'a, T>;
  #[inline]
  fn into_iter(self) -> Self::IntoIter { self.iter() }
}
impl<'a, T> IntoIterator for &'a mut Attempt<T> {
  type Item = &'a mut T;
  type IntoIter = IterMut<'a, T>;
  #[inline]
  fn into_iter(self) -> Self::IntoIter { self.iter_mut() }
}


#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use thiserror::Error;

  use super::*;

  #[derive(Debug, Error)]
  #[error("{0}")]
  struct TestError(&'static str);

  #[test]
  fn evaluate_wraps_value() {
    let attempt = Attempt::evaluate(|| Ok::<_, TestError>("foo"));
    assert!(attempt.is_success());
    assert!(!attempt.is_failure());
    assert_eq!(attempt.get(), "foo");
    assert_eq!(Attempt::evaluate_value(|| 42).get(), 42);
  }

  #[test]
  fn evaluate_captures_returned_error() {
    let attempt = Attempt::<String>::evaluate(|| Err(TestError("fail")));
    assert!(attempt.is_failure());
    assert_eq!(attempt.cause().to_string(), "fail");
    assert!(attempt.cause().is::<TestError>());
  }

  #[test]
  fn evaluate_captures_panic() {
    let attempt = Attempt::<i32>::evaluate_value(|| panic!("exploded"));
    let panicked = attempt.cause().downcast_ref::<Panicked>().unwrap();
    assert_eq!(panicked.message.as_deref(), Some("exploded"));
  }

  #[test]
  #[should_panic(expected = "attempt did not succeed")]
  fn get_on_failure_panics() {
    Attempt::<i32>::failure(TestError("fail")).get();
  }

  #[test]
  #[should_panic(expected = "attempt did not succeed")]
  fn cause_on_success_panics() {
    Attempt::success(1).cause();
  }

  #[test]
  fn non_panicking_accessors_report_illegal_state() {
    assert_eq!(Attempt::<i32>::failure(Cause::msg("x")).try_get(), Err(IllegalState::NotSucceeded));
    assert_eq!(Attempt::success(1).try_cause().unwrap_err(), IllegalState::NotSucceeded);
  }

  #[test]
  fn defaults_and_alternatives() {
    assert_eq!(Attempt::success("foo").get_or_else("bar"), "foo");
    assert_eq!(Attempt::failure(Cause::msg("x")).get_or_else("bar"), "bar");

    let alternative = Attempt::success("bar".to_string());
    let result = Attempt::<String>::failure(Cause::msg("x")).or_else(alternative.clone());
    assert_eq!(result, alternative);
    let cause = Cause::msg("kept");
    let failure = Attempt::<i32>::failure(cause.clone()).or_else(Attempt::failure(Cause::msg("other")));
    assert!(!failure.cause().ptr_eq(&cause));
    assert_eq!(Attempt::success(1).or_else_with(|| unreachable!()).get(), 1);
  }

  #[test]
  fn map_propagates_same_cause() {
    let cause = Cause::msg("x");
    let mapped = Attempt::<i32>::failure(cause.clone()).map(|v| v.to_string());
    assert!(mapped.cause().ptr_eq(&cause));
    assert_eq!(Attempt::success(21).map(|v| v * 2).get(), 42);
  }

  #[test]
  fn filter_rejects_with_no_such_element() {
    let rejected = Attempt::success(42).filter(|v| *v < 10);
    assert!(rejected.cause().is_no_such_element());
    assert_eq!(Attempt::success(42).filter(|v| *v > 10).get(), 42);

    let calls = Cell::new(0);
    let failure = Attempt::<i32>::failure(TestError("test")).filter(|_| {
      calls.set(calls.get() + 1);
      true
    });
    assert!(failure.cause().is::<TestError>());
    assert_eq!(calls.get(), 0);
  }

  #[test]
  fn recover_only_runs_on_failure() {
    let seen = Cell::new(false);
    let recovered = Attempt::success("foo").recover(|_| {
      seen.set(true);
      "bar"
    });
    assert_eq!(recovered.get(), "foo");
    assert!(!seen.get());

    let cause = Cause::msg("x");
    let mut received = None;
    let recovered = Attempt::failure(cause.clone()).recover(|c| {
      received = Some(c);
      "bar"
    });
    assert_eq!(recovered.get(), "bar");
    assert!(received.unwrap().ptr_eq(&cause));
  }

  #[test]
  fn recover_with_only_runs_on_failure() {
    let seen = Cell::new(false);
    let recovered = Attempt::success("foo").recover_with(|_| {
      seen.set(true);
      Attempt::success("bar")
    });
    assert_eq!(recovered.get(), "foo");
    assert!(!seen.get());

    let cause = Cause::msg("x");
    let mut received = None;
    let recovered = Attempt::failure(cause.clone()).recover_with(|c| {
      received = Some(c);
      Attempt::success("bar")
    });
    assert_eq!(recovered.get(), "bar");
    assert!(received.unwrap().ptr_eq(&cause));
  }

  #[test]
  fn transform_dispatches_to_one_branch() {
    let success_called = Cell::new(false);
    let failure_called = Cell::new(false);
    let transformed = Attempt::success(42).transform(
      |v| {
        success_called.set(true);
        Attempt::success(v.to_string())
      },
      |c| {
        failure_called.set(true);
        Attempt::success(c.to_string())
      },
    );
    assert_eq!(transformed.get(), "42");
    assert!(success_called.get());
    assert!(!failure_called.get());

    let transformed = Attempt::<i32>::failure(Cause::msg("fail"))
      .transform(|v| Attempt::success(v.to_string()), |c| Attempt::success(c.to_string()));
    assert_eq!(transformed.get(), "fail");
  }

  #[test]
  fn to_optional_discards_cause() {
    assert_eq!(Attempt::success("foo").to_optional(), Optional::some("foo"));
    assert!(Attempt::<String>::failure(Cause::msg("x")).to_optional().is_empty());
  }

  #[test]
  fn sequence_view_has_one_item_on_success() {
    let success = Attempt::success(42);
    assert_eq!(success.iter().collect::<Vec<_>>(), vec![&42]);
    assert_eq!(success.iter().count(), 1);
    assert_eq!(Attempt::<i32>::failure(Cause::msg("x")).into_iter().count(), 0);
  }

  #[test]
  fn from_sequence_keeps_first() {
    assert_eq!(Attempt::from_sequence([42, 99]).get(), 42);
    assert!(Attempt::from_sequence(Vec::<i32>::new()).cause().is_no_such_element());
  }

  #[test]
  fn result_round_trip_keeps_cause() {
    let result: Result<i32, Cause> = Attempt::<i32>::from(Err::<i32, _>(TestError("x"))).into();
    assert!(result.unwrap_err().is::<TestError>());
  }
}
