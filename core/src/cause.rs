use std::any::Any;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

use thiserror::Error;

/// No element satisfied the request: a filter predicate rejected the value, or a sequence was empty.
#[derive(Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Error)]
#[error("No such element")]
pub struct NoSuchElement;

/// A panic that was captured at an [evaluate](crate::attempt::Attempt::evaluate) boundary.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Error)]
#[error("Evaluation panicked: {}", .message.as_deref().unwrap_or("panic payload is not a string"))]
pub struct Panicked {
  pub message: Option<String>,
}
impl Panicked {
  pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
    let message = match payload.downcast::<String>() {
      Ok(message) => Some(*message),
      Err(payload) => payload.downcast_ref::<&'static str>().map(|message| message.to_string()),
    };
    Self { message }
  }
}

/// Plain-text cause, created with [`Cause::msg`].
#[derive(Clone, Eq, PartialEq, Hash, Debug, Error)]
#[error("{0}")]
pub struct Message(pub String);

/// Caller bug: a value was requested from an empty container, or an attempt was accessed in the state it is not in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Error)]
pub enum IllegalState {
  #[error("optional is empty")]
  Empty,
  /// Both the value of a failure and the cause of a success report this state.
  #[error("attempt did not succeed")]
  NotSucceeded,
}


/// Opaque cause of a failed [`Attempt`](crate::attempt::Attempt).
///
/// Wraps any error behind an [`Arc`]: cloning is cheap and keeps pointing at the same error object, which
/// [`ptr_eq`](Self::ptr_eq) can observe. Kinds are told apart by type with [`is`](Self::is) and
/// [`downcast_ref`](Self::downcast_ref).
#[derive(Clone)]
pub struct Cause(Arc<dyn Error + Send + Sync + 'static>);

impl Cause {
  #[inline]
  pub fn new<E: Error + Send + Sync + 'static>(error: E) -> Self { Self(Arc::new(error)) }
  #[inline]
  pub fn msg(message: impl Into<String>) -> Self { Self::new(Message(message.into())) }
  #[inline]
  pub fn from_boxed(error: Box<dyn Error + Send + Sync + 'static>) -> Self { Self(Arc::from(error)) }
  #[inline]
  pub fn no_such_element() -> Self { Self::new(NoSuchElement) }

  #[inline]
  pub fn is<E: Error + 'static>(&self) -> bool { self.0.is::<E>() }
  #[inline]
  pub fn is_no_such_element(&self) -> bool { self.is::<NoSuchElement>() }
  #[inline]
  pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> { self.0.downcast_ref::<E>() }

  #[inline]
  pub fn as_error(&self) -> &(dyn Error + Send + Sync + 'static) { self.0.as_ref() }

  /// Returns `true` if both causes refer to the same error object.
  #[inline]
  pub fn ptr_eq(&self, other: &Cause) -> bool {
    // Compare data pointers only; vtable pointers of the same type may differ across codegen units.
    std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
  }
}

impl<E: Error + Send + Sync + 'static> From<E> for Cause {
  #[inline]
  fn from(error: E) -> Self { Self::new(error) }
}

impl AsRef<dyn Error + Send + Sync + 'static> for Cause {
  #[inline]
  fn as_ref(&self) -> &(dyn Error + Send + Sync + 'static) { self.as_error() }
}

impl Display for Cause {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    Display::fmt(&self.0, f)
  }
}
impl Debug for Cause {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Cause").field(&self.0).finish()
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Error)]
  #[error("boom")]
  struct Boom;

  #[test]
  fn kinds_are_distinguished_by_type() {
    let cause = Cause::from(Boom);
    assert!(cause.is::<Boom>());
    assert!(!cause.is_no_such_element());
    assert!(Cause::no_such_element().is_no_such_element());
    assert_eq!(Cause::msg("no such element").downcast_ref::<Message>(), Some(&Message("no such element".to_string())));
    assert!(!Cause::msg("No such element").is_no_such_element());
  }

  #[test]
  fn clones_share_identity() {
    let cause = Cause::new(Boom);
    let clone = cause.clone();
    assert!(cause.ptr_eq(&clone));
    assert!(!cause.ptr_eq(&Cause::new(Boom)));
  }

  #[test]
  fn display_forwards_to_error() {
    assert_eq!(Cause::new(Boom).to_string(), "boom");
    assert_eq!(Cause::msg("fail").to_string(), "fail");
    assert_eq!(IllegalState::Empty.to_string(), "optional is empty");
    assert_eq!(IllegalState::NotSucceeded.to_string(), "attempt did not succeed");
  }

  #[test]
  fn panic_payloads_keep_string_messages() {
    assert_eq!(Panicked::from_payload(Box::new("static")).message.as_deref(), Some("static"));
    assert_eq!(Panicked::from_payload(Box::new(String::from("owned"))).message.as_deref(), Some("owned"));
    assert_eq!(Panicked::from_payload(Box::new(42)).message, None);
  }
}
