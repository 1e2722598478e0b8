use std::error::Error;

use tracing::{debug, info, instrument};

use scando_core::app::env;
use scando_core::app::tracing::AppTracingBuilder;
use scando_core::prelude::*;

/// Env var holding the largest value that is accepted.
const LIMIT: &str = "SCANDO_LIMIT";

#[derive(Debug, thiserror::Error)]
#[error("{0} is negative")]
struct Negative(i64);

#[derive(Debug, thiserror::Error)]
#[error("{value} exceeds the limit of {limit}")]
struct LimitExceeded {
  value: i64,
  limit: i64,
}

#[derive(Debug, thiserror::Error)]
#[error("doubling {0} overflows")]
struct Overflow(i64);

#[derive(Debug)]
struct Config {
  limit: Optional<i64>,
}
impl Config {
  fn from_env() -> Self {
    let limit = Optional::from(env::var_opt(LIMIT))
      .flat_map(|limit| Attempt::evaluate(|| limit.trim().parse::<i64>()).to_optional());
    Self { limit }
  }
}

fn main() -> Result<(), Box<dyn Error>> {
  env::load_dotenv_into_env();
  let _tracing = AppTracingBuilder::from_env().build();

  let config = Config::from_env();
  debug!(?config, "loaded configuration");

  let attempts: Vec<Attempt<i64>> = std::env::args().skip(1).map(|arg| parse(&arg, &config)).collect();
  for attempt in &attempts {
    match attempt {
      Attempt::Success(value) => println!("ok: {value}"),
      Attempt::Failure(cause) => println!("failed: {cause}"),
    }
  }

  let summary = first_even(&attempts)
    .map(|value| value.to_string())
    .get_or_else("none".to_string());
  println!("first even: {summary}");
  info!(count = attempts.len(), "processed arguments");

  Ok(())
}

/// Parses `arg`, keeps it only if non-negative and within the configured limit, and doubles it.
#[instrument(skip(config))]
fn parse(arg: &str, config: &Config) -> Attempt<i64> {
  let limit = config.limit;
  comprehend! {
    from value in Attempt::evaluate(|| arg.trim().parse::<i64>());
    from value in check_sign(value);
    from value in check_limit(value, limit);
    from doubled in double(value);
    select doubled
  }
}

fn first_even(attempts: &[Attempt<i64>]) -> Optional<i64> {
  attempts.iter()
    .flat_map(|attempt| attempt.iter())
    .copied()
    .filter(|value| value % 2 == 0)
    .to_optional()
}

fn check_sign(value: i64) -> Attempt<i64> {
  if value < 0 {
    Attempt::failure(Negative(value))
  } else {
    Attempt::success(value)
  }
}

fn check_limit(value: i64, limit: Optional<i64>) -> Attempt<i64> {
  match limit {
    Optional::Present(limit) if value > limit => Attempt::failure(LimitExceeded { value, limit }),
    _ => Attempt::success(value),
  }
}

fn double(value: i64) -> Attempt<i64> {
  Attempt::from(value.checked_mul(2).ok_or(Overflow(value)))
}


#[cfg(test)]
mod tests {
  use std::num::ParseIntError;

  use super::*;

  fn unlimited() -> Config { Config { limit: Optional::empty() } }

  #[test]
  fn doubles_valid_values() {
    assert_eq!(parse("21", &unlimited()).get(), 42);
    assert_eq!(parse(" 0 ", &unlimited()).get(), 0);
    assert_eq!(parse("4611686018427387903", &unlimited()).get(), 9223372036854775806);
  }

  #[test]
  fn overflowing_double_fails() {
    let attempt = parse("9223372036854775807", &unlimited());
    assert!(attempt.cause().is::<Overflow>());
    assert_eq!(attempt.cause().to_string(), "doubling 9223372036854775807 overflows");
  }

  #[test]
  fn negative_values_fail() {
    let attempt = parse("-3", &unlimited());
    assert!(attempt.cause().is::<Negative>());
    assert!(!attempt.cause().is_no_such_element());
  }

  #[test]
  fn invalid_numbers_keep_parse_error() {
    assert!(parse("abc", &unlimited()).cause().is::<ParseIntError>());
  }

  #[test]
  fn limit_is_inclusive() {
    let config = Config { limit: Optional::some(10) };
    assert_eq!(parse("10", &config).get(), 20);
    let attempt = parse("11", &config);
    assert!(attempt.cause().is::<LimitExceeded>());
    assert_eq!(attempt.cause().to_string(), "11 exceeds the limit of 10");
  }

  #[test]
  fn first_even_skips_failures() {
    let attempts = [Attempt::failure(Negative(-1)), Attempt::success(3), Attempt::success(8), Attempt::success(4)];
    assert_eq!(first_even(&attempts), Optional::some(8));
    assert_eq!(first_even(&[]), Absent);
  }
}
