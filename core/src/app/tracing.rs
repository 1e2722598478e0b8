use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Env var holding the console filter directives.
pub const CONSOLE_LOG: &str = "CONSOLE_LOG";
/// Env var holding the log file filter directives.
pub const FILE_LOG: &str = "FILE_LOG";
/// Env var holding the path of the log file.
pub const LOG_FILE: &str = "LOG_FILE";

#[derive(Default)]
pub struct AppTracingBuilder {
  console_filter: Option<EnvFilter>,
  log_file_path: Option<PathBuf>,
  file_filter: Option<EnvFilter>,
}
impl AppTracingBuilder {
  /// Creates a builder that logs to a file if the [`LOG_FILE`] env var is set.
  pub fn from_env() -> Self {
    Self::default().with_log_file_path_opt(std::env::var_os(LOG_FILE).map(PathBuf::from))
  }

  pub fn with_console_filter(mut self, console_filter: EnvFilter) -> Self {
    self.console_filter = Some(console_filter);
    self
  }

  pub fn with_log_file_path(mut self, log_file_path: impl Into<PathBuf>) -> Self {
    self.log_file_path = Some(log_file_path.into());
    self
  }
  pub fn with_log_file_path_opt(mut self, log_file_path: Option<impl Into<PathBuf>>) -> Self {
    self.log_file_path = log_file_path.map(Into::into);
    self
  }
  pub fn with_file_filter(mut self, file_filter: EnvFilter) -> Self {
    self.file_filter = Some(file_filter);
    self
  }

  /// Installs the global subscriber. Keep the returned [`AppTracing`] alive until the application exits, so that
  /// buffered file output is flushed.
  pub fn build(self) -> AppTracing {
    let console_filter = self.console_filter.unwrap_or_else(|| filter_from_env(CONSOLE_LOG));
    let file_filter = self.file_filter;
    let file = self.log_file_path.map(|path| (path, file_filter.unwrap_or_else(|| filter_from_env(FILE_LOG))));
    AppTracing::new(console_filter, file)
  }
}

fn filter_from_env(env_var: &str) -> EnvFilter {
  EnvFilter::try_from_env(env_var).unwrap_or_default()
}


pub struct AppTracing {
  _file_tracing: FileTracing,
}
#[cfg(feature = "app_tracing_file")]
#[derive(Default)]
struct FileTracing(Option<tracing_appender::non_blocking::WorkerGuard>);
#[cfg(not(feature = "app_tracing_file"))]
#[derive(Default)]
struct FileTracing;

impl AppTracing {
  fn new(console_filter: EnvFilter, file: Option<(PathBuf, EnvFilter)>) -> Self {
    let layered = tracing_subscriber::registry()
      .with(
        tracing_subscriber::fmt::layer()
          .with_writer(std::io::stderr)
          .with_filter(console_filter)
      );

    #[cfg(feature = "app_tracing_file")] {
      use std::fs::{create_dir_all, File};
      use std::io::BufWriter;

      let Some((file_path, file_filter)) = file else {
        layered.init();
        return Self { _file_tracing: FileTracing::default() };
      };
      let result = (|| {
        if let Some(parent) = file_path.parent() {
          create_dir_all(parent)?;
        }
        File::create(&file_path)
      })();
      match result {
        Err(e) => {
          layered.init();
          tracing::warn!(path = %file_path.display(), %e, "cannot log to file; could not create log file");
          Self { _file_tracing: FileTracing::default() }
        }
        Ok(log_file) => {
          let (non_blocking, guard) = tracing_appender::non_blocking(BufWriter::new(log_file));
          layered
            .with(
              tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter)
            )
            .init();
          Self { _file_tracing: FileTracing(Some(guard)) }
        }
      }
    }
    #[cfg(not(feature = "app_tracing_file"))] {
      layered.init();
      if let Some((file_path, _)) = file {
        tracing::warn!(path = %file_path.display(), "cannot log to file; built without the `app_tracing_file` feature");
      }
      Self { _file_tracing: FileTracing }
    }
  }
}
