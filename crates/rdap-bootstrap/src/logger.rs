//! Injectable advisory logging.

use std::fmt;

/// Sink for advisory log messages.
///
/// Components that accept a logger default to [`NoopLogger`].
pub trait Logger: Send + Sync + fmt::Debug {
    /// Logs a formatted message.
    fn log(&self, args: fmt::Arguments<'_>);
}

/// Logger that discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _args: fmt::Arguments<'_>) {}
}

/// Logger that forwards messages to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(target: "rdap_bootstrap", "{args}");
    }
}

/// Logger backed by a closure.
///
/// # Examples
///
/// ```
/// use rdap_bootstrap::{Logger, LoggerFn};
///
/// let logger = LoggerFn(|args: std::fmt::Arguments<'_>| eprintln!("{args}"));
/// logger.log(format_args!("loaded {} entries", 3));
/// ```
#[derive(Clone, Copy)]
pub struct LoggerFn<F>(pub F);

impl<F> fmt::Debug for LoggerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerFn").finish_non_exhaustive()
    }
}

impl<F> Logger for LoggerFn<F>
where
    F: Fn(fmt::Arguments<'_>) + Send + Sync,
{
    fn log(&self, args: fmt::Arguments<'_>) {
        (self.0)(args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_logger_fn_receives_messages() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let logger = LoggerFn(move |args: fmt::Arguments<'_>| {
            sink.lock().unwrap().push(args.to_string());
        });

        logger.log(format_args!("saved {}", "dns.json"));

        assert_eq!(*lines.lock().unwrap(), vec!["saved dns.json".to_string()]);
    }

    #[test]
    fn test_noop_and_tracing_loggers_accept_messages() {
        let loggers: [&dyn Logger; 2] = [&NoopLogger, &TracingLogger];
        for logger in loggers {
            logger.log(format_args!("nothing to see"));
        }
    }
}
