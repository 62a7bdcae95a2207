use std::fmt;

/// A request-scoped logging interface.
///
/// `RequestLog` is obtained from `SecurityContext::log()` and borrows the
/// request ID, so every line it emits carries `request_id` as a structured
/// field. It is lifetime-bound to the context it came from.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    request_id: &'a str,
}

impl<'a> RequestLog<'a> {
    /// Creates a new RequestLog for a request ID.
    pub(crate) fn new(request_id: &'a str) -> Self {
        Self { request_id }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs an info-level message with request ID.
    ///
    /// Use with `format_args!` for efficient formatting:
    /// ```no_run
    /// # use request_gate::SecurityContext;
    /// # let ctx = SecurityContext::new("req-1");
    /// ctx.log().info(format_args!("short-circuit status={}", 403));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a warning-level message with request ID.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a debug-level message with request ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, "{}", args);
    }
}
