use std::panic::PanicHookInfo;

/// Replaces the default panic hook with one logging through `tracing`, so
/// panics end up in the configured log format.
pub fn install() {
    std::panic::set_hook(Box::new(log_panic));
}

fn log_panic(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let thread = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::capture();
    tracing::error!(thread, "{panic}\nstack backtrace:\n{backtrace}");
}
