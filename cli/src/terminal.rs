//! Terminal stand-ins for the browser's navigation and timers.

use std::future::Future;
use std::time::Duration;

use authgate::host::{Navigator, Sleeper};

/// Prints where a browser would have gone.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        println!("navigate: {path}");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}
