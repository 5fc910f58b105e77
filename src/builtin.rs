//! Service types shipped with the `servicehost` binary.
//!
//! - `text`: `Echo`, `ToUpper`, `ToLower`, `Length`, with `Open`/`Close`
//!   hooks for routes that want a setup and teardown
//! - `calculator`: `Add`, `Divide`, `IsEven`

use std::time::Instant;

use crate::error::ConfigurationError;
use crate::service::{ServiceCatalog, ServiceType};

/// Value substituted for `$data` by `Echo`.
const ECHO_DATA: &str = "42";

/// String helpers. One instance per request.
#[derive(Debug, Default)]
pub struct Text {
    opened: Option<Instant>,
}

impl Text {
    fn open(&mut self) {
        self.opened = Some(Instant::now());
    }

    fn close(&mut self) -> Result<(), String> {
        let opened = self.opened.take().ok_or("Close called without Open")?;
        tracing::debug!(elapsed_us = opened.elapsed().as_micros() as u64, "Text session closed");
        Ok(())
    }

    fn echo(&mut self, ping: String) -> String {
        ping.replace("$data", ECHO_DATA)
    }

    fn to_upper(&mut self, text: String) -> String {
        text.to_uppercase()
    }

    fn to_lower(&mut self, text: String) -> String {
        text.to_lowercase()
    }

    fn length(&mut self, text: String) -> i64 {
        text.chars().count() as i64
    }
}

/// Arithmetic on integers.
#[derive(Debug, Default)]
pub struct Calculator;

impl Calculator {
    fn add(&mut self, a: i64, b: i64) -> Result<i64, String> {
        a.checked_add(b).ok_or_else(|| format!("{a} + {b} overflows"))
    }

    fn divide(&mut self, a: f64, b: f64) -> Result<f64, &'static str> {
        if b == 0.0 {
            return Err("division by zero");
        }
        Ok(a / b)
    }

    fn is_even(&mut self, n: i64) -> bool {
        n % 2 == 0
    }
}

pub fn text() -> ServiceType<Text> {
    ServiceType::new("text", Text::default)
        .method("Open", Text::open)
        .method("Close", Text::close)
        .method("Echo", Text::echo)
        .method("ToUpper", Text::to_upper)
        .method("ToLower", Text::to_lower)
        .method("Length", Text::length)
}

pub fn calculator() -> ServiceType<Calculator> {
    ServiceType::new("calculator", Calculator::default)
        .method("Add", Calculator::add)
        .method("Divide", Calculator::divide)
        .method("IsEven", Calculator::is_even)
}

/// Catalog with every built-in service type.
pub fn catalog() -> Result<ServiceCatalog, ConfigurationError> {
    ServiceCatalog::new().with(text())?.with(calculator())
}
