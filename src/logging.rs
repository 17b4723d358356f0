//! Diagnostics through `tracing`.
//!
//! In the browser each formatted line goes to `console.log`; native builds (tests,
//! tooling) write to stderr. Timestamps are off because `wasm32-unknown-unknown`
//! has no system clock.

use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(ConsoleWriter)
                .with_ansi(false)
                .without_time()
                .compact(),
        )
        .try_init();
}

/// `MakeWriter` handing out one line buffer per event.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine::default()
    }
}

#[derive(Debug, Default)]
pub struct ConsoleLine {
    buf: Vec<u8>,
}

impl Write for ConsoleLine {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&self.buf);
        emit(text.trim_end());
        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(line: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line));
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(line: &str) {
    let _ = writeln!(io::stderr(), "{line}");
}
