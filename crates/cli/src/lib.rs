//! Operations behind the `n8n-inspect`, `n8n-import` and `n8n-probe` tools.
//!
//! Each module is a linear sequence of API or webhook calls that prints its
//! progress for a human operator. Failures are printed and the sequence moves
//! on; only the importer's file loading can stop a run.

pub mod importer;
pub mod inspector;
pub mod prober;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Diagnostics for the operator go to stdout; tracing events go to stderr and
/// default to `warn` so they stay out of the way unless `RUST_LOG` asks.
pub fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Print a title followed by a rule of `width` equals signs.
pub fn print_banner(title: &str, width: usize) {
    println!("{}", title);
    println!("{}", "=".repeat(width));
}
