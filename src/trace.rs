//! Tracing untuk debugging spsc-ring.
//!
//! Aktifkan dengan `--features tracing`. Tanpa feature tersebut semua macro
//! menjadi no-op, jadi hot path tidak membayar apa-apa.

/// Install tracing subscriber dengan timestamp dan thread name.
///
/// Panggil di awal test atau binary benchmark. Tidak melakukan apa-apa
/// jika feature `tracing` tidak aktif.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spsc_ring=debug"));

    // try_init: test yang berbeda boleh memanggil ini berulang kali
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}

/// Install tracing subscriber dengan timestamp dan thread name.
///
/// Feature `tracing` tidak aktif: no-op.
#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
macro_rules! debug_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use debug_noop as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use warn_noop as warn;
