//! Console window handling for `--no-window`.

/// Detach the process from its console window.
///
/// Only Windows has a window to hide. Elsewhere this logs and returns.
#[cfg(windows)]
pub fn hide_console_window() {
    #[link(name = "kernel32")]
    extern "system" {
        fn FreeConsole() -> i32;
    }

    // SAFETY: FreeConsole takes no arguments and only detaches the calling
    // process from its console.
    let detached = unsafe { FreeConsole() } != 0;
    if !detached {
        tracing::warn!("Failed to detach from console window");
    }
}

#[cfg(not(windows))]
pub fn hide_console_window() {
    tracing::info!("No console window to hide on this platform");
}
