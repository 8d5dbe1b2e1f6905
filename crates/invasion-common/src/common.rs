// common.rs — misc functions used across the engine and cgame

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

pub const ERR_FATAL: i32 = 0; // exit the entire game with a popup window
pub const ERR_DROP: i32 = 1; // print to console and disconnect from game
pub const ERR_QUIT: i32 = 2; // clean exit

/// Print sink installed by the embedding client (console, log file).
pub type PrintSink = Box<dyn Fn(&str) + Send + Sync>;

static PRINT_SINK: OnceLock<Mutex<Option<PrintSink>>> = OnceLock::new();
static RD_BUFFER: OnceLock<Mutex<Option<String>>> = OnceLock::new();
static DEVELOPER: AtomicBool = AtomicBool::new(false);

fn print_sink() -> &'static Mutex<Option<PrintSink>> {
    PRINT_SINK.get_or_init(|| Mutex::new(None))
}

fn rd_buffer() -> &'static Mutex<Option<String>> {
    RD_BUFFER.get_or_init(|| Mutex::new(None))
}

/// Route com_printf output somewhere other than stdout.
pub fn com_set_print_sink(sink: PrintSink) {
    *print_sink().lock() = Some(sink);
}

/// Enable or disable developer prints.
pub fn com_set_developer(on: bool) {
    DEVELOPER.store(on, Ordering::Relaxed);
}

// ============================================================
// Redirect buffer for Com_Printf
// ============================================================

/// Begin redirecting printf output into a buffer.
pub fn com_begin_redirect() {
    *rd_buffer().lock() = Some(String::new());
}

/// End redirect and return the captured output.
pub fn com_end_redirect() -> Option<String> {
    rd_buffer().lock().take()
}

// ============================================================
// Com_Printf / Com_DPrintf / Com_Error
// ============================================================

/// General-purpose print function. Appends to the redirect buffer if one
/// is active, otherwise goes through the installed sink or stdout.
pub fn com_printf(msg: &str) {
    {
        let mut buf = rd_buffer().lock();
        if let Some(ref mut s) = *buf {
            s.push_str(msg);
            return;
        }
    }
    let sink = print_sink().lock();
    if let Some(ref f) = *sink {
        f(msg);
    } else {
        print!("{}", msg);
    }
}

/// Developer-only print.
pub fn com_dprintf(msg: &str) {
    if !DEVELOPER.load(Ordering::Relaxed) {
        return;
    }
    com_printf(msg);
}

/// Engine error handler.
/// - `ERR_FATAL`: prints to stderr and panics.
/// - `ERR_DROP`: prints the error (non-fatal, the frame continues degraded).
/// - `ERR_QUIT`: clean exit.
pub fn com_error(code: i32, msg: &str) {
    if code == ERR_FATAL {
        eprintln!("Error: {}", msg);
        panic!("Fatal error: {}", msg);
    } else if code == ERR_DROP {
        com_printf(&format!(
            "********************\nERROR: {}\n********************\n",
            msg
        ));
    } else {
        println!("{}", msg);
        std::process::exit(0);
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    // The redirect buffer is process-wide, so the capture tests share one
    // test body to avoid interleaving with parallel test threads.
    #[test]
    fn test_redirect_captures_prints() {
        com_begin_redirect();
        com_printf("hello ");
        com_printf("world\n");
        com_error(ERR_DROP, "dropped");
        let out = com_end_redirect().unwrap();
        assert!(out.starts_with("hello world\n"));
        assert!(out.contains("ERROR: dropped"));

        // dprintf is gated on developer mode
        com_set_developer(false);
        com_begin_redirect();
        com_dprintf("quiet\n");
        assert_eq!(com_end_redirect().unwrap(), "");

        com_set_developer(true);
        com_begin_redirect();
        com_dprintf("loud\n");
        assert_eq!(com_end_redirect().unwrap(), "loud\n");
        com_set_developer(false);
    }
}
