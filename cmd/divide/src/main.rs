//! Division demo
//!
//! Shows the full result flow: creating successes and errors, bubbling a
//! failure up through a caller with a different success type, and the
//! fatal unwrap at the program boundary.
//!
//! # Environment Variables
//!
//! - `GRES_FLUSH_EPRINT=1` - Flush debug output immediately
//! - `GRES_LOG_LEVEL=debug` - Set log level (off, error, warn, info, debug, trace)

use gresult::{err, grdebug, grinfo, ok, site, unwrap_or_exit, unwrap_or_return, Res, Store};

// GRES_LOG_LEVEL=debug cargo run -p gresult-divide
fn divide(store: &Store, dividend: i32, divisor: i32) -> Res<f32> {
    // Save the error message in the result object and return it in the
    // event of failure. File, function and line are saved along with it.
    if divisor == 0 {
        return err!(store, f32, "Divisor mustn't be 0.");
    }
    ok!(store, dividend as f32 / divisor as f32)
}

fn call_divide(store: &Store, dividend: i32, divisor: i32) -> Res<()> {
    // Unwrap the result value, or return from the current function with
    // the caller's own result type and the original error information.
    let quotient: f32 = unwrap_or_return!(store, divide(store, dividend, divisor), ());
    grdebug!("call_divide: {} / {} = {}", dividend, divisor, quotient);
    ok!(store, ())
}

fn main() {
    println!("=== gresult Division Example ===\n");

    let store = Store::new();

    // Check that the call ran, or exit after printing the diagnostic.
    unwrap_or_exit!(&store, call_divide(&store, 10, 5));

    // Or unwrap the value directly at the boundary.
    let quotient: f32 = unwrap_or_exit!(&store, divide(&store, 10, 5));
    println!("10 / 5 = {}", quotient);

    // Failing path: the emitted diagnostic keeps the site inside divide(),
    // even though the failure was forwarded through call_divide().
    let failed = call_divide(&store, 1, 0);
    if failed.get(&store, site!()).is_err() {
        println!("\n1 / 0 failed, original diagnostic:");
        let _ = failed.describe(&store, site!());
        let _ = failed.delete(&store, site!());
    }

    grinfo!("{} result(s) still live in the store", store.live_count());
    println!("\n=== Example Complete ===");
}
