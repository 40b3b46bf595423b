//! Construction and propagation macros
//!
//! Thin sugar over the `Res` methods that captures the call site
//! automatically. Termination and forwarding stay explicit, named methods
//! on `Res` - the macros only save the `site!()` boilerplate.

/// Create a success result, capturing the call site
///
/// ```ignore
/// let res = ok!(store, 42u32);
/// ```
#[macro_export]
macro_rules! ok {
    ($store:expr, $value:expr) => {
        $crate::Res::ok($store, $value, $crate::site!())
    };
}

/// Create an error result of the given success type, capturing the call site
///
/// ```ignore
/// return err!(store, f32, "Divisor mustn't be 0.");
/// ```
#[macro_export]
macro_rules! err {
    ($store:expr, $t:ty, $msg:expr) => {
        $crate::Res::<$t>::err($store, $msg, $crate::site!())
    };
}

/// Unwrap a result or return from the caller with a forwarded failure
///
/// Evaluates to the success value. On failure, forwards the diagnostic into
/// the caller's declared result type `$ret`, deletes the source handle and
/// returns the forwarded handle from the enclosing function.
///
/// ```ignore
/// fn call_divide(store: &Store, a: i32, b: i32) -> Res<()> {
///     let quotient: f32 = unwrap_or_return!(store, divide(store, a, b), ());
///     ok!(store, ())
/// }
/// ```
#[macro_export]
macro_rules! unwrap_or_return {
    ($store:expr, $res:expr, $ret:ty) => {{
        let __res = $res;
        match __res.get_or_forward::<$ret>($store, $crate::site!()) {
            Ok(__value) => __value,
            Err(__forwarded) => return __forwarded,
        }
    }};
}

/// Unwrap a result or describe the failure and exit the process
///
/// Unconditionally fatal on failure; intended only at a program's
/// outermost boundary.
///
/// ```ignore
/// let quotient: f32 = unwrap_or_exit!(&store, divide(&store, 10, 5));
/// ```
#[macro_export]
macro_rules! unwrap_or_exit {
    ($store:expr, $res:expr) => {
        $res.get_or_exit($store, $crate::site!())
    };
}

#[cfg(test)]
mod tests {
    use crate::{Fault, Res, Store};

    fn divide(store: &Store, dividend: i32, divisor: i32) -> Res<f32> {
        if divisor == 0 {
            return err!(store, f32, "Divisor mustn't be 0.");
        }
        ok!(store, dividend as f32 / divisor as f32)
    }

    fn call_divide(store: &Store, dividend: i32, divisor: i32) -> Res<()> {
        let quotient: f32 = unwrap_or_return!(store, divide(store, dividend, divisor), ());
        assert!(quotient.is_finite());
        ok!(store, ())
    }

    #[test]
    fn test_ok_macro_captures_site() {
        let store = Store::new();
        let res = Res::ok(&store, 1u8, crate::site!());
        assert!(!res.is_fallback());

        let failed = err!(&store, u8, "sad");
        let record = store.error_record(failed.id()).unwrap();
        assert_eq!(record.site().file(), file!());
        assert!(record.site().func().ends_with("test_ok_macro_captures_site"));
    }

    #[test]
    fn test_divide_success_path() {
        let store = Store::new();
        let res = call_divide(&store, 10, 5);
        res.get(&store, crate::site!()).unwrap();
    }

    #[test]
    fn test_divide_failure_bubbles_with_origin() {
        let store = Store::new();
        let res = call_divide(&store, 1, 0);

        let err = res.get(&store, crate::site!()).unwrap_err();
        assert_eq!(err.kind(), Fault::StateMismatch);

        // The forwarded record still points into divide(), two layers down
        let record = store.error_record(res.id()).unwrap();
        assert_eq!(record.message(), "Divisor mustn't be 0.");
        assert!(record.site().func().ends_with("::divide"));

        // divide()'s own slot was deleted by the propagation
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_unwrap_or_return_forwards_through_two_layers() {
        fn relay(store: &Store, res: Res<f32>) -> Res<u64> {
            let value: f32 = unwrap_or_return!(store, res, u64);
            ok!(store, value as u64)
        }

        let store = Store::new();
        let failed = relay(&store, divide(&store, 3, 0));
        let record = store.error_record(failed.id()).unwrap();
        assert_eq!(record.message(), "Divisor mustn't be 0.");
        assert!(record.site().func().ends_with("::divide"));

        let forwarded_again: Res<()> = match failed.get_or_forward(&store, crate::site!()) {
            Err(f) => f,
            Ok(_) => panic!("error result must not yield a value"),
        };
        let record = store.error_record(forwarded_again.id()).unwrap();
        assert!(record.site().func().ends_with("::divide"));
    }
}
