//! Explicit, build-time-threaded instrumentation hooks (§4.8).
//!
//! Upstream's `DebugTrace` mutates module-scope globals during parser
//! *construction* to propagate a tracer and scope string down the tree,
//! then restores them; that global is eliminated here. A [`Tracer`] is an
//! ordinary value (`Rc<dyn Tracer>`) wrapped around a parser by
//! [`traced`] at construction time, carrying its own scope string and a
//! tracking number assigned once per wrapped node — not a counter touched
//! per invocation. There is no automatic `catch_unwind`-based panic
//! recovery: a Rust panic is never treated as a parser outcome here, and
//! [`Tracer::panic`] exists only for a caller's own code to invoke
//! deliberately.

use crate::context::{MatchStatus, ParserContext};
use crate::error::ParseError;
use crate::kernel::ParserFn;
use std::cell::Cell;
use std::fmt::Debug;
use std::rc::Rc;

/// Three callbacks bundled as a trait, matching the upstream `before`,
/// `after`, `panic` trio plus an explicit scope string and tracking
/// number.
pub trait Tracer {
    fn before(&self, scope: &str, tracking_no: u64, class_name: &str);
    fn after(&self, scope: &str, tracking_no: u64, class_name: &str, status: MatchStatus);
    fn panic(&self, scope: &str, tracking_no: u64, class_name: &str, payload: &str);
}

/// No-op default; attaching no tracer at all is equivalent to this.
pub struct NullTracer;

impl Tracer for NullTracer {
    fn before(&self, _scope: &str, _tracking_no: u64, _class_name: &str) {}
    fn after(&self, _scope: &str, _tracking_no: u64, _class_name: &str, _status: MatchStatus) {}
    fn panic(&self, _scope: &str, _tracking_no: u64, _class_name: &str, _payload: &str) {}
}

/// A `println!`-based tracer gated by the crate's own [`crate::logger::Log`]
/// ordering, matching `lang-pt`'s debug-instrumentation convention rather
/// than the `log`/`tracing` crates.
pub struct LogTracer(pub crate::logger::Log<&'static str>);

impl Tracer for LogTracer {
    fn before(&self, scope: &str, tracking_no: u64, class_name: &str) {
        #[cfg(debug_assertions)]
        if self.0.at_least(&crate::logger::Log::Verbose("")) {
            println!("[{}:{}#{}] entering", scope, class_name, tracking_no);
        }
        #[cfg(not(debug_assertions))]
        let _ = (scope, tracking_no, class_name);
    }

    fn after(&self, scope: &str, tracking_no: u64, class_name: &str, status: MatchStatus) {
        #[cfg(debug_assertions)]
        if self.0.at_least(&crate::logger::Log::Success("")) {
            println!("[{}:{}#{}] {:?}", scope, class_name, tracking_no, status);
        }
        #[cfg(not(debug_assertions))]
        let _ = (scope, tracking_no, class_name, status);
    }

    fn panic(&self, scope: &str, tracking_no: u64, class_name: &str, payload: &str) {
        #[cfg(debug_assertions)]
        println!("[{}:{}#{}] panic: {}", scope, class_name, tracking_no, payload);
        #[cfg(not(debug_assertions))]
        let _ = (scope, tracking_no, class_name, payload);
    }
}

/// Monotonically increasing tracking-number source, threaded explicitly
/// through combinator construction rather than stored in a global.
/// `Cell`-based: fine for the single-threaded construction phase this
/// crate assumes throughout (§5).
pub struct TrackingCounter(Cell<u64>);

impl Default for TrackingCounter {
    fn default() -> Self {
        TrackingCounter::new()
    }
}

impl TrackingCounter {
    pub fn new() -> Self {
        TrackingCounter(Cell::new(0))
    }

    pub fn next(&self) -> u64 {
        let n = self.0.get();
        self.0.set(n + 1);
        n
    }
}

/// Wrap `inner` so every invocation reports through `tracer`, tagged with
/// `scope`, `class_name`, and a tracking number drawn from `counter` once
/// at construction time (one tracking number per node in the built tree,
/// mirroring how upstream assigns one debugger per production node rather
/// than per call).
pub fn traced<V: Clone + PartialEq + Debug + 'static>(
    scope: &'static str,
    class_name: &'static str,
    tracer: Rc<dyn Tracer>,
    counter: &TrackingCounter,
    inner: ParserFn<V>,
) -> ParserFn<V> {
    let tracking_no = counter.next();
    Rc::new(move |ctx: ParserContext<'_, V>| -> Result<ParserContext<'_, V>, ParseError> {
        tracer.before(scope, tracking_no, class_name);
        let result = inner(ctx);
        match &result {
            Ok(out) => tracer.after(scope, tracking_no, class_name, out.match_status),
            Err(_) => tracer.after(scope, tracking_no, class_name, MatchStatus::Error),
        }
        result
    })
}

#[cfg(test)]
mod __tests__ {
    use super::*;
    use crate::context::ParserContext;
    use crate::primitives::string::seq;
    use std::cell::RefCell;

    struct RecordingTracer(RefCell<Vec<String>>);

    impl Tracer for RecordingTracer {
        fn before(&self, scope: &str, tracking_no: u64, class_name: &str) {
            self.0.borrow_mut().push(format!("before:{}:{}:{}", scope, class_name, tracking_no));
        }
        fn after(&self, scope: &str, tracking_no: u64, class_name: &str, status: MatchStatus) {
            self.0
                .borrow_mut()
                .push(format!("after:{}:{}:{}:{:?}", scope, class_name, tracking_no, status));
        }
        fn panic(&self, _scope: &str, _tracking_no: u64, _class_name: &str, _payload: &str) {}
    }

    #[test]
    fn wraps_invocation_with_before_and_after() {
        let tracer = Rc::new(RecordingTracer(RefCell::new(Vec::new())));
        let counter = TrackingCounter::new();
        let p = traced("root", "Seq", tracer.clone(), &counter, seq("foo"));
        let ctx = ParserContext::from_str("foobar");
        let result = p(ctx).unwrap();
        assert_eq!(result.match_status, MatchStatus::Matched);
        let log = tracer.0.borrow();
        assert_eq!(log[0], "before:root:Seq:0");
        assert_eq!(log[1], "after:root:Seq:0:Matched");
    }

    #[test]
    fn tracking_numbers_assigned_once_at_construction() {
        let tracer = Rc::new(RecordingTracer(RefCell::new(Vec::new())));
        let counter = TrackingCounter::new();
        let a = traced("s", "A", tracer.clone(), &counter, seq("a"));
        let b = traced("s", "B", tracer.clone(), &counter, seq("b"));
        assert_eq!(a(ParserContext::from_str("a")).unwrap().match_status, MatchStatus::Matched);
        assert_eq!(b(ParserContext::from_str("b")).unwrap().match_status, MatchStatus::Matched);
        let log = tracer.0.borrow();
        assert!(log.iter().any(|l| l.contains("A:0")));
        assert!(log.iter().any(|l| l.contains("B:1")));
    }
}
