//! Debug-level logging convention (§7), following `lang-pt`'s own
//! `util/logger.rs`: an ordered enum gating `println!` emission under
//! `#[cfg(debug_assertions)]`, not the `log`/`tracing` crates. Used by
//! [`crate::tracer::LogTracer`] and by [`crate::combinators::indirect`]'s
//! construction diagnostics.

use std::fmt::{Debug, Display, Formatter};

/// Five verbosity tiers, ordered by [`Log::order`]: higher tiers are a
/// strict superset of what lower tiers print.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}

impl<T> Log<T> {
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T: Debug> Log<T> {
    /// `true` once this label's tier is at least as verbose as `threshold`.
    pub fn at_least(&self, threshold: &Log<T>) -> bool {
        self.order() >= threshold.order()
    }
}
