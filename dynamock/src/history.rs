// vim: tw=80
//! Call history of a mock object.
use std::fmt;

/// How the dispatcher resolved a call.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Outcome {
    /// Satisfied an expectation
    Matched,
    /// Served by a stub binding
    Stubbed,
    /// No binding applied; the return type's default value was returned
    Defaulted,
    /// Read or wrote a stateful property
    Property,
    /// Raised an [`ExpectationViolation`](crate::ExpectationViolation)
    Rejected,
}

/// One intercepted call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallRecord {
    /// Position in the mock's history, starting at 0
    pub seq: usize,
    pub method: &'static str,
    /// Arguments rendered with `Debug`, or `?` for non-`Debug` types
    pub args: Vec<String>,
    pub outcome: Outcome,
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.method, self.args.join(", "))
    }
}
