// vim: tw=80
//! Failures raised by mock objects.
use thiserror::Error;

/// What kind of contract a call or a verification broke.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ViolationKind {
    /// A strict mock received a call that no binding accepts.
    UnexpectedCall,
    /// A strict mock received a call whose only accepting bindings have
    /// already been called their maximum number of times.
    OverSatisfied,
    /// Verification found expectations that received too few calls.
    Unsatisfied,
    /// A default value was needed for a type that doesn't have one.
    NoDefault,
    /// A `return_once` binding was asked to return a second time.
    Expired,
    /// A stateful property was read, but its type can't be cloned.
    Uncloneable,
}

/// The single failure kind of a mock object.
///
/// Proxy methods raise it by panicking with its description, so it surfaces
/// like any other failed assertion.  The non-panicking entry points, like
/// [`Mock::try_call`](crate::Mock::try_call) and
/// [`Mock::try_verify_all`](crate::Mock::try_verify_all), return it instead.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{description}")]
pub struct ExpectationViolation {
    kind: ViolationKind,
    description: String,
}

impl ExpectationViolation {
    pub(crate) fn new(kind: ViolationKind, description: impl Into<String>)
        -> Self
    {
        ExpectationViolation { kind, description: description.into() }
    }

    pub(crate) fn unexpected(call: &str, hint: Option<String>) -> Self {
        let mut description = format!("unexpected call: {call}");
        if let Some(hint) = hint {
            description.push('\n');
            description.push_str(&hint);
        }
        Self::new(ViolationKind::UnexpectedCall, description)
    }

    pub(crate) fn over_satisfied(call: &str, expected: &str, nth: usize)
        -> Self
    {
        Self::new(ViolationKind::OverSatisfied,
            format!("unexpected call: {call}: expected {expected} call(s), \
                    this would be call {nth}"))
    }

    pub(crate) fn unsatisfied(unmet: &[String]) -> Self {
        let mut description = String::from("unmet expectations:");
        for line in unmet {
            description.push_str("\n    ");
            description.push_str(line);
        }
        Self::new(ViolationKind::Unsatisfied, description)
    }

    pub(crate) fn no_default(call: &str) -> Self {
        Self::new(ViolationKind::NoDefault,
            format!("{call}: no return value configured and the return type \
                    has no default value"))
    }

    /// Which contract was broken
    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Human-readable description naming the offending call or expectations.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fail the current test with this violation.
    pub fn raise(self) -> ! {
        tracing::warn!(kind = ?self.kind, "{}", self.description);
        panic!("{}", self.description)
    }
}

/// A capability set that can't be proxied.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CapabilityError {
    #[error("cannot proxy {0}: it has no overridable methods")]
    Empty(String),
    #[error("cannot proxy {capability}: method {method} is declared more than once")]
    Duplicate {
        capability: String,
        method: String,
    },
}
