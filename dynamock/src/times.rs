// vim: tw=80
//! Call counting for bindings.
use std::{
    fmt,
    ops::Range
};

use crate::expectation::Binding;

/// How far along an expectation is toward its required call count.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Satisfaction {
    /// Requires calls, and hasn't received any yet.
    Pending,
    /// Received some calls, but fewer than required.
    PartiallySatisfied,
    /// Received at least the required number of calls.
    Satisfied,
}

/// Allowed call count of a binding, and how many calls it has received.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Times {
    /// How many times has the binding already been called?
    count: usize,
    /// Allowed counts; the end is exclusive.
    range: Range<usize>
}

impl Times {
    /// Exactly one call, the default for expectations
    pub fn once() -> Self {
        Times { count: 0, range: 1..2 }
    }

    /// Any number of calls, the default for stubs
    pub fn unbounded() -> Self {
        Times { count: 0, range: 0..usize::MAX }
    }

    pub fn call(&mut self) {
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn any(&mut self) {
        self.range = 0..usize::MAX;
    }

    pub fn at_least(&mut self, n: usize) {
        self.range = n..usize::MAX;
    }

    /// Has this binding already been called the maximum allowed number of
    /// times?
    pub fn is_done(&self) -> bool {
        self.range.end != usize::MAX && self.count + 1 >= self.range.end
    }

    /// Has this binding already been called the minimum required number of
    /// times?
    pub fn is_satisfied(&self) -> bool {
        self.count >= self.range.start
    }

    /// Exactly `n` calls.  `usize::MAX` can't be exceeded, so it reads as "at
    /// least".
    pub fn n(&mut self, n: usize) {
        self.range = n..n.saturating_add(1);
    }

    pub fn never(&mut self) {
        self.range = 0..1;
    }

    pub fn range(&mut self, range: Range<usize>) {
        assert!(range.start < range.end, "Empty call count range {range:?}");
        self.range = range;
    }

    pub fn satisfaction(&self) -> Satisfaction {
        if self.is_satisfied() {
            Satisfaction::Satisfied
        } else if self.count == 0 {
            Satisfaction::Pending
        } else {
            Satisfaction::PartiallySatisfied
        }
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Range { start, end } = self.range;
        if end == usize::MAX {
            if start == 0 {
                write!(f, "any number of")
            } else {
                write!(f, "at least {start}")
            }
        } else if end - 1 == start {
            write!(f, "exactly {start}")
        } else {
            write!(f, "between {} and {}", start, end - 1)
        }
    }
}

/// Fluent call count settings for a [`Binding`].
///
/// Obtained from [`Binding::repeat`].  Each method consumes the builder and
/// hands the binding back, so chaining can continue.
///
/// # Examples
/// ```
/// # use dynamock::*;
/// #[mockable]
/// trait Counter {
///     fn bump(&self);
/// }
///
/// let mut mock = MockCounter::strict();
/// mock.expect_bump().repeat().twice();
/// mock.bump();
/// mock.bump();
/// mock.verify_all_expectations();
/// ```
pub struct Repeat<'a, I, O> {
    binding: &'a mut Binding<I, O>
}

impl<'a, I, O> Repeat<'a, I, O> {
    pub(crate) fn new(binding: &'a mut Binding<I, O>) -> Self {
        Repeat { binding }
    }

    /// Allow any number of calls, including none.
    pub fn any(self) -> &'a mut Binding<I, O> {
        self.binding.times_any()
    }

    /// Require at least `n` calls, with no upper limit.
    pub fn at_least(self, n: usize) -> &'a mut Binding<I, O> {
        self.binding.times_at_least(n)
    }

    /// Forbid any calls.
    pub fn never(self) -> &'a mut Binding<I, O> {
        self.binding.never()
    }

    /// Require exactly one call.
    pub fn once(self) -> &'a mut Binding<I, O> {
        self.binding.times(1)
    }

    /// Require a call count within `range`.
    pub fn range(self, range: Range<usize>) -> &'a mut Binding<I, O> {
        self.binding.times_range(range)
    }

    /// Require exactly `n` calls.
    pub fn times(self, n: usize) -> &'a mut Binding<I, O> {
        self.binding.times(n)
    }

    /// Require exactly two calls.
    pub fn twice(self) -> &'a mut Binding<I, O> {
        self.binding.times(2)
    }
}
