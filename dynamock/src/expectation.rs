// vim: tw=80
//! Expectation and stub bindings.
use std::{
    fmt,
    mem,
    ops::Range
};

use downcast::{Any, downcast};
use fragile::Fragile;
use predicates::prelude::*;

use crate::{
    ExpectationViolation,
    ViolationKind,
    matcher::Matcher,
    times::{Repeat, Satisfaction, Times}
};

/// Whether a binding takes part in verification.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BindingKind {
    /// Must be called exactly its repeat count (default once).
    Expect,
    /// May be called any number of times, and is never verified.
    Stub,
}

/// Return functions for bindings
enum Rfunc<I, O> {
    Default,
    // Indicates that a `return_once` binding has already returned
    Expired,
    Mut(Box<dyn FnMut(I) -> O + Send>),
    Once(Box<dyn FnOnce(I) -> O + Send>),
}

impl<I, O> Rfunc<I, O> {
    fn call_mut(&mut self, args: I, default: Option<fn() -> O>, call: &str)
        -> Result<O, ExpectationViolation>
    {
        match self {
            Rfunc::Default => {
                default.map(|f| f())
                    .ok_or_else(|| ExpectationViolation::no_default(call))
            },
            Rfunc::Expired => {
                Err(ExpectationViolation::new(ViolationKind::Expired,
                    format!("{call}: called a method twice that was expected \
                            to return only once")))
            },
            Rfunc::Mut(f) => {
                Ok(f(args))
            },
            Rfunc::Once(_) => {
                match mem::replace(self, Rfunc::Expired) {
                    Rfunc::Once(f) => Ok(f(args)),
                    _ => unreachable!()
                }
            },
        }
    }
}

/// A single expectation or stub on one method of a mock object.
///
/// `I` is the method's argument type: `()` for no arguments, the argument
/// itself for one, and a tuple for more.  `O` is its return type.  Bindings
/// are created by a mock's `expect_*` and `stub_*` methods, then configured in
/// place with the fluent methods below.
pub struct Binding<I, O> {
    /// Position among all bindings of the same mock
    id: usize,
    kind: BindingKind,
    matcher: Matcher<I>,
    times: Times,
    rfunc: Rfunc<I, O>,
}

impl<I, O> Binding<I, O> {
    pub(crate) fn new(id: usize, kind: BindingKind) -> Self {
        let times = match kind {
            BindingKind::Expect => Times::once(),
            BindingKind::Stub => Times::unbounded(),
        };
        Binding {
            id,
            kind,
            matcher: Matcher::default(),
            times,
            rfunc: Rfunc::Default
        }
    }

    /// Simulate calling the real method for this binding
    pub(crate) fn call(&mut self, args: I, default: Option<fn() -> O>,
                       call: &str) -> Result<O, ExpectationViolation>
    {
        self.times.call();
        self.rfunc.call_mut(args, default, call)
    }

    /// How many matching calls this binding has received
    pub fn call_count(&self) -> usize {
        self.times.count()
    }

    pub(crate) fn explain(&self, i: &I) -> Option<String> {
        self.matcher.explain(i)
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn is_done(&self) -> bool {
        self.kind == BindingKind::Expect && self.times.is_done()
    }

    /// Is this an expectation or a stub?
    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    pub(crate) fn matches(&self, i: &I) -> bool {
        self.matcher.matches(i)
    }

    /// Forbid this binding from ever being called
    pub fn never(&mut self) -> &mut Self {
        self.times.never();
        self
    }

    /// Expect this binding to be called exactly once.  Shortcut for
    /// [`times(1)`](#method.times).
    pub fn once(&mut self) -> &mut Self {
        self.times(1)
    }

    /// Set the call count with a fluent sub-builder, like
    /// `.repeat().twice()`.
    pub fn repeat(&mut self) -> Repeat<'_, I, O> {
        Repeat::new(self)
    }

    /// Supply a `FnOnce` closure that will provide the return value for this
    /// binding.  This is useful for return types that aren't `Clone`.  A
    /// second matching call is an [`ExpectationViolation`].
    pub fn return_once<F>(&mut self, f: F) -> &mut Self
        where F: FnOnce(I) -> O + Send + 'static
    {
        self.rfunc = Rfunc::Once(Box::new(f));
        self
    }

    /// Supply a closure that will provide the return value for this binding.
    /// The method's arguments are passed to the closure by value, so it can
    /// also be used for side effects.
    pub fn returning<F>(&mut self, f: F) -> &mut Self
        where F: FnMut(I) -> O + Send + 'static
    {
        self.rfunc = Rfunc::Mut(Box::new(f));
        self
    }

    /// Single-threaded version of [`returning`](#method.returning).  Can be
    /// used when the closure isn't `Send`.
    ///
    /// It is a runtime error to call the mock method from a different thread
    /// than the one that originally called this method.
    pub fn returning_st<F>(&mut self, f: F) -> &mut Self
        where F: FnMut(I) -> O + 'static
    {
        let mut fragile = Fragile::new(f);
        let fmut = move |i: I| {
            (fragile.get_mut())(i)
        };
        self.rfunc = Rfunc::Mut(Box::new(fmut));
        self
    }

    /// Where this binding stands relative to its required call count.
    pub fn satisfaction(&self) -> Satisfaction {
        self.times.satisfaction()
    }

    /// Require this binding to be called exactly `n` times.
    pub fn times(&mut self, n: usize) -> &mut Self {
        self.times.n(n);
        self
    }

    /// Allow this binding to be called any number of times
    pub fn times_any(&mut self) -> &mut Self {
        self.times.any();
        self
    }

    /// Require this binding to be called at least `n` times
    pub fn times_at_least(&mut self, n: usize) -> &mut Self {
        self.times.at_least(n);
        self
    }

    /// Allow this binding to be called any number of times within a given
    /// range.  The end is exclusive.
    pub fn times_range(&mut self, range: Range<usize>) -> &mut Self {
        self.times.range(range);
        self
    }

    /// Describe an unmet expectation, or `None` if it's met.
    pub(crate) fn unmet(&self) -> Option<String> {
        if self.kind == BindingKind::Expect && !self.times.is_satisfied() {
            Some(format!("({}): expected {} call(s), received {}",
                self.matcher, self.times, self.times.count()))
        } else {
            None
        }
    }

    /// Set matching criteria for this binding.
    ///
    /// The matching predicate can be anything implementing the [`Predicate`]
    /// trait.  Only one matcher can be set per binding at a time.
    pub fn with<P>(&mut self, p: P) -> &mut Self
        where P: Predicate<I> + Send + 'static
    {
        self.matcher = Matcher::new(p);
        self
    }

    /// Set a matching function for this binding.
    ///
    /// This is equivalent to calling [`with`](#method.with) with a function
    /// argument, like `with(predicate::function(f))`.
    pub fn withf<F>(&mut self, f: F) -> &mut Self
        where F: Fn(&I) -> bool + Send + 'static, I: Send + 'static
    {
        self.matcher = Matcher::new(predicate::function(f));
        self
    }
}

impl<I, O: Clone + Send + 'static> Binding<I, O> {
    /// Return a constant value from the binding
    ///
    /// The output type must be `Clone`.
    pub fn return_const(&mut self, c: O) -> &mut Self {
        self.returning(move |_| c.clone())
    }
}

impl<I, O> fmt::Debug for Binding<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Binding")
            .field("kind", &self.kind)
            .field("matcher", &format_args!("{}", self.matcher))
            .field("times", &format_args!("{}", self.times))
            .field("calls", &self.times.count())
            .finish()
    }
}

/// How a call resolved against one method's bindings
pub(crate) enum Resolved<O> {
    /// An accepting binding produced this result
    Bound(BindingKind, Result<O, ExpectationViolation>),
    /// Only exhausted bindings accept the call
    Exhausted {
        expected: String,
        nth: usize
    },
    /// No binding accepts the call.  Carries an explanation from the
    /// closest binding, if there is one.
    Unmatched(Option<String>),
}

/// All bindings of one method, in declaration order.
pub(crate) struct Bindings<I, O>(Vec<Binding<I, O>>);

impl<I, O> Bindings<I, O> {
    pub fn new() -> Self {
        Bindings(Vec::new())
    }

    /// Add a new binding, and return it for configuration.
    pub fn push(&mut self, id: usize, kind: BindingKind)
        -> &mut Binding<I, O>
    {
        self.0.push(Binding::new(id, kind));
        let l = self.0.len();
        &mut self.0[l - 1]
    }

    /// Every binding will be checked in declaration order and the first one
    /// with matching arguments that isn't yet exhausted will be used.
    pub fn resolve(&mut self, args: I, default: Option<fn() -> O>, call: &str)
        -> Resolved<O>
    {
        let mut exhausted = None;
        let mut found = None;
        for (n, b) in self.0.iter().enumerate() {
            if b.matches(&args) {
                if !b.is_done() {
                    found = Some(n);
                    break;
                }
                exhausted.get_or_insert(n);
            }
        }
        match (found, exhausted) {
            (Some(n), _) => {
                let b = &mut self.0[n];
                Resolved::Bound(b.kind(), b.call(args, default, call))
            },
            (None, Some(n)) => {
                let b = &self.0[n];
                Resolved::Exhausted {
                    expected: b.times.to_string(),
                    nth: b.call_count() + 1
                }
            },
            (None, None) => {
                let hint = self.0.first()
                    .and_then(|b| b.explain(&args))
                    .map(|why| format!("closest binding rejected the \
                                       arguments:\n{why}"));
                Resolved::Unmatched(hint)
            }
        }
    }
}

/// Type-erased [`Bindings`], so one ledger can hold every method's bindings.
#[doc(hidden)]
pub trait AnyBindings: Any + Send {
    /// Unmet expectations as `(id, description)` pairs
    fn unmet(&self) -> Vec<(usize, String)>;
}
downcast!(dyn AnyBindings);

impl<I: 'static, O: 'static> AnyBindings for Bindings<I, O> {
    fn unmet(&self) -> Vec<(usize, String)> {
        self.0.iter()
            .filter_map(|b| b.unmet().map(|desc| (b.id(), desc)))
            .collect()
    }
}

#[cfg(test)]
mod t {
    use super::*;
    use crate::arg;

    fn zero() -> Option<fn() -> i32> {
        Some(i32::default as fn() -> i32)
    }

    #[test]
    fn first_acceptor_wins() {
        let mut bindings = Bindings::<String, i32>::new();
        bindings.push(0, BindingKind::Expect)
            .with(arg::text::ends_with("text"))
            .return_const(1);
        bindings.push(1, BindingKind::Expect)
            .with(arg::text::is("some text"))
            .return_const(2);
        match bindings.resolve(String::from("some text"), zero(), "f") {
            Resolved::Bound(BindingKind::Expect, Ok(1)) => (),
            _ => panic!("Wrong binding used")
        }
    }

    #[test]
    fn exhausted_falls_through_to_next() {
        let mut bindings = Bindings::<u32, i32>::new();
        bindings.push(0, BindingKind::Expect).return_const(1);
        bindings.push(1, BindingKind::Expect).return_const(2);
        assert!(matches!(bindings.resolve(0, zero(), "f"),
            Resolved::Bound(_, Ok(1))));
        assert!(matches!(bindings.resolve(0, zero(), "f"),
            Resolved::Bound(_, Ok(2))));
        match bindings.resolve(0, zero(), "f") {
            Resolved::Exhausted{expected, nth} => {
                assert_eq!("exactly 1", expected);
                assert_eq!(2, nth);
            },
            _ => panic!("Should be exhausted")
        }
    }

    #[test]
    fn stubs_never_exhaust() {
        let mut bindings = Bindings::<u32, i32>::new();
        bindings.push(0, BindingKind::Stub).return_const(7);
        for _ in 0..10 {
            assert!(matches!(bindings.resolve(3, zero(), "f"),
                Resolved::Bound(BindingKind::Stub, Ok(7))));
        }
        assert!(bindings.unmet().is_empty());
    }

    #[test]
    fn unmatched_explains() {
        let mut bindings = Bindings::<u32, i32>::new();
        bindings.push(0, BindingKind::Expect).with(arg::is(4u32));
        match bindings.resolve(5, zero(), "f") {
            Resolved::Unmatched(Some(hint)) => {
                assert!(hint.contains("var == 4"), "{hint}")
            },
            _ => panic!("Should be unmatched")
        }
    }

    #[test]
    fn unmatched_without_bindings() {
        let mut bindings = Bindings::<u32, i32>::new();
        assert!(matches!(bindings.resolve(5, zero(), "f"),
            Resolved::Unmatched(None)));
    }

    #[test]
    fn default_return() {
        let mut bindings = Bindings::<(), i32>::new();
        bindings.push(0, BindingKind::Stub);
        assert!(matches!(bindings.resolve((), zero(), "f"),
            Resolved::Bound(_, Ok(0))));
        match bindings.resolve((), None, "Foo::f()") {
            Resolved::Bound(_, Err(v)) => {
                assert_eq!(ViolationKind::NoDefault, v.kind());
                assert!(v.description().starts_with("Foo::f(): "));
            },
            _ => panic!("Should've needed a default")
        }
    }

    #[test]
    fn return_once_expires() {
        let mut bindings = Bindings::<(), String>::new();
        let s = String::from("once");
        bindings.push(0, BindingKind::Stub).return_once(move |_| s);
        assert!(matches!(bindings.resolve((), None, "f"),
            Resolved::Bound(_, Ok(ref s)) if s == "once"));
        match bindings.resolve((), None, "f") {
            Resolved::Bound(_, Err(v)) => {
                assert_eq!(ViolationKind::Expired, v.kind())
            },
            _ => panic!("Should've expired")
        }
    }

    #[test]
    fn returning_side_effect() {
        use std::sync::{Arc, Mutex};
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        let mut bindings = Bindings::<u32, ()>::new();
        bindings.push(0, BindingKind::Stub)
            .returning(move |x| seen2.lock().unwrap().push(x));
        for x in 1..4 {
            assert!(matches!(bindings.resolve(x, None, "f"),
                Resolved::Bound(_, Ok(()))));
        }
        assert_eq!(vec![1, 2, 3], *seen.lock().unwrap());
    }

    #[test]
    fn returning_st() {
        let mut bindings = Bindings::<u32, u32>::new();
        let offset = std::rc::Rc::new(10u32);
        bindings.push(0, BindingKind::Stub)
            .returning_st(move |x| x + *offset);
        assert!(matches!(bindings.resolve(5, None, "f"),
            Resolved::Bound(_, Ok(15))));
    }

    #[test]
    fn unmet_descriptions() {
        let mut bindings = Bindings::<u32, ()>::new();
        bindings.push(3, BindingKind::Expect)
            .with(arg::is(1u32))
            .repeat().twice();
        bindings.push(4, BindingKind::Expect).repeat().any();
        let _ = bindings.resolve(1, None, "f");
        let unmet = bindings.unmet();
        assert_eq!(1, unmet.len());
        assert_eq!(3, unmet[0].0);
        assert_eq!("(var == 1): expected exactly 2 call(s), received 1",
            unmet[0].1);
    }
}
