// vim: tw=80
//! Dynamic mock objects for Rust.
//!
//! Dynamock creates substitute objects for traits.  Every call on a substitute
//! is intercepted and resolved against a ledger of expectations and stubs that
//! the test configured beforehand.  Expectations can later be verified.
//!
//! # Usage
//!
//! * Annotate a trait with [`#[mockable]`](mockable).  That generates a
//!   struct whose name is the trait's with "Mock" prepended.
//! * In your test, create the mock in one of three modes: [`strict`],
//!   [`lenient`], or [`stub`] (stateful).
//! * Add expectations with the `expect_<method>` methods, and stubs with the
//!   `stub_<method>` methods.  Each binding may have an argument matcher, a
//!   call count, and a return value.
//! * Hand the mock to the code under test.
//! * Finish with [`verify_all_expectations`].
//!
//! # User Guide
//!
//! * [`Getting started`](#getting-started)
//! * [`Modes`](#modes)
//! * [`Return values`](#return-values)
//! * [`Matching arguments`](#matching-arguments)
//! * [`Call counts`](#call-counts)
//! * [`Stubs`](#stubs)
//! * [`Stateful stubs`](#stateful-stubs)
//! * [`Reference arguments`](#reference-arguments)
//! * [`Call history`](#call-history)
//! * [`Checkpoints`](#checkpoints)
//! * [`Manual proxies`](#manual-proxies)
//!
//! ## Getting Started
//! ```
//! use dynamock::*;
//! #[mockable]
//! trait MyTrait {
//!     fn foo(&self, x: u32) -> u32;
//! }
//!
//! fn call_with_four(x: &dyn MyTrait) -> u32 {
//!     x.foo(4)
//! }
//!
//! let mut mock = MockMyTrait::strict();
//! mock.expect_foo()
//!     .with(arg::is(4u32))
//!     .returning(|x| x + 1);
//! assert_eq!(5, call_with_four(&mock));
//! mock.verify_all_expectations();
//! ```
//!
//! ## Modes
//!
//! A [`Strict`](Mode::Strict) mock fails immediately on any call that no
//! expectation or stub accepts.  A [`Lenient`](Mode::Lenient) mock instead
//! returns the default value of the method's return type.  "Null" is spelled
//! `None` in Rust, so a lenient method returning `Option<T>` yields `None`.
//!
//! ```
//! # use dynamock::*;
//! #[mockable]
//! trait List {
//!     fn get(&self, index: usize) -> Option<String>;
//! }
//!
//! let mock = MockList::lenient();
//! assert_eq!(None, mock.get(0));
//! ```
//!
//! Failures are [`ExpectationViolation`]s.  Proxy methods raise them by
//! panicking with a description of the offending call.
//!
//! ```should_panic
//! # use dynamock::*;
//! # #[mockable]
//! # trait List {
//! #     fn get(&self, index: usize) -> Option<String>;
//! # }
//! let mock = MockList::strict();
//! mock.get(0);
//! ```
//!
//! Return types without a [`Default`] implementation have no default value.
//! A lenient mock that needs one fails too.
//!
//! ## Return values
//!
//! Expectations and stubs return a constant with
//! [`return_const`](Binding::return_const), or compute the return value with a
//! closure given to [`returning`](Binding::returning).  The closure receives
//! the method's arguments by value, and may have side effects.
//! [`return_once`](Binding::return_once) accepts an `FnOnce` for values that
//! aren't `Clone`.  Without any of those, a binding returns the default value
//! of the return type.
//!
//! ```
//! # use dynamock::*;
//! #[mockable]
//! trait MyTrait {
//!     fn foo(&self) -> u32;
//!     fn bar(&self, x: u32, y: u32) -> u32;
//! }
//!
//! let mut mock = MockMyTrait::strict();
//! mock.expect_foo()
//!     .return_const(42u32);
//! mock.expect_bar()
//!     .returning(|(x, y)| x + y);
//! assert_eq!(42, mock.foo());
//! assert_eq!(7, mock.bar(3, 4));
//! ```
//!
//! Closures must be `Send`.  For closures that aren't, use
//! [`returning_st`](Binding::returning_st).
//!
//! ## Matching arguments
//!
//! A binding only accepts calls whose arguments satisfy its matcher.  Any
//! [`Predicate`] works; the [`arg`] module has the common ones.  When several
//! bindings of the same method accept a call, the first one declared wins.
//!
//! ```
//! # use dynamock::*;
//! #[mockable]
//! trait List {
//!     fn index_of(&self, item: &str) -> i32;
//! }
//!
//! let mut mock = MockList::strict();
//! mock.expect_index_of()
//!     .with(arg::text::ends_with("text"))
//!     .return_const(1);
//! mock.expect_index_of()
//!     .with(arg::matches(|s: &String| s == "why would you do this?"))
//!     .return_const(2);
//! mock.expect_index_of()
//!     .with(arg::text::is("soup"))
//!     .return_const(3);
//! assert_eq!(1, mock.index_of("some text"));
//! assert_eq!(2, mock.index_of("why would you do this?"));
//! assert_eq!(3, mock.index_of("soup"));
//! ```
//!
//! Methods with several arguments are matched against a tuple of all of them.
//! [`withf`](Binding::withf) takes a closure over that tuple, and
//! [`params!`] combines one matcher per argument.
//!
//! ## Call counts
//!
//! An expectation requires exactly one call by default.  Use
//! [`times`](Binding::times) or the fluent [`repeat`](Binding::repeat) builder
//! to change that.  A call beyond the maximum fails a strict mock immediately;
//! too few calls fail [`verify_all_expectations`].
//!
//! ```
//! # use dynamock::*;
//! #[mockable]
//! trait List {
//!     fn add(&mut self, item: String);
//! }
//!
//! let mut mock = MockList::strict();
//! mock.expect_add()
//!     .with(arg::text::is("some text"))
//!     .repeat().twice();
//! mock.add(String::from("some text"));
//! assert!(mock.try_verify_all().is_err());
//! mock.add(String::from("some text"));
//! mock.verify_all_expectations();
//! ```
//!
//! ## Stubs
//!
//! A stub binding accepts any number of calls, including none, and is never
//! verified.  Stubs and expectations share the same fluent methods.
//!
//! ```
//! # use dynamock::*;
//! # #[mockable]
//! # trait List {
//! #     fn index_of(&self, item: &str) -> i32;
//! # }
//! let mut mock = MockList::strict();
//! mock.stub_index_of()
//!     .with(arg::text::is("some text"))
//!     .return_const(1);
//! mock.verify_all_expectations();
//! assert_eq!(1, mock.index_of("some text"));
//! assert_eq!(1, mock.index_of("some text"));
//! ```
//!
//! ## Stateful stubs
//!
//! A [`Stateful`](Mode::Stateful) mock treats property accessors as plain
//! fields.  A zero-argument method `x` (or `get_x`) and a one-argument method
//! `set_x` taking the same type form the property `x`.  Reading a property
//! that was never written yields its type's default value.
//!
//! ```
//! # use dynamock::*;
//! #[mockable]
//! trait Widget {
//!     fn id(&self) -> i32;
//!     fn set_id(&mut self, id: i32);
//!     fn name(&self) -> Option<String>;
//!     fn set_name(&mut self, name: Option<String>);
//! }
//!
//! let mut widget = MockWidget::stub();
//! assert_eq!(0, widget.id());
//! assert_eq!(None, widget.name());
//! widget.set_name(Some(String::from("Mog")));
//! assert_eq!(Some(String::from("Mog")), widget.name());
//! ```
//!
//! Property types must be `Send`.  Reading one also requires it to be
//! `Clone`.
//!
//! ## Reference arguments
//!
//! Arguments of type `&T` are matched, and passed to return closures, as
//! `T::Owned`.  So a `&str` argument is seen as a `String`, and a `&[u8]`
//! argument as a `Vec<u8>`.
//!
//! ## Call history
//!
//! Every call is recorded, along with how it was resolved.  Arguments are
//! rendered with `Debug`, or as `?` if their type isn't `Debug`.
//!
//! ```
//! # use dynamock::*;
//! # #[mockable]
//! # trait List {
//! #     fn index_of(&self, item: &str) -> i32;
//! # }
//! let mock = MockList::lenient();
//! mock.index_of("x");
//! let calls = mock.calls();
//! assert_eq!("index_of(\"x\")", calls[0].to_string());
//! assert_eq!(Outcome::Defaulted, calls[0].outcome);
//! ```
//!
//! ## Checkpoints
//!
//! [`checkpoint`](Proxy::checkpoint) verifies all expectations, then removes
//! all bindings so the test can set new ones.
//!
//! ## Manual proxies
//!
//! [`Mock`] is independent of any particular trait.  A proxy can be written
//! by hand by implementing [`Proxy`] and routing each method to
//! [`Mock::call`] with its slot.  [`generate`] validates the capability set
//! before building such a proxy.
//!
//! [`lenient`]: #modes
//! [`strict`]: #modes
//! [`stub`]: #stateful-stubs
//! [`verify_all_expectations`]: Proxy::verify_all_expectations

mod capability;
mod error;
mod expectation;
mod history;
mod ledger;
mod matcher;
mod mock;
mod probe;
mod times;

pub use crate::capability::{
    Accessor,
    Capabilities,
    MethodSig,
    Mode,
    Proxy,
    generate
};
pub use crate::error::{CapabilityError, ExpectationViolation, ViolationKind};
pub use crate::expectation::{Binding, BindingKind};
pub use crate::history::{CallRecord, Outcome};
pub use crate::matcher::{Params, Text, arg};
pub use crate::mock::Mock;
pub use crate::times::{Repeat, Satisfaction};
pub use dynamock_derive::mockable;
pub use predicates::prelude::{Predicate, predicate};

/// Everything a test usually needs.
pub mod prelude {
    pub use crate::{
        Mode,
        Proxy,
        arg,
        mockable,
        params,
        Predicate,
        predicate
    };
}

// Used by the code that dynamock_derive generates
#[doc(hidden)]
pub mod __private {
    pub use crate::probe::{
        CloneProbe,
        DebugProbe,
        DefaultProbe,
        ProbeClone,
        ProbeDebug,
        ProbeDefault,
        ProbeNoClone,
        ProbeNoDefault,
        ProbeOpaque
    };
}
