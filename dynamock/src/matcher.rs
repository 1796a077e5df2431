// vim: tw=80
//! Argument matchers.
//!
//! Every matcher is a [`Predicate`] over the argument type of the method it
//! constrains.  The [`arg`] module provides the common ones; anything else
//! from the [`predicates`](https://docs.rs/predicates) crate works too.
use std::fmt::{self, Display};

use predicates::{
    prelude::*,
    reflection::{Case, PredicateReflection}
};
use predicates_tree::CaseTreeExt;

pub(crate) struct Matcher<I> {
    pred: Box<dyn Predicate<I> + Send>,
    /// Accepts anything; displays as `<anything>`.
    anything: bool,
}

impl<I> Matcher<I> {
    pub fn new<P: Predicate<I> + Send + 'static>(p: P) -> Self {
        Matcher { pred: Box::new(p), anything: false }
    }

    pub fn matches(&self, i: &I) -> bool {
        self.pred.eval(i)
    }

    /// Explain why this matcher rejects `i`, if it does.
    pub fn explain(&self, i: &I) -> Option<String> {
        self.pred.find_case(false, i)
            .map(|case| case.tree().to_string())
    }
}

impl<I> Default for Matcher<I> {
    fn default() -> Self {
        Matcher {
            pred: Box::new(predicate::always()),
            anything: true
        }
    }
}

impl<I> Display for Matcher<I> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.anything {
            write!(f, "<anything>")
        } else {
            write!(f, "{}", self.pred)
        }
    }
}

/// Adapts a `str` predicate to match owned `String` arguments.
///
/// Proxies capture `&str` arguments as `String`, so the text matchers in
/// [`arg::text`] are wrapped in this.
#[derive(Clone, Debug)]
pub struct Text<P>(P);

impl<P: Predicate<str>> Predicate<String> for Text<P> {
    fn eval(&self, variable: &String) -> bool {
        self.0.eval(variable.as_str())
    }

    fn find_case<'a>(&'a self, expected: bool, variable: &String)
        -> Option<Case<'a>>
    {
        self.0.find_case(expected, variable.as_str())
    }
}

impl<P: PredicateReflection> PredicateReflection for Text<P> {}

impl<P: Display> Display for Text<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Combines one matcher per argument into a matcher for a multi-argument
/// method.  Built by the [`params!`](crate::params) macro.
#[derive(Clone, Debug)]
pub struct Params<T>(pub T);

macro_rules! params_impl {
    ($($p:ident $a:ident $idx:tt),+) => {
        impl<$($p, $a),+> Predicate<($($a,)+)> for Params<($($p,)+)>
            where $($p: Predicate<$a>),+
        {
            fn eval(&self, args: &($($a,)+)) -> bool {
                $(self.0.$idx.eval(&args.$idx))&&+
            }
        }

        impl<$($p: PredicateReflection),+> PredicateReflection
            for Params<($($p,)+)>
        {}

        impl<$($p: Display),+> Display for Params<($($p,)+)> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                let parts = [$(&self.0.$idx as &dyn Display),+];
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{part}")?;
                }
                write!(f, ")")
            }
        }
    }
}

params_impl!{P0 A0 0, P1 A1 1}
params_impl!{P0 A0 0, P1 A1 1, P2 A2 2}
params_impl!{P0 A0 0, P1 A1 1, P2 A2 2, P3 A3 3}

/// Check separate [`Predicate`]s for each argument of a method.  Used with
/// [`with`](crate::Binding::with) for methods of two to four arguments.
///
/// # Examples
/// ```
/// # use dynamock::*;
/// #[mockable]
/// trait Grid {
///     fn cell(&self, x: u32, y: u32) -> char;
/// }
///
/// let mut mock = MockGrid::strict();
/// mock.expect_cell()
///     .with(params!(arg::is(4u32), arg::anything()))
///     .return_const('#');
/// assert_eq!('#', mock.cell(4, 9));
/// ```
#[macro_export]
macro_rules! params {
    ($($p:expr),+ $(,)?) => {
        $crate::Params(($($p,)+))
    };
}

/// Argument matcher helpers.
pub mod arg {
    use predicates::{
        constant::BooleanPredicate,
        function::FnPredicate,
        ord::EqPredicate,
        prelude::*
    };
    use std::fmt::Debug;

    /// Accept any argument.
    pub fn anything() -> BooleanPredicate {
        predicate::always()
    }

    /// Accept an argument equal to `value`.
    pub fn is<T: Debug + PartialEq>(value: T) -> EqPredicate<T> {
        predicate::eq(value)
    }

    /// Accept an argument for which `f` returns true.
    ///
    /// # Examples
    /// ```
    /// # use dynamock::*;
    /// let m = arg::matches(|x: &u32| x % 2 == 0);
    /// assert!(m.eval(&4));
    /// assert!(!m.eval(&5));
    /// ```
    pub fn matches<F, T>(f: F) -> FnPredicate<F, T>
        where F: Fn(&T) -> bool
    {
        predicate::function(f)
    }

    /// Matchers for textual arguments.
    pub mod text {
        use predicates::{
            ord::EqPredicate,
            prelude::*,
            str::{ContainsPredicate, EndsWithPredicate, StartsWithPredicate}
        };
        use crate::matcher::Text;

        /// Accept text containing `pattern`.
        pub fn contains(pattern: impl Into<String>)
            -> Text<ContainsPredicate>
        {
            Text(predicate::str::contains(pattern))
        }

        /// Accept text ending with `pattern`.
        pub fn ends_with(pattern: impl Into<String>)
            -> Text<EndsWithPredicate>
        {
            Text(predicate::str::ends_with(pattern))
        }

        /// Accept text equal to `value`.
        pub fn is(value: impl Into<String>) -> EqPredicate<String> {
            predicate::eq(value.into())
        }

        /// Accept text starting with `pattern`.
        pub fn starts_with(pattern: impl Into<String>)
            -> Text<StartsWithPredicate>
        {
            Text(predicate::str::starts_with(pattern))
        }
    }
}
