// vim: tw=80
//! Capability sets: what a proxy can be asked to do.
use std::collections::HashSet;

use crate::{
    CallRecord,
    CapabilityError,
    ExpectationViolation,
    mock::Mock
};

/// How a mock object treats calls.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Any call without an accepting expectation or stub fails immediately.
    #[default]
    Strict,
    /// Calls without an accepting binding return the default value of the
    /// method's return type.
    Lenient,
    /// Property accessors behave like plain fields.  Other calls behave as in
    /// [`Lenient`](Mode::Lenient) mode.
    Stateful,
}

/// Property role of a method, if it has one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Accessor {
    /// An ordinary method
    None,
    /// Reads the named property
    Getter(&'static str),
    /// Writes the named property
    Setter(&'static str),
}

/// Signature of one proxied method.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MethodSig {
    name: &'static str,
    arity: usize,
    accessor: Accessor,
}

impl MethodSig {
    pub const fn new(name: &'static str, arity: usize) -> Self {
        MethodSig { name, arity, accessor: Accessor::None }
    }

    /// Mark this method as the getter of `property`.
    pub const fn getter(self, property: &'static str) -> Self {
        MethodSig { accessor: Accessor::Getter(property), ..self }
    }

    /// Mark this method as the setter of `property`.
    pub const fn setter(self, property: &'static str) -> Self {
        MethodSig { accessor: Accessor::Setter(property), ..self }
    }

    pub fn accessor(&self) -> Accessor {
        self.accessor
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Description of a capability set: a named list of methods.
///
/// A method's position in the list is its slot, which the proxy passes along
/// with every call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Capabilities {
    name: &'static str,
    methods: Vec<MethodSig>,
}

impl Capabilities {
    /// Validate a capability set.
    ///
    /// # Examples
    /// ```
    /// # use dynamock::*;
    /// assert!(Capabilities::new("Marker", []).is_err());
    /// let caps = Capabilities::new("Counter", [MethodSig::new("bump", 0)])
    ///     .unwrap();
    /// assert_eq!(Some(0), caps.slot("bump"));
    /// ```
    pub fn new<M>(name: &'static str, methods: M)
        -> Result<Self, CapabilityError>
        where M: IntoIterator<Item=MethodSig>
    {
        let methods = methods.into_iter().collect::<Vec<_>>();
        if methods.is_empty() {
            return Err(CapabilityError::Empty(name.to_owned()));
        }
        let mut seen = HashSet::new();
        for m in methods.iter() {
            if !seen.insert(m.name) {
                return Err(CapabilityError::Duplicate {
                    capability: name.to_owned(),
                    method: m.name.to_owned()
                });
            }
        }
        Ok(Capabilities { name, methods })
    }

    // Should only be called from the dynamock_derive generated code, which
    // has already rejected empty and duplicate method lists.
    #[doc(hidden)]
    pub fn declared(name: &'static str, methods: &[MethodSig]) -> Self {
        Capabilities { name, methods: methods.to_vec() }
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn method(&self, slot: usize) -> Option<&MethodSig> {
        self.methods.get(slot)
    }

    pub fn methods(&self) -> &[MethodSig] {
        &self.methods
    }

    /// Name of the proxied trait
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up a method's slot by name
    pub fn slot(&self, method: &str) -> Option<usize> {
        self.methods.iter().position(|m| m.name == method)
    }
}

/// A generated mock object.
///
/// Implemented by the structs that [`#[mockable]`](crate::mockable)
/// generates.  It can also be implemented by hand, for a proxy that routes its
/// calls to [`Mock::call`].
pub trait Proxy: Sized {
    /// Name of the proxied trait
    const NAME: &'static str;

    /// The proxied trait's methods, in slot order
    fn methods() -> &'static [MethodSig];

    /// Wrap a freshly generated mock object.
    fn from_mock(mock: Mock) -> Self;

    fn mock(&self) -> &Mock;

    fn mock_mut(&mut self) -> &mut Mock;

    /// All calls received so far, in order.
    fn calls(&self) -> Vec<CallRecord> {
        self.mock().calls()
    }

    /// Verify all expectations, then clear all expectations and stubs.
    fn checkpoint(&mut self) {
        self.mock_mut().checkpoint()
    }

    fn mode(&self) -> Mode {
        self.mock().mode()
    }

    /// Like [`verify_all_expectations`](Proxy::verify_all_expectations), but
    /// returns the violation instead of failing.
    fn try_verify_all(&self) -> Result<(), ExpectationViolation> {
        self.mock().try_verify_all()
    }

    /// Fail unless every expectation received its required number of calls.
    /// Stubs are exempt.
    fn verify_all_expectations(&self) {
        self.mock().verify_all()
    }
}

/// Generate a mock object for the capability set of `P`.
///
/// # Examples
/// ```
/// # use dynamock::*;
/// #[mockable]
/// trait Counter {
///     fn bump(&self) -> u32;
/// }
///
/// let mock = generate::<MockCounter>(Mode::Lenient).unwrap();
/// assert_eq!(0, mock.bump());
/// ```
pub fn generate<P: Proxy>(mode: Mode) -> Result<P, CapabilityError> {
    let caps = Capabilities::new(P::NAME, P::methods().iter().copied())?;
    tracing::debug!(capability = P::NAME, ?mode, "generating mock");
    Ok(P::from_mock(Mock::new(mode, caps)))
}
