// vim: tw=80
//! The mock object: dispatcher, verifier and stateful fields.
use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{Mutex, MutexGuard, PoisonError}
};

use crate::{
    Accessor,
    CallRecord,
    Capabilities,
    ExpectationViolation,
    MethodSig,
    Mode,
    Outcome,
    ViolationKind,
    expectation::{Binding, BindingKind, Resolved},
    ledger::Ledger
};

struct State {
    ledger: Ledger,
    history: Vec<CallRecord>,
    /// Property values of a stateful mock
    fields: HashMap<&'static str, Box<dyn Any + Send>>,
}

impl State {
    fn record(&mut self, method: &'static str, args: Vec<String>,
              outcome: Outcome)
    {
        let seq = self.history.len();
        self.history.push(CallRecord { seq, method, args, outcome });
    }
}

fn unit() {}

/// A mock object's engine, independent of the trait it proxies.
///
/// Generated proxies own one of these and route every method call through
/// [`call`](Mock::call) or, for property accessors,
/// [`get_property`](Mock::get_property) and
/// [`set_property`](Mock::set_property).  Methods are identified by their slot
/// in the [`Capabilities`].
///
/// Calls are dispatched synchronously under a lock.  Return closures must not
/// call back into the same mock object.
pub struct Mock {
    mode: Mode,
    caps: Capabilities,
    state: Mutex<State>,
}

impl Mock {
    pub fn new(mode: Mode, caps: Capabilities) -> Self {
        let state = State {
            ledger: Ledger::new(caps.len()),
            history: Vec::new(),
            fields: HashMap::new()
        };
        Mock { mode, caps, state: Mutex::new(state) }
    }

    // A panic raised while dispatching poisons the lock.  The state is still
    // consistent, and tests that catch the panic may go on to verify.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut State {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn method(&self, slot: usize) -> MethodSig {
        *self.caps.method(slot).unwrap_or_else(||
            panic!("{}: no such method slot {}", self.caps.name(), slot))
    }

    /// Format a call like `List::add("x")`
    fn describe(&self, method: &str, shown: &[String]) -> String {
        format!("{}::{}({})", self.caps.name(), method, shown.join(", "))
    }

    fn bind<I: 'static, O: 'static>(&mut self, slot: usize, kind: BindingKind)
        -> &mut Binding<I, O>
    {
        let method = self.method(slot).name();
        tracing::debug!(capability = self.caps.name(), method, ?kind,
            "registering binding");
        self.state_mut().ledger.bind(slot, kind, method)
    }

    /// Simulate calling a method.  Fails with an [`ExpectationViolation`]
    /// when the mode and the bindings don't permit the call.
    ///
    /// # Arguments
    ///
    /// * `slot`:       The method's position in the capability set.
    /// * `args`:       The arguments, as matched by the bindings.
    /// * `shown`:      Each argument rendered for messages and history.
    /// * `default`:    Produces the return type's default value, if it has
    ///                 one.
    pub fn try_call<I: 'static, O: 'static>(&self, slot: usize, args: I,
                                            shown: Vec<String>,
                                            default: Option<fn() -> O>)
        -> Result<O, ExpectationViolation>
    {
        let method = self.method(slot).name();
        let call = self.describe(method, &shown);
        let mut state = self.lock();
        let resolved = match state.ledger.bindings_mut::<I, O>(slot, method) {
            Some(bindings) => bindings.resolve(args, default, &call),
            None => Resolved::Unmatched(None)
        };
        let strict = self.mode == Mode::Strict;
        let (outcome, result) = match resolved {
            Resolved::Bound(BindingKind::Expect, r) => (Outcome::Matched, r),
            Resolved::Bound(BindingKind::Stub, r) => (Outcome::Stubbed, r),
            Resolved::Exhausted{expected, nth} if strict => {
                let v = ExpectationViolation::over_satisfied(&call, &expected,
                                                             nth);
                (Outcome::Rejected, Err(v))
            },
            Resolved::Unmatched(hint) if strict => {
                let v = ExpectationViolation::unexpected(&call, hint);
                (Outcome::Rejected, Err(v))
            },
            Resolved::Exhausted{..} | Resolved::Unmatched(_) => {
                let r = default.map(|f| f())
                    .ok_or_else(|| ExpectationViolation::no_default(&call));
                (Outcome::Defaulted, r)
            }
        };
        let outcome = if result.is_ok() { outcome } else { Outcome::Rejected };
        state.record(method, shown, outcome);
        tracing::trace!(%call, ?outcome, "dispatched");
        result
    }

    /// Like [`try_call`](Mock::try_call), but raises any violation.
    pub fn call<I: 'static, O: 'static>(&self, slot: usize, args: I,
                                        shown: Vec<String>,
                                        default: Option<fn() -> O>) -> O
    {
        self.try_call(slot, args, shown, default)
            .unwrap_or_else(|v| v.raise())
    }

    /// Read a property.  Only a [`Stateful`](Mode::Stateful) mock treats it
    /// as a field; other modes dispatch it like any call.
    pub fn try_get_property<T: 'static>(&self, slot: usize,
                                        shown: Vec<String>,
                                        default: Option<fn() -> T>,
                                        clone: Option<fn(&T) -> T>)
        -> Result<T, ExpectationViolation>
    {
        let sig = self.method(slot);
        let (Mode::Stateful, Accessor::Getter(property)) =
            (self.mode, sig.accessor()) else
        {
            return self.try_call::<(), T>(slot, (), shown, default);
        };
        let call = self.describe(sig.name(), &shown);
        let mut state = self.lock();
        let result = match state.fields.get(property) {
            Some(value) => {
                let value = (**value).downcast_ref::<T>()
                    .unwrap_or_else(|| panic!(
                        "{call}: property {property} was set with another type"));
                clone.map(|f| f(value))
                    .ok_or_else(|| ExpectationViolation::new(
                        ViolationKind::Uncloneable,
                        format!("{call}: the value of property {property} \
                                can't be cloned")))
            },
            None => default.map(|f| f())
                .ok_or_else(|| ExpectationViolation::no_default(&call))
        };
        let outcome = if result.is_ok() {
            Outcome::Property
        } else {
            Outcome::Rejected
        };
        state.record(sig.name(), shown, outcome);
        tracing::trace!(%call, property, "read property");
        result
    }

    /// Like [`try_get_property`](Mock::try_get_property), but raises any
    /// violation.
    pub fn get_property<T: 'static>(&self, slot: usize, shown: Vec<String>,
                                    default: Option<fn() -> T>,
                                    clone: Option<fn(&T) -> T>) -> T
    {
        self.try_get_property(slot, shown, default, clone)
            .unwrap_or_else(|v| v.raise())
    }

    /// Write a property.  Only a [`Stateful`](Mode::Stateful) mock treats it
    /// as a field; other modes dispatch it like any call.
    pub fn try_set_property<T: Send + 'static>(&self, slot: usize, value: T,
                                               shown: Vec<String>)
        -> Result<(), ExpectationViolation>
    {
        let sig = self.method(slot);
        let (Mode::Stateful, Accessor::Setter(property)) =
            (self.mode, sig.accessor()) else
        {
            return self.try_call::<T, ()>(slot, value, shown,
                                          Some(unit as fn()));
        };
        let mut state = self.lock();
        state.fields.insert(property, Box::new(value));
        state.record(sig.name(), shown, Outcome::Property);
        tracing::trace!(capability = self.caps.name(), property,
            "wrote property");
        Ok(())
    }

    /// Like [`try_set_property`](Mock::try_set_property), but raises any
    /// violation.
    pub fn set_property<T: Send + 'static>(&self, slot: usize, value: T,
                                           shown: Vec<String>)
    {
        self.try_set_property(slot, value, shown)
            .unwrap_or_else(|v| v.raise())
    }

    /// Add an expectation on the method in `slot`.  It requires exactly one
    /// matching call unless configured otherwise.
    pub fn expect<I: 'static, O: 'static>(&mut self, slot: usize)
        -> &mut Binding<I, O>
    {
        self.bind(slot, BindingKind::Expect)
    }

    /// Add a stub binding on the method in `slot`.  It may be called any
    /// number of times and is exempt from verification.
    pub fn stub<I: 'static, O: 'static>(&mut self, slot: usize)
        -> &mut Binding<I, O>
    {
        self.bind(slot, BindingKind::Stub)
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.lock().history.clone()
    }

    /// How many calls `method` has received, whatever their outcome.
    pub fn calls_to(&self, method: &str) -> usize {
        self.lock().history.iter()
            .filter(|r| r.method == method)
            .count()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// Verify all expectations, then clear all bindings.  The call history
    /// is kept.
    pub fn checkpoint(&mut self) {
        let r = self.try_verify_all();
        self.state_mut().ledger.clear();
        if let Err(v) = r {
            v.raise()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Check that every expectation received its required number of calls.
    /// Stub bindings are exempt.
    pub fn try_verify_all(&self) -> Result<(), ExpectationViolation> {
        let unmet = self.lock().ledger.unmet(&self.caps);
        tracing::debug!(capability = self.caps.name(), unmet = unmet.len(),
            "verified expectations");
        if unmet.is_empty() {
            Ok(())
        } else {
            Err(ExpectationViolation::unsatisfied(&unmet))
        }
    }

    /// Like [`try_verify_all`](Mock::try_verify_all), but raises any
    /// violation.
    pub fn verify_all(&self) {
        if let Err(v) = self.try_verify_all() {
            v.raise()
        }
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mock")
            .field("capability", &self.caps.name())
            .field("mode", &self.mode)
            .finish()
    }
}
