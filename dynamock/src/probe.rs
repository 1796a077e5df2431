// vim: tw=80
//! Compile-time capability probes used by generated proxies.
//!
//! Each probe has two traits: one implemented for the probe itself when the
//! probed type has the capability, and a fallback implemented for a reference
//! to the probe.  Called as `(&Probe::new()).method()`, method resolution picks
//! the first when it applies and the fallback otherwise.  This only works with
//! concrete types, which is all that generated code ever uses.
use std::{
    fmt::Debug,
    marker::PhantomData
};

/// Probes whether `T: Default`.
pub struct DefaultProbe<T>(PhantomData<fn() -> T>);

impl<T> DefaultProbe<T> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        DefaultProbe(PhantomData)
    }
}

pub trait ProbeDefault<T> {
    fn default_fn(&self) -> Option<fn() -> T>;
}

impl<T: Default> ProbeDefault<T> for DefaultProbe<T> {
    fn default_fn(&self) -> Option<fn() -> T> {
        Some(T::default as fn() -> T)
    }
}

pub trait ProbeNoDefault<T> {
    fn default_fn(&self) -> Option<fn() -> T>;
}

impl<T> ProbeNoDefault<T> for &DefaultProbe<T> {
    fn default_fn(&self) -> Option<fn() -> T> {
        None
    }
}

/// Probes whether `T: Clone`.
pub struct CloneProbe<T>(PhantomData<fn() -> T>);

impl<T> CloneProbe<T> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        CloneProbe(PhantomData)
    }
}

pub trait ProbeClone<T> {
    fn clone_fn(&self) -> Option<fn(&T) -> T>;
}

impl<T: Clone> ProbeClone<T> for CloneProbe<T> {
    fn clone_fn(&self) -> Option<fn(&T) -> T> {
        Some(T::clone as fn(&T) -> T)
    }
}

pub trait ProbeNoClone<T> {
    fn clone_fn(&self) -> Option<fn(&T) -> T>;
}

impl<T> ProbeNoClone<T> for &CloneProbe<T> {
    fn clone_fn(&self) -> Option<fn(&T) -> T> {
        None
    }
}

/// Renders an argument with `Debug` if it has it, or as `?` otherwise.
pub struct DebugProbe<'a, T: ?Sized>(pub &'a T);

pub trait ProbeDebug {
    fn show(&self) -> String;
}

impl<T: Debug + ?Sized> ProbeDebug for DebugProbe<'_, T> {
    fn show(&self) -> String {
        format!("{:?}", self.0)
    }
}

pub trait ProbeOpaque {
    fn show(&self) -> String;
}

impl<T: ?Sized> ProbeOpaque for &DebugProbe<'_, T> {
    fn show(&self) -> String {
        String::from("?")
    }
}

#[cfg(test)]
mod t {
    use super::*;

    struct Opaque;

    #[test]
    fn default() {
        let f = (&DefaultProbe::<Option<String>>::new()).default_fn();
        assert_eq!(Some(None), f.map(|f| f()));
        let f = (&DefaultProbe::<i32>::new()).default_fn();
        assert_eq!(Some(0), f.map(|f| f()));
        assert!((&DefaultProbe::<Opaque>::new()).default_fn().is_none());
    }

    #[test]
    fn clone() {
        let f = (&CloneProbe::<String>::new()).clone_fn().unwrap();
        assert_eq!("x", f(&String::from("x")));
        assert!((&CloneProbe::<Opaque>::new()).clone_fn().is_none());
    }

    #[test]
    fn debug() {
        let x = String::from("x");
        assert_eq!("\"x\"", (&DebugProbe(&x)).show());
        assert_eq!("42", (&DebugProbe(&42u8)).show());
        assert_eq!("?", (&DebugProbe(&Opaque)).show());
    }
}
