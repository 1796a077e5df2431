// vim: tw=80
//! Per-mock store of bindings.
use crate::{
    Capabilities,
    expectation::{AnyBindings, Binding, BindingKind, Bindings}
};

/// Bindings of one mock object, one slot per proxied method.
///
/// Each slot holds the [`Bindings`] of its method, created on first use with
/// that method's argument and return types.
pub(crate) struct Ledger {
    slots: Vec<Option<Box<dyn AnyBindings>>>,
    /// Declaration order of the next binding, across all slots
    next_id: usize,
}

impl Ledger {
    pub fn new(nslots: usize) -> Self {
        Ledger {
            slots: (0..nslots).map(|_| None).collect(),
            next_id: 0
        }
    }

    /// Create a new binding in `slot`.
    pub fn bind<I: 'static, O: 'static>(&mut self, slot: usize,
                                        kind: BindingKind, method: &str)
        -> &mut Binding<I, O>
    {
        let id = self.next_id;
        self.next_id += 1;
        let entry = self.slots.get_mut(slot)
            .unwrap_or_else(|| panic!("{method}: no such method slot {slot}"));
        let bindings: &mut Bindings<I, O> = entry
            .get_or_insert_with(|| Box::new(Bindings::<I, O>::new()))
            .downcast_mut()
            .unwrap_or_else(|_| panic!(
                "{method}: bindings registered with mismatched argument or \
                return types"));
        bindings.push(id, kind)
    }

    /// The bindings of `slot`, if any were ever created.
    pub fn bindings_mut<I: 'static, O: 'static>(&mut self, slot: usize,
                                                method: &str)
        -> Option<&mut Bindings<I, O>>
    {
        let entry = self.slots.get_mut(slot)?.as_mut()?;
        Some(entry.downcast_mut()
            .unwrap_or_else(|_| panic!(
                "{method}: called with argument or return types that differ \
                from its bindings")))
    }

    pub fn clear(&mut self) {
        for entry in self.slots.iter_mut() {
            *entry = None;
        }
    }

    /// Describe every unmet expectation, in declaration order.
    pub fn unmet(&self, caps: &Capabilities) -> Vec<String> {
        let mut unmet = Vec::new();
        for (slot, entry) in self.slots.iter().enumerate() {
            let Some(bindings) = entry else {
                continue;
            };
            let method = caps.method(slot).map_or("?", |m| m.name());
            unmet.extend(bindings.unmet().into_iter().map(|(id, desc)| {
                (id, format!("{}::{}{}", caps.name(), method, desc))
            }));
        }
        unmet.sort_by_key(|(id, _)| *id);
        unmet.into_iter()
            .map(|(_, desc)| desc)
            .collect()
    }
}
