// vim: tw=80
//! Code generation for a single proxied method.
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    *,
    spanned::Spanned
};

use crate::{has_impl_trait, has_nested_ref, owned_type};

/// Property role of a method
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Role {
    Plain,
    Getter(String),
    Setter(String),
}

struct ProxyArg {
    ident: Ident,
    ty: Type,
}

impl ProxyArg {
    /// Expression that captures the argument for matching
    fn capture(&self) -> TokenStream {
        let ident = &self.ident;
        if let Type::Reference(_) = self.ty {
            quote!(::std::borrow::ToOwned::to_owned(&*#ident))
        } else {
            quote!(#ident)
        }
    }
}

pub(crate) struct ProxyMethod {
    /// Signature used in the trait implementation, with `mut` removed from the
    /// argument bindings
    sig: Signature,
    args: Vec<ProxyArg>,
    /// Return type, or `()`
    output: Type,
    by_ref: bool,
    slot: usize,
    pub role: Role,
}

impl ProxyMethod {
    pub fn new(item: &TraitItemFn, slot: usize) -> Result<Self> {
        let mut sig = item.sig.clone();
        if let Some(a) = &sig.asyncness {
            return Err(Error::new(a.span(),
                "#[mockable] does not support async methods"));
        }
        if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some()
        {
            return Err(Error::new(sig.generics.span(),
                "#[mockable] does not support generic methods"));
        }
        if let Some(v) = &sig.variadic {
            return Err(Error::new(v.span(),
                "#[mockable] does not support variadic methods"));
        }
        let by_ref = match sig.inputs.first() {
            Some(FnArg::Receiver(r)) if r.colon_token.is_none() => {
                r.reference.is_some()
            },
            Some(FnArg::Receiver(r)) => {
                return Err(Error::new(r.span(),
                    "#[mockable] only supports self, &self, and &mut self \
                    receivers"));
            },
            _ => {
                return Err(Error::new(sig.ident.span(),
                    "#[mockable] can't proxy methods without a self receiver"));
            }
        };
        let mut args = Vec::new();
        for fn_arg in sig.inputs.iter_mut().skip(1) {
            let FnArg::Typed(pt) = fn_arg else {
                return Err(Error::new(fn_arg.span(), "Unexpected receiver"));
            };
            pt.attrs.clear();
            let ident = match pt.pat.as_mut() {
                Pat::Ident(pi) if pi.by_ref.is_none() && pi.subpat.is_none()
                    => {
                    pi.mutability = None;
                    pi.ident.clone()
                },
                pat => return Err(Error::new(pat.span(),
                    "#[mockable] requires arguments to be plain identifiers"))
            };
            if has_impl_trait(&pt.ty) {
                return Err(Error::new(pt.ty.span(),
                    "#[mockable] does not support impl Trait arguments"));
            }
            if has_nested_ref(&pt.ty) {
                return Err(Error::new(pt.ty.span(),
                    "#[mockable] does not support references nested in \
                    argument types"));
            }
            args.push(ProxyArg { ident, ty: (*pt.ty).clone() });
        }
        let output = match &sig.output {
            ReturnType::Default => parse_quote!(()),
            ReturnType::Type(_, ty) => match ty.as_ref() {
                Type::Reference(r) => return Err(Error::new(r.span(),
                    "#[mockable] does not support methods returning \
                    references")),
                ty if has_impl_trait(ty) => return Err(Error::new(ty.span(),
                    "#[mockable] does not support impl Trait return types")),
                ty if has_nested_ref(ty) => return Err(Error::new(ty.span(),
                    "#[mockable] does not support methods returning \
                    references")),
                ty => ty.clone()
            }
        };
        Ok(ProxyMethod { sig, args, output, by_ref, slot, role: Role::Plain })
    }

    fn is_unit(&self) -> bool {
        matches!(&self.output, Type::Tuple(t) if t.elems.is_empty())
    }

    pub fn name(&self) -> String {
        self.sig.ident.to_string()
    }

    /// If this method could read a property, return the property's name and
    /// type.
    pub fn getter_candidate(&self) -> Option<(String, &Type)> {
        if !self.by_ref || !self.args.is_empty() || self.is_unit() {
            return None;
        }
        let name = self.name();
        let property = name.strip_prefix("get_").unwrap_or(&name);
        Some((property.to_owned(), &self.output))
    }

    /// If this method could write a property, return the property's name and
    /// type.
    pub fn setter_candidate(&self) -> Option<(String, &Type)> {
        let name = self.name();
        let property = name.strip_prefix("set_")
            .filter(|p| !p.is_empty())?;
        match self.args.as_slice() {
            [arg] if self.by_ref && self.is_unit() => match arg.ty {
                Type::Reference(_) => None,
                ref ty => Some((property.to_owned(), ty))
            },
            _ => None
        }
    }

    /// The binding's argument type: `()`, a single type, or a tuple
    fn input_type(&self) -> TokenStream {
        let tys = self.args.iter()
            .map(|a| owned_type(&a.ty))
            .collect::<Vec<_>>();
        match tys.as_slice() {
            [] => quote!(()),
            [ty] => quote!(#ty),
            _ => quote!((#(#tys,)*))
        }
    }

    /// Entry of the capability set's method list
    pub fn sig_entry(&self) -> TokenStream {
        let name = self.name();
        let arity = self.args.len();
        let sig = quote!(::dynamock::MethodSig::new(#name, #arity));
        match &self.role {
            Role::Plain => sig,
            Role::Getter(p) => quote!(#sig.getter(#p)),
            Role::Setter(p) => quote!(#sig.setter(#p)),
        }
    }

    /// The `expect_` and `stub_` methods of the mock struct
    pub fn binding_methods(&self, vis: &Visibility) -> TokenStream {
        let name = self.name();
        let expect_ident = format_ident!("expect_{}", name);
        let stub_ident = format_ident!("stub_{}", name);
        let expect_doc = format!("Expect a call to `{name}`.");
        let stub_doc = format!("Stub `{name}`.");
        let i = self.input_type();
        let o = &self.output;
        let slot = self.slot;
        quote!(
            #[doc = #expect_doc]
            #vis fn #expect_ident(&mut self)
                -> &mut ::dynamock::Binding<#i, #o>
            {
                self.dynamock.expect::<#i, #o>(#slot)
            }
            #[doc = #stub_doc]
            #vis fn #stub_ident(&mut self)
                -> &mut ::dynamock::Binding<#i, #o>
            {
                self.dynamock.stub::<#i, #o>(#slot)
            }
        )
    }

    /// The method's implementation in the mock struct's trait impl
    pub fn impl_method(&self) -> TokenStream {
        let sig = &self.sig;
        let o = &self.output;
        let slot = self.slot;
        let mut probes = Vec::new();
        if !self.args.is_empty() {
            probes.push(quote!(ProbeDebug as _));
            probes.push(quote!(ProbeOpaque as _));
        }
        if !matches!(self.role, Role::Setter(_)) {
            probes.push(quote!(ProbeDefault as _));
            probes.push(quote!(ProbeNoDefault as _));
        }
        if matches!(self.role, Role::Getter(_)) {
            probes.push(quote!(ProbeClone as _));
            probes.push(quote!(ProbeNoClone as _));
        }
        let idents = self.args.iter().map(|a| &a.ident);
        let shown = quote!(
            let __dynamock_shown = ::std::vec![
                #((&::dynamock::__private::DebugProbe(&#idents)).show()),*
            ];
        );
        let default = quote!(
            let __dynamock_default =
                (&::dynamock::__private::DefaultProbe::<#o>::new())
                .default_fn();
        );
        let body = match &self.role {
            Role::Plain => {
                let i = self.input_type();
                let captures = self.args.iter()
                    .map(ProxyArg::capture)
                    .collect::<Vec<_>>();
                let args = match captures.as_slice() {
                    [] => quote!(()),
                    [c] => c.clone(),
                    _ => quote!((#(#captures,)*))
                };
                quote!(
                    #default
                    self.dynamock.call::<#i, #o>(#slot, #args,
                        __dynamock_shown, __dynamock_default)
                )
            },
            Role::Getter(_) => quote!(
                #default
                let __dynamock_clone =
                    (&::dynamock::__private::CloneProbe::<#o>::new())
                    .clone_fn();
                self.dynamock.get_property::<#o>(#slot, __dynamock_shown,
                    __dynamock_default, __dynamock_clone)
            ),
            Role::Setter(_) => {
                let ProxyArg { ident, ty } = &self.args[0];
                quote!(
                    self.dynamock.set_property::<#ty>(#slot, #ident,
                        __dynamock_shown)
                )
            }
        };
        quote!(
            #sig {
                #[allow(unused_imports)]
                use ::dynamock::__private::{#(#probes),*};
                #shown
                #body
            }
        )
    }
}
