// vim: tw=80
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use std::collections::HashMap;
use syn::{
    *,
    spanned::Spanned
};

use crate::{
    gen_mock_ident,
    proxy_method::{ProxyMethod, Role}
};

/// A trait annotated with `#[mockable]`, ready to generate its mock struct.
pub(crate) struct MockableTrait {
    vis: Visibility,
    trait_ident: Ident,
    mock_ident: Ident,
    unsafety: Option<Token![unsafe]>,
    methods: Vec<ProxyMethod>,
}

/// Only auto traits can be implemented without knowing their methods.
fn check_supertrait(bound: &TypeParamBound) -> Result<()> {
    match bound {
        TypeParamBound::Trait(tb) => {
            let last = tb.path.segments.last();
            if last.is_some_and(|seg| seg.ident == "Send" || seg.ident == "Sync")
            {
                Ok(())
            } else {
                Err(Error::new(tb.span(),
                    "#[mockable] only supports Send and Sync supertraits"))
            }
        },
        _ => Ok(())
    }
}

/// Pair each getter with the setter of the same property, and mark both.
///
/// A property is only recognized when exactly one getter and one setter
/// agree on its type.
fn find_properties(methods: &mut [ProxyMethod]) {
    let mut getters: HashMap<String, Vec<(usize, String)>> = HashMap::new();
    let mut setters: HashMap<String, Vec<(usize, String)>> = HashMap::new();
    for (i, m) in methods.iter().enumerate() {
        if let Some((p, ty)) = m.getter_candidate() {
            let ty = ty.to_token_stream().to_string();
            getters.entry(p).or_default().push((i, ty));
        }
        if let Some((p, ty)) = m.setter_candidate() {
            let ty = ty.to_token_stream().to_string();
            setters.entry(p).or_default().push((i, ty));
        }
    }
    for (property, g) in getters.into_iter() {
        let Some(s) = setters.get(&property) else {
            continue;
        };
        if let ([(gi, gty)], [(si, sty)]) = (g.as_slice(), s.as_slice()) {
            if gty == sty {
                methods[*gi].role = Role::Getter(property.clone());
                methods[*si].role = Role::Setter(property);
            }
        }
    }
}

impl MockableTrait {
    pub fn new(item: &ItemTrait) -> Result<Self> {
        if !item.generics.params.is_empty() {
            return Err(Error::new(item.generics.span(),
                "#[mockable] does not support generic traits"));
        }
        let mut errors: Option<Error> = None;
        let mut push_err = |e: Error| match errors.as_mut() {
            Some(errors) => errors.combine(e),
            None => errors = Some(e)
        };
        for bound in item.supertraits.iter() {
            if let Err(e) = check_supertrait(bound) {
                push_err(e);
            }
        }
        let mut methods = Vec::new();
        for ti in item.items.iter() {
            match ti {
                TraitItem::Fn(tif) => {
                    match ProxyMethod::new(tif, methods.len()) {
                        Ok(m) => methods.push(m),
                        Err(e) => push_err(e)
                    }
                },
                TraitItem::Const(tic) => push_err(Error::new(tic.span(),
                    "#[mockable] does not support associated constants")),
                TraitItem::Type(tit) => push_err(Error::new(tit.span(),
                    "#[mockable] does not support associated types")),
                _ => push_err(Error::new(ti.span(),
                    "#[mockable] does not support this trait item"))
            }
        }
        if let Some(e) = errors {
            return Err(e);
        }
        if methods.is_empty() {
            return Err(Error::new(item.ident.span(),
                "cannot proxy a trait with no overridable methods"));
        }
        find_properties(&mut methods);
        Ok(MockableTrait {
            vis: item.vis.clone(),
            trait_ident: item.ident.clone(),
            mock_ident: gen_mock_ident(&item.ident),
            unsafety: item.unsafety,
            methods
        })
    }
}

impl ToTokens for MockableTrait {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let MockableTrait { vis, trait_ident, mock_ident, unsafety, methods }
            = self;
        let name = trait_ident.to_string();
        let struct_doc = format!("Mock object for [`{name}`]");
        let sigs = methods.iter().map(ProxyMethod::sig_entry);
        let bindings = methods.iter().map(|m| m.binding_methods(vis));
        let impls = methods.iter().map(ProxyMethod::impl_method);
        quote!(
            #[doc = #struct_doc]
            #vis struct #mock_ident {
                dynamock: ::dynamock::Mock,
            }
            impl ::std::fmt::Debug for #mock_ident {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>)
                    -> ::std::fmt::Result
                {
                    ::std::fmt::Debug::fmt(&self.dynamock, f)
                }
            }
            impl ::std::default::Default for #mock_ident {
                fn default() -> Self {
                    Self::new(::dynamock::Mode::Strict)
                }
            }
            #[allow(dead_code)]
            impl #mock_ident {
                const METHODS: &'static [::dynamock::MethodSig] = &[
                    #(#sigs),*
                ];
                #[doc = "Create a mock object in the given mode."]
                #vis fn new(mode: ::dynamock::Mode) -> Self {
                    let caps = ::dynamock::Capabilities::declared(#name,
                        Self::METHODS);
                    <Self as ::dynamock::Proxy>::from_mock(
                        ::dynamock::Mock::new(mode, caps))
                }
                #[doc = "Create a strict mock object."]
                #vis fn strict() -> Self {
                    Self::new(::dynamock::Mode::Strict)
                }
                #[doc = "Create a lenient mock object."]
                #vis fn lenient() -> Self {
                    Self::new(::dynamock::Mode::Lenient)
                }
                #[doc = "Create a stateful stub."]
                #vis fn stub() -> Self {
                    Self::new(::dynamock::Mode::Stateful)
                }
                #[doc = "All calls received so far, in order."]
                #vis fn calls(&self) -> ::std::vec::Vec<::dynamock::CallRecord>
                {
                    self.dynamock.calls()
                }
                #[doc = "Verify all expectations, then clear all bindings."]
                #vis fn checkpoint(&mut self) {
                    self.dynamock.checkpoint()
                }
                #[doc = "Check all expectations without failing."]
                #vis fn try_verify_all(&self)
                    -> ::std::result::Result<(), ::dynamock::ExpectationViolation>
                {
                    self.dynamock.try_verify_all()
                }
                #[doc = "Fail unless every expectation has been met."]
                #vis fn verify_all_expectations(&self) {
                    self.dynamock.verify_all()
                }
                #(#bindings)*
            }
            impl ::dynamock::Proxy for #mock_ident {
                const NAME: &'static str = #name;
                fn methods() -> &'static [::dynamock::MethodSig] {
                    Self::METHODS
                }
                fn from_mock(mock: ::dynamock::Mock) -> Self {
                    #mock_ident { dynamock: mock }
                }
                fn mock(&self) -> &::dynamock::Mock {
                    &self.dynamock
                }
                fn mock_mut(&mut self) -> &mut ::dynamock::Mock {
                    &mut self.dynamock
                }
            }
            #unsafety impl #trait_ident for #mock_ident {
                #(#impls)*
            }
        ).to_tokens(tokens);
    }
}

#[cfg(test)]
mod t {
    use std::str::FromStr;
    use pretty_assertions::assert_eq;
    use super::*;

    fn mockable(code: &str) -> Result<MockableTrait> {
        let ts = TokenStream::from_str(code).unwrap();
        let item: ItemTrait = parse2(ts).unwrap();
        MockableTrait::new(&item)
    }

    fn check(desired: &str, code: &str) {
        let output = mockable(code).unwrap().to_token_stream().to_string();
        // Reparse both sides so proc_macro2 spaces their punctuation alike
        let output = TokenStream::from_str(&output).unwrap().to_string();
        let expected = TokenStream::from_str(desired).unwrap().to_string();
        assert_eq!(expected, output);
    }

    fn error(code: &str) -> String {
        match mockable(code) {
            Ok(_) => panic!("trait should have been rejected"),
            Err(e) => e.to_string()
        }
    }

    fn roles(code: &str) -> Vec<Role> {
        mockable(code).unwrap()
            .methods
            .into_iter()
            .map(|m| m.role)
            .collect()
    }

    #[test]
    fn one_method() {
        let desired = r#"
        #[doc = "Mock object for [`Foo`]"]
        pub struct MockFoo {
            dynamock: ::dynamock::Mock,
        }
        impl ::std::fmt::Debug for MockFoo {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>)
                -> ::std::fmt::Result
            {
                ::std::fmt::Debug::fmt(&self.dynamock, f)
            }
        }
        impl ::std::default::Default for MockFoo {
            fn default() -> Self {
                Self::new(::dynamock::Mode::Strict)
            }
        }
        #[allow(dead_code)]
        impl MockFoo {
            const METHODS: &'static [::dynamock::MethodSig] = &[
                ::dynamock::MethodSig::new("foo", 1usize)
            ];
            #[doc = "Create a mock object in the given mode."]
            pub fn new(mode: ::dynamock::Mode) -> Self {
                let caps = ::dynamock::Capabilities::declared("Foo",
                    Self::METHODS);
                <Self as ::dynamock::Proxy>::from_mock(
                    ::dynamock::Mock::new(mode, caps))
            }
            #[doc = "Create a strict mock object."]
            pub fn strict() -> Self {
                Self::new(::dynamock::Mode::Strict)
            }
            #[doc = "Create a lenient mock object."]
            pub fn lenient() -> Self {
                Self::new(::dynamock::Mode::Lenient)
            }
            #[doc = "Create a stateful stub."]
            pub fn stub() -> Self {
                Self::new(::dynamock::Mode::Stateful)
            }
            #[doc = "All calls received so far, in order."]
            pub fn calls(&self) -> ::std::vec::Vec<::dynamock::CallRecord> {
                self.dynamock.calls()
            }
            #[doc = "Verify all expectations, then clear all bindings."]
            pub fn checkpoint(&mut self) {
                self.dynamock.checkpoint()
            }
            #[doc = "Check all expectations without failing."]
            pub fn try_verify_all(&self)
                -> ::std::result::Result<(), ::dynamock::ExpectationViolation>
            {
                self.dynamock.try_verify_all()
            }
            #[doc = "Fail unless every expectation has been met."]
            pub fn verify_all_expectations(&self) {
                self.dynamock.verify_all()
            }
            #[doc = "Expect a call to `foo`."]
            pub fn expect_foo(&mut self) -> &mut ::dynamock::Binding<u32, u32> {
                self.dynamock.expect::<u32, u32>(0usize)
            }
            #[doc = "Stub `foo`."]
            pub fn stub_foo(&mut self) -> &mut ::dynamock::Binding<u32, u32> {
                self.dynamock.stub::<u32, u32>(0usize)
            }
        }
        impl ::dynamock::Proxy for MockFoo {
            const NAME: &'static str = "Foo";
            fn methods() -> &'static [::dynamock::MethodSig] {
                Self::METHODS
            }
            fn from_mock(mock: ::dynamock::Mock) -> Self {
                MockFoo { dynamock: mock }
            }
            fn mock(&self) -> &::dynamock::Mock {
                &self.dynamock
            }
            fn mock_mut(&mut self) -> &mut ::dynamock::Mock {
                &mut self.dynamock
            }
        }
        impl Foo for MockFoo {
            fn foo(&self, x: u32) -> u32 {
                #[allow(unused_imports)]
                use ::dynamock::__private::{
                    ProbeDebug as _,
                    ProbeOpaque as _,
                    ProbeDefault as _,
                    ProbeNoDefault as _
                };
                let __dynamock_shown = ::std::vec![
                    (&::dynamock::__private::DebugProbe(&x)).show()
                ];
                let __dynamock_default =
                    (&::dynamock::__private::DefaultProbe::<u32>::new())
                    .default_fn();
                self.dynamock.call::<u32, u32>(0usize, x, __dynamock_shown,
                    __dynamock_default)
            }
        }"#;
        let code = r#"
        pub trait Foo {
            fn foo(&self, mut x: u32) -> u32;
        }"#;
        check(desired, code);
    }

    #[test]
    fn properties() {
        let r = roles(r#"
        trait Widget {
            fn id(&self) -> i32;
            fn set_id(&mut self, id: i32);
            fn get_name(&self) -> Option<String>;
            fn set_name(&mut self, name: Option<String>);
            fn size(&self) -> u64;
            fn set_size(&mut self, size: u32);
            fn set_color(&mut self, color: u32);
            fn refresh(&mut self);
        }"#);
        assert_eq!(r, vec![
            Role::Getter(String::from("id")),
            Role::Setter(String::from("id")),
            Role::Getter(String::from("name")),
            Role::Setter(String::from("name")),
            Role::Plain,
            Role::Plain,
            Role::Plain,
            Role::Plain,
        ]);
    }

    #[test]
    fn ambiguous_property() {
        let r = roles(r#"
        trait Widget {
            fn name(&self) -> String;
            fn get_name(&self) -> String;
            fn set_name(&mut self, name: String);
        }"#);
        assert_eq!(r, vec![Role::Plain, Role::Plain, Role::Plain]);
    }

    #[test]
    fn setter_entry() {
        let out = mockable(r#"
        trait Widget {
            fn id(&self) -> i32;
            fn set_id(&mut self, id: i32);
        }"#).unwrap().to_token_stream().to_string();
        let setter = quote!(
            self.dynamock.set_property::<i32>(1usize, id, __dynamock_shown)
        ).to_string();
        let entry = quote!(
            ::dynamock::MethodSig::new("set_id", 1usize).setter("id")
        ).to_string();
        assert!(out.contains(&setter));
        assert!(out.contains(&entry));
    }

    #[test]
    fn send_sync_supertraits() {
        assert!(mockable("trait Foo: Send + Sync + 'static { fn foo(&self); }")
            .is_ok());
    }

    #[test]
    fn other_supertraits() {
        assert!(error("trait Foo: Clone { fn foo(&self); }")
            .contains("only supports Send and Sync supertraits"));
    }

    #[test]
    fn empty() {
        assert_eq!(error("trait Marker {}"),
                   "cannot proxy a trait with no overridable methods");
    }

    #[test]
    fn generic_trait() {
        assert!(error("trait Foo<T> { fn foo(&self, t: T); }")
            .contains("generic traits"));
    }

    #[test]
    fn associated_type() {
        assert!(error("trait Foo { type Item; fn foo(&self); }")
            .contains("associated types"));
    }

    #[test]
    fn reports_every_bad_method() {
        let code = r#"
        trait Foo {
            fn new() -> Self;
            async fn foo(&self);
        }"#;
        let item: ItemTrait = parse2(TokenStream::from_str(code).unwrap())
            .unwrap();
        let Err(e) = MockableTrait::new(&item) else {
            panic!("trait should have been rejected");
        };
        assert_eq!(2, e.into_iter().count());
    }
}
