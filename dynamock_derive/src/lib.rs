// vim: tw=80
//! Proc Macros for use with Dynamock
//!
//! You probably don't want to use this crate directly.  Instead, you use its
//! reexports via the [`dynamock`](../dynamock/index.html) crate.

extern crate proc_macro;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    *,
    spanned::Spanned
};

mod mockable_trait;
mod proxy_method;

use crate::mockable_trait::MockableTrait;

/// Generate a mock identifier from the regular one: eg "Foo" => "MockFoo"
fn gen_mock_ident(ident: &Ident) -> Ident {
    format_ident!("Mock{}", ident)
}

/// The type in which an argument is captured for matching.
///
/// References can't outlive the call, so `&T` and `&mut T` are captured as
/// `T::Owned`.  Everything else is captured as-is.
fn owned_type(ty: &Type) -> Type {
    match ty {
        Type::Reference(r) => {
            let elem = &r.elem;
            parse_quote!(<#elem as ::std::borrow::ToOwned>::Owned)
        },
        Type::Paren(p) => owned_type(&p.elem),
        _ => ty.clone()
    }
}

/// Whether `f` holds for `ty` or any type nested within it.
fn type_contains(ty: &Type, f: &dyn Fn(&Type) -> bool) -> bool {
    if f(ty) {
        return true;
    }
    match ty {
        Type::Array(a) => type_contains(&a.elem, f),
        Type::Group(g) => type_contains(&g.elem, f),
        Type::Paren(p) => type_contains(&p.elem, f),
        Type::Ptr(p) => type_contains(&p.elem, f),
        Type::Reference(r) => type_contains(&r.elem, f),
        Type::Slice(s) => type_contains(&s.elem, f),
        Type::Tuple(t) => t.elems.iter().any(|ty| type_contains(ty, f)),
        Type::Path(tp) => tp.path.segments.iter().any(|seg| {
            match &seg.arguments {
                PathArguments::AngleBracketed(abga) => {
                    abga.args.iter().any(|ga| match ga {
                        GenericArgument::Type(ty) => type_contains(ty, f),
                        _ => false
                    })
                },
                PathArguments::Parenthesized(pga) => {
                    pga.inputs.iter().any(|ty| type_contains(ty, f)) ||
                        match &pga.output {
                            ReturnType::Type(_, ty) => type_contains(ty, f),
                            ReturnType::Default => false
                        }
                },
                PathArguments::None => false
            }
        }),
        _ => false
    }
}

/// Whether a type mentions `impl Trait` anywhere.
fn has_impl_trait(ty: &Type) -> bool {
    type_contains(ty, &|ty| matches!(ty, Type::ImplTrait(_)))
}

/// Whether a type borrows anything below its top level, like `Option<&str>`
/// or `&[&str]`.
fn has_nested_ref(ty: &Type) -> bool {
    let is_ref = |ty: &Type| matches!(ty, Type::Reference(_));
    match ty {
        Type::Reference(r) => type_contains(&r.elem, &is_ref),
        Type::Paren(p) => has_nested_ref(&p.elem),
        _ => type_contains(ty, &is_ref)
    }
}

fn do_mockable(attrs: TokenStream, input: TokenStream) -> TokenStream {
    if !attrs.is_empty() {
        return Error::new(attrs.span(), "#[mockable] takes no arguments")
            .to_compile_error();
    }
    let item: Item = match parse2(input) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error()
    };
    let item_trait = match item {
        Item::Trait(item_trait) => item_trait,
        _ => return Error::new(item.span(),
                "#[mockable] can only be applied to traits")
            .to_compile_error()
    };
    match MockableTrait::new(&item_trait) {
        Ok(mt) => quote!(#item_trait #mt),
        Err(e) => {
            let e = e.to_compile_error();
            quote!(#item_trait #e)
        }
    }
}

/// Automatically generate a mock object for a trait.
///
/// It generates a struct whose name is the trait's, prepended with "Mock".
/// The struct implements the trait by routing every method to a
/// [`dynamock::Mock`](../dynamock/struct.Mock.html).  For each method `foo`
/// of the trait, the struct has an `expect_foo` method that adds an
/// expectation, and a `stub_foo` method that adds a stub.
///
/// A zero-argument method `foo` or `get_foo` and a one-argument method
/// `set_foo` taking the type that the first one returns form the property
/// `foo`.  Stateful mocks store properties as fields.
///
/// # Restrictions
///
/// The trait must have at least one method, and every method must:
///
/// * take `self`, `&self`, or `&mut self`,
/// * have no generic parameters, and not be `async`,
/// * name all of its arguments with plain identifiers,
/// * borrow only at the top level of an argument's type: `&str` works, but
///   `Option<&str>` and `&[&str]` don't,
/// * return an owned type, not a reference or `impl Trait`.
///
/// Generic traits aren't supported, and the only supertraits allowed are
/// `Send` and `Sync`.
///
/// # Examples
///
/// ```
/// # use dynamock_derive::*;
/// #[mockable]
/// pub trait Foo {
///     fn foo(&self, key: i16) -> u32;
/// }
/// ```
///
/// A trait without any methods has nothing to mock:
/// ```compile_fail
/// # use dynamock_derive::*;
/// #[mockable]
/// pub trait Marker {}
/// ```
#[proc_macro_attribute]
pub fn mockable(attrs: proc_macro::TokenStream,
                input: proc_macro::TokenStream) -> proc_macro::TokenStream
{
    do_mockable(attrs.into(), input.into()).into()
}
