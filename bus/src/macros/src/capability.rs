use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::{
    FnArg, GenericArgument, Ident, ItemTrait, PathArguments, ReturnType, TraitItem, TraitItemFn,
    Type, TypeParamBound, parse_macro_input,
};

/// How a handler method reports its result.
enum Shape {
    /// No return type, or `()`.
    Unit,
    /// `Handled` or `Result<(), E>`.
    Fallible,
    /// Anything else, kept as written for the validation message. Result aliases without
    /// generic arguments, such as `fmt::Result`, land here too since the macro cannot see
    /// through them.
    Value(String),
}

pub fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[capability] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let item_trait = parse_macro_input!(item as ItemTrait);
    let ident = &item_trait.ident;

    if !extends_listener(&item_trait) {
        return with_error(
            &item_trait,
            syn::Error::new_spanned(ident, "capability trait must extend `Listener`"),
        );
    }
    if !item_trait.generics.params.is_empty() {
        return with_error(
            &item_trait,
            syn::Error::new_spanned(&item_trait.generics, "capability traits cannot be generic"),
        );
    }

    let methods = item_trait.items.iter().filter_map(|item| match item {
        TraitItem::Fn(method) if method.default.is_none() => Some(describe_method(ident, method)),
        _ => None,
    });

    TokenStream::from(quote! {
        #item_trait

        impl ::rusty_bus::Capability for dyn #ident {
            fn contract() -> ::rusty_bus::Contract {
                #[allow(unused_imports)]
                use ::rusty_bus::__private::{ViaEvent as _, ViaPlain as _};

                ::rusty_bus::Contract::of::<dyn #ident>()
                    #( .method(#methods) )*
            }
        }
    })
}

/// Keep the trait itself so the error is the only diagnostic.
fn with_error(item_trait: &ItemTrait, err: syn::Error) -> TokenStream {
    let err = err.to_compile_error();
    TokenStream::from(quote! {
        #item_trait
        #err
    })
}

fn extends_listener(item_trait: &ItemTrait) -> bool {
    item_trait.supertraits.iter().any(|bound| match bound {
        TypeParamBound::Trait(bound) => bound
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Listener"),
        _ => false,
    })
}

fn describe_method(contract: &Ident, method: &TraitItemFn) -> TokenStream2 {
    let name = method.sig.ident.to_string();
    let shape = shape_of(&method.sig.output);

    let params: Vec<&Type> = method
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(arg) => Some(&*arg.ty),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let output = match &shape {
        Shape::Unit => quote!(::rusty_bus::Output::Unit),
        Shape::Fallible => quote!(::rusty_bus::Output::Fallible),
        Shape::Value(written) => quote!(::rusty_bus::Output::Value(#written)),
    };

    let param_probes = params.iter().map(|ty| {
        let (inner, _) = strip_reference(ty);
        quote! {
            .param((&::rusty_bus::__private::Probe::<#inner>::new()).param())
        }
    });

    // Value-returning handlers fail validation, so they never get an invoker.
    let invoke = match (params.as_slice(), &shape) {
        (_, Shape::Value(_)) => quote!(),
        ([param], shape) if takes_shared_self(method) && method.sig.generics.params.is_empty() => {
            invoker(contract, method, param, matches!(shape, Shape::Fallible))
        }
        _ => quote!(),
    };

    quote! {
        ::rusty_bus::Method::new(#name)
            .returns(#output)
            #( #param_probes )*
            #invoke
    }
}

fn invoker(contract: &Ident, method: &TraitItemFn, param: &Type, fallible: bool) -> TokenStream2 {
    let method_ident = &method.sig.ident;
    let contract_name = contract.to_string();
    let (inner, by_ref) = strip_reference(param);
    let inner_name = inner.to_token_stream().to_string();

    let arg = if by_ref {
        quote!(event)
    } else {
        quote!(::core::clone::Clone::clone(event))
    };
    let call = quote!(listener.#method_ident(#arg));
    let body = if fallible {
        quote!(#call.map_err(::core::convert::Into::into))
    } else {
        quote! {
            #call;
            ::core::result::Result::Ok(())
        }
    };

    quote! {
        .invoke(|listener, event| {
            let ::core::option::Option::Some(listener) =
                listener.downcast_ref::<::std::sync::Arc<dyn #contract>>()
            else {
                return ::core::result::Result::Err(
                    ::rusty_bus::__private::mismatch(#contract_name, "a listener handle"),
                );
            };
            let ::core::option::Option::Some(event) =
                ::rusty_bus::Event::as_any(event).downcast_ref::<#inner>()
            else {
                return ::core::result::Result::Err(
                    ::rusty_bus::__private::mismatch(#contract_name, #inner_name),
                );
            };
            #body
        })
    }
}

fn takes_shared_self(method: &TraitItemFn) -> bool {
    matches!(
        method.sig.inputs.first(),
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none()
    )
}

fn strip_reference(ty: &Type) -> (&Type, bool) {
    match ty {
        Type::Reference(reference) => (&reference.elem, true),
        other => (other, false),
    }
}

fn shape_of(output: &ReturnType) -> Shape {
    let ty = match output {
        ReturnType::Default => return Shape::Unit,
        ReturnType::Type(_, ty) => &**ty,
    };

    match ty {
        Type::Tuple(tuple) if tuple.elems.is_empty() => Shape::Unit,
        Type::Path(path) => match path.path.segments.last() {
            Some(segment) if segment.ident == "Handled" => Shape::Fallible,
            Some(segment) if segment.ident == "Result" && ok_is_unit(&segment.arguments) => {
                Shape::Fallible
            }
            _ => Shape::Value(ty.to_token_stream().to_string()),
        },
        other => Shape::Value(other.to_token_stream().to_string()),
    }
}

fn ok_is_unit(arguments: &PathArguments) -> bool {
    let PathArguments::AngleBracketed(arguments) = arguments else {
        return false;
    };
    matches!(
        arguments.args.first(),
        Some(GenericArgument::Type(Type::Tuple(tuple))) if tuple.elems.is_empty()
    )
}
