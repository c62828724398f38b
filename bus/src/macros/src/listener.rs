use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{DeriveInput, Path, Token, parse_macro_input};

pub fn derive_listener(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    // Every `#[listens(A, B)]` attribute contributes its contracts, in order.
    let mut contracts: Vec<Path> = Vec::new();
    for attr in ast.attrs.iter().filter(|attr| attr.path().is_ident("listens")) {
        match attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated) {
            Ok(list) => contracts.extend(list),
            Err(err) => return err.to_compile_error().into(),
        }
    }

    TokenStream::from(quote! {
        impl #impl_generics ::rusty_bus::Listener for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn capabilities(
                self: ::std::sync::Arc<Self>,
                caps: &mut ::rusty_bus::Capabilities,
            ) {
                #(
                    caps.add::<dyn #contracts>(
                        ::std::sync::Arc::clone(&self) as ::std::sync::Arc<dyn #contracts>
                    );
                )*
            }
        }
    })
}
