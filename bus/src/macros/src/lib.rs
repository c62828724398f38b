mod capability;
mod event;
mod listener;

use proc_macro::TokenStream;

#[proc_macro_derive(Event)]
pub fn derive_event(item: TokenStream) -> TokenStream {
    event::derive_event(item)
}

#[proc_macro_derive(Listener, attributes(listens))]
pub fn derive_listener(item: TokenStream) -> TokenStream {
    listener::derive_listener(item)
}

#[proc_macro_attribute]
pub fn capability(attr: TokenStream, item: TokenStream) -> TokenStream {
    capability::expand(attr, item)
}
