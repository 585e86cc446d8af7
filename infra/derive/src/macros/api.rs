use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemFn;

/// Expands `#[api_handler]`: forwards the arguments to `utoipa::path` behind the
/// consumer's `server` feature and silences `unused_async` for extractor-only handlers.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}
