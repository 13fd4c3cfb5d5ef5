use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one and inject a
/// [`rocket::local::asynchronous::Client`] talking to a server over a fresh
/// in-memory election.
///
/// With `#[backend_test(operator)]`, the client is logged in as the bootstrap
/// operator before the test body runs.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract the injected arguments and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Log in the client as the operator if needed.
    let login = match parse_macro_input!(args as Option<Ident>) {
        None => quote! {},
        Some(arg) if arg == "operator" => quote! {{
            let credentials = crate::model::api::account::AccountCredentials::operator();
            let response = rocket_client
                .post("/auth/login")
                .header(rocket::http::ContentType::JSON)
                .body(rocket::serde::json::json!(credentials).to_string())
                .dispatch()
                .await;
            assert_eq!(
                response.status(),
                rocket::http::Status::Ok,
                "operator login failed"
            );
        }},
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected no argument or `operator`")
                .into_compile_error()
                .into();
        }
    };

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// The test itself.
            #item_fn

            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                let server = crate::test_rocket().await;
                let rocket_client = rocket::local::asynchronous::Client::tracked(server)
                    .await
                    .unwrap();

                #login

                #new_name(#(#test_args),*).await;
            });
        }
    }
    .into()
}

/// Ensure the wrapped test is async and only asks for things we can inject.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let Pat::Ident(_) = &*pat_type.pat {
                if let Type::Path(type_path) = &*pat_type.ty {
                    if let Some(type_ident) = type_path.path.get_ident() {
                        if type_ident == "Client" {
                            if has_client {
                                return Err(syn::Error::new(
                                    input.span(),
                                    "Test cannot accept more than one `Client`",
                                ));
                            }
                            has_client = true;
                            args.push(quote! { rocket_client });
                            continue;
                        }
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected `client_ident: Client`",
        ));
    }

    Ok(args)
}
