use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Expr, Ident, Lit, LitStr, Meta, Token};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Class,
    Interface,
    Value,
}

struct ExportArgs {
    handler: bool,
    is_abstract: bool,
    kind: Option<Kind>,
    route: Option<LitStr>,
    capabilities: Vec<Ident>,
}

const KNOWN_CAPABILITIES: &[(&str, &str)] = &[
    ("handler", "REQUEST_HANDLER"),
    ("request_handler", "REQUEST_HANDLER"),
    ("message_handler", "MESSAGE_HANDLER"),
    ("exception_logger", "EXCEPTION_LOGGER"),
    ("service", "SERVICE"),
];

/// Expands the `#[exported_type]` attribute macro.
pub fn expand_exported(args: TokenStream, input: DeriveInput) -> TokenStream {
    let args = match parse_args(args) {
        Ok(args) => args,
        Err(err) => return err,
    };

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "exported_type requires a non-generic type; each export has exactly one identity",
        )
        .to_compile_error();
    }

    let natural_kind = match &input.data {
        Data::Struct(_) => Kind::Class,
        Data::Enum(_) => Kind::Value,
        Data::Union(_) => {
            return syn::Error::new_spanned(&input.ident, "exported_type does not support unions")
                .to_compile_error();
        },
    };
    let kind = args.kind.unwrap_or(natural_kind);

    let ident = &input.ident;
    let kernel = quote! { ::idsrv_kernel };

    let kind_tokens = match kind {
        Kind::Class => quote! { #kernel::domain::capabilities::TypeKind::Class },
        Kind::Interface => quote! { #kernel::domain::capabilities::TypeKind::Interface },
        Kind::Value => quote! { #kernel::domain::capabilities::TypeKind::Value },
    };

    let mut flags = Vec::new();
    if args.handler {
        flags.push(Ident::new("REQUEST_HANDLER", proc_macro2::Span::call_site()));
    }
    for cap in &args.capabilities {
        let Some((_, flag)) = KNOWN_CAPABILITIES.iter().find(|(name, _)| cap == name) else {
            return syn::Error::new_spanned(
                cap,
                "Unknown capability; expected handler, message_handler, exception_logger or service",
            )
            .to_compile_error();
        };
        flags.push(Ident::new(flag, cap.span()));
    }
    let capabilities = quote! {
        #kernel::domain::capabilities::Capabilities::empty()
            #( .union(#kernel::domain::capabilities::Capabilities::#flags) )*
    };

    let route = args.route.as_ref().map_or_else(|| quote! { None }, |lit| quote! { Some(#lit) });

    let is_abstract = args.is_abstract;
    let activator = if args.handler && !is_abstract && kind == Kind::Class {
        quote! {
            Some(#kernel::discovery::activate_handler::<#ident> as #kernel::discovery::Activator)
        }
    } else {
        quote! { None }
    };

    quote! {
        #input

        #[automatically_derived]
        impl #ident {
            /// Compile-time registration record for the hosting assembly.
            pub const EXPORTED_TYPE: #kernel::discovery::TypeRegistration =
                #kernel::discovery::TypeRegistration {
                    name: concat!(module_path!(), "::", stringify!(#ident)),
                    kind: #kind_tokens,
                    is_abstract: #is_abstract,
                    capabilities: #capabilities,
                    route: #route,
                    activator: #activator,
                };
        }
    }
}

fn parse_args(args: TokenStream) -> Result<ExportArgs, TokenStream> {
    let parser = Punctuated::<Meta, Token![,]>::parse_terminated;
    let metas = parser.parse2(args).map_err(|err| err.to_compile_error())?;

    let mut parsed = ExportArgs {
        handler: false,
        is_abstract: false,
        kind: None,
        route: None,
        capabilities: Vec::new(),
    };

    for meta in metas {
        match meta {
            Meta::Path(path) if path.is_ident("handler") => parsed.handler = true,
            Meta::Path(path) if path.is_ident("is_abstract") => parsed.is_abstract = true,
            Meta::NameValue(nv) if nv.path.is_ident("kind") => {
                if parsed.kind.is_some() {
                    return Err(error(&nv, "Duplicate `kind` argument"));
                }
                parsed.kind = Some(parse_kind(&nv.value)?);
            },
            Meta::NameValue(nv) if nv.path.is_ident("route") => {
                if parsed.route.is_some() {
                    return Err(error(&nv, "Duplicate `route` argument"));
                }
                let Expr::Lit(expr) = &nv.value else {
                    return Err(error(&nv.value, "route must be a string literal"));
                };
                let Lit::Str(lit) = &expr.lit else {
                    return Err(error(&nv.value, "route must be a string literal"));
                };
                parsed.route = Some(lit.clone());
            },
            Meta::List(list) if list.path.is_ident("capabilities") => {
                let idents = list
                    .parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)
                    .map_err(|err| err.to_compile_error())?;
                parsed.capabilities.extend(idents);
            },
            other => {
                return Err(error(
                    &other,
                    "Unsupported argument; expected handler, is_abstract, kind = ..., route = \"...\" or capabilities(...)",
                ));
            },
        }
    }

    Ok(parsed)
}

fn parse_kind(value: &Expr) -> Result<Kind, TokenStream> {
    let Expr::Path(path) = value else {
        return Err(error(value, "kind must be one of: class, interface, value"));
    };
    match path.path.get_ident().map(ToString::to_string).as_deref() {
        Some("class") => Ok(Kind::Class),
        Some("interface") => Ok(Kind::Interface),
        Some("value") => Ok(Kind::Value),
        _ => Err(error(value, "kind must be one of: class, interface, value")),
    }
}

fn error(tokens: &impl quote::ToTokens, message: &str) -> TokenStream {
    syn::Error::new_spanned(tokens, message).to_compile_error()
}
