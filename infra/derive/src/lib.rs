#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the host infrastructure.
//! This crate provides attribute macros that replace runtime reflection with
//! compile-time metadata: error enums, injectable services and exported types
//! that the hosting assembly enumerates during handler discovery.
//!
//! ## Usage
//! Add the crate under `dependencies` of a consuming crate inside the workspace:
//! ```toml
//! [dependencies]
//! idsrv-derive.workspace = true
//! ```
//!
//! See each macro’s docstring for examples; they are `ignore`d to avoid compiling in this crate,
//! but should be copied into consuming crates’ tests as needed.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `#[source]` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&str>` and `From<String>` implementations
///   if an `Internal` variant is present.
/// * **Kind**: Generates `kind()` returning the variant name, for structured log fields.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]` (compatible with `thiserror`).
/// 4. Tuple or unit variants are rejected to keep error wiring explicit and reliable.
///
/// # Example
///
/// ```rust,ignore
/// use idsrv_derive::idsrv_error;
/// use std::borrow::Cow;
///
/// #[idsrv_error]
/// pub enum ConfigError {
///     #[error("Config error{}: {source}", format_context(.context))]
///     Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn idsrv_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define an injectable service handle.
///
/// This macro transforms a struct into a shared service:
/// 1. Generates a thread-safe `Arc` wrapper around `<Name>Inner`.
/// 2. Implements `Deref` for transparent access to the inner state.
/// 3. Implements `Service` so the value can be registered in the service container.
///
/// # Example
/// ```rust,ignore
/// #[idsrv_derive::idsrv_service]
/// pub struct Identity {
///     pub issuer: String,
/// }
///
/// fn init() -> RegisteredService {
///     Identity::new(IdentityInner { issuer: "https://id".to_owned() }).into_registered()
/// }
/// ```
#[proc_macro_attribute]
pub fn idsrv_service(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::service::expand_service(input).into()
}

/// Attribute macro that records a type in the hosting assembly's type table.
///
/// Generates an associated `EXPORTED_TYPE` constant holding a
/// `TypeRegistration` with the type's identity (`module_path!()::Name`),
/// structural kind, abstractness and declared capabilities. Concrete handler
/// classes also get an activator, which requires `Activate + HttpHandler`
/// at compile time.
///
/// # Arguments
///
/// * `handler` - Declares the request-handler capability.
/// * `is_abstract` - Marks the type as non-instantiable; no activator is generated.
/// * `kind = class | interface | value` - Overrides the kind (structs are classes, enums values).
/// * `route = "/prefix"` - Mount point for the handler's routes.
/// * `capabilities(message_handler, service, ...)` - Additional capabilities.
///
/// # Example
/// ```rust,ignore
/// #[exported_type(handler, route = "/.well-known")]
/// #[derive(Debug)]
/// pub struct DiscoveryEndpoint {
///     identity: Identity,
/// }
///
/// pub const TYPES: &[TypeRegistration] = &[DiscoveryEndpoint::EXPORTED_TYPE];
/// ```
#[proc_macro_attribute]
pub fn exported_type(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::exported::expand_exported(args.into(), input).into()
}
