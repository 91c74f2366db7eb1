use std::borrow::Cow;

/// A specialized [`IdentityError`] enum of this crate.
#[idsrv_derive::idsrv_error]
pub enum IdentityError {
    /// Invalid identity configuration (origin, signing key, scopes).
    #[error("Identity config error{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The configured public key is not a valid Ed25519 point encoding.
    #[error("Invalid signing key{}: {source}", format_context(.context))]
    InvalidKey { source: ed25519_dalek::SignatureError, context: Option<Cow<'static, str>> },

    #[error("Invalid scope '{scope}'{}", format_context(.context))]
    InvalidScope { scope: String, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal identity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
