use bitflags::bitflags;

bitflags! {
    /// Contracts a type declares when it is exported from the hosting assembly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Capabilities: u32 {
        /// The type processes HTTP requests and can be mounted in the dispatch table.
        const REQUEST_HANDLER = 1 << 0;
        /// The type observes messages in the processing pipeline.
        const MESSAGE_HANDLER = 1 << 1;
        /// The type reports unhandled exceptions.
        const EXCEPTION_LOGGER = 1 << 2;
        /// The type is shared state resolvable from the service container.
        const SERVICE = 1 << 3;
    }
}

/// Structural category of an exported type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A struct with behavior; the only kind that can be instantiated as a handler.
    Class,
    /// A contract without state.
    Interface,
    /// A plain value (enum or newtype).
    Value,
}

impl TypeKind {
    #[must_use]
    pub const fn is_class(self) -> bool {
        matches!(self, Self::Class)
    }
}
