use tracing::debug;

const IDENTITY_TARGET: &str = "idsrv::identity";

/// Notable protocol-level occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityEvent {
    DiscoveryDocumentServed,
    KeySetServed { keys: usize },
}

/// Receives identity events. Exported with the message-handler capability only,
/// so discovery never mounts it as a request handler.
#[idsrv_derive::exported_type(capabilities(message_handler))]
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityEvents;

impl IdentityEvents {
    pub fn publish(self, event: IdentityEvent) {
        match event {
            IdentityEvent::DiscoveryDocumentServed => {
                debug!(target: IDENTITY_TARGET, "Discovery document served");
            },
            IdentityEvent::KeySetServed { keys } => {
                debug!(target: IDENTITY_TARGET, keys, "Key set served");
            },
        }
    }
}
