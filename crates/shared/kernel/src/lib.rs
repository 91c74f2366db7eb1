//! Hosting kernel shared by the server and the feature slices.
//!
//! ## Handler discovery
//! Feature crates mark types with `#[exported_type]` and publish them in an
//! `EXPORTED_TYPES` table; the facade folds every table into one
//! [`discovery::StaticAssembly`], which the hosting pipeline enumerates once.
//!
//! ```rust,ignore
//! use idsrv_kernel::discovery::StaticAssembly;
//!
//! pub static HOST_ASSEMBLY: StaticAssembly =
//!     StaticAssembly::new("idsrv", &[idsrv_kernel::server::EXPORTED_TYPES]);
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use idsrv_kernel::config::load_config;
//! let cfg: idsrv_kernel::domain::config::ApiConfig = load_config(Some("server")).unwrap();
//! ```

extern crate self as idsrv_kernel;

pub mod config;
#[cfg(feature = "server")]
pub mod discovery;
#[cfg(feature = "server")]
pub mod hosting;
#[cfg(feature = "server")]
pub mod server;

pub use idsrv_domain as domain;
