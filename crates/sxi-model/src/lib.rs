//! Searx instance list model
//!
//! The validated, ordered list of searx instances and its YAML form:
//!
//! - [`url`]: canonical URL form and the https / onion-http scheme rule
//! - [`Instance`], [`AdditionalUrls`]: instance records
//! - [`InstanceList`]: the store, unique and canonical URLs only
//! - [`codec`]: deterministic YAML encode / decode
//! - [`ListFile`]: the list on disk
//!
//! # Example
//!
//! ```rust
//! use sxi_model::{codec, Instance, InstanceList};
//!
//! let mut list = InstanceList::new();
//! list.insert("https://searx.me", Instance::new().with_safe(true))?;
//!
//! let text = codec::encode(&list)?;
//! assert_eq!(codec::decode(&text)?, list);
//! # Ok::<(), sxi_model::ModelError>(())
//! ```

pub mod codec;
pub mod error;
pub mod instance;
pub mod list;
pub mod storage;
pub mod url;

pub use codec::RecordKind;
pub use error::{ModelError, ModelResult};
pub use instance::{AdditionalUrls, Instance};
pub use list::InstanceList;
pub use storage::{ListFile, DEFAULT_LIST_PATH};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
