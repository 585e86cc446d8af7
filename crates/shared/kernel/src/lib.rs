//! Kernel utilities shared by the feature slices and the server.
//!
//! Keep this crate lightweight: configuration loading, the shared [`server::ApiState`],
//! HTTP error mapping and id generation.
//!
//! ## Session ids
//! `safe_nanoid!` yields URL-safe ids without visually ambiguous characters:
//! ```rust
//! # use nexus_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//! ```
//!
//! ## Config loading
//! ```rust,no_run
//! use nexus_kernel::config::load_config;
//! use nexus_kernel::domain::config::ApiConfig;
//!
//! let config: ApiConfig = load_config(Some("server")).unwrap();
//! ```

pub mod config;
#[cfg(feature = "server")]
pub mod server;

// No visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use nanoid::nanoid;
pub use nexus_domain as domain;
pub use nexus_tree as tree;

/// Generates an unambiguous `NanoID`, 12 characters unless a size is given.
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
