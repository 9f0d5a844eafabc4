//! Identity adapters.

pub mod google;
pub mod static_table;

pub use google::GoogleIdentityProvider;
pub use static_table::StaticIdentityProvider;
