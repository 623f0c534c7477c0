//! Managed resource families
//!
//! - [`dns`]: Static DNS entries (`ip/dns/static`)

pub mod dns;
