//! Networking core: wire types, the transport seam, and the refresh
//! coordinator that rides on top of it.

pub mod refresh;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;
