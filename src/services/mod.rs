//! Remote-content services: path resolution, the contents gateway and the
//! transports it talks through.

pub mod gateway;
pub mod github_client;
pub mod path_resolver;
pub mod transport;
