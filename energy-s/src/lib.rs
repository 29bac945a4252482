pub mod api_server;
pub mod artifact;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod util;
