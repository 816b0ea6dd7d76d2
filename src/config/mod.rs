mod server;

pub use server::{DEV_JWT_SECRET, ServerConfig};
