use std::path::PathBuf;

use kernel::KernelError;

const DEFAULT_PORT: u16 = 9090;
const DEFAULT_LOG_DIR: &str = "./logs/";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub log_dir: PathBuf,
}

impl ServerConfig {
    /// Reads `SERVER_PORT` and `LOG_DIR`, either from the environment or a `.env` file.
    pub fn load() -> error_stack::Result<Self, KernelError> {
        Ok(Self {
            port: driver::env_or("SERVER_PORT", DEFAULT_PORT)?,
            log_dir: driver::env_or("LOG_DIR", PathBuf::from(DEFAULT_LOG_DIR))?,
        })
    }
}
