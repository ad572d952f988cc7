mod init;
mod seed;

pub use init::cmd_init_config;
pub use seed::cmd_seed;
