pub mod allocate;
pub mod config_cmd;
pub mod generate;
pub mod serve;
