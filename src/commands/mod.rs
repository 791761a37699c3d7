pub use info::print_info;
pub use info::InfoOptions;
pub use init::init_config;
pub use init::InitOptions;
pub use merge::merge_domain;
pub use merge::MergeOptions;

mod info;
mod init;
mod merge;
