//! Built-in diagnostic checks

pub mod accelerator;
pub mod attributes;
pub mod cli;
pub mod env;
pub mod event_loop;
pub mod imports;
pub mod lockfile;
pub mod nvidia;
pub mod shared_library;
pub mod wrappers;

pub use accelerator::AcceleratorCheck;
pub use attributes::AttributeCheck;
pub use cli::CliCheck;
pub use env::EnvCheck;
pub use event_loop::EventLoopCheck;
pub use imports::ImportCheck;
pub use lockfile::LockfileHashCheck;
pub use nvidia::NvidiaDriverCheck;
pub use shared_library::SharedLibraryCheck;
pub use wrappers::WrapperCheck;
