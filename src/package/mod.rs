//! Package identifiers and the external tools that fetch them
//!
//! - [`PackageSpec`]: a validated identifier plus optional version
//! - [`codec`]: identifier <-> cache slot name
//! - [`PackageManager`]: npm, yarn or pnpm command construction

pub mod codec;
pub mod manager;
pub mod spec;

pub use manager::PackageManager;
pub use spec::PackageSpec;
