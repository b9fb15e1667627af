pub mod config;
pub mod contents;
pub mod error;
pub mod identity;
pub mod image;
pub mod model;
pub mod output;
pub mod scanner;

pub use config::Config;
pub use error::ScanError;
pub use identity::{assemble, IdentityAssembler};
pub use model::{Ecosystem, Package, PackageIdentity, RawPackageFact, ScanResult};
pub use scanner::Scanner;
