//! Read-only virtual filesystem over APPX/MSIX application package layouts.
//!
//! A package on disk is either a loose unpacked directory or a single
//! manifest file with the package contents as its siblings. [`PackageReader`]
//! presents one contract over both shapes: exact-path reads, existence
//! checks, lazy cancellable enumeration, and resource lookup that resolves
//! requests like `Assets/Logo.png` against Windows resource-qualifier
//! naming conventions (`Assets/Logo.scale-150.png`, `Assets/en-US/Logo.png`).

pub mod error;
pub mod reader;
pub mod resource;

pub use error::ReaderError;
pub use reader::{DirectoryReader, FileEntry, ManifestReader, PackageReader, open};
pub use resource::ResourceResolver;
