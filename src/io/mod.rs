mod browser;
mod encoding;
mod filesystem;

pub use browser::{DirEntry, DirectoryBrowser, FsBrowser};
pub use encoding::resolve_label;
pub use filesystem::{EolStyle, FileError, load_document, save_document};
