pub mod catalog;
pub mod deeplink;
pub mod error;
pub mod paths;

pub use catalog::{Catalog, Coordinates, Quest, QuestTask};
pub use deeplink::{ar_link, parse_ar_link};
pub use error::{CatalogError, Result};
pub use paths::{CONFIG_FILE_NAME, default_base_dir, resolve_base_dir};
