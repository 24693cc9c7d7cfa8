mod loader;

pub(crate) use loader::{LoadResult, load_dataset};
