pub mod compose;
pub mod engine;
pub mod fetch;
pub mod layers;
pub mod legend;

pub use crate::domain::model::{MapDocument, SourceData};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
