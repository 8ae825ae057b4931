pub mod boxing;
pub mod card;
pub mod etl;
pub mod pipeline;
pub mod progress;
pub mod schema;

pub use crate::domain::model::{BoxRecord, BoxingResult, CardRow, Table};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ProgressSink, Storage};
pub use crate::utils::error::Result;
