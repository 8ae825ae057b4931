pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::storage::LocalStorage;
pub use crate::config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::{
    boxing::{box_rows, BoxEvent, Boxes},
    card::format_card_number,
    etl::EtlEngine,
    pipeline::BoxingPipeline,
    schema::validate_schema,
};
pub use crate::domain::model::{BoxRecord, BoxingResult, CardRow, Table};
pub use crate::domain::ports::ProgressSink;
pub use crate::utils::error::{BoxerError, Result};
