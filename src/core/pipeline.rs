use crate::adapters::reader::{read_table, InputFormat};
use crate::adapters::writer::{bundle_zip, write_csv, write_summary_json, write_xlsx};
use crate::core::boxing::box_rows;
use crate::core::progress::LogProgress;
use crate::core::schema::validate_schema;
use crate::core::{BoxingResult, ConfigProvider, Pipeline, Storage, Table};
use crate::utils::error::{BoxerError, Result};
use std::collections::HashSet;
use std::num::NonZeroUsize;

/// Reads a card table, boxes it and writes the requested output files.
pub struct BoxingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BoxingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn unit(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.config.unit()).ok_or_else(|| BoxerError::InvalidConfigValueError {
            field: "unit".to_string(),
            value: "0".to_string(),
            reason: "Unit must be at least 1".to_string(),
        })
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), name)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BoxingPipeline<S, C> {
    async fn extract(&self) -> Result<Table> {
        let input = self.config.input_path();
        let format = InputFormat::from_path(input)?;

        tracing::debug!("Loading {:?} input from: {}", format, input);
        let bytes = self.storage.read_file(input).await?;
        read_table(&bytes, format, self.config.sheet_name())
    }

    async fn transform(&self, table: Table) -> Result<BoxingResult> {
        let unit = self.unit()?;
        let rows = validate_schema(&table)?;

        let mut progress = LogProgress::new();
        let boxes = box_rows(&rows, unit, &mut progress)?;

        Ok(BoxingResult {
            unit: unit.get(),
            total_rows: rows.len(),
            boxes,
        })
    }

    async fn load(&self, result: BoxingResult) -> Result<String> {
        let stem = self.config.output_stem();
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();
        let mut seen = HashSet::new();

        for format in self.config.output_formats() {
            // 同一格式只輸出一次，避免重複檔名
            if !seen.insert(format.as_str()) {
                tracing::warn!("Output format '{}' listed more than once, skipping", format);
                continue;
            }
            match format.as_str() {
                "xlsx" => files.push((format!("{}.xlsx", stem), write_xlsx(&result.boxes)?)),
                "csv" => files.push((format!("{}.csv", stem), write_csv(&result.boxes)?)),
                "json" => files.push((
                    format!("{}_summary.json", stem),
                    write_summary_json(&result, Some(self.config.input_path()))?,
                )),
                other => {
                    return Err(BoxerError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported output format".to_string(),
                    })
                }
            }
        }

        if files.is_empty() {
            return Err(BoxerError::MissingConfigError {
                field: "output_formats".to_string(),
            });
        }

        if self.config.compress_output() {
            let zip_name = format!("{}.zip", stem);
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = bundle_zip(&files)?;
            self.storage
                .write_file(&self.output_file(&zip_name), &zip_data)
                .await?;
            return Ok(self.output_file(&zip_name));
        }

        for (name, data) in &files {
            self.storage.write_file(&self.output_file(name), data).await?;
        }

        // 第一個輸出檔當作主要結果
        Ok(self.output_file(&files[0].0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::REQUIRED_COLUMNS;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &[u8]) {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
        }

        async fn names(&self) -> Vec<String> {
            let mut names: Vec<String> = self.files.lock().await.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                BoxerError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.put(path, data).await;
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        unit: usize,
        output_formats: Vec<String>,
        compress: bool,
    }

    impl MockConfig {
        fn new(unit: usize, formats: &[&str]) -> Self {
            Self {
                input_path: "cards.csv".to_string(),
                unit,
                output_formats: formats.iter().map(|f| f.to_string()).collect(),
                compress: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn sheet_name(&self) -> Option<&str> {
            None
        }

        fn unit(&self) -> usize {
            self.unit
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn compress_output(&self) -> bool {
            self.compress
        }
    }

    fn sample_csv() -> String {
        let mut csv = REQUIRED_COLUMNS.join(",");
        csv.push('\n');
        for (card, branch) in [("1", "강남"), ("2", "강남"), ("3", "부산"), ("4", "강남")] {
            csv.push_str(&format!("{},10000,P1,{},001,{}\n", card, card, branch));
        }
        csv
    }

    #[tokio::test]
    async fn test_extract_and_transform() {
        let storage = MockStorage::default();
        storage.put("cards.csv", sample_csv().as_bytes()).await;
        let pipeline = BoxingPipeline::new(storage, MockConfig::new(2, &["xlsx"]));

        let table = pipeline.extract().await.unwrap();
        assert_eq!(table.len(), 4);

        let result = pipeline.transform(table).await.unwrap();
        assert_eq!(result.total_rows, 4);
        assert_eq!(result.boxes.len(), 3);
        assert_eq!(result.boxes[0].back_card, "0000-0000-0000-0002");
        assert_eq!(result.boxes[1].front_card, "0000-0000-0000-0004");
        assert_eq!(result.boxes[2].branch_name, "부산");
    }

    #[tokio::test]
    async fn test_transform_rejects_missing_columns() {
        let pipeline = BoxingPipeline::new(MockStorage::default(), MockConfig::new(2, &["xlsx"]));
        let table = Table::new(vec!["카드번호".to_string()], vec![vec!["1".to_string()]]);

        let err = pipeline.transform(table).await.unwrap_err();
        match err {
            BoxerError::MissingColumns { missing } => assert_eq!(missing.len(), 5),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transform_rejects_zero_unit() {
        let pipeline = BoxingPipeline::new(MockStorage::default(), MockConfig::new(0, &["xlsx"]));
        let err = pipeline.transform(Table::default()).await.unwrap_err();
        assert!(matches!(err, BoxerError::InvalidConfigValueError { .. }));
    }

    #[tokio::test]
    async fn test_load_writes_each_format() {
        let storage = MockStorage::default();
        storage.put("cards.csv", sample_csv().as_bytes()).await;
        let pipeline =
            BoxingPipeline::new(storage.clone(), MockConfig::new(2, &["xlsx", "csv", "json"]));

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "out/2_변환엑셀파일.xlsx");
        assert_eq!(
            storage.names().await,
            vec![
                "cards.csv",
                "out/2_변환엑셀파일.csv",
                "out/2_변환엑셀파일.xlsx",
                "out/2_변환엑셀파일_summary.json",
            ]
        );
    }

    #[tokio::test]
    async fn test_load_bundles_zip() {
        let storage = MockStorage::default();
        let mut config = MockConfig::new(2000, &["xlsx", "csv"]);
        config.compress = true;
        let pipeline = BoxingPipeline::new(storage.clone(), config);

        let result = BoxingResult {
            unit: 2000,
            total_rows: 0,
            boxes: vec![],
        };
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "out/2000_변환엑셀파일.zip");
        assert_eq!(storage.names().await, vec!["out/2000_변환엑셀파일.zip"]);
    }

    #[tokio::test]
    async fn test_load_skips_repeated_formats_when_zipping() {
        let storage = MockStorage::default();
        let mut config = MockConfig::new(2, &["xlsx", "csv", "xlsx"]);
        config.compress = true;
        let pipeline = BoxingPipeline::new(storage.clone(), config);

        let result = BoxingResult {
            unit: 2,
            total_rows: 0,
            boxes: vec![],
        };
        let output = pipeline.load(result).await.unwrap();
        assert_eq!(output, "out/2_변환엑셀파일.zip");

        let zip_data = storage.files.lock().await["out/2_변환엑셀파일.zip"].clone();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[tokio::test]
    async fn test_load_without_formats_fails() {
        let pipeline = BoxingPipeline::new(MockStorage::default(), MockConfig::new(2, &[]));
        let result = BoxingResult {
            unit: 2,
            total_rows: 0,
            boxes: vec![],
        };
        let err = pipeline.load(result).await.unwrap_err();
        assert!(matches!(err, BoxerError::MissingConfigError { .. }));
    }
}
