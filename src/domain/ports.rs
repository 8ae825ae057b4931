use crate::domain::model::{BoxingResult, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    /// 指定工作表名稱，`None` 時讀第一張
    fn sheet_name(&self) -> Option<&str>;
    fn unit(&self) -> usize;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress_output(&self) -> bool;

    fn output_stem(&self) -> String {
        format!("{}_변환엑셀파일", self.unit())
    }
}

/// Receives the fraction of rows boxed so far, in `[0.0, 1.0]`.
///
/// Returning an error aborts boxing; the error reaches the caller unchanged.
pub trait ProgressSink {
    fn report(&mut self, fraction: f64) -> Result<()>;
}

impl<F> ProgressSink for F
where
    F: FnMut(f64) -> Result<()>,
{
    fn report(&mut self, fraction: f64) -> Result<()> {
        self(fraction)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Table>;
    async fn transform(&self, table: Table) -> Result<BoxingResult>;
    async fn load(&self, result: BoxingResult) -> Result<String>;
}
