use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use tokio::sync::Mutex;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: Mutex<SystemMonitor>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: Mutex::new(SystemMonitor::new(monitor_enabled)),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting boxing process...");
        let mut monitor = self.monitor.lock().await;
        monitor.log_stats("Start");

        // Extract
        let table = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows", table.len());
        monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(table).await?;
        tracing::info!(
            "Packed {} rows into {} boxes (unit {})",
            result.total_rows,
            result.boxes.len(),
            result.unit
        );
        monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        monitor.log_stats("Load");
        monitor.log_final_stats();

        Ok(output_path)
    }
}
