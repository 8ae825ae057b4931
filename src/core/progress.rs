use crate::domain::ports::ProgressSink;
use crate::utils::error::Result;

/// Logs boxing progress each time another 10% step is crossed.
#[derive(Debug, Default)]
pub struct LogProgress {
    last_step: u32,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for LogProgress {
    fn report(&mut self, fraction: f64) -> Result<()> {
        let step = (fraction.clamp(0.0, 1.0) * 10.0).floor() as u32;
        if step > self.last_step {
            self.last_step = step;
            tracing::info!("📦 Boxing progress: {}%", step * 10);
        } else {
            tracing::trace!("Boxing progress: {:.3}", fraction);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_highest_step_crossed() {
        let mut sink = LogProgress::new();
        for (fraction, step) in [(0.05, 0), (0.1, 1), (0.55, 5), (0.5, 5), (1.0, 10)] {
            sink.report(fraction).unwrap();
            assert_eq!(sink.last_step, step);
        }
    }
}
