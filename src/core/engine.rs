use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::BuildMonitor;

/// Runs a map pipeline: fetch, build layers, write.
pub struct MapEngine<P: Pipeline> {
    pipeline: P,
    monitor: BuildMonitor,
}

impl<P: Pipeline> MapEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: BuildMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🌍 Starting map build");

        // Extract
        self.monitor.begin_phase();
        let sources = self.pipeline.extract().await?;
        tracing::info!(
            "Fetched {} quake features and {} boundary features",
            sources.quakes.len(),
            sources.boundaries.len()
        );
        self.monitor.end_phase("Fetch");

        // Transform
        self.monitor.begin_phase();
        let document = self.pipeline.transform(sources).await?;
        tracing::info!(
            "Composed map with {} overlays ({} quake markers, {} boundary features)",
            document.overlays.len(),
            document.quake_marker_count(),
            document.boundary_feature_count()
        );
        self.monitor.end_phase("Build layers");

        // Load
        self.monitor.begin_phase();
        let output_path = self.pipeline.load(document).await?;
        tracing::info!("Map written to: {}", output_path);
        self.monitor.end_phase("Write");

        self.monitor.log_summary();
        Ok(output_path)
    }
}
