//! Pipeline driver
//!
//! Owns the `PipelineStatus` for one run and walks the definition's stages
//! through their lifecycle, publishing a snapshot after every transition.
//! All status mutation happens here on the driving task; stage processes
//! never touch the aggregate.

use anyhow::{Context, Result};
use cascade_core::domain::pipeline::{PipelineStatus, PublishCallback};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::definition::PipelineDefinition;
use crate::executor::StageExecutor;

/// Drives one pipeline run
pub struct PipelineDriver {
    config: Config,
    executor: Arc<dyn StageExecutor>,
}

impl PipelineDriver {
    /// Creates a driver with the given configuration and stage executor
    pub fn new(config: Config, executor: Arc<dyn StageExecutor>) -> Self {
        Self { config, executor }
    }

    /// Runs the pipeline to completion and returns its final status
    ///
    /// The returned status ends in `COMPLETE` or `FAILED`: a failed stage
    /// fails the pipeline unless `continue_on_error` is configured, in which
    /// case remaining stages still run and the pipeline is failed at the end.
    /// A publish failure aborts the run and propagates to the caller.
    pub async fn run(
        &self,
        definition: &PipelineDefinition,
        sink: Option<Box<dyn PublishCallback>>,
    ) -> Result<PipelineStatus> {
        let run_id = Uuid::new_v4();
        info!(
            "Starting run {} for pipeline '{}' ({} stage(s))",
            run_id,
            definition.name,
            definition.stages.len()
        );

        let mut status = PipelineStatus::new(&definition.name);
        if let Some(sink) = sink {
            status.set_publish_callback(move |snapshot: &PipelineStatus| sink.publish(snapshot));
        }

        status.start();
        status.publish().context("failed to publish pipeline start")?;

        let mut failed_stages: Vec<String> = Vec::new();

        for (index, stage) in definition.stages.iter().enumerate() {
            if stage.skip {
                info!(
                    "Skipping stage {}/{}: {}",
                    index + 1,
                    definition.stages.len(),
                    stage.name
                );
                status
                    .add_job(&stage.name)
                    .skip_with_message(format!("Stage '{}' skipped", stage.name));
                status.publish().context("failed to publish stage skip")?;
                continue;
            }

            info!(
                "Executing stage {}/{}: {}",
                index + 1,
                definition.stages.len(),
                stage.name
            );

            status.add_job(&stage.name).start();
            status.publish().context("failed to publish stage start")?;

            let outcome = self.executor.execute(stage, &self.config).await;
            let message = outcome.message(&stage.name);
            let succeeded = outcome.is_success();

            if let Some(job) = status.active_job_mut() {
                if succeeded {
                    job.complete_with_message(&message);
                } else {
                    job.fail_with_message(&message);
                }
            }
            status.publish().context("failed to publish stage result")?;

            if !succeeded {
                error!("{}", message);
                failed_stages.push(stage.name.clone());
                if !self.config.continue_on_error {
                    break;
                }
            }
        }

        if failed_stages.is_empty() {
            status.complete();
        } else if failed_stages.len() == 1 {
            status.fail_with_message(format!(
                "Pipeline failed: stage '{}' failed",
                failed_stages[0]
            ));
        } else {
            status.fail_with_message(format!(
                "Pipeline failed: {} stages failed",
                failed_stages.len()
            ));
        }
        status.publish().context("failed to publish pipeline finish")?;

        info!(
            "Run {} finished: pipeline '{}' is {:?}",
            run_id, status.name, status.state
        );

        Ok(status)
    }
}
