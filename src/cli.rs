use anyhow::Error;
use clap::Parser;
use log::Level;
use uuid::Uuid;

use fanout_config::Config;
use fanout_models::database::DatabaseClient;
use fanout_workers::removal::{
    remove_posts_with_database,
    RemovePostsJobData,
};

#[derive(Parser)]
#[command(version)]
pub struct Cli {
    /// Overrides log level from config file
    #[arg(long)]
    pub log_level: Option<Level>,

    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Parser)]
pub enum SubCommand {
    RemovePosts(RemovePosts),
    EnqueueRemoval(EnqueueRemoval),
    /// Process queued removal requests
    RunWorker,
}

/// Delete posts with their reblogs and retract them immediately
#[derive(Parser)]
pub struct RemovePosts {
    #[arg(required = true)]
    post_ids: Vec<Uuid>,
}

impl RemovePosts {
    pub async fn execute(
        &self,
        config: &Config,
        db_client: &mut impl DatabaseClient,
    ) -> Result<(), Error> {
        let report = remove_posts_with_database(
            config,
            db_client,
            &self.post_ids,
        ).await?;
        println!(
            "posts deleted: {} (with reblogs: {})",
            report.deleted_count,
            report.working_set_size,
        );
        println!(
            "timeline updates: {} ({} failed)",
            report.unpush_calls,
            report.unpush_failures,
        );
        println!(
            "channel broadcasts: {} ({} failed)",
            report.publish_calls,
            report.publish_failures,
        );
        println!("stream entry batches: {}", report.stream_entry_batches);
        println!("federation deliveries: {}", report.federation_entries);
        Ok(())
    }
}

/// Add removal request to the queue
#[derive(Parser)]
pub struct EnqueueRemoval {
    #[arg(required = true)]
    post_ids: Vec<Uuid>,
}

impl EnqueueRemoval {
    pub async fn execute(
        &self,
        db_client: &impl DatabaseClient,
    ) -> Result<(), Error> {
        let job_data = RemovePostsJobData { post_ids: self.post_ids.clone() };
        job_data.into_job(db_client).await?;
        println!("removal request added to queue");
        Ok(())
    }
}
