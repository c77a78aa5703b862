use clap::Parser;

use fanout_adapters::init::{
    create_database_client,
    create_database_connection_pool,
    initialize_app,
    initialize_database,
};
use fanout_workers::workers::{run_worker, PeriodicTask};

mod cli;
use cli::{Cli, SubCommand};

#[tokio::main]
async fn main() {
    let opts: Cli = Cli::parse();
    let config = initialize_app(opts.log_level);

    let db_client = &mut create_database_client(&config).await;
    initialize_database(db_client).await;

    match opts.subcmd {
        SubCommand::RemovePosts(cmd) => cmd.execute(&config, db_client).await.unwrap(),
        SubCommand::EnqueueRemoval(cmd) => cmd.execute(db_client).await.unwrap(),
        SubCommand::RunWorker => {
            let db_pool = create_database_connection_pool(&config);
            log::info!("background worker started");
            run_worker(
                config,
                db_pool,
                vec![PeriodicTask::RetractionQueueExecutor],
            ).await;
        },
    };
}
