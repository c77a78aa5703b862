use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use fanout_config::Config;
use fanout_models::database::DatabaseConnectionPool;

use super::periodic_tasks::*;

const WORKER_DELAY: u64 = 500;

#[derive(Debug, Eq, Hash, PartialEq)]
pub enum PeriodicTask {
    RetractionQueueExecutor,
}

impl PeriodicTask {
    /// Returns task period (in seconds)
    fn period(&self) -> i64 {
        match self {
            Self::RetractionQueueExecutor => 1,
        }
    }

    fn is_ready(&self, last_run: &Option<DateTime<Utc>>) -> bool {
        match last_run {
            Some(last_run) => {
                let time_passed = Utc::now() - *last_run;
                time_passed.num_seconds() >= self.period()
            },
            None => true,
        }
    }
}

pub async fn run_worker(
    config: Config,
    db_pool: DatabaseConnectionPool,
    tasks: Vec<PeriodicTask>,
) -> () {
    let mut worker_state: HashMap<PeriodicTask, Option<DateTime<Utc>>> =
        HashMap::from_iter(tasks.into_iter().map(|task| (task, None)));
    let mut interval =
        tokio::time::interval(Duration::from_millis(WORKER_DELAY));
    loop {
        interval.tick().await;

        for (task, last_run) in worker_state.iter_mut() {
            if !task.is_ready(last_run) {
                continue;
            };
            let task_result = match task {
                PeriodicTask::RetractionQueueExecutor => {
                    retraction_queue_executor(&config, &db_pool).await
                },
            };
            task_result.unwrap_or_else(|err| {
                log::error!("{:?}: {}", task, err);
            });
            *last_run = Some(Utc::now());
        };
    };
}

#[cfg(test)]
mod tests {
    use chrono::Duration as TimeDelta;
    use super::*;

    #[test]
    fn test_task_is_ready() {
        let task = PeriodicTask::RetractionQueueExecutor;
        assert_eq!(task.is_ready(&None), true);
        assert_eq!(task.is_ready(&Some(Utc::now())), false);
        let last_run = Utc::now() - TimeDelta::seconds(5);
        assert_eq!(task.is_ready(&Some(last_run)), true);
    }
}
