// Worker - 単一ジョブの実行
// 変換器の呼び出しを独立タスクで包み、失敗・パニック・タイムアウトを結果に変換する

use crate::converter::ConversionInvoker;
use crate::core::{Job, JobFailure, TaskOutcome};
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 単一ジョブの実行。どの経路でも必ず `TaskOutcome` を一つ返す
pub async fn execute_job<C>(
    converter: Arc<C>,
    job: Job,
    timeout: Option<Duration>,
    worker_id: usize,
) -> TaskOutcome
where
    C: ConversionInvoker + 'static,
{
    let start_time = Instant::now();

    let task_job = job.clone();
    let mut handle = tokio::spawn(async move {
        converter
            .convert(task_job.input_path(), task_job.output_path())
            .await
    });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                tracing::warn!(worker_id, file = %job.base_name(), ?limit, "Conversion timed out");
                return TaskOutcome::failed(
                    job,
                    JobFailure::TimedOut { after: limit },
                    start_time.elapsed(),
                );
            }
        },
        None => handle.await,
    };

    let elapsed = start_time.elapsed();
    match joined {
        Ok(Ok(())) => TaskOutcome::succeeded(job, elapsed),
        Ok(Err(error)) => TaskOutcome::failed(job, JobFailure::conversion(format!("{error:#}")), elapsed),
        Err(join_error) => {
            let message = if join_error.is_panic() {
                panic_message(join_error.into_panic())
            } else {
                join_error.to_string()
            };
            TaskOutcome::failed(job, JobFailure::Panicked { message }, elapsed)
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
