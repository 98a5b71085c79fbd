// Consumer - 並列ワーカー機能

use super::producer::Dispatched;
use crate::converter::ConversionInvoker;
use crate::core::TaskOutcome;
use crate::services::execute_job;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// 単一ワーカー
///
/// 作業キューが閉じるまでジョブを取り出し、結果を送信してから完了を通知する。
pub fn spawn_worker<C>(
    worker_id: usize,
    converter: Arc<C>,
    work_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<Dispatched>>>,
    result_tx: mpsc::Sender<TaskOutcome>,
    timeout: Option<Duration>,
) -> tokio::task::JoinHandle<()>
where
    C: ConversionInvoker + 'static,
{
    tokio::spawn(async move {
        loop {
            // 次の作業を取得
            let Dispatched { job, token } = {
                let mut rx = work_rx.lock().await;
                match rx.recv().await {
                    Some(item) => item,
                    None => break,
                }
            };

            tracing::debug!(worker_id, file = %job.base_name(), "Starting conversion");
            let outcome = execute_job(Arc::clone(&converter), job, timeout, worker_id).await;

            let sent = result_tx.send(outcome).await;
            token.complete();

            if sent.is_err() {
                tracing::warn!(worker_id, "Result channel closed, stopping worker");
                break;
            }
        }
    })
}

/// ワーカープール。受信側は全ワーカーで共有する
pub fn spawn_workers<C>(
    converter: Arc<C>,
    work_rx: mpsc::Receiver<Dispatched>,
    result_tx: mpsc::Sender<TaskOutcome>,
    timeout: Option<Duration>,
    worker_count: usize,
) -> Vec<tokio::task::JoinHandle<()>>
where
    C: ConversionInvoker + 'static,
{
    let work_rx = Arc::new(tokio::sync::Mutex::new(work_rx));

    (0..worker_count)
        .map(|worker_id| {
            spawn_worker(
                worker_id,
                Arc::clone(&converter),
                Arc::clone(&work_rx),
                result_tx.clone(),
                timeout,
            )
        })
        .collect()
}
