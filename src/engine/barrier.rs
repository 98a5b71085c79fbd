// CompletionBarrier - 登録済みの全ユニットが完了するまで待機する同期プリミティブ

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct BarrierState {
    outstanding: AtomicUsize,
    registered: AtomicUsize,
    notify: Notify,
}

impl BarrierState {
    fn complete_one(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.notify.notify_waiters();
        }
    }
}

/// 未完了ユニット数を数えるバリア
///
/// ユニットを起動する前に必ず [`register`](Self::register) で登録し、
/// 返された [`CompletionToken`] をユニットに持たせる。トークンは
/// `complete()` で消費されるか、ドロップされた時点で一度だけ完了扱いになる。
#[derive(Debug, Clone, Default)]
pub struct CompletionBarrier {
    state: Arc<BarrierState>,
}

impl CompletionBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// ユニットを一つ登録する
    pub fn register(&self) -> CompletionToken {
        self.state.outstanding.fetch_add(1, Ordering::AcqRel);
        self.state.registered.fetch_add(1, Ordering::Relaxed);
        CompletionToken {
            state: Some(Arc::clone(&self.state)),
        }
    }

    /// 未完了のユニット数
    pub fn outstanding(&self) -> usize {
        self.state.outstanding.load(Ordering::Acquire)
    }

    /// これまでに登録されたユニットの総数
    pub fn registered(&self) -> usize {
        self.state.registered.load(Ordering::Relaxed)
    }

    /// 未完了数が0になるまで待機する
    pub async fn wait(&self) {
        loop {
            // 判定より先に Notified を作り、判定と待機の間の通知を取りこぼさない
            let notified = self.state.notify.notified();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// 登録済みユニットの完了権
#[derive(Debug)]
#[must_use = "dropping a token completes its unit immediately"]
pub struct CompletionToken {
    state: Option<Arc<BarrierState>>,
}

impl CompletionToken {
    /// ユニットの完了を通知する
    pub fn complete(mut self) {
        if let Some(state) = self.state.take() {
            state.complete_one();
        }
    }
}

impl Drop for CompletionToken {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            state.complete_one();
        }
    }
}
