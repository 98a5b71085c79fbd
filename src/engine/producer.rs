// Producer - ディレクトリ走査とジョブ配信（TaskDispatcher）

use super::barrier::{CompletionBarrier, CompletionToken};
use crate::classifier::{extension_of, trim_extension, PathClassifier};
use crate::core::{CollisionPolicy, ConvertError, ConvertResult, Job, RunConfig};
use crate::walker::DirectoryWalker;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

/// キューに投入される作業単位。トークンはジョブの完了時に消費される
#[derive(Debug)]
pub struct Dispatched {
    pub job: Job,
    pub token: CompletionToken,
}

/// 配信結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub dispatched: usize,
    pub renamed: usize,
    pub skipped: usize,
}

/// 走査と分類に必要な設定
#[derive(Debug, Clone)]
pub struct DispatchPlan {
    pub root_dir: PathBuf,
    pub output_dir: PathBuf,
    pub classifier: PathClassifier,
    pub collision_policy: CollisionPolicy,
}

impl DispatchPlan {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            root_dir: config.root_dir.clone(),
            output_dir: config.output_dir(),
            classifier: PathClassifier::from_config(config),
            collision_policy: config.collision_policy,
        }
    }
}

/// 衝突判定の結果
#[derive(Debug, PartialEq, Eq)]
pub enum Claim {
    Accepted(Job),
    Renamed(Job),
    Overwriting { job: Job, previous: PathBuf },
    Skipped { job: Job, previous: PathBuf },
}

/// 一回の実行で見つかったジョブの出力パスを決める
///
/// 割り当ては走査順に依存しない。
/// 入力パス順で最初のジョブが本来の出力名を使い、それ以外の重複ジョブは
/// どのジョブの本来の出力名とも重ならない `<stem>-<n><ext>` を受け取る。
#[derive(Debug)]
pub struct OutputClaims {
    policy: CollisionPolicy,
    // 本来の出力パス -> そのパスを求めたジョブ
    requested: BTreeMap<PathBuf, Vec<Job>>,
}

impl OutputClaims {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            requested: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, job: Job) {
        self.requested
            .entry(job.output_path().to_path_buf())
            .or_default()
            .push(job);
    }

    /// 全ジョブの割り当てを確定する。結果は入力パス順
    pub fn resolve(self) -> Vec<Claim> {
        let natural: HashSet<PathBuf> = self.requested.keys().cloned().collect();
        let mut generated: HashSet<PathBuf> = HashSet::new();
        let mut claims = Vec::new();

        for (output, mut jobs) in self.requested {
            jobs.sort_by(|a, b| a.input_path().cmp(b.input_path()));
            let mut jobs = jobs.into_iter();
            let Some(first) = jobs.next() else {
                continue;
            };
            let previous = first.input_path().to_path_buf();
            claims.push(Claim::Accepted(first));

            for job in jobs {
                let claim = match self.policy {
                    CollisionPolicy::Overwrite => Claim::Overwriting {
                        job,
                        previous: previous.clone(),
                    },
                    CollisionPolicy::Skip => Claim::Skipped {
                        job,
                        previous: previous.clone(),
                    },
                    CollisionPolicy::Rename => {
                        let renamed = next_free_path(&output, |candidate| {
                            natural.contains(candidate) || generated.contains(candidate)
                        });
                        generated.insert(renamed.clone());
                        Claim::Renamed(Job::new(job.input_path(), renamed))
                    }
                };
                claims.push(claim);
            }
        }

        claims.sort_by(|a, b| a.job().input_path().cmp(b.job().input_path()));
        claims
    }
}

impl Claim {
    pub fn job(&self) -> &Job {
        match self {
            Claim::Accepted(job) | Claim::Renamed(job) => job,
            Claim::Overwriting { job, .. } | Claim::Skipped { job, .. } => job,
        }
    }
}

fn next_free_path(taken: &Path, in_use: impl Fn(&Path) -> bool) -> PathBuf {
    let file_name = taken
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = trim_extension(&file_name);
    let extension = extension_of(&file_name);
    let parent = taken.parent().unwrap_or_else(|| Path::new(""));

    (1..)
        .map(|n| parent.join(format!("{stem}-{n}{extension}")))
        .find(|candidate| !in_use(candidate))
        .unwrap_or_else(|| taken.to_path_buf())
}

/// ディレクトリを走査し、対象ファイルごとにバリアへ登録してからキューへ送る
///
/// 出力名の衝突は走査がすべて終わってから解決するため、配信は走査の後に始まる。
/// 走査エラーが出た場合は、それまでに見つかったジョブを配信してからエラーを返す。
pub fn dispatch_blocking<W>(
    walker: &W,
    plan: &DispatchPlan,
    barrier: &CompletionBarrier,
    work_tx: &mpsc::Sender<Dispatched>,
) -> ConvertResult<DispatchStats>
where
    W: DirectoryWalker + ?Sized,
{
    let mut claims = OutputClaims::new(plan.collision_policy);
    let mut walk_error = None;

    for entry in walker.walk(&plan.root_dir, &plan.output_dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                walk_error = Some(ConvertError::enumeration_failed(&plan.root_dir, e));
                break;
            }
        };

        // 出力ディレクトリ配下は再処理しない
        if entry.path.starts_with(&plan.output_dir) {
            continue;
        }

        if let Some(job) = plan.classifier.classify(&entry, &plan.output_dir) {
            claims.push(job);
        }
    }

    let stats = dispatch_claims(claims, barrier, work_tx)?;
    match walk_error {
        Some(error) => Err(error),
        None => Ok(stats),
    }
}

fn dispatch_claims(
    claims: OutputClaims,
    barrier: &CompletionBarrier,
    work_tx: &mpsc::Sender<Dispatched>,
) -> ConvertResult<DispatchStats> {
    let mut stats = DispatchStats::default();

    for claim in claims.resolve() {
        let job = match claim {
            Claim::Accepted(job) => job,
            Claim::Renamed(job) => {
                tracing::warn!(
                    file = %job.base_name(),
                    output = %job.output_path().display(),
                    "Output name already taken, renamed"
                );
                stats.renamed += 1;
                job
            }
            Claim::Overwriting { job, previous } => {
                tracing::warn!(
                    file = %job.base_name(),
                    previous = %previous.display(),
                    output = %job.output_path().display(),
                    "Output collides with another input and will be overwritten"
                );
                job
            }
            Claim::Skipped { job, previous } => {
                tracing::warn!(
                    file = %job.base_name(),
                    previous = %previous.display(),
                    output = %job.output_path().display(),
                    "Output collides with another input, skipped"
                );
                stats.skipped += 1;
                continue;
            }
        };

        // 起動より先に登録する
        let token = barrier.register();
        if work_tx.blocking_send(Dispatched { job, token }).is_err() {
            return Err(ConvertError::internal(anyhow::anyhow!(
                "work queue closed before dispatch finished"
            )));
        }
        stats.dispatched += 1;
    }

    Ok(stats)
}
/// Producer: ブロッキングスレッドで走査と配信を行う
///
/// `work_tx` はタスク終了時にドロップされ、ワーカーにキューの終了を伝える。
pub fn spawn_dispatcher<W>(
    walker: Arc<W>,
    plan: DispatchPlan,
    barrier: CompletionBarrier,
    work_tx: mpsc::Sender<Dispatched>,
) -> tokio::task::JoinHandle<ConvertResult<DispatchStats>>
where
    W: DirectoryWalker + 'static,
{
    tokio::task::spawn_blocking(move || dispatch_blocking(walker.as_ref(), &plan, &barrier, &work_tx))
}
