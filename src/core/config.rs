// 実行設定
// 実行中は不変で、必要なコンポーネントへ参照で渡す

use super::error::{ValidationError, ValidationResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_OUTPUT_SUBDIR: &str = "mobi";
pub const DEFAULT_TARGET_EXTENSION: &str = ".mobi";
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = [".fb2", ".txt", ".pdf", ".epub"];
pub const DEFAULT_CONVERTER: &str = "ebook-convert";
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// 同じ出力パスに複数の入力が対応した場合の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// 後から来た入力に `-1`, `-2` ... の連番を付ける
    #[default]
    Rename,
    /// 後から来た入力で上書きする
    Overwrite,
    /// 後から来た入力は変換しない
    Skip,
}

/// 一回の実行に必要な設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub root_dir: PathBuf,
    pub output_subdir: String,
    pub target_extension: String,
    pub allowed_extensions: Vec<String>,
    pub verbose: bool,
    pub max_workers: usize,
    pub queue_capacity: usize,
    /// 秒単位。未指定ならタイムアウトなし
    pub timeout_secs: Option<u64>,
    pub collision_policy: CollisionPolicy,
    pub converter: PathBuf,
    pub converter_args: Vec<String>,
    /// 走査でシンボリックリンクを辿る
    pub follow_links: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            output_subdir: DEFAULT_OUTPUT_SUBDIR.to_string(),
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            verbose: false,
            max_workers: num_cpus::get().max(1) * 2,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            timeout_secs: None,
            collision_policy: CollisionPolicy::default(),
            converter: PathBuf::from(DEFAULT_CONVERTER),
            converter_args: Vec::new(),
            follow_links: false,
        }
    }
}

impl RunConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    /// JSON設定ファイルから読み込む（未指定の項目はデフォルト値）
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: RunConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.target_extension = normalize_extension(&config.target_extension);
        config.allowed_extensions = config
            .allowed_extensions
            .iter()
            .map(|e| normalize_extension(e))
            .collect();
        Ok(config)
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    pub fn with_output_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.output_subdir = subdir.into();
        self
    }

    pub fn with_target_extension(mut self, extension: &str) -> Self {
        self.target_extension = normalize_extension(extension);
        self
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .collect();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn with_converter(mut self, program: impl Into<PathBuf>) -> Self {
        self.converter = program.into();
        self
    }

    pub fn with_converter_args(mut self, args: Vec<String>) -> Self {
        self.converter_args = args;
        self
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// 出力ディレクトリ（root_dir/output_subdir）
    pub fn output_dir(&self) -> PathBuf {
        self.root_dir.join(&self.output_subdir)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// 設定の妥当性をチェック
    pub fn validate(&self) -> ValidationResult<()> {
        if self.max_workers == 0 {
            return Err(ValidationError::new(
                "max_workers",
                "ワーカー数は1以上である必要があります",
            ));
        }

        if self.queue_capacity == 0 {
            return Err(ValidationError::new(
                "queue_capacity",
                "キュー容量は1以上である必要があります",
            ));
        }

        if self.timeout_secs == Some(0) {
            return Err(ValidationError::new(
                "timeout_secs",
                "タイムアウトは1秒以上である必要があります",
            ));
        }

        if !is_plain_extension(&self.target_extension) {
            return Err(ValidationError::new(
                "target_extension",
                format!("不正な拡張子です: {:?}", self.target_extension),
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err(ValidationError::new(
                "allowed_extensions",
                "変換対象の拡張子が指定されていません",
            ));
        }

        if let Some(bad) = self
            .allowed_extensions
            .iter()
            .find(|e| !is_plain_extension(e))
        {
            return Err(ValidationError::new(
                "allowed_extensions",
                format!("不正な拡張子です: {bad:?}"),
            ));
        }

        let mut components = Path::new(&self.output_subdir).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal {
            return Err(ValidationError::new(
                "output_subdir",
                format!(
                    "出力サブディレクトリは単一のディレクトリ名である必要があります: {:?}",
                    self.output_subdir
                ),
            ));
        }

        Ok(())
    }
}

/// ファイル名の末尾にそのまま付けられる拡張子か
///
/// 先頭のドットの後に1文字以上あり、パス区切りや `..` を含まないこと。
fn is_plain_extension(extension: &str) -> bool {
    extension.len() >= 2
        && extension.starts_with('.')
        && !extension.contains("..")
        && !extension.contains(&['/', '\\'][..])
}

/// 拡張子を小文字・先頭ドット付きに正規化
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}
