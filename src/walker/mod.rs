use anyhow::Result;
use mockall::automock;
use std::path::{Path, PathBuf};

pub mod local;

/// 走査で見つかったエントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl WalkEntry {
    pub fn new(path: impl Into<PathBuf>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            is_dir,
        }
    }

    /// パスの最後の要素
    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// エントリを順に返すイテレータ。途中で `Err` が出たら走査失敗
pub type WalkIter = Box<dyn Iterator<Item = Result<WalkEntry>> + Send>;

/// ディレクトリ走査のトレイト
///
/// 返す順序は保証しない。ルート自身は含めない。
/// `prune` と一致するディレクトリは中に降りずに読み飛ばす。
#[automock]
pub trait DirectoryWalker: Send + Sync {
    fn walk(&self, root: &Path, prune: &Path) -> WalkIter;
}

// DirectoryWalker for Box<dyn DirectoryWalker>
impl DirectoryWalker for Box<dyn DirectoryWalker> {
    fn walk(&self, root: &Path, prune: &Path) -> WalkIter {
        self.as_ref().walk(root, prune)
    }
}
