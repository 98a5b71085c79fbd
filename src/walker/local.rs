use super::{DirectoryWalker, WalkEntry, WalkIter};
use anyhow::Context;
use std::path::Path;
use walkdir::WalkDir;

/// ローカルファイルシステムを再帰的に走査する
#[derive(Debug, Clone, Default)]
pub struct LocalWalker {
    follow_links: bool,
}

impl LocalWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// シンボリックリンクを辿るかどうか
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }
}

impl DirectoryWalker for LocalWalker {
    fn walk(&self, root: &Path, prune: &Path) -> WalkIter {
        let root_display = root.display().to_string();
        let prune = prune.to_path_buf();
        let iter = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| entry.path() != prune.as_path())
            .map(move |entry| {
                let entry = entry
                    .with_context(|| format!("Failed to walk directory: {root_display}"))?;
                Ok(WalkEntry {
                    is_dir: entry.file_type().is_dir(),
                    path: entry.into_path(),
                })
            });
        Box::new(iter)
    }
}
