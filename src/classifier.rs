use crate::core::config::{normalize_extension, RunConfig};
use crate::core::Job;
use crate::walker::WalkEntry;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 変換対象の判定と出力パスの導出
#[derive(Debug, Clone)]
pub struct PathClassifier {
    allowed: HashSet<String>,
    target_extension: String,
}

impl PathClassifier {
    pub fn new<I, S>(allowed_extensions: I, target_extension: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed_extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
            target_extension: normalize_extension(target_extension),
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(&config.allowed_extensions, &config.target_extension)
    }

    /// 拡張子が許可リストに含まれるか（大文字小文字は区別しない）
    pub fn is_eligible(&self, filename: &str) -> bool {
        let extension = extension_of(filename);
        !extension.is_empty() && self.allowed.contains(&extension.to_lowercase())
    }

    pub fn target_extension(&self) -> &str {
        &self.target_extension
    }

    pub fn derive_output_path(&self, filename: &str, output_dir: &Path) -> PathBuf {
        derive_output_path(filename, output_dir, &self.target_extension)
    }

    /// 走査エントリをジョブに変換する。ディレクトリと対象外ファイルは `None`
    pub fn classify(&self, entry: &WalkEntry, output_dir: &Path) -> Option<Job> {
        if entry.is_dir {
            return None;
        }
        let name = entry.file_name()?;
        if !self.is_eligible(&name) {
            return None;
        }
        Some(Job::new(
            entry.path.clone(),
            self.derive_output_path(&name, output_dir),
        ))
    }
}

/// 最後の `.` 以降（`.` を含む）を拡張子とみなす。なければ空文字列
pub fn extension_of(filename: &str) -> &str {
    filename.rfind('.').map_or("", |idx| &filename[idx..])
}

/// 拡張子を取り除いたファイル名
pub fn trim_extension(filename: &str) -> &str {
    &filename[..filename.len() - extension_of(filename).len()]
}

/// `output_dir/<拡張子を除いた名前><target_ext>` を返す
pub fn derive_output_path(filename: &str, output_dir: &Path, target_ext: &str) -> PathBuf {
    output_dir.join(format!("{}{}", trim_extension(filename), target_ext))
}
