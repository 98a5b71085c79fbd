// 統合テスト用の変換器スタブとディレクトリ準備
#![allow(dead_code)]


pub use converters::*;

use std::fs;
use std::path::Path;

/// ルート直下とサブディレクトリに入力ファイルを配置する
pub fn setup_library(root: &Path) {
    let fiction = root.join("fiction");
    let nested = fiction.join("classics");
    fs::create_dir_all(&nested).unwrap();

    fs::write(root.join("report.fb2"), "<FictionBook/>").unwrap();
    fs::write(root.join("notes.txt"), "plain text").unwrap();
    fs::write(fiction.join("novel.EPUB"), "epub").unwrap();
    fs::write(nested.join("manual.pdf"), "%PDF-1.4").unwrap();

    // 対象外
    fs::write(root.join("cover.jpg"), "jpg").unwrap();
    fs::write(fiction.join("README"), "no extension").unwrap();
    fs::write(nested.join("archive.tar.gz"), "gz").unwrap();
}

/// `setup_library` が作る対象ファイルの数
pub const LIBRARY_ELIGIBLE: usize = 4;
