use std::path::Path;

use anyhow::Result;

use crate::core::tagger;
use crate::models::Mp3File;

/// 디렉토리를 재귀 탐색하여 모든 MP3 파일을 스캔한다.
/// 각 파일의 ID3 태그를 읽어 Mp3File 목록을 반환한다.
pub fn scan_directory(dir: &Path) -> Result<Vec<Mp3File>> {
    let mut files = Vec::new();
    collect_mp3_files(dir, &mut files)?;
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// 디렉토리를 재귀 순회하며 MP3 파일을 수집한다.
fn collect_mp3_files(dir: &Path, files: &mut Vec<Mp3File>) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("{}은(는) 디렉토리가 아닙니다", dir.display());
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_mp3_files(&path, files)?;
        } else if is_mp3(&path) {
            files.push(load_mp3_file(&path));
        }
    }

    Ok(())
}

/// 확장자가 .mp3인지 확인한다 (대소문자 무시).
fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

/// MP3 파일 하나를 로드하여 태그 정보를 포함한 Mp3File을 반환한다.
fn load_mp3_file(path: &Path) -> Mp3File {
    let track = tagger::read_track(path).unwrap_or(None);
    Mp3File {
        path: path.to_path_buf(),
        track,
    }
}

/// 단일 MP3 파일을 로드한다. 파일이 없거나 MP3가 아니면 에러.
pub fn load_single_file(path: &Path) -> Result<Mp3File> {
    if !path.exists() {
        anyhow::bail!("파일을 찾을 수 없습니다: {}", path.display());
    }
    if !is_mp3(path) {
        anyhow::bail!("MP3 파일이 아닙니다: {}", path.display());
    }
    Ok(load_mp3_file(path))
}

/// 경로가 디렉토리면 재귀 스캔, 파일이면 단일 로드한다.
pub fn scan_path(path: &Path) -> Result<Vec<Mp3File>> {
    if path.is_dir() {
        scan_directory(path)
    } else {
        Ok(vec![load_single_file(path)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_directory_finds_mp3_case_insensitive() {
        let dir = tempfile::tempdir().expect("임시 디렉토리 생성 실패");
        std::fs::write(dir.path().join("b.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("a.MP3"), b"").unwrap();
        std::fs::write(dir.path().join("note.txt"), b"").unwrap();

        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("c.mp3"), b"").unwrap();

        let files = scan_directory(dir.path()).expect("스캔 실패");
        let names: Vec<&str> = files.iter().map(|f| f.filename()).collect();
        assert_eq!(names, vec!["a.MP3", "b.mp3", "c.mp3"]);
    }

    #[test]
    fn test_scan_directory_rejects_file_path() {
        let file = tempfile::NamedTempFile::new().expect("임시 파일 생성 실패");
        assert!(scan_directory(file.path()).is_err());
    }

    #[test]
    fn test_load_single_file_rejects_non_mp3() {
        let file = tempfile::NamedTempFile::new().expect("임시 파일 생성 실패");
        assert!(load_single_file(file.path()).is_err());
    }
}
