pub mod art;
pub mod lastfm;

use anyhow::Result;

/// URL에서 바이트를 내려받는 수집기 트레이트.
/// 커버 아트 다운로드가 이 경계를 통해 이루어진다.
pub trait ArtFetcher: Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
