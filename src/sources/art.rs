use std::time::Duration;

use anyhow::{Context, Result};

use crate::sources::ArtFetcher;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// reqwest 기반 커버 아트 다운로더.
pub struct HttpArtFetcher {
    client: reqwest::blocking::Client,
}

impl HttpArtFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("커버 아트 HTTP 클라이언트 생성에 실패했습니다")?;

        Ok(Self { client })
    }
}

impl ArtFetcher for HttpArtFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let data = self
            .client
            .get(url)
            .send()
            .context("커버 아트 요청에 실패했습니다")?
            .error_for_status()
            .context("커버 아트 응답이 실패했습니다")?
            .bytes()?
            .to_vec();

        Ok(data)
    }
}
