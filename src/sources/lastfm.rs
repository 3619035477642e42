use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use rand::Rng;
use serde::Deserialize;

use crate::models::{ArtSize, Track};

const API_URL: &str = "https://ws.audioscrobbler.com/2.0/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Last.fm track.getInfo 클라이언트.
/// 생성 시 키 풀에서 API 키 하나를 뽑아 수명 동안 재사용한다.
pub struct LastFmClient {
    client: reqwest::blocking::Client,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
pub struct LastFmResponse {
    pub status: String,
    pub track: Option<LastFmTrack>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LastFmTrack {
    pub name: Option<String>,
    pub artist: Option<LastFmArtist>,
    /// 재생 길이 (밀리초).
    pub duration: Option<u64>,
    pub album: Option<LastFmAlbum>,
    pub toptags: Option<LastFmToptags>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LastFmArtist {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LastFmAlbum {
    pub title: Option<String>,
    pub position: Option<AlbumPosition>,
    pub image: Option<Vec<Option<LastFmImage>>>,
}

/// 앨범 내 트랙 순번. 숫자 또는 문자열로 내려온다.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AlbumPosition {
    Number(u32),
    Text(String),
}

impl AlbumPosition {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            AlbumPosition::Number(n) => Some(*n),
            AlbumPosition::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LastFmImage {
    pub size: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LastFmToptags {
    pub tag: Option<Vec<Option<LastFmTag>>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LastFmTag {
    pub name: Option<String>,
}

impl LastFmClient {
    /// 키 풀에서 키 하나를 무작위로 선택해 클라이언트를 만든다.
    pub fn new(api_keys: &[String], rng: &mut impl Rng) -> Result<Self> {
        if api_keys.is_empty() {
            bail!("Last.fm API 키가 없습니다");
        }
        let api_key = api_keys[rng.gen_range(0..api_keys.len())].clone();

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Last.fm HTTP 클라이언트 생성에 실패했습니다")?;

        Ok(Self {
            client,
            api_key,
            api_url: API_URL.to_string(),
        })
    }

    /// Last.fm에서 트랙 정보를 조회하여 track에 채워 넣는다.
    /// 1차 조회에 앨범 정보가 없으면 단순화한 제목으로 한 번만 재조회한다.
    /// 네트워크/파싱/상태 오류는 모두 false로 끝나며 전파되지 않는다.
    pub fn enrich(&self, track: &mut Track) -> bool {
        let artist = track.artist.clone();
        enrich_with(track, |title| self.get_info(&artist, title))
    }

    /// track.getInfo 호출 한 번. 시도당 네트워크 호출은 정확히 한 번이다.
    fn get_info(&self, artist: &str, title: &str) -> Result<LastFmResponse> {
        let body = self
            .client
            .get(&self.api_url)
            .query(&[
                ("method", "track.getInfo"),
                ("api_key", self.api_key.as_str()),
                ("artist", artist),
                ("track", title),
                ("format", "json"),
            ])
            .send()
            .context("Last.fm 요청에 실패했습니다")?
            .text()
            .context("Last.fm 응답 읽기에 실패했습니다")?;

        parse_response(&body)
    }
}

/// 응답 본문을 파싱하고 상태를 검사한다. 루트가 파싱되지 않거나
/// status가 ok가 아니면 에러.
pub fn parse_response(body: &str) -> Result<LastFmResponse> {
    let resp: LastFmResponse =
        serde_json::from_str(body).context("Last.fm 응답 파싱에 실패했습니다")?;
    if resp.status != "ok" {
        bail!("Last.fm 응답 상태가 ok가 아닙니다: {}", resp.status);
    }
    Ok(resp)
}

/// 조회 시도를 순차 실행한다. 1차 응답에 앨범 정보가 있으면 그대로
/// 매핑하고, 없으면 단순화한 제목이 원래 제목과 다를 때 한 번만
/// 재조회한다. 매핑에는 실제로 앨범 정보를 담은 응답이 쓰인다.
fn enrich_with<F>(track: &mut Track, get_info: F) -> bool
where
    F: Fn(&str) -> Result<LastFmResponse>,
{
    let first = match get_info(&track.title) {
        Ok(resp) => resp,
        Err(e) => {
            warn!("Last.fm 조회 실패 ({} - {}): {:#}", track.artist, track.title, e);
            return false;
        }
    };

    if let Some(found) = with_album(&first) {
        log_match(found);
        map_track(track, found);
        return true;
    }

    let simplified = simplify_title(&track.title);
    if simplified == track.title {
        return true;
    }

    debug!("앨범 정보 없음, 단순화한 제목으로 재조회: {}", simplified);

    let second = match get_info(&simplified) {
        Ok(resp) => resp,
        Err(e) => {
            warn!("Last.fm 재조회 실패 ({} - {}): {:#}", track.artist, simplified, e);
            return false;
        }
    };

    if let Some(found) = with_album(&second) {
        log_match(found);
        map_track(track, found);
    }

    true
}

/// 일치한 트랙을 디버그 로그로 남긴다.
fn log_match(found: &LastFmTrack) {
    debug!(
        "일치 항목: {} - {}",
        found
            .artist
            .as_ref()
            .and_then(|artist| artist.name.as_deref())
            .unwrap_or("?"),
        found.name.as_deref().unwrap_or("?")
    );
}

/// 앨범 블록까지 담고 있는 트랙 페이로드만 돌려준다.
fn with_album(resp: &LastFmResponse) -> Option<&LastFmTrack> {
    resp.track.as_ref().filter(|t| t.album.is_some())
}

/// 파싱된 응답을 트랙 필드에 복사한다. 응답에 없는 값은 기존 값을
/// 유지하며, 아티스트와 제목은 건드리지 않는다.
pub fn map_track(track: &mut Track, found: &LastFmTrack) {
    if let Some(ref album) = found.album {
        if let Some(ref title) = album.title {
            track.album = Some(title.clone());
        }
        if let Some(position) = album.position.as_ref().and_then(AlbumPosition::as_u32) {
            track.album_position = Some(position);
        }
        if let Some(ref images) = album.image {
            for image in images.iter().flatten() {
                let size = match image.size.as_deref().and_then(ArtSize::from_api_name) {
                    Some(size) => size,
                    None => continue,
                };
                if let Some(ref url) = image.url {
                    track.set_art_url(size, url.clone());
                }
            }
        }
    }

    track.genres = found
        .toptags
        .as_ref()
        .and_then(|toptags| toptags.tag.as_ref())
        .map(|tags| {
            tags.iter()
                .flatten()
                .filter_map(|tag| tag.name.clone())
                .collect()
        })
        .unwrap_or_default();

    if let Some(ms) = found.duration {
        track.length = Some((ms / 1000) as u32);
    }
}

/// 제목에서 괄호 그룹과 " - " 이후의 꼬리를 제거한다.
/// 예: "Song (Remix)" -> "Song", "Song - Live" -> "Song"
pub fn simplify_title(title: &str) -> String {
    let mut out = String::new();
    let mut rest = title;
    loop {
        // " (...)"는 가장 가까운 닫는 괄호까지만 제거한다.
        let paren = rest.find(" (").and_then(|start| {
            rest[start + 2..]
                .find(')')
                .map(|close| (start, start + 2 + close + 1))
        });
        let dash = rest.find(" - ");
        match (paren, dash) {
            (Some((start, _)), Some(d)) if d < start => {
                out.push_str(&rest[..d]);
                break;
            }
            (Some((start, end)), _) => {
                out.push_str(&rest[..start]);
                rest = &rest[end..];
            }
            (None, Some(d)) => {
                out.push_str(&rest[..d]);
                break;
            }
            (None, None) => {
                out.push_str(rest);
                break;
            }
        }
    }
    out
}
