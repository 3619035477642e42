use std::path::PathBuf;

/// 커버 아트 해상도. 순서는 임베딩 선택 우선순위와 같다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtSize {
    ExtraLarge,
    Large,
    Medium,
    Small,
}

impl ArtSize {
    /// 우선순위 순서의 전체 해상도 목록.
    pub const ALL: [ArtSize; 4] = [
        ArtSize::ExtraLarge,
        ArtSize::Large,
        ArtSize::Medium,
        ArtSize::Small,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Last.fm 응답의 size 태그 값.
    pub fn api_name(self) -> &'static str {
        match self {
            ArtSize::ExtraLarge => "extralarge",
            ArtSize::Large => "large",
            ArtSize::Medium => "medium",
            ArtSize::Small => "small",
        }
    }

    pub fn from_api_name(name: &str) -> Option<ArtSize> {
        ArtSize::ALL.into_iter().find(|size| size.api_name() == name)
    }
}

/// 보강 대상 트랙. 아티스트와 제목은 호출자가 미리 채우며
/// 파이프라인은 이 둘을 덮어쓰지 않는다.
#[derive(Debug, Clone)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
    pub album_position: Option<u32>,
    pub genres: Vec<String>,
    /// 재생 길이 (초).
    pub length: Option<u32>,
    /// 해상도별 커버 아트 URL. ArtSize::index()로 접근한다.
    pub art_urls: [Option<String>; 4],
    /// 해상도별로 내려받은 커버 아트.
    pub art: [Option<Vec<u8>>; 4],
    pub album_artists: Option<Vec<String>>,
    pub performers: Option<Vec<String>>,
    pub disc: Option<u32>,
    pub year: Option<i32>,
}

impl Track {
    pub fn new(artist: &str, title: &str) -> Self {
        Self {
            artist: artist.to_string(),
            title: title.to_string(),
            album: None,
            album_position: None,
            genres: Vec::new(),
            length: None,
            art_urls: Default::default(),
            art: Default::default(),
            album_artists: None,
            performers: None,
            disc: None,
            year: None,
        }
    }

    pub fn art_url(&self, size: ArtSize) -> Option<&str> {
        self.art_urls[size.index()].as_deref()
    }

    pub fn set_art_url(&mut self, size: ArtSize, url: String) {
        self.art_urls[size.index()] = Some(url);
    }

    pub fn art(&self, size: ArtSize) -> Option<&[u8]> {
        self.art[size.index()].as_deref()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} - {} [{}]",
            self.artist,
            self.title,
            self.album.as_deref().unwrap_or("알 수 없음")
        )
    }
}

/// 태그에 임베드할 이미지. 항상 앞표지로 기록된다.
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub mime: &'static str,
    pub data: Vec<u8>,
}

/// 태그 기록기에 넘기는 최종 레코드. 파이프라인 실행당 한 번 만들어진다.
#[derive(Debug, Clone)]
pub struct TagRecord {
    pub track_number: Option<u32>,
    pub title: String,
    pub album: Option<String>,
    pub genres: Vec<String>,
    pub disc: Option<u32>,
    pub year: Option<i32>,
    pub album_artists: Vec<String>,
    pub performers: Vec<String>,
    pub picture: Option<Picture>,
}

#[derive(Debug, Clone)]
pub struct Mp3File {
    pub path: PathBuf,
    /// 태그에서 읽은 트랙. 아티스트/제목 태그가 없으면 None.
    pub track: Option<Track>,
}

impl Mp3File {
    pub fn filename(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("알 수 없음")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_art_size_priority_order() {
        assert_eq!(ArtSize::ALL[0], ArtSize::ExtraLarge);
        assert_eq!(ArtSize::ALL[3], ArtSize::Small);
        for (i, size) in ArtSize::ALL.into_iter().enumerate() {
            assert_eq!(size.index(), i);
        }
    }

    #[test]
    fn test_art_size_api_names() {
        assert_eq!(
            ArtSize::from_api_name("extralarge"),
            Some(ArtSize::ExtraLarge)
        );
        assert_eq!(ArtSize::from_api_name("small"), Some(ArtSize::Small));
        assert_eq!(ArtSize::from_api_name("mega"), None);
    }

    #[test]
    fn test_track_art_url_roundtrip() {
        let mut track = Track::new("IU", "Blueming");
        track.set_art_url(ArtSize::Medium, "http://cover.local/m.jpg".to_string());
        assert_eq!(
            track.art_url(ArtSize::Medium),
            Some("http://cover.local/m.jpg")
        );
        assert_eq!(track.art_url(ArtSize::Large), None);
    }
}
