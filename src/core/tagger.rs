use std::path::Path;

use anyhow::Result;
use id3::{Tag, TagLike, Version};

use crate::models::{TagRecord, Track};

/// MP3 파일에서 ID3 태그를 읽어 Track으로 변환한다.
/// 조회에 필요한 아티스트와 제목이 모두 있어야 Some을 반환한다.
pub fn read_track(path: &Path) -> Result<Option<Track>> {
    let tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(id3::Error {
            kind: id3::ErrorKind::NoTag,
            ..
        }) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let (artist, title) = match (tag.artist(), tag.title()) {
        (Some(artist), Some(title)) => (artist, title),
        _ => return Ok(None),
    };

    let mut track = Track::new(artist, title);
    track.album = tag.album().map(|s| s.to_string());
    track.genres = tag
        .genre_parsed()
        .map(|g| vec![g.to_string()])
        .unwrap_or_default();
    track.album_artists = tag.album_artist().map(|a| vec![a.to_string()]);
    track.disc = tag.disc();
    track.year = tag.year();

    Ok(Some(track))
}

/// 태그 레코드를 MP3 파일에 ID3v2.4 태그로 기록한다.
/// 기존 태그가 있으면 레코드에 있는 필드만 덮어쓴다.
pub fn embed_record(path: &Path, record: &TagRecord) -> Result<()> {
    let mut tag = Tag::read_from_path(path).unwrap_or_else(|_| Tag::new());

    tag.set_title(&record.title);
    if let Some(track_number) = record.track_number {
        tag.set_track(track_number);
    }
    if let Some(ref album) = record.album {
        tag.set_album(album);
    }
    if !record.genres.is_empty() {
        tag.set_genre(record.genres.join(";"));
    }
    if let Some(disc) = record.disc {
        tag.set_disc(disc);
    }
    if let Some(year) = record.year {
        tag.set_year(year);
    }
    if !record.album_artists.is_empty() {
        tag.set_album_artist(record.album_artists.join(";"));
    }
    if !record.performers.is_empty() {
        tag.set_artist(record.performers.join(";"));
    }
    if let Some(ref picture) = record.picture {
        tag.remove_all_pictures();
        tag.add_frame(id3::frame::Picture {
            mime_type: picture.mime.to_string(),
            picture_type: id3::frame::PictureType::CoverFront,
            description: String::new(),
            data: picture.data.clone(),
        });
    }

    tag.write_to_path(path, Version::Id3v24)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Picture;

    fn sample_record() -> TagRecord {
        TagRecord {
            track_number: Some(5),
            title: "Title".to_string(),
            album: Some("Album Title".to_string()),
            genres: vec!["Reggae".to_string(), "Rock".to_string()],
            disc: Some(1),
            year: Some(2020),
            album_artists: vec!["Artist".to_string()],
            performers: vec!["Artist".to_string()],
            picture: Some(Picture {
                mime: "image/jpeg",
                data: vec![0xFF, 0xD8, 0xFF, 0xE0],
            }),
        }
    }

    #[test]
    fn test_embed_then_read_roundtrip() {
        let file = tempfile::NamedTempFile::new().expect("임시 파일 생성 실패");

        embed_record(file.path(), &sample_record()).expect("태그 기록 실패");

        let track = read_track(file.path())
            .expect("태그 읽기 실패")
            .expect("트랙이 없음");
        assert_eq!(track.artist, "Artist");
        assert_eq!(track.title, "Title");
        assert_eq!(track.album.as_deref(), Some("Album Title"));
        assert_eq!(track.album_artists, Some(vec!["Artist".to_string()]));
        assert_eq!(track.disc, Some(1));
        assert_eq!(track.year, Some(2020));
    }

    #[test]
    fn test_embed_writes_front_cover_picture() {
        let file = tempfile::NamedTempFile::new().expect("임시 파일 생성 실패");

        embed_record(file.path(), &sample_record()).expect("태그 기록 실패");

        let tag = Tag::read_from_path(file.path()).expect("태그 읽기 실패");
        let picture = tag.pictures().next().expect("이미지가 없음");
        assert_eq!(picture.picture_type, id3::frame::PictureType::CoverFront);
        assert_eq!(picture.mime_type, "image/jpeg");
        assert_eq!(picture.data, vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn test_embed_without_picture_keeps_tag_clean() {
        let file = tempfile::NamedTempFile::new().expect("임시 파일 생성 실패");

        let record = TagRecord {
            picture: None,
            ..sample_record()
        };
        embed_record(file.path(), &record).expect("태그 기록 실패");

        let tag = Tag::read_from_path(file.path()).expect("태그 읽기 실패");
        assert!(tag.pictures().next().is_none());
        assert_eq!(tag.track(), Some(5));
    }

    #[test]
    fn test_read_track_requires_artist_and_title() {
        let file = tempfile::NamedTempFile::new().expect("임시 파일 생성 실패");

        let mut tag = Tag::new();
        tag.set_title("Title Only");
        tag.write_to_path(file.path(), Version::Id3v24)
            .expect("태그 기록 실패");

        let track = read_track(file.path()).expect("태그 읽기 실패");
        assert!(track.is_none());
    }

    #[test]
    fn test_read_track_no_tag_is_none() {
        let file = tempfile::NamedTempFile::new().expect("임시 파일 생성 실패");
        let track = read_track(file.path()).expect("태그 읽기 실패");
        assert!(track.is_none());
    }
}
