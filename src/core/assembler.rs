use std::thread;

use log::debug;

use crate::models::{ArtSize, Picture, TagRecord, Track};
use crate::sources::ArtFetcher;

/// 임베드 이미지의 고정 MIME 타입.
pub const COVER_MIME: &str = "image/jpeg";

/// 보강된 트랙을 태그 레코드로 조립한다. 4개 해상도의 커버 아트를
/// 동시에 내려받은 뒤 우선순위가 가장 높은 한 장만 임베드한다.
pub fn assemble(
    track: &mut Track,
    fetcher: &dyn ArtFetcher,
    order_number_in_tag: bool,
    position_count: Option<u32>,
) -> TagRecord {
    fetch_art(track, fetcher);

    TagRecord {
        track_number: track_number(track, order_number_in_tag, position_count),
        title: track.title.clone(),
        album: track.album.clone(),
        genres: track.genres.clone(),
        disc: track.disc,
        year: track.year,
        album_artists: track
            .album_artists
            .clone()
            .unwrap_or_else(|| vec![track.artist.clone()]),
        performers: track
            .performers
            .clone()
            .unwrap_or_else(|| vec![track.artist.clone()]),
        picture: select_picture(track),
    }
}

/// 해상도별 커버 아트를 동시에 내려받아 트랙에 저장한다.
/// URL이 없는 해상도는 네트워크 호출 없이 건너뛰고, 실패한 해상도는
/// None으로 남으며 다른 해상도에 영향을 주지 않는다. 네 작업이 모두
/// 끝날 때까지 기다린 뒤 반환한다.
pub fn fetch_art(track: &mut Track, fetcher: &dyn ArtFetcher) {
    let urls = ArtSize::ALL.map(|size| track.art_url(size).map(str::to_string));

    let art = thread::scope(|scope| {
        let handles =
            urls.map(|url| scope.spawn(move || fetch_one(fetcher, url.as_deref())));
        handles.map(|handle| handle.join().unwrap_or(None))
    });

    track.art = art;
}

fn fetch_one(fetcher: &dyn ArtFetcher, url: Option<&str>) -> Option<Vec<u8>> {
    let url = match url {
        Some(url) if !url.trim().is_empty() => url,
        _ => return None,
    };
    match fetcher.fetch(url) {
        Ok(data) => Some(data),
        Err(e) => {
            debug!("커버 아트 다운로드 실패 ({}): {:#}", url, e);
            None
        }
    }
}

/// 트랙 번호 정책: 순번 기록이 켜져 있고 순번이 주어지면 순번,
/// 아니면 앨범 내 위치, 둘 다 없으면 미기록.
fn track_number(track: &Track, order_number_in_tag: bool, position_count: Option<u32>) -> Option<u32> {
    if order_number_in_tag {
        if let Some(count) = position_count {
            return Some(count);
        }
    }
    track.album_position
}

/// extralarge -> small 우선순위로 첫 번째로 받은 아트를 선택한다.
fn select_picture(track: &Track) -> Option<Picture> {
    for size in ArtSize::ALL {
        if let Some(data) = track.art(size) {
            return Some(Picture {
                mime: COVER_MIME,
                data: data.to_vec(),
            });
        }
    }
    None
}
