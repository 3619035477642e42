use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};

use crate::config;
use crate::core::{assembler, parser, scanner, tagger};
use crate::models::{ArtSize, Mp3File, Track};
use crate::sources::art::HttpArtFetcher;
use crate::sources::lastfm::LastFmClient;

#[derive(Parser)]
#[command(name = "tagfm", about = "Last.fm 연동 MP3 태그 보강 도구")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 디렉토리를 스캔하여 태그 현황 표시
    Scan {
        /// 스캔할 디렉토리
        directory: PathBuf,
    },
    /// Last.fm에서 태그를 가져와 파일에 기록
    Fetch {
        /// MP3 파일 또는 디렉토리
        path: PathBuf,

        /// 앨범 정보가 이미 있는 파일도 다시 보강
        #[arg(long)]
        all: bool,
    },
    /// 아티스트/제목으로 조회 결과만 출력 (파일 수정 없음)
    Lookup {
        artist: String,
        title: String,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan { directory } => cmd_scan(&directory),
        Commands::Fetch { path, all } => cmd_fetch(&path, all),
        Commands::Lookup { artist, title } => cmd_lookup(&artist, &title),
    }
}

fn cmd_scan(directory: &Path) -> Result<()> {
    let files = scanner::scan_directory(directory)?;

    if files.is_empty() {
        println!("{}에서 MP3 파일을 찾을 수 없습니다", directory.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["파일", "아티스트", "제목", "앨범", "장르"]);

    for file in &files {
        let (artist, title, album, genre) = match &file.track {
            Some(t) => (
                t.artist.clone(),
                t.title.clone(),
                t.album.clone().unwrap_or_else(|| "-".to_string()),
                t.genres.join(", "),
            ),
            None => (
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                String::new(),
            ),
        };

        table.add_row(vec![
            Cell::new(file.filename()),
            Cell::new(&artist),
            Cell::new(&title),
            Cell::new(&album),
            Cell::new(&genre),
        ]);
    }

    println!("{table}");
    println!(
        "\n총 {} 파일 (앨범 정보 있음: {}, 필요: {})",
        files.len(),
        files.iter().filter(|f| !needs_enrichment(f)).count(),
        files.iter().filter(|f| needs_enrichment(f)).count(),
    );

    Ok(())
}

fn cmd_fetch(path: &Path, all: bool) -> Result<()> {
    let cfg = config::load_config();

    if !cfg.lastfm.is_configured() {
        println!(
            "Last.fm API 키가 설정되지 않았습니다. {}의 [lastfm] api_keys에 추가하세요.",
            config::config_path().display()
        );
        return Ok(());
    }

    let client = LastFmClient::new(&cfg.lastfm.api_keys, &mut rand::thread_rng())?;
    let fetcher = HttpArtFetcher::new()?;

    let files = scanner::scan_path(path)?;
    let targets: Vec<_> = files
        .into_iter()
        .filter(|f| all || needs_enrichment(f))
        .collect();

    if targets.is_empty() {
        println!("보강할 파일이 없습니다.");
        return Ok(());
    }

    println!("보강할 파일 {}개를 찾았습니다.\n", targets.len());

    for (index, file) in targets.iter().enumerate() {
        println!("--- {} ---", file.filename());

        let mut track = match resolve_track(file) {
            Some(track) => track,
            None => {
                println!("  아티스트/제목을 알 수 없습니다. 건너뜁니다.\n");
                continue;
            }
        };

        println!("  조회 중: {} - {}", track.artist, track.title);

        if !client.enrich(&mut track) {
            println!("  Last.fm 조회에 실패했습니다. 건너뜁니다.\n");
            continue;
        }

        let position_count = if cfg.tag.order_number_in_tag {
            Some(index as u32 + 1)
        } else {
            None
        };
        let record = assembler::assemble(
            &mut track,
            &fetcher,
            cfg.tag.order_number_in_tag,
            position_count,
        );

        if record.picture.is_some() {
            println!("  커버 아트를 내려받았습니다.");
        }

        if let Err(e) = tagger::embed_record(&file.path, &record) {
            println!("  태그 기록 실패: {:#}. 건너뜁니다.\n", e);
            continue;
        }
        println!("  태그가 적용되었습니다: {}\n", track.summary());
    }

    println!("완료!");
    Ok(())
}

fn cmd_lookup(artist: &str, title: &str) -> Result<()> {
    let cfg = config::load_config();

    if !cfg.lastfm.is_configured() {
        println!(
            "Last.fm API 키가 설정되지 않았습니다. {}의 [lastfm] api_keys에 추가하세요.",
            config::config_path().display()
        );
        return Ok(());
    }

    let client = LastFmClient::new(&cfg.lastfm.api_keys, &mut rand::thread_rng())?;
    let mut track = Track::new(artist, title);

    if !client.enrich(&mut track) {
        println!("Last.fm 조회에 실패했습니다.");
        return Ok(());
    }

    println!("앨범: {}", track.album.as_deref().unwrap_or("-"));
    println!(
        "앨범 내 위치: {}",
        track
            .album_position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "재생 길이: {}",
        track
            .length
            .map(|s| format!("{}초", s))
            .unwrap_or_else(|| "-".to_string())
    );
    println!("장르: {}", track.genres.join(", "));
    for size in ArtSize::ALL {
        println!(
            "커버 아트 ({}): {}",
            size.api_name(),
            track.art_url(size).unwrap_or("-")
        );
    }

    Ok(())
}

/// 앨범 정보가 없는 파일이 보강 대상이다.
fn needs_enrichment(file: &Mp3File) -> bool {
    match &file.track {
        Some(track) => track.album.is_none(),
        None => true,
    }
}

/// 태그에서 트랙을 얻고, 없으면 파일명에서 아티스트/제목을 추출한다.
fn resolve_track(file: &Mp3File) -> Option<Track> {
    if let Some(ref track) = file.track {
        return Some(track.clone());
    }

    let parsed = parser::parse_filename(&file.path);
    match (parsed.artist, parsed.title) {
        (Some(artist), Some(title)) => Some(Track::new(&artist, &title)),
        _ => None,
    }
}
