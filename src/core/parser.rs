use std::path::Path;

/// Artist and title extracted from a filename.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedName {
    pub artist: Option<String>,
    pub title: Option<String>,
}

/// Parse a filename into artist and title.
///
/// Supported patterns:
/// - "Artist - Title.mp3"
/// - "01. Title.mp3"
/// - "01 Artist - Title.mp3"
/// - "Title.mp3" (fallback)
pub fn parse_filename(path: &Path) -> ParsedName {
    let stem = match path.file_stem().and_then(|s| s.to_str()) {
        Some(s) => s.to_string(),
        None => return ParsedName::default(),
    };

    let stem = stem.trim().to_string();

    // Try "01 Artist - Title" or "01. Artist - Title"
    if let Some(name) = try_numbered_artist_title(&stem) {
        return name;
    }

    // Try "Artist - Title"
    if let Some(name) = try_artist_title(&stem) {
        return name;
    }

    // Try "01. Title" or "01 Title"
    if let Some(name) = try_numbered_title(&stem) {
        return name;
    }

    // Fallback: entire stem is the title
    ParsedName {
        title: Some(stem),
        artist: None,
    }
}

fn try_numbered_artist_title(stem: &str) -> Option<ParsedName> {
    // Pattern: "01. Artist - Title" or "01 Artist - Title"
    let rest = strip_track_number(stem)?;
    try_artist_title(rest)
}

fn try_artist_title(stem: &str) -> Option<ParsedName> {
    // Split on " - "
    let parts: Vec<&str> = stem.splitn(2, " - ").collect();
    if parts.len() != 2 {
        return None;
    }

    let artist = parts[0].trim();
    let title = parts[1].trim();

    if artist.is_empty() || title.is_empty() {
        return None;
    }

    Some(ParsedName {
        artist: Some(artist.to_string()),
        title: Some(title.to_string()),
    })
}

fn try_numbered_title(stem: &str) -> Option<ParsedName> {
    let rest = strip_track_number(stem)?;
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    Some(ParsedName {
        title: Some(title.to_string()),
        artist: None,
    })
}

fn strip_track_number(stem: &str) -> Option<&str> {
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() < 2 {
        return None;
    }

    // Must start with digits
    let mut i = 0;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i == 0 {
        return None;
    }

    let rest = &stem[i..];

    // Skip optional "." and/or spaces
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let rest = rest.trim_start();

    if rest.is_empty() {
        return None;
    }

    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_artist_title() {
        let name = parse_filename(&PathBuf::from("IU - Blueming.mp3"));
        assert_eq!(name.artist.as_deref(), Some("IU"));
        assert_eq!(name.title.as_deref(), Some("Blueming"));
    }

    #[test]
    fn test_numbered_title() {
        let name = parse_filename(&PathBuf::from("01. Blueming.mp3"));
        assert_eq!(name.title.as_deref(), Some("Blueming"));
        assert!(name.artist.is_none());
    }

    #[test]
    fn test_numbered_artist_title() {
        let name = parse_filename(&PathBuf::from("01 IU - Blueming.mp3"));
        assert_eq!(name.artist.as_deref(), Some("IU"));
        assert_eq!(name.title.as_deref(), Some("Blueming"));
    }

    #[test]
    fn test_fallback() {
        let name = parse_filename(&PathBuf::from("SomeSong.mp3"));
        assert_eq!(name.title.as_deref(), Some("SomeSong"));
        assert!(name.artist.is_none());
    }
}
