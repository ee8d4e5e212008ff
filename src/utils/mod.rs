/// Hosts the download endpoint accepts.
const VIDEO_HOST_MARKERS: [&str; 2] = ["youtube", "youtu.be"];

/// Check that a URL points at a supported video host
pub fn is_supported_video_url(url: &str) -> bool {
    VIDEO_HOST_MARKERS.iter().any(|marker| url.contains(marker))
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
