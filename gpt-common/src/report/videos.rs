//! Embedded video widgets for sessions with a recording

use crate::resolve::{ResolvedSession, UNKNOWN};
use crate::time::display_date;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoWidget {
    pub embed_url: String,
    pub title: String,
}

/// Convert a share link into an embeddable one
///
/// Drops any query string and rewrites `https://youtu.be/` short links.
pub fn embed_url(url: &str) -> String {
    let url = url.trim();
    let base = match url.find('?') {
        Some(pos) => &url[..pos],
        None => url,
    };
    base.replace("https://youtu.be/", "https://youtube.com/embed/")
}

/// One widget per session with a video link, keyed by session id
pub fn video_widgets(sessions: &[ResolvedSession]) -> BTreeMap<i64, VideoWidget> {
    sessions
        .iter()
        .filter(|s| s.has_video())
        .filter_map(|s| {
            let id = s.id?;
            let url = s.video_url.as_deref()?;
            Some((
                id,
                VideoWidget {
                    embed_url: embed_url(url),
                    title: format!(
                        "{} - {}",
                        display_date(Some(s.session_date)).unwrap_or_default(),
                        s.song.as_deref().unwrap_or(UNKNOWN)
                    ),
                },
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_embed_url() {
        assert_eq!(
            embed_url("https://youtu.be/dQw4w9WgXcQ?si=abc123"),
            "https://youtube.com/embed/dQw4w9WgXcQ"
        );
        // No query string: nothing is cut
        assert_eq!(
            embed_url("https://youtu.be/dQw4w9WgXcQ"),
            "https://youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_url("https://youtube.com/embed/xyz"),
            "https://youtube.com/embed/xyz"
        );
    }

    #[test]
    fn test_widgets_keyed_by_session() {
        let mut with_video = session(7, d(2024, 3, 9), 20, Some("Lagrima"));
        with_video.video_url = Some("https://youtu.be/abc?t=3".into());
        let mut blank = session(8, d(2024, 3, 10), 20, Some("Lagrima"));
        blank.video_url = Some("  ".into());
        let sessions = vec![with_video, blank, session(9, d(2024, 3, 11), 20, None)];

        let widgets = video_widgets(&sessions);
        assert_eq!(widgets.len(), 1);
        assert_eq!(
            widgets[&7],
            VideoWidget {
                embed_url: "https://youtube.com/embed/abc".into(),
                title: "03/09/2024 - Lagrima".into(),
            }
        );
    }
}
