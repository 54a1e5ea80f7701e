//! HTML rendering for the form and gallery pages.

use gallery_core::{MediaKind, MediaPayload, Post, PostContent};
use std::fmt::Write;

/// Where a rendered gallery will be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Served by the app, with navigation back to the form
    Served,
    /// Written to a standalone file
    Standalone,
}

const STYLE: &str = r#"
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
         background: #fafafa; color: #1a1a1a; line-height: 1.6; padding: 2rem 1rem; }
  .container { max-width: 1200px; margin: 0 auto; }
  h1 { font-size: 2.5rem; font-weight: 300; margin-bottom: 2rem; text-align: center; }
  nav { text-align: center; margin-bottom: 2rem; }
  form { display: grid; gap: 1rem; max-width: 32rem; margin: 0 auto 2rem; }
  label { font-weight: 600; }
  .gallery-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
                  gap: 1.5rem; margin-bottom: 4rem; }
  .card { background: #fff; border-radius: 0.75rem; overflow: hidden; border: 1px solid #e5e7eb; }
  .card-image { width: 100%; height: 200px; object-fit: cover; }
  .text-content { font-size: 1.125rem; text-align: center; padding: 2rem 1rem; min-height: 120px;
                  display: flex; align-items: center; justify-content: center; }
  .audio-player { padding: 1rem; }
  .audio-controls { width: 100%; }
  .card time { display: block; font-size: 0.75rem; color: #6b7280; padding: 0 1rem 0.75rem; }
  .empty-state { text-align: center; padding: 4rem 2rem; color: #6b7280; grid-column: 1 / -1; }
"#;

/// Escape text for use in HTML element content and quoted attributes.
///
/// # Examples
///
/// ```
/// use gallery_server::escape_html;
///
/// assert_eq!(escape_html(r#"<b>"walk" & 'talk'</b>"#),
///            "&lt;b&gt;&quot;walk&quot; &amp; &#x27;talk&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<div class=\"container\">\n{}</div>\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// Render the submission form.
///
/// A link to the gallery is shown once any posts exist.
pub fn render_index(post_count: i64) -> String {
    let mut body = String::from("<h1>Walk Gallery</h1>\n");
    if post_count > 0 {
        let _ = writeln!(
            body,
            "<nav><a href=\"/gallery\">View the gallery ({} {})</a></nav>",
            post_count,
            if post_count == 1 { "post" } else { "posts" }
        );
    }
    body.push_str(
        r#"<form action="/posts" method="post" enctype="multipart/form-data">
  <label for="text">Type Your Word</label>
  <input id="text" name="text" type="text" autocomplete="off">
  <label for="image">Upload Your Image</label>
  <input id="image" name="image" type="file" accept="image/*">
  <label for="audio">Record Your Sound</label>
  <input id="audio" name="audio" type="file" accept="audio/*" capture>
  <label for="drawing">Add Your Drawing</label>
  <input id="drawing" name="drawing" type="file" accept="image/*">
  <button type="submit">Submit</button>
</form>
"#,
    );
    page("Walk Gallery", &body)
}

fn media_card(out: &mut String, kind: MediaKind, payload: &MediaPayload) {
    let src = escape_html(&payload.src());
    let alt = escape_html(payload.name.as_deref().unwrap_or(""));
    if kind.is_visual() {
        let _ = write!(out, "<img class=\"card-image\" src=\"{}\" alt=\"{}\">", src, alt);
    } else {
        let _ = write!(
            out,
            "<div class=\"audio-player\"><audio class=\"audio-controls\" controls>\
             <source src=\"{}\" type=\"{}\">Your browser does not support the audio element.\
             </audio></div>",
            src,
            escape_html(&payload.mime)
        );
    }
}

/// Render posts as a gallery page, newest first.
///
/// `posts` is expected in ascending timestamp order, as returned by
/// `PostRepository::list_all`. Text is shown upper-cased.
pub fn render_gallery(posts: &[Post], layout: Layout) -> String {
    let mut body = String::from("<h1>Walk Gallery</h1>\n");
    if layout == Layout::Served {
        body.push_str("<nav><a href=\"/\">Add to the gallery</a></nav>\n");
    }
    body.push_str("<div class=\"gallery-grid\">\n");

    for post in posts.iter().rev() {
        let _ = write!(body, "<div class=\"card\" id=\"post-{}\">", escape_html(&post.id));
        match &post.content {
            PostContent::Text(text) => {
                let _ = write!(
                    body,
                    "<div class=\"text-content\"><strong>{}</strong></div>",
                    escape_html(&text.to_uppercase())
                );
            }
            content => {
                if let (Some(kind), Some(payload)) = (content.kind(), content.payload()) {
                    media_card(&mut body, kind, payload);
                }
            }
        }
        let _ = writeln!(body, "<time>{}</time></div>", escape_html(&post.datetime));
    }

    if posts.is_empty() {
        body.push_str(
            "<div class=\"empty-state\"><h3>No content yet</h3>\
             <p>Start creating your walk gallery</p></div>\n",
        );
    }
    body.push_str("</div>\n");

    page("Walk Gallery", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::{MediaKind, MediaSource, TimestampClock};

    fn text(clock: &TimestampClock, s: &str) -> Post {
        Post::new(PostContent::text(s).unwrap(), clock)
    }

    #[test]
    fn gallery_is_newest_first_and_uppercased() {
        let clock = TimestampClock::new();
        let posts = vec![text(&clock, "first step"), text(&clock, "second step")];
        let html = render_gallery(&posts, Layout::Served);

        let first = html.find("FIRST STEP").unwrap();
        let second = html.find("SECOND STEP").unwrap();
        assert!(second < first);
        assert!(!html.contains("first step"));
    }

    #[test]
    fn text_is_escaped() {
        let clock = TimestampClock::new();
        let html = render_gallery(&[text(&clock, "<script>")], Layout::Standalone);
        assert!(html.contains("&lt;SCRIPT&gt;"));
        assert!(!html.contains("<SCRIPT>"));
    }

    #[test]
    fn media_sources_render_as_data_uri_or_url() {
        let clock = TimestampClock::new();
        let inline = Post::new(
            PostContent::media(
                MediaKind::Drawing,
                MediaPayload {
                    name: None,
                    mime: "image/png".to_string(),
                    source: MediaSource::inline(b"abc"),
                },
            ),
            &clock,
        );
        let remote = Post::new(
            PostContent::media(
                MediaKind::Audio,
                MediaPayload {
                    name: Some("clip.wav".to_string()),
                    mime: "audio/wav".to_string(),
                    source: MediaSource::Url("https://cdn.example.com/a.wav?x=1&y=2".into()),
                },
            ),
            &clock,
        );
        let html = render_gallery(&[inline, remote], Layout::Standalone);

        assert!(html.contains(r#"src="data:image/png;base64,YWJj""#));
        assert!(html.contains(r#"src="https://cdn.example.com/a.wav?x=1&amp;y=2" type="audio/wav""#));
    }

    #[test]
    fn empty_gallery_shows_empty_state() {
        let html = render_gallery(&[], Layout::Standalone);
        assert!(html.contains("No content yet"));
        assert!(!html.contains("Add to the gallery"));
    }

    #[test]
    fn index_links_to_gallery_only_when_posts_exist() {
        assert!(!render_index(0).contains("/gallery"));
        assert!(render_index(1).contains("View the gallery (1 post)"));
        assert!(render_index(3).contains("(3 posts)"));
    }
}
