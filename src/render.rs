//! Markdown to HTML rendering via pulldown-cmark.
//!
//! Pure: raw text in, markup out, no filesystem access. Link and image
//! destinations pointing at `.md` sources are rewritten to their `.html`
//! counterparts so intra-site links survive the conversion.

use pulldown_cmark::{Event, Options, Parser, Tag, html};

/// Render raw markdown to an HTML fragment.
///
/// Tables, footnotes, strikethrough and task lists are enabled.
pub fn to_html(raw: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(raw, opts).map(rewrite_md_destinations);

    let mut out = String::with_capacity(raw.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Rewrite `.md` link/image destinations to `.html`.
fn rewrite_md_destinations(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = match rewrite_destination(&dest_url) {
                Some(rewritten) => rewritten.into(),
                None => dest_url,
            };
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = match rewrite_destination(&dest_url) {
                Some(rewritten) => rewritten.into(),
                None => dest_url,
            };
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        other => other,
    }
}

/// Map `page.md` to `page.html` (fragments preserved), or `None` when the
/// destination does not point at a markdown source.
fn rewrite_destination(dest: &str) -> Option<String> {
    if let Some(stem) = dest.strip_suffix(".md") {
        return Some(format!("{stem}.html"));
    }
    if let Some((page, fragment)) = dest.split_once(".md#") {
        return Some(format!("{page}.html#{fragment}"));
    }
    None
}
