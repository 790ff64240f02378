use quick_xml::events::Event;
use quick_xml::Reader;

/// Text of the first `<h1>` element of an HTML page.
///
/// Pages are read leniently: unclosed and mismatched tags are tolerated.
/// Nested markup inside the heading is flattened to its text with
/// whitespace collapsed. Returns `None` when the page has no non-empty
/// heading or becomes unreadable before one is found.
pub fn extract_heading(html: &str) -> Option<String> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut depth: usize = 0;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if is_h1(e.local_name().as_ref()) => depth += 1,
            Ok(Event::End(e)) if depth > 0 && is_h1(e.local_name().as_ref()) => {
                depth -= 1;
                if depth == 0 {
                    let heading = collapse_whitespace(&text);
                    if !heading.is_empty() {
                        return Some(heading);
                    }
                    text.clear();
                }
            }
            Ok(Event::Text(t)) if depth > 0 => match t.unescape() {
                Ok(s) => text.push_str(&s),
                // HTML entities outside the XML set
                Err(_) => text.push_str(&String::from_utf8_lossy(&t)),
            },
            Ok(Event::CData(t)) if depth > 0 => text.push_str(&String::from_utf8_lossy(&t)),
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(error = %e, position = reader.buffer_position(), "Stopped reading page markup");
                break;
            }
            _ => {}
        }
    }
    None
}

fn is_h1(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(b"h1")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
