/// Extract the first path from a drag-and-drop payload.
///
/// Toolkits wrap paths containing spaces in braces (`{C:/My Docs} {D:/x}`)
/// and terminals in quotes; other payloads are taken whole. Returns `None`
/// for blank payloads.
pub fn parse_drop_payload(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let path = match raw.strip_prefix('{') {
        Some(rest) => rest.split_once('}').map_or(rest, |(first, _)| first),
        None => strip_quotes(raw),
    };
    let path = path.trim();
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

fn strip_quotes(raw: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}
