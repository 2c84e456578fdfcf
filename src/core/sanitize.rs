// src/core/sanitize.rs
use percent_encoding::percent_decode_str;

use crate::config::consts::WIKI_PREFIX;

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Canonical page title, used as the VisitedSet and corpus key.
///
/// `"pokémon_(species)#Biology"` and `" Pokémon  (species) "` both map to
/// `"Pokémon (species)"`. Idempotent: no percent-decoding happens here, that
/// belongs to [`title_from_href`].
pub fn canonical_title(raw: &str) -> String {
    let no_fragment = match raw.find('#') {
        Some(i) => &raw[..i],
        None => raw,
    };
    let spaced = normalize_ws(&no_fragment.replace('_', " "));

    // MediaWiki titles are case-insensitive in their first letter only
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => s!(),
    }
}

/// `/wiki/Ash_Ketchum#Pokémon` -> `Some("Ash Ketchum")`. Anything that is not an
/// internal article href (external, `/w/index.php?...`, fragment-only) -> `None`.
///
/// The path is percent-decoded exactly once, after query and fragment are cut,
/// so `/wiki/%2523` is the page literally titled `%23`.
pub fn title_from_href(href: &str) -> Option<String> {
    let rest = href.strip_prefix(WIKI_PREFIX)?;
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    let decoded = percent_decode_str(&rest[..end]).decode_utf8_lossy();
    let title = canonical_title(&decoded);
    if title.is_empty() { None } else { Some(title) }
}

/// Title as it appears in a wiki URL path.
pub fn title_to_slug(title: &str) -> String {
    canonical_title(title).replace(' ', "_")
}

/// Filesystem-safe stem for exports named after an article.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch=='-' || ch=='_' || ch=='(' || ch==')' { if !(last_us && ch=='_') { out.push(ch); } last_us = ch=='_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!(fallback) } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_variants_share_one_key() {
        let want = "Pokémon (species)";
        assert_eq!(canonical_title("pokémon_(species)#Biology"), want);
        assert_eq!(canonical_title("  Pokémon   (species) "), want);
        assert_eq!(title_from_href("/wiki/Pok%C3%A9mon_(species)").as_deref(), Some(want));
    }

    #[test]
    fn canonical_title_is_idempotent() {
        for raw in ["%23", "100%_Cotton", "pikachu", "Pok%C3%A9mon"] {
            let once = canonical_title(raw);
            assert_eq!(canonical_title(&once), once);
        }
        assert_eq!(canonical_title("%23"), "%23");
    }

    #[test]
    fn encoded_percent_decodes_once() {
        assert_eq!(title_from_href("/wiki/%2523"), Some(s!("%23")));
        assert_eq!(title_from_href("/wiki/Raichu%23Biology"), Some(s!("Raichu")));
        assert_eq!(title_to_slug("%23"), "%23");
    }

    #[test]
    fn hrefs_outside_wiki_namespace_are_ignored() {
        assert_eq!(title_from_href("/wiki/Ash_Ketchum"), Some(s!("Ash Ketchum")));
        assert_eq!(title_from_href("/wiki/File:Image.png"), Some(s!("File:Image.png")));
        assert_eq!(title_from_href("https://google.com"), None);
        assert_eq!(title_from_href("/w/index.php?title=Pikachu&action=edit"), None);
        assert_eq!(title_from_href("/wiki/#top"), None);
    }

    #[test]
    fn filename_keeps_word_chars_only() {
        assert_eq!(sanitize_filename("Team Rocket: HQ", "table"), "Team_Rocket_HQ");
        assert_eq!(sanitize_filename("???", "table"), "table");
    }
}
