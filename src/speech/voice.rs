use crate::speech::Voice;

fn normalize(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(tag: &str) -> String {
    normalize(tag).split('-').next().unwrap_or_default().to_string()
}

/// First local voice among `candidates`, else the first candidate
fn prefer_local<'a>(candidates: impl Iterator<Item = &'a Voice>) -> Option<&'a Voice> {
    let mut first = None;
    for voice in candidates {
        if voice.local_service {
            return Some(voice);
        }
        first.get_or_insert(voice);
    }
    first
}

/// Pick the voice for `lang` from an engine's catalog.
///
/// Tries, in order: an exact tag match, a match on the primary subtag ("es" for
/// "es-ES"), preferring local voices in both cases; then the engine default;
/// then the first voice. Returns `None` only for an empty catalog.
pub fn select_voice<'a>(lang: &str, catalog: &'a [Voice]) -> Option<&'a Voice> {
    let wanted = normalize(lang);
    let wanted_primary = primary_subtag(lang);

    prefer_local(catalog.iter().filter(|v| normalize(&v.lang) == wanted))
        .or_else(|| {
            prefer_local(
                catalog
                    .iter()
                    .filter(|v| !wanted_primary.is_empty() && primary_subtag(&v.lang) == wanted_primary),
            )
        })
        .or_else(|| catalog.iter().find(|v| v.default))
        .or_else(|| catalog.first())
}
