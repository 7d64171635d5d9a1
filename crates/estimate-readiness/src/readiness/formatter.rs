//! Presentation helpers turning field paths into labels.

/// Convert a dotted field path into a human-readable label.
///
/// `hvacData.climateZone` becomes `Climate Zone` and `squareFootage` becomes
/// `Square Footage`. Camel case is split into words, the leading character is
/// capitalized, trade data namespaces (`hvacData.`, `plumbingData.`, ...) are
/// dropped, and any remaining nesting is shown with ` > `.
pub fn format_missing_field(path: &str) -> String {
    let spaced = split_camel_case(path);
    let capitalized = capitalize_first(&spaced);
    let stripped = strip_data_namespace(&capitalized);
    capitalize_first(&stripped).replace('.', " > ")
}

pub fn format_missing_fields<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    paths
        .iter()
        .map(|path| format_missing_field(path.as_ref()))
        .collect()
}

fn split_camel_case(path: &str) -> String {
    let mut spaced = String::with_capacity(path.len() + 8);
    let mut previous: Option<char> = None;

    for ch in path.chars() {
        let after_break = previous.map_or(true, char::is_whitespace);
        if ch.is_uppercase() && !after_break {
            spaced.push(' ');
        }
        spaced.push(ch);
        previous = Some(ch);
    }

    spaced
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn strip_data_namespace(label: &str) -> String {
    let segments: Vec<&str> = label.split('.').collect();
    let last = segments.len().saturating_sub(1);

    segments
        .iter()
        .enumerate()
        .filter(|(index, segment)| *index == last || !is_data_namespace(segment))
        .map(|(_, segment)| *segment)
        .collect::<Vec<_>>()
        .join(".")
}

fn is_data_namespace(segment: &str) -> bool {
    segment == "Data" || segment.ends_with(" Data")
}
