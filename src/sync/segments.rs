use once_cell::sync::Lazy;
use regex::Regex;

static VARIABLE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([A-Za-z0-9_-]+)").expect("path variable pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Variable(&'a str),
}

/// The path part of a possibly malformed url template: query dropped, and
/// `scheme://authority` dropped when present.
pub fn path_portion(raw: &str) -> &str {
    let before_query = raw.split('?').next().unwrap_or("");
    match before_query.find("://") {
        Some(scheme_end) => {
            let after_scheme = &before_query[scheme_end + 3..];
            match after_scheme.find('/') {
                Some(path_start) => &after_scheme[path_start..],
                None => "",
            }
        }
        None => before_query,
    }
}

pub fn classify(segment: &str) -> Segment<'_> {
    match VARIABLE_SEGMENT.captures(segment).and_then(|caps| caps.get(1)) {
        Some(name) => Segment::Variable(name.as_str()),
        None => Segment::Literal(segment),
    }
}

/// Non-empty path segments of `raw`, left to right.
pub fn tokenize_path(raw: &str) -> Vec<Segment<'_>> {
    path_portion(raw)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(classify)
        .collect()
}

/// Path variable names in order of first appearance.
pub fn path_variable_names(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for segment in tokenize_path(raw) {
        if let Segment::Variable(name) = segment {
            if !names.iter().any(|known| known == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}
