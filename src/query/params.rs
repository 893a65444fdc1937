//! Sync filter state with URL query parameters (`page`, `tag`, `search`, `category`)

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::FilterState;

/// Characters left as-is in query parameter values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a query parameter value
pub fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Decode a query parameter value, treating `+` as a space
pub fn decode_value(value: &str) -> String {
    let value = value.replace('+', " ");
    percent_decode_str(&value).decode_utf8_lossy().into_owned()
}

/// Link that opens the listing filtered by a single tag
pub fn tag_link(tag: &str) -> String {
    format!("/?tag={}", encode_value(tag))
}

impl FilterState {
    /// Seed a filter state from a URL query string
    ///
    /// A leading `?` is accepted. Unknown keys are ignored; a missing or
    /// non-numeric `page` means page 1. `tag` and `category` may repeat.
    pub fn from_query_string(query: &str) -> Self {
        let mut state = FilterState::default();

        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_value(value);

            match decode_value(key).as_str() {
                "page" => {
                    state.page = value.trim().parse().ok().filter(|p| *p >= 1).unwrap_or(1);
                }
                "tag" if !value.is_empty() => {
                    state.tags.insert(value);
                }
                "category" if !value.is_empty() => {
                    state.categories.insert(value);
                }
                "search" => state.query = value,
                other => tracing::debug!("Ignoring query parameter {:?}", other),
            }
        }

        state
    }

    /// Canonical query string for a shareable link, without the leading `?`
    ///
    /// Empty fields are omitted, and so is `page` when it is 1.
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();

        if !self.query.is_empty() {
            pairs.push(format!("search={}", encode_value(&self.query)));
        }
        for tag in &self.tags {
            pairs.push(format!("tag={}", encode_value(tag)));
        }
        for category in &self.categories {
            pairs.push(format!("category={}", encode_value(category)));
        }
        if self.page != 1 {
            pairs.push(format!("page={}", self.page));
        }

        pairs.join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string() {
        let state = FilterState::from_query_string(
            "?page=2&tag=Web%20Development&tag=CSS&search=hello+world&category=Design",
        );
        assert_eq!(state.page, 2);
        assert_eq!(
            state.tags.iter().cloned().collect::<Vec<_>>(),
            vec!["Web Development", "CSS"]
        );
        assert!(state.categories.contains("Design"));
        assert_eq!(state.query, "hello world");
    }

    #[test]
    fn test_bad_page_falls_back_to_first() {
        assert_eq!(FilterState::from_query_string("page=abc").page, 1);
        assert_eq!(FilterState::from_query_string("page=0").page, 1);
        assert_eq!(FilterState::from_query_string("page=").page, 1);
        assert_eq!(FilterState::from_query_string("").page, 1);
    }

    #[test]
    fn test_unknown_and_empty_keys_ignored() {
        let state = FilterState::from_query_string("utm=x&&tag=&foo");
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_to_query_string() {
        let state = FilterState::new()
            .with_query("c++ & rust")
            .with_tag("Web Development")
            .with_page(3);
        assert_eq!(
            state.to_query_string(),
            "search=c%2B%2B%20%26%20rust&tag=Web%20Development&page=3"
        );
        assert_eq!(FilterState::new().to_query_string(), "");
    }

    #[test]
    fn test_query_string_survives_reload() {
        let state = FilterState::new()
            .with_query("a+b=c")
            .with_tag("C#")
            .with_category("News")
            .with_page(2);
        let reloaded = FilterState::from_query_string(&state.to_query_string());
        assert_eq!(reloaded, state);
    }

    #[test]
    fn test_tag_link() {
        assert_eq!(tag_link("Static Sites"), "/?tag=Static%20Sites");
    }
}
