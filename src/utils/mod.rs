pub mod form;
pub mod time;
pub mod url_validator;

pub use form::parse_form;
pub use time::{format_duration_human, rfc2822_from_unix};
pub use url_validator::{UrlValidationError, host_in, parse_http_url};

/// Remove `<...>` tags and NUL bytes from user input
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            '\0' => {}
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}
