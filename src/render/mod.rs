//! HTML / RSS pages served by the resolver and the search endpoint

use handlebars::Handlebars;
use rust_embed::Embed;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::config::SiteConfig;
use crate::errors::{Result, SiteGlueError};
use crate::services::search::SearchResult;

#[derive(Embed)]
#[folder = "templates/"]
struct PageTemplates;

#[derive(Serialize)]
struct HtmlHit<'a> {
    href: String,
    title: &'a str,
    description: &'a str,
}

/// Compiled page templates plus the site values they interpolate
pub struct Pages {
    hbs: Handlebars<'static>,
    site_url: String,
    site_name: String,
    search_action: String,
}

impl Pages {
    pub fn new(site: &SiteConfig, search_action: &str) -> Result<Self> {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(false);

        for file in PageTemplates::iter() {
            let Some(name) = file.strip_suffix(".hbs") else {
                continue;
            };
            let Some(asset) = PageTemplates::get(&file) else {
                continue;
            };
            let source = std::str::from_utf8(asset.data.as_ref()).map_err(|e| {
                SiteGlueError::template(format!("template {} is not utf-8: {}", file, e))
            })?;
            hbs.register_template_string(name, source)?;
            debug!("Registered template: {}", name);
        }

        for required in ["gone.html", "not_found.html", "search.html", "search.rss"] {
            if !hbs.has_template(required) {
                return Err(SiteGlueError::template(format!(
                    "missing embedded template: {}",
                    required
                )));
            }
        }

        Ok(Self {
            hbs,
            site_url: site.url.trim_end_matches('/').to_string(),
            site_name: site.name.clone(),
            search_action: search_action.to_string(),
        })
    }

    pub fn gone(&self, uri: &str) -> Result<String> {
        Ok(self.hbs.render("gone.html", &json!({ "uri": uri }))?)
    }

    pub fn not_found(&self, uri: &str) -> Result<String> {
        Ok(self.hbs.render(
            "not_found.html",
            &json!({ "uri": uri, "search_action": self.search_action }),
        )?)
    }

    pub fn search_html(&self, term: &str, results: &[SearchResult]) -> Result<String> {
        let hits: Vec<HtmlHit<'_>> = results
            .iter()
            .map(|r| HtmlHit {
                href: relurl(&self.site_url, &r.url),
                title: &r.title,
                description: &r.description,
            })
            .collect();

        // 已编码，不含需要 HTML 转义的字符
        let feed_term = urlencoding::encode(term);

        Ok(self.hbs.render(
            "search.html",
            &json!({
                "term": term,
                "feed_term": feed_term,
                "site_name": self.site_name,
                "search_action": self.search_action,
                "results": hits,
            }),
        )?)
    }

    /// `build_date` is RFC 2822 formatted
    pub fn search_rss(
        &self,
        term: &str,
        results: &[SearchResult],
        build_date: &str,
    ) -> Result<String> {
        Ok(self.hbs.render(
            "search.rss",
            &json!({
                "term": term,
                "site_url": self.site_url,
                "site_name": self.site_name,
                "total": results.len(),
                "build_date": build_date,
                "results": results,
            }),
        )?)
    }
}

/// Relative path from `from` to `to`
///
/// Path segments are compared positionally; each leftover segment of `from`
/// becomes a `../`. The final character is dropped, which removes the
/// trailing slash of directory style URLs.
pub fn relurl(from: &str, to: &str) -> String {
    let from_parts: Vec<&str> = from.split('/').collect();
    let to_parts: Vec<&str> = to.split('/').collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = String::new();
    for part in &from_parts[common..] {
        if !part.is_empty() {
            rel.push_str("../");
        }
    }
    for part in &to_parts[common..] {
        if !part.is_empty() {
            rel.push_str(part);
            rel.push('/');
        }
    }
    rel.pop();
    rel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Pages {
        Pages::new(&SiteConfig::default(), "/search").unwrap()
    }

    fn hit(url: &str, title: &str) -> SearchResult {
        SearchResult {
            id: url.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            description: "a [...] snippet".to_string(),
            pub_date: "Thu, 01 Jan 1970 00:00:00 +0000".to_string(),
        }
    }

    #[test]
    fn test_relurl() {
        assert_eq!(
            relurl("https://example.net", "https://example.net/blog/post/"),
            "blog/post"
        );
        assert_eq!(
            relurl("https://example.net/a/b", "https://example.net/a/c/"),
            "../c"
        );
        assert_eq!(relurl("https://example.net", "https://example.net"), "");
    }

    #[test]
    fn test_gone_page_escapes_uri() {
        let html = pages().gone("<script>").unwrap();
        assert!(html.contains("This content was deleted."));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_not_found_page_has_search_form() {
        let html = pages().not_found("missing/page").unwrap();
        assert!(html.contains("action=\"/search\""));
        assert!(html.contains("missing/page"));
    }

    #[test]
    fn test_search_html_links_are_relative() {
        let results = vec![hit("https://example.net/journal/hello/", "Hello")];
        let html = pages().search_html("hello", &results).unwrap();

        assert!(html.contains("href=\"journal/hello\""));
        assert!(html.contains("Hello"));
        assert!(html.contains("/search?q=hello&amp;xml"));
        assert!(!html.contains("No results."));
    }

    #[test]
    fn test_search_html_shows_term_as_typed() {
        let html = pages().search_html("rust-lang", &[]).unwrap();
        assert!(html.contains("<h1>Search results for: rust-lang</h1>"));
        assert!(html.contains("value=\"rust-lang\""));
        assert!(!html.contains("rust+lang"));
    }

    #[test]
    fn test_search_html_without_results() {
        let html = pages().search_html("nothing", &[]).unwrap();
        assert!(html.contains("No results."));
    }

    #[test]
    fn test_search_rss() {
        let results = vec![hit("https://example.net/a/", "A"), hit("https://example.net/b/", "B")];
        let rss = pages()
            .search_rss("x", &results, "Mon, 08 Oct 2018 12:00:00 +0000")
            .unwrap();

        assert!(rss.starts_with("<?xml"));
        assert!(rss.contains("<openSearch:totalResults>2</openSearch:totalResults>"));
        assert!(rss.contains("<link>https://example.net/b/</link>"));
        assert!(rss.contains("<pubDate>Thu, 01 Jan 1970 00:00:00 +0000</pubDate>"));
        assert!(rss.contains("<lastBuildDate>Mon, 08 Oct 2018 12:00:00 +0000</lastBuildDate>"));
    }
}
