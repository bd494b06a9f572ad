use jobdigest_core::{CoreError, ScrapeError};
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Dereferences a posting's redirect URL and reduces the page to plain text
/// for the analysis chain. The LLM cleaning stage handles leftover chrome;
/// this only drops what is never prose.
pub struct PageScraper {
    client: reqwest::Client,
}

impl PageScraper {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    pub async fn scrape_text(&self, url: &str) -> Result<String, CoreError> {
        debug!("Fetching posting page: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                CoreError::Scrape(ScrapeError::RequestTimeout {
                    url: url.to_string(),
                })
            } else {
                CoreError::Network(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(CoreError::Scrape(ScrapeError::FetchFailed {
                url: url.to_string(),
                status: response.status().as_u16(),
            }));
        }

        let html = response.text().await.map_err(CoreError::Network)?;
        let text = extract_text(&Html::parse_document(&html));

        if text.is_empty() {
            return Err(CoreError::Scrape(ScrapeError::EmptyDocument {
                url: url.to_string(),
            }));
        }

        info!("Extracted {} characters from {}", text.len(), url);
        Ok(text)
    }
}

impl Default for PageScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole-document text with script/style subtrees dropped and whitespace
/// collapsed to single spaces.
pub fn extract_text(document: &Html) -> String {
    let mut raw = String::new();
    collect_text(document.tree.root(), &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Element(element) => {
            if matches!(
                element.name(),
                "script" | "style" | "noscript" | "head" | "template"
            ) {
                return;
            }
            for child in node.children() {
                collect_text(child, out);
            }
        }
        Node::Text(text) => {
            out.push_str(&text.text);
            out.push(' ');
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_skips_scripts_and_styles() {
        let html = Html::parse_document(
            r#"<html>
                <head><title>Job 42</title><style>body { color: red; }</style></head>
                <body>
                    <script>var tracker = "noise";</script>
                    <h1>Backend Engineer</h1>
                    <p>We are hiring a backend   engineer
                    in Toronto.</p>
                </body>
            </html>"#,
        );

        let text = extract_text(&html);
        assert_eq!(text, "Backend Engineer We are hiring a backend engineer in Toronto.");
        assert!(!text.contains("tracker"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_extract_text_empty_page() {
        let html = Html::parse_document("<html><body><script>1</script></body></html>");
        assert!(extract_text(&html).is_empty());
    }
}
