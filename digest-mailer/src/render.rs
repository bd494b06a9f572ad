use jobdigest_core::Posting;

/// Renders the plain-text digest body: a header with the filtered/retrieved
/// ratio, then a fixed five-line record per posting.
pub fn render_digest(postings: &[Posting], total_retrieved: usize) -> String {
    let mut body = format!(
        "Here is your daily jobs list. {}/{} jobs remained after filtering.\n\n",
        postings.len(),
        total_retrieved
    );

    for posting in postings {
        body.push_str(&format!("Job: {}\n", posting.title));
        body.push_str(&format!("Company: {}\n", posting.company));
        body.push_str(&format!("Date posted: {}\n", format_date(posting)));
        body.push_str(&format!("URL: {}\n", posting.url));
        body.push('\n');
    }

    body
}

fn format_date(posting: &Posting) -> String {
    posting
        .created
        .map(|created| created.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn posting(id: &str, created: bool) -> Posting {
        Posting {
            id: id.to_string(),
            title: format!("Engineer {}", id),
            company: "Acme".to_string(),
            url: format!("https://board.example.com/jobs/{}", id),
            created: created.then(|| Utc.with_ymd_and_hms(2025, 7, 30, 8, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_empty_digest_is_header_only() {
        let body = render_digest(&[], 12);
        assert_eq!(
            body,
            "Here is your daily jobs list. 0/12 jobs remained after filtering.\n\n"
        );
    }

    #[test]
    fn test_record_content() {
        let body = render_digest(&[posting("a", true)], 3);
        assert!(body.contains("Job: Engineer a\n"));
        assert!(body.contains("Company: Acme\n"));
        assert!(body.contains("Date posted: 2025-07-30\n"));
        assert!(body.contains("URL: https://board.example.com/jobs/a\n"));
    }

    #[test]
    fn test_missing_date_renders_unknown() {
        let body = render_digest(&[posting("a", false)], 1);
        assert!(body.contains("Date posted: unknown\n"));
    }

    #[test]
    fn test_line_count_is_fixed_per_record() {
        // Two header lines plus five lines per posting
        for n in 0..4 {
            let postings: Vec<_> = (0..n).map(|i| posting(&i.to_string(), true)).collect();
            let body = render_digest(&postings, 10);
            assert_eq!(body.lines().count(), 2 + 5 * n);
        }
    }
}
