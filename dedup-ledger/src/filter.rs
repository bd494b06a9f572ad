use crate::Ledger;
use jobdigest_core::{CoreError, FitAnalysis, Posting};
use tracing::{debug, info};

/// Applies the dedup ledger and the analysis rules to the analyzed batch.
/// Every analyzed posting is marked as seen, whether or not it passes the
/// rules; only the digest itself is gated on the rules.
pub struct PostingFilter {
    ledger: Ledger,
    match_threshold: u8,
    require_remote: bool,
}

impl PostingFilter {
    pub fn new(ledger: Ledger, match_threshold: u8, require_remote: bool) -> Self {
        Self {
            ledger,
            match_threshold,
            require_remote,
        }
    }

    pub async fn filter(
        &self,
        postings: Vec<Posting>,
        analyses: Vec<Option<FitAnalysis>>,
    ) -> Result<Vec<Posting>, CoreError> {
        if postings.len() != analyses.len() {
            return Err(CoreError::Internal {
                message: format!(
                    "{} analyses returned, but {} postings were given",
                    analyses.len(),
                    postings.len()
                ),
            });
        }

        let total = postings.len();
        let mut kept = Vec::new();

        for (posting, analysis) in postings.into_iter().zip(analyses) {
            let Some(analysis) = analysis else {
                debug!("Excluding posting {} (no analysis)", posting.id);
                continue;
            };
            if !self.ledger.check_and_mark(&posting.id).await? {
                info!("Suppressing previously-seen posting {}", posting.id);
                continue;
            }
            if !self.passes_rules(&analysis) {
                debug!(
                    "Excluding posting {} (match {}%, remote_eligible {})",
                    posting.id, analysis.overall_match_percentage, analysis.remote_eligible
                );
                continue;
            }
            kept.push(posting);
        }

        info!("After filtering, {}/{} postings remain", kept.len(), total);
        Ok(kept)
    }

    fn passes_rules(&self, analysis: &FitAnalysis) -> bool {
        if analysis.overall_match_percentage <= self.match_threshold {
            return false;
        }
        if self.require_remote && !analysis.remote_eligible {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(id: &str) -> Posting {
        Posting {
            id: id.to_string(),
            title: format!("Engineer {}", id),
            company: "Acme".to_string(),
            url: format!("https://board.example.com/jobs/{}", id),
            created: None,
        }
    }

    fn analysis(match_percentage: u8, remote_eligible: bool) -> FitAnalysis {
        FitAnalysis {
            overall_match_percentage: match_percentage,
            key_matches: vec![],
            missing_skills: vec![],
            recommendations: vec![],
            remote_eligible,
            summary: "summary".to_string(),
        }
    }

    fn filter_with_tempdir(dir: &tempfile::TempDir) -> PostingFilter {
        PostingFilter::new(Ledger::local(dir.path()), 80, true)
    }

    #[tokio::test]
    async fn test_threshold_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with_tempdir(&dir);

        let postings = vec![posting("a"), posting("b"), posting("c")];
        // Exactly at threshold is excluded; strictly above is kept
        let analyses = vec![
            Some(analysis(80, true)),
            Some(analysis(81, true)),
            Some(analysis(100, true)),
        ];

        let kept = filter.filter(postings, analyses).await.unwrap();
        let ids: Vec<_> = kept.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_missing_analysis_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with_tempdir(&dir);

        let kept = filter
            .filter(vec![posting("a")], vec![None])
            .await
            .unwrap();
        assert!(kept.is_empty());
    }

    #[tokio::test]
    async fn test_remote_rule() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with_tempdir(&dir);

        let kept = filter
            .filter(vec![posting("a")], vec![Some(analysis(95, false))])
            .await
            .unwrap();
        assert!(kept.is_empty());

        // With the remote requirement disabled the same posting passes
        let dir2 = tempfile::tempdir().unwrap();
        let relaxed = PostingFilter::new(Ledger::local(dir2.path()), 80, false);
        let kept = relaxed
            .filter(vec![posting("a")], vec![Some(analysis(95, false))])
            .await
            .unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn test_rerun_with_same_inputs_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let first = filter_with_tempdir(&dir)
            .filter(vec![posting("a")], vec![Some(analysis(95, true))])
            .await
            .unwrap();
        assert_eq!(first.len(), 1);

        // Same ledger directory, same inputs: everything is suppressed
        let second = filter_with_tempdir(&dir)
            .filter(vec![posting("a")], vec![Some(analysis(95, true))])
            .await
            .unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_bypass_ignores_ledger() {
        let dir = tempfile::tempdir().unwrap();

        filter_with_tempdir(&dir)
            .filter(vec![posting("a")], vec![Some(analysis(95, true))])
            .await
            .unwrap();

        let bypass = PostingFilter::new(Ledger::bypass(), 80, true);
        let kept = bypass
            .filter(vec![posting("a")], vec![Some(analysis(95, true))])
            .await
            .unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn test_analyzed_postings_are_marked_even_when_rules_fail() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with_tempdir(&dir);

        // Below threshold: excluded, but still recorded as seen
        let kept = filter
            .filter(vec![posting("a")], vec![Some(analysis(50, true))])
            .await
            .unwrap();
        assert!(kept.is_empty());
        assert!(dir.path().join("a").exists());

        // A later run that scores it higher is still suppressed
        let kept = filter
            .filter(vec![posting("a")], vec![Some(analysis(95, true))])
            .await
            .unwrap();
        assert!(kept.is_empty());
    }

    #[tokio::test]
    async fn test_unanalyzed_postings_are_not_marked() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with_tempdir(&dir);

        filter
            .filter(vec![posting("a")], vec![None])
            .await
            .unwrap();
        assert!(!dir.path().join("a").exists());

        // Once the analysis succeeds the posting can still be digested
        let kept = filter
            .filter(vec![posting("a")], vec![Some(analysis(95, true))])
            .await
            .unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let filter = filter_with_tempdir(&dir);

        let err = filter
            .filter(vec![posting("a")], vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Internal { .. }));
    }
}
