//! Check results and the aggregated validation report.
//!
//! Every check produces a fresh, immutable [`CheckResult`] value with a
//! tri-state status. The orchestrator accumulates them in execution
//! order into a [`ValidationReport`], whose verdict is the conjunction
//! of all results: valid iff nothing failed.

use serde::Serialize;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The check ran and the property holds.
    Pass,
    /// The check did not apply (informational, or prerequisite absent).
    Skip,
    /// The check ran and the property does not hold.
    Fail,
}

impl CheckStatus {
    /// Fixed-width display tag used in the report.
    pub fn tag(&self) -> &'static str {
        match self {
            CheckStatus::Pass => " OK ",
            CheckStatus::Skip => "----",
            CheckStatus::Fail => "FAIL",
        }
    }
}

/// Identity of a check in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckKind {
    /// RFC 6125 hostname match against the leaf certificate.
    Hostname,
    /// Leaf anchors to a trusted root through the presented chain.
    ChainTrust,
    /// Subject display (informational).
    Subject,
    /// RFC 5280 Section 4.1.2.5: validity start.
    NotBefore,
    /// RFC 5280 Section 4.1.2.5: validity end.
    NotAfter,
    /// RFC 5280 Section 4.1.2.4: issuer name and signature linkage.
    Issuer,
    /// RFC 5280 Section 4.2.1.9: basic constraints.
    BasicConstraints,
    /// RFC 5280 Section 5: CRL revocation lookup.
    CrlRevocation,
    /// RFC 6960: OCSP revocation lookup.
    OcspRevocation,
    /// CA flag display (informational).
    CaFlag,
}

impl CheckKind {
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::Hostname => "hostname",
            CheckKind::ChainTrust => "chain",
            CheckKind::Subject => "subject",
            CheckKind::NotBefore => "notBefore",
            CheckKind::NotAfter => "notAfter",
            CheckKind::Issuer => "issuer",
            CheckKind::BasicConstraints => "basicConstraints",
            CheckKind::CrlRevocation => "crlRevocation",
            CheckKind::OcspRevocation => "ocspRevocation",
            CheckKind::CaFlag => "caFlag",
        }
    }
}

/// A single check outcome: status, the check that produced it, the
/// chain depth it applies to (`None` for chain-wide checks), and a
/// human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub status: CheckStatus,
    /// Chain position the result applies to (0 = leaf); `None` for
    /// chain-wide checks.
    pub depth: Option<usize>,
    pub message: String,
}

impl CheckResult {
    pub fn pass(kind: CheckKind, depth: Option<usize>, message: impl Into<String>) -> Self {
        CheckResult {
            kind,
            status: CheckStatus::Pass,
            depth,
            message: message.into(),
        }
    }

    pub fn skip(kind: CheckKind, depth: Option<usize>, message: impl Into<String>) -> Self {
        CheckResult {
            kind,
            status: CheckStatus::Skip,
            depth,
            message: message.into(),
        }
    }

    pub fn fail(kind: CheckKind, depth: Option<usize>, message: impl Into<String>) -> Self {
        CheckResult {
            kind,
            status: CheckStatus::Fail,
            depth,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == CheckStatus::Fail
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status.tag(), self.message)
    }
}

/// Information about one certificate in the examined chain.
#[derive(Debug, Clone, Serialize)]
pub struct ChainCertInfo {
    /// Position in chain (0 = leaf).
    pub depth: usize,
    /// Subject distinguished name.
    pub subject: String,
    /// Serial number as colon-separated hex.
    pub serial: String,
}

/// All check results for one chain, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Hostname the chain was checked against.
    pub hostname: String,
    /// The examined chain, leaf first.
    pub chain: Vec<ChainCertInfo>,
    /// Results in execution order: chain-wide first, then per
    /// certificate leaf to root.
    pub results: Vec<CheckResult>,
}

impl ValidationReport {
    /// True iff no check failed. Skips do not count against validity.
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|r| !r.is_failure())
    }

    /// Messages of all failed checks, in accumulation order.
    pub fn failure_messages(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| r.message.as_str())
            .collect()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut last_depth: Option<usize> = None;
        for result in &self.results {
            if let Some(depth) = result.depth {
                if last_depth != Some(depth) {
                    let subject = self
                        .chain
                        .iter()
                        .find(|c| c.depth == depth)
                        .map(|c| c.subject.as_str())
                        .unwrap_or("<unknown>");
                    writeln!(f, "\ncertificate {}: {}", depth, subject)?;
                    last_depth = Some(depth);
                }
            }
            writeln!(f, "{}", result)?;
        }
        let failures = self.failure_messages().len();
        if failures == 0 {
            writeln!(f, "\nverdict: VALID")
        } else {
            writeln!(f, "\nverdict: INVALID ({} failed)", failures)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(results: Vec<CheckResult>) -> ValidationReport {
        ValidationReport {
            hostname: "example.test".to_string(),
            chain: vec![ChainCertInfo {
                depth: 0,
                subject: "CN=example.test".to_string(),
                serial: "01".to_string(),
            }],
            results,
        }
    }

    #[test]
    fn status_tags_are_four_chars() {
        assert_eq!(CheckStatus::Pass.tag(), " OK ");
        assert_eq!(CheckStatus::Skip.tag(), "----");
        assert_eq!(CheckStatus::Fail.tag(), "FAIL");
    }

    #[test]
    fn all_pass_is_valid() {
        let r = report(vec![
            CheckResult::pass(CheckKind::Hostname, None, "hostname ok"),
            CheckResult::pass(CheckKind::NotAfter, Some(0), "date ok"),
        ]);
        assert!(r.is_valid());
        assert!(r.failure_messages().is_empty());
    }

    #[test]
    fn skip_does_not_invalidate() {
        let r = report(vec![
            CheckResult::skip(CheckKind::Subject, Some(0), "subject: CN=x"),
            CheckResult::skip(CheckKind::CaFlag, Some(0), "caFlag: false"),
        ]);
        assert!(r.is_valid());
    }

    #[test]
    fn single_fail_invalidates() {
        let r = report(vec![
            CheckResult::pass(CheckKind::Hostname, None, "hostname ok"),
            CheckResult::fail(CheckKind::NotAfter, Some(0), "notAfter: expired"),
            CheckResult::pass(CheckKind::Issuer, Some(0), "issuer ok"),
        ]);
        assert!(!r.is_valid());
        assert_eq!(r.failure_messages(), vec!["notAfter: expired"]);
    }

    #[test]
    fn failure_messages_keep_order() {
        let r = report(vec![
            CheckResult::fail(CheckKind::Hostname, None, "first"),
            CheckResult::skip(CheckKind::Subject, Some(0), "skipped"),
            CheckResult::fail(CheckKind::Issuer, Some(0), "second"),
        ]);
        assert_eq!(r.failure_messages(), vec!["first", "second"]);
    }

    #[test]
    fn display_groups_per_certificate() {
        let r = report(vec![
            CheckResult::pass(CheckKind::Hostname, None, "hostname: ok"),
            CheckResult::skip(CheckKind::Subject, Some(0), "subject: CN=example.test"),
        ]);
        let text = format!("{}", r);
        assert!(text.contains("certificate 0: CN=example.test"));
        assert!(text.contains("[ OK ] hostname: ok"));
        assert!(text.contains("[----] subject: CN=example.test"));
        assert!(text.contains("verdict: VALID"));
    }

    #[test]
    fn display_reports_failure_count() {
        let r = report(vec![
            CheckResult::fail(CheckKind::NotBefore, Some(0), "notBefore: bad"),
            CheckResult::fail(CheckKind::NotAfter, Some(0), "notAfter: bad"),
        ]);
        let text = format!("{}", r);
        assert!(text.contains("verdict: INVALID (2 failed)"));
    }

    #[test]
    fn serializes_to_json() {
        let r = report(vec![CheckResult::pass(CheckKind::Hostname, None, "ok")]);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"status\":\"pass\""));
        assert!(json.contains("\"hostname\":\"example.test\""));
    }
}
