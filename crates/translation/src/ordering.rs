//! Deterministic execution order for mapping delegates.
//!
//! Delegates run in a single pass in the order produced here, and later
//! delegates may rely on the side effects of earlier ones. The order is:
//!
//! 1. model path, compared case-insensitively on its rendered form, with
//!    [`DeferredBranch`] rules able to push one sub-branch after its
//!    siblings;
//! 2. exact rendered model path;
//! 3. delegate name.
//!
//! The default rule defers `economicTerms.payout.cashflow` behind every other
//! delegate under the same `economicTerms.payout` prefix, because cashflow
//! mappings would otherwise overwrite counterparty role assignments made by
//! the other payout mappings.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::MappingDelegate;

/// Orders the delegates under one structural prefix so that those in a given
/// sub-branch come last.
///
/// A path belongs to the rule's group when it contains the `boundary`
/// segments followed by at least one more segment; the group key is the
/// path text up to and including the boundary. Two paths in the same group
/// whose first segment after the boundary differ in being `branch` are
/// ordered with the `branch` one last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredBranch {
    boundary: String,
    branch: String,
}

impl DeferredBranch {
    /// Creates a rule deferring `branch` below the dot-separated `boundary`.
    pub fn new(boundary: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into().to_lowercase(),
            branch: branch.into().to_lowercase(),
        }
    }

    /// The rule applied by default: cashflow payouts after other payouts.
    pub fn cashflow_payout() -> Self {
        Self::new("economicTerms.payout", "cashflow")
    }

    /// Length of the group key within `path` (lower-cased), i.e. the byte
    /// offset just past the `.` that follows the boundary, if `path` lies
    /// under the boundary.
    fn group_len(&self, path: &str) -> Option<usize> {
        path.match_indices(self.boundary.as_str())
            .filter(|(start, _)| *start == 0 || path.as_bytes()[start - 1] == b'.')
            .find_map(|(start, _)| after_boundary(path, start + self.boundary.len()))
    }

    fn is_deferred(&self, remainder: &str) -> bool {
        let segment = remainder
            .split(['.', '('])
            .next()
            .unwrap_or_default();
        segment == self.branch
    }

    /// Compares two lower-cased paths if this rule decides between them.
    fn compare(&self, a: &str, b: &str) -> Option<Ordering> {
        let group_a = self.group_len(a)?;
        let group_b = self.group_len(b)?;
        if a[..group_a] != b[..group_b] {
            return None;
        }
        let deferred_a = self.is_deferred(&a[group_a..]);
        let deferred_b = self.is_deferred(&b[group_b..]);
        (deferred_a != deferred_b).then(|| deferred_a.cmp(&deferred_b))
    }
}

/// Offset just past the separator following a boundary ending at `end`,
/// skipping an optional `(index)` on the boundary's last segment.
fn after_boundary(path: &str, end: usize) -> Option<usize> {
    let rest = &path[end..];
    let skipped = if rest.starts_with('(') {
        rest.find(')')? + 1
    } else {
        0
    };
    rest[skipped..]
        .starts_with('.')
        .then_some(end + skipped + 1)
}

// ---------------------------------------------------------------------------

/// Two-stage comparator over mapping delegates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateOrdering {
    deferred: Vec<DeferredBranch>,
}

impl Default for DelegateOrdering {
    fn default() -> Self {
        Self {
            deferred: vec![DeferredBranch::cashflow_payout()],
        }
    }
}

impl DelegateOrdering {
    /// Plain lexicographic ordering with no deferred branches.
    pub fn lexicographic() -> Self {
        Self {
            deferred: Vec::new(),
        }
    }

    /// Creates an ordering applying `deferred` rules, first match wins.
    pub fn with_deferred(deferred: Vec<DeferredBranch>) -> Self {
        Self { deferred }
    }

    /// Compares two rendered model paths.
    pub fn compare_paths(&self, a: &str, b: &str) -> Ordering {
        let lower_a = a.to_lowercase();
        let lower_b = b.to_lowercase();
        self.deferred
            .iter()
            .find_map(|rule| rule.compare(&lower_a, &lower_b))
            .unwrap_or_else(|| lower_a.cmp(&lower_b))
            .then_with(|| a.cmp(b))
    }

    /// Compares two delegates: by model path, then by name.
    pub fn compare(&self, a: &dyn MappingDelegate, b: &dyn MappingDelegate) -> Ordering {
        self.compare_paths(&a.model_path().build_path(), &b.model_path().build_path())
            .then_with(|| a.name().cmp(b.name()))
    }

    /// Sorts `delegates` into execution order.
    pub fn sort(&self, delegates: &mut [Arc<dyn MappingDelegate>]) {
        delegates.sort_by(|a, b| self.compare(a.as_ref(), b.as_ref()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered(ordering: &DelegateOrdering, paths: &[&str]) -> Vec<String> {
        let mut paths: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        paths.sort_by(|a, b| ordering.compare_paths(a, b));
        paths
    }

    #[test]
    fn lexicographic_stage_ignores_case() {
        let result = ordered(&DelegateOrdering::default(), &["Trade.party", "Trade.Account", "Trade.book"]);
        assert_eq!(result, ["Trade.Account", "Trade.book", "Trade.party"]);
    }

    #[test]
    fn cashflow_follows_other_payouts_under_same_prefix() {
        let result = ordered(
            &DelegateOrdering::default(),
            &[
                "Trade.product.economicTerms.payout.cashflow.payerReceiver",
                "Trade.product.economicTerms.payout.interestRatePayout.payerReceiver",
                "Trade.product.economicTerms.payout.optionPayout.buyerSeller",
            ],
        );
        assert_eq!(
            result,
            [
                "Trade.product.economicTerms.payout.interestRatePayout.payerReceiver",
                "Trade.product.economicTerms.payout.optionPayout.buyerSeller",
                "Trade.product.economicTerms.payout.cashflow.payerReceiver",
            ]
        );
    }

    #[test]
    fn cashflow_rule_does_not_apply_across_prefixes() {
        let result = ordered(
            &DelegateOrdering::default(),
            &[
                "A.economicTerms.payout.interestRatePayout",
                "B.economicTerms.payout.cashflow",
                "A.economicTerms.payout.cashflow",
            ],
        );
        assert_eq!(
            result,
            [
                "A.economicTerms.payout.interestRatePayout",
                "A.economicTerms.payout.cashflow",
                "B.economicTerms.payout.cashflow",
            ]
        );
    }

    #[test]
    fn boundary_must_align_with_segments() {
        let rule = DeferredBranch::cashflow_payout();
        assert_eq!(rule.group_len("x.economicterms.payout.cashflow"), Some(23));
        assert_eq!(rule.group_len("x.economicterms.payout(0).cashflow"), Some(26));
        assert_eq!(rule.group_len("x.noteconomicterms.payout.cashflow"), None);
        assert_eq!(rule.group_len("x.economicterms.payoutx.cashflow"), None);
        assert_eq!(rule.group_len("x.economicterms.payout"), None);
    }

    #[test]
    fn lexicographic_ordering_has_no_exception() {
        let result = ordered(
            &DelegateOrdering::lexicographic(),
            &["T.economicTerms.payout.interestRatePayout", "T.economicTerms.payout.cashflow"],
        );
        assert_eq!(
            result,
            ["T.economicTerms.payout.cashflow", "T.economicTerms.payout.interestRatePayout"]
        );
    }
}
