//! Issue taxonomy and the reporter seam.
//!
//! Every finding of the analysis passes goes through [`Reporter::report`];
//! nothing here is fatal to traversal, and whether an issue fails the build
//! is the embedder's decision. Suppression and baselines are handled
//! upstream and are invisible to this crate.

use parking_lot::Mutex;

use crate::base::ItemId;

/// The kinds of issues the analysis passes can raise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// A show annotation on an item whose immediate parent is hidden
    /// without a compatible annotation of its own.
    InconsistentShowNesting,
    /// A publicly constructible class has an abstract method that is hidden
    /// from the surface, so no subclass outside it could implement it.
    HiddenAbstractMethod,
    /// Surface code references a class excluded from the surface.
    ReferencesHidden,
    /// A method return/parameter type is itself excluded from the surface.
    UnavailableSymbol,
    /// An excluded class appears as a generic argument of a surface type.
    HiddenTypeArgument,
    /// A surface class extends or implements an excluded type.
    HiddenSuperclass,
    /// A surface class extends or implements a private type.
    PrivateSuperclass,
    /// A non-deprecated item references a deprecated one.
    ReferencesDeprecated,
    /// A privileged API requires a permission that is not defined.
    MissingPermission,
}

impl IssueKind {
    /// Stable issue code for reporting.
    pub fn code(self) -> &'static str {
        match self {
            IssueKind::InconsistentShowNesting => "InconsistentShowNesting",
            IssueKind::HiddenAbstractMethod => "HiddenAbstractMethod",
            IssueKind::ReferencesHidden => "ReferencesHidden",
            IssueKind::UnavailableSymbol => "UnavailableSymbol",
            IssueKind::HiddenTypeArgument => "HiddenTypeArgument",
            IssueKind::HiddenSuperclass => "HiddenSuperclass",
            IssueKind::PrivateSuperclass => "PrivateSuperclass",
            IssueKind::ReferencesDeprecated => "ReferencesDeprecated",
            IssueKind::MissingPermission => "MissingPermission",
        }
    }
}

/// The external diagnostics sink. Implementations must not fail; traversal
/// always continues past a report.
pub trait Reporter {
    fn report(&self, issue: IssueKind, item: ItemId, message: &str);
}

/// A reporter that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _issue: IssueKind, _item: ItemId, _message: &str) {}
}

/// One collected report.
#[derive(Clone, Debug)]
pub struct ReportedIssue {
    pub issue: IssueKind,
    pub item: ItemId,
    pub message: String,
}

/// An append-only in-memory sink, driven through `&self` so read-only passes
/// can share it.
#[derive(Default)]
pub struct CollectingReporter {
    entries: Mutex<Vec<ReportedIssue>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ReportedIssue> {
        self.entries.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn count_of(&self, issue: IssueKind) -> usize {
        self.entries.lock().iter().filter(|e| e.issue == issue).count()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, issue: IssueKind, item: ItemId, message: &str) {
        self.entries.lock().push(ReportedIssue {
            issue,
            item,
            message: message.to_string(),
        });
    }
}
