//! Scanner state machine definitions.

use crate::ident::TagId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScanState {
    /// Before the first element-level construct of a whole document. DOCTYPE
    /// is only recognized here.
    Prologue,
    Text,
    /// After a start tag's name, until its `>` or `/>`.
    StartTag { tag: TagId },
}
