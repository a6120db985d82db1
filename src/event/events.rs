use std::path::PathBuf;

use crate::adjust::AdjustmentKind;

/// Changes to the image session that observers may react to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// An image was opened from disk
    Loaded { path: PathBuf, width: u32, height: u32 },
    /// A blank image was created
    Created { width: u32, height: u32 },
    /// A user action was committed to history
    Committed { label: &'static str },
    /// A trial transform is being shown without being committed
    Previewed,
    /// The preview was dropped
    PreviewCleared,
    /// An adjustment slider moved
    Adjusted { kind: AdjustmentKind, value: i32 },
    Undone,
    Redone,
    Saved { path: PathBuf },
}
