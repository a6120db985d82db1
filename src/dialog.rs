use log::debug;

use crate::adjust::{AdjustmentKind, Adjustments};
use crate::session::ImageSession;

/// How a slider dialog was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirmed,
    Cancelled,
}

/// A modal set of adjustment sliders bound to the session.
///
/// Every value change is pushed to the session straight away, so the canvas
/// follows the slider. Confirming records one history entry; cancelling
/// restores the image the dialog was opened on. Once closed the dialog
/// ignores further input.
#[derive(Debug, Clone)]
pub struct SliderDialog {
    title: &'static str,
    kinds: Vec<AdjustmentKind>,
    values: Adjustments,
    outcome: Option<DialogOutcome>,
}

impl SliderDialog {
    /// Open a dialog for `kinds`, starting from the session's current values
    pub fn new(title: &'static str, kinds: &[AdjustmentKind], session: &ImageSession) -> Self {
        Self {
            title,
            kinds: kinds.to_vec(),
            values: session.adjustments(),
            outcome: None,
        }
    }

    pub fn brightness(session: &ImageSession) -> Self {
        Self::new("Brightness", &[AdjustmentKind::Brightness], session)
    }

    pub fn contrast(session: &ImageSession) -> Self {
        Self::new("Contrast", &[AdjustmentKind::Contrast], session)
    }

    pub fn saturation(session: &ImageSession) -> Self {
        Self::new("Saturation", &[AdjustmentKind::Saturation], session)
    }

    /// Red, green and blue balance, shown next to the histogram
    pub fn color_balance(session: &ImageSession) -> Self {
        Self::new(
            "Colour Balance",
            &[AdjustmentKind::Red, AdjustmentKind::Green, AdjustmentKind::Blue],
            session,
        )
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn kinds(&self) -> &[AdjustmentKind] {
        &self.kinds
    }

    pub fn value(&self, kind: AdjustmentKind) -> i32 {
        self.values.get(kind)
    }

    pub fn is_open(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn outcome(&self) -> Option<DialogOutcome> {
        self.outcome
    }

    /// Slider moved. Returns true if the session image changed.
    pub fn set_value(&mut self, kind: AdjustmentKind, value: i32, session: &mut ImageSession) -> bool {
        if !self.is_open() || !self.kinds.contains(&kind) {
            return false;
        }
        let before = self.values.get(kind);
        self.values.set(kind, value);
        if self.values.get(kind) == before {
            return false;
        }
        session.adjust(kind, self.values.get(kind))
    }

    /// Keep the adjusted image. Returns true if a history entry was recorded.
    pub fn confirm(&mut self, session: &mut ImageSession) -> bool {
        if !self.is_open() {
            return false;
        }
        self.outcome = Some(DialogOutcome::Confirmed);
        debug!("{} dialog confirmed", self.title);
        session.commit_adjustment()
    }

    /// Throw the adjustment away
    pub fn cancel(&mut self, session: &mut ImageSession) {
        if !self.is_open() {
            return;
        }
        self.outcome = Some(DialogOutcome::Cancelled);
        debug!("{} dialog cancelled", self.title);
        session.cancel_adjustment();
    }
}
