/// Where a page is in its request lifecycle. Only an `Idle` page accepts a
/// submit; the form is hidden in every other phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting on the request a page makes when it is first shown.
    Loading,

    /// Waiting for the user.
    Idle,

    /// Waiting on a submitted form.
    Submitting,
}

impl Phase {
    /// Is a request outstanding?
    pub fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Move to `Submitting` if nothing else is in flight. Returns whether the
    /// submit may go ahead.
    pub fn begin_submit(&mut self) -> bool {
        if *self == Self::Idle {
            *self = Self::Submitting;
            true
        } else {
            false
        }
    }

    /// The outstanding request resolved.
    pub fn finish(&mut self) {
        *self = Self::Idle;
    }
}
