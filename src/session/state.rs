/// Neural-model availability within one session.
///
/// `Loading` is entered exactly once, at `start`. The loop thread moves the
/// cell to `Ready` or `Unavailable` when it consumes the loader's one-shot
/// completion message; there is no way back to `Loading` except a new
/// session. `Unavailable` pins the session to the fallback path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelState {
    Loading,
    Ready,
    Unavailable,
}

impl ModelState {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            ModelState::Loading => 0,
            ModelState::Ready => 1,
            ModelState::Unavailable => 2,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ModelState::Loading,
            1 => ModelState::Ready,
            _ => ModelState::Unavailable,
        }
    }
}
