use crate::shared::frame::Frame;

/// External collaborator: the stream of camera frames driving a session.
///
/// `next_frame` is the detection loop's yield point: it blocks until the
/// source has a new frame (typically once per display refresh) and returns
/// `None` when the stream ends. A source queried while no new frame exists
/// simply keeps the caller suspended; the loop never errors on absence.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Option<Frame>;
}
