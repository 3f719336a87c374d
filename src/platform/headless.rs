//! Host with no browser: frames are pumped by hand and drawing is recorded.
//! Drives the native demo and the engine tests.

use crate::engine::{FrameHandle, GameLoopEngine, Host};
use crate::render::{RecordingSink, RenderSink};

#[derive(Debug, Default)]
pub struct HeadlessHost {
    sink: RecordingSink,
    next_handle: i32,
    pending: Option<FrameHandle>,
    requested: u32,
    cancelled: u32,
    detached: u32,
}

impl HeadlessHost {
    /// Frame scheduled but not yet run
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn recording(&self) -> &RecordingSink {
        &self.sink
    }

    pub fn requested(&self) -> u32 {
        self.requested
    }

    pub fn cancelled(&self) -> u32 {
        self.cancelled
    }

    pub fn detached(&self) -> u32 {
        self.detached
    }
}

impl Host for HeadlessHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.next_handle += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_handle);
        self.pending = Some(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }

    fn sink(&mut self) -> &mut dyn RenderSink {
        &mut self.sink
    }

    fn detach(&mut self) {
        self.sink.reset();
        self.detached += 1;
    }
}

impl GameLoopEngine<HeadlessHost> {
    /// Run the pending frame at `timestamp` ms, as an animation-frame
    /// callback would. Returns false when nothing was scheduled.
    pub fn pump(&mut self, timestamp: f64) -> bool {
        if self.host_mut().take_pending().is_none() {
            return false;
        }
        self.frame(timestamp);
        true
    }

    /// Pump frames at a steady 60 Hz until the loop halts or `frames` run out.
    /// Returns the number of frames run.
    pub fn run_for(&mut self, frames: u32) -> u32 {
        let mut ran = 0;
        while ran < frames && self.pump(ran as f64 * 1000.0 / 60.0) {
            ran += 1;
        }
        ran
    }
}
