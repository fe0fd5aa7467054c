//! Mount/unmount lifecycle of a field on a [`Host`].
//!
//! A [`Backdrop`] is either stopped (nothing scheduled) or running (exactly
//! one frame pending plus resize and pointer listeners attached). Mounting
//! sizes and populates the field and starts the loop; every delivered frame
//! steps the field and requests the next one; unmounting cancels the pending
//! frame and detaches both listeners.
//!
//! Event handlers and frames all take `&mut self`, so on a single-threaded
//! host an event can never land in the middle of a frame.

use crate::config::FieldConfig;
use crate::field::FieldState;
use crate::host::{FrameHandle, Host, HostEvent, ListenerId};
use crate::prng::Xorshift64;
use crate::stepper::{step, FrameStats};
use crate::surface::Surface;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Stopped,
    Running {
        frame: FrameHandle,
        listeners: Vec<ListenerId>,
    },
}

/// An animated particle field bound to a host's lifecycle.
#[derive(Debug, Clone)]
pub struct Backdrop {
    state: FieldState,
    config: FieldConfig,
    rng: Xorshift64,
    phase: Phase,
}

impl Backdrop {
    /// A stopped backdrop with an empty field. `rng` drives every repopulation.
    pub fn new(config: FieldConfig, rng: Xorshift64) -> Self {
        Self {
            state: FieldState::new(),
            config,
            rng,
            phase: Phase::Stopped,
        }
    }

    /// Whether a frame is pending and listeners are attached.
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// The current field.
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    /// The config every frame is drawn with.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Starts the field on `host`.
    ///
    /// Populates for the host's current size, requests the first frame, and
    /// attaches both listeners. Returns `false` and leaves everything
    /// untouched when the host has no surface or refuses a capability.
    /// Mounting a running backdrop is a no-op that returns `true`.
    pub fn mount<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.is_running() {
            return true;
        }
        let Some((width, height)) = host.surface_size() else {
            log::warn!("particle field not mounted: no drawing surface");
            return false;
        };
        let Some(frame) = host.request_frame() else {
            log::warn!("particle field not mounted: frame scheduling unavailable");
            return false;
        };

        let mut listeners = Vec::with_capacity(HostEvent::ALL.len());
        for event in HostEvent::ALL {
            match host.listen(event) {
                Some(id) => listeners.push(id),
                None => {
                    log::warn!("particle field not mounted: cannot listen for {event:?}");
                    host.cancel_frame(frame);
                    listeners.into_iter().for_each(|id| host.unlisten(id));
                    return false;
                }
            }
        }

        self.resize(width, height);
        self.phase = Phase::Running { frame, listeners };
        log::debug!("particle field mounted at {width}x{height}");
        true
    }

    /// Runs the frame identified by `handle`, then schedules the next one.
    ///
    /// Returns `None` without touching the field when the backdrop is
    /// stopped or `handle` is not the pending frame. If the next frame
    /// cannot be scheduled the backdrop detaches and stops.
    pub fn frame<H, S>(
        &mut self,
        handle: FrameHandle,
        host: &mut H,
        surface: &mut S,
    ) -> Option<FrameStats>
    where
        H: Host + ?Sized,
        S: Surface + ?Sized,
    {
        match &self.phase {
            Phase::Running { frame, .. } if *frame == handle => {}
            _ => return None,
        }

        let stats = step(&mut self.state, surface, &self.config);

        match host.request_frame() {
            Some(next) => {
                if let Phase::Running { frame, .. } = &mut self.phase {
                    *frame = next;
                }
            }
            None => {
                log::debug!("particle field stopped: next frame could not be scheduled");
                self.detach(host);
            }
        }
        Some(stats)
    }

    /// Repopulates for a new surface size. The running loop picks the new
    /// generation up on its next frame.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.state.populate(width, height, &mut self.rng, &self.config);
    }

    /// Records the pointer position in surface pixels.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.state.set_pointer(x, y);
    }

    /// Cancels the pending frame, detaches both listeners, and drops the
    /// particle set. Safe to call when already stopped.
    pub fn unmount<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Phase::Running { frame, .. } = self.phase else {
            return;
        };
        host.cancel_frame(frame);
        self.detach(host);
        self.state.clear();
        log::debug!("particle field unmounted");
    }

    fn detach<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Phase::Running { listeners, .. } = std::mem::replace(&mut self.phase, Phase::Stopped)
        {
            listeners.into_iter().for_each(|id| host.unlisten(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ManualHost;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn backdrop() -> Backdrop {
        Backdrop::new(FieldConfig::default(), Xorshift64::new(42))
    }

    /// Delivers the pending frame, if any.
    fn pump(
        b: &mut Backdrop,
        host: &mut ManualHost,
        surface: &mut RecordingSurface,
    ) -> Option<FrameStats> {
        let handle = host.take_frame()?;
        b.frame(handle, host, surface)
    }

    #[test]
    fn new_backdrop_is_stopped_and_empty() {
        let b = backdrop();
        assert!(!b.is_running());
        assert!(b.state().particles().is_empty());
    }

    #[test]
    fn mount_populates_schedules_and_listens() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        assert!(b.mount(&mut host));
        assert!(b.is_running());
        assert_eq!(b.state().particles().len(), 32);
        assert!(host.pending_frame().is_some());
        assert!(host.is_listening(HostEvent::Resize));
        assert!(host.is_listening(HostEvent::PointerMove));
    }

    #[test]
    fn mount_without_surface_is_noop() {
        let mut b = backdrop();
        let mut host = ManualHost::detached();
        assert!(!b.mount(&mut host));
        assert!(!b.is_running());
        assert!(host.pending_frame().is_none());
        assert_eq!(host.listener_count(), 0);
        assert!(b.state().particles().is_empty());
    }

    #[test]
    fn mount_without_frame_scheduling_is_noop() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        host.set_frames_available(false);
        assert!(!b.mount(&mut host));
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn mount_twice_keeps_single_schedule() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        assert!(b.mount(&mut host));
        assert!(b.mount(&mut host));
        assert_eq!(host.frames_requested(), 1);
        assert_eq!(host.listener_count(), 2);
    }

    #[test]
    fn each_frame_reschedules_exactly_one_frame() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        let mut surface = RecordingSurface::new();
        b.mount(&mut host);
        for i in 0..5 {
            let stats = pump(&mut b, &mut host, &mut surface).unwrap();
            assert_eq!(stats.particles_drawn, 32);
            assert!(host.pending_frame().is_some(), "frame {i} did not reschedule");
        }
        assert_eq!(host.frames_requested(), 6);
    }

    #[test]
    fn stale_handle_is_ignored() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        let mut surface = RecordingSurface::new();
        b.mount(&mut host);
        let first = host.take_frame().unwrap();
        b.frame(first, &mut host, &mut surface).unwrap();
        assert!(b.frame(first, &mut host, &mut surface).is_none());
    }

    #[test]
    fn resize_replaces_generation_seen_by_next_frame() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        let mut surface = RecordingSurface::new();
        b.mount(&mut host);
        b.resize(1920, 1080);
        let stats = pump(&mut b, &mut host, &mut surface).unwrap();
        assert_eq!(stats.particles_drawn, 138);
        assert_eq!(b.state().generation(), 2);
    }

    #[test]
    fn host_resize_repopulates_for_new_size() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        let mut surface = RecordingSurface::new();
        b.mount(&mut host);
        host.set_size(1920, 1080);
        let (width, height) = host.surface_size().unwrap();
        b.resize(width, height);
        let stats = pump(&mut b, &mut host, &mut surface).unwrap();
        assert_eq!(stats.particles_drawn, 138);
        assert_eq!(
            surface.commands()[0],
            DrawCommand::Clear {
                width: 1920.0,
                height: 1080.0
            }
        );
    }

    #[test]
    fn mount_after_surface_appears_succeeds() {
        let mut b = backdrop();
        let mut host = ManualHost::detached();
        assert!(!b.mount(&mut host));
        host.set_size(800, 600);
        assert!(b.mount(&mut host));
        assert_eq!(b.state().particles().len(), 32);
    }

    #[test]
    fn pointer_move_updates_state_without_drawing() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        b.mount(&mut host);
        let requested = host.frames_requested();
        b.pointer_moved(120.0, 80.0);
        assert_eq!(b.state().pointer(), glam::DVec2::new(120.0, 80.0));
        assert_eq!(host.frames_requested(), requested);
    }

    #[test]
    fn unmount_cancels_frame_and_removes_both_listeners() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        let mut surface = RecordingSurface::new();
        b.mount(&mut host);
        pump(&mut b, &mut host, &mut surface).unwrap();
        let pending = host.pending_frame().unwrap();

        b.unmount(&mut host);

        assert!(!b.is_running());
        assert!(host.take_frame().is_none(), "no further frame fires");
        assert_eq!(host.listener_count(), 0);
        assert!(b.frame(pending, &mut host, &mut surface).is_none());
        assert!(b.state().particles().is_empty());
    }

    #[test]
    fn unmount_when_stopped_is_noop() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        b.unmount(&mut host);
        assert!(!b.is_running());
    }

    #[test]
    fn remount_after_unmount_starts_fresh_generation() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        b.mount(&mut host);
        b.unmount(&mut host);
        assert!(b.mount(&mut host));
        assert_eq!(b.state().particles().len(), 32);
        assert_eq!(host.listener_count(), 2);
    }

    #[test]
    fn lost_surface_stops_loop_and_detaches() {
        let mut b = backdrop();
        let mut host = ManualHost::new(800, 600);
        let mut surface = RecordingSurface::new();
        b.mount(&mut host);
        host.set_frames_available(false);
        assert!(pump(&mut b, &mut host, &mut surface).is_some());
        assert!(!b.is_running());
        assert!(host.pending_frame().is_none());
        assert_eq!(host.listener_count(), 0);
    }
}
