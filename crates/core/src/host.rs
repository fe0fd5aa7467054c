//! What the field needs from its host environment.
//!
//! A host supplies the surface size, a one-shot "next display refresh"
//! scheduler with cancellation, and event listener registration for resize
//! and pointer movement. The browser implements it with
//! `requestAnimationFrame` and window listeners; [`ManualHost`] implements it
//! in memory so frames are delivered by whoever drives it (tests, the CLI).

/// Token for one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Token for one attached event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Events the field subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    Resize,
    PointerMove,
}

impl HostEvent {
    /// Both events a mounted field listens to.
    pub const ALL: [HostEvent; 2] = [HostEvent::Resize, HostEvent::PointerMove];
}

/// Scheduling and event capabilities of the environment hosting a field.
///
/// `None` from any method means the capability is unavailable (e.g. the
/// surface was detached); callers treat that as "do nothing", never as an
/// error.
pub trait Host {
    /// Current surface size in pixels, or `None` without a usable surface.
    fn surface_size(&self) -> Option<(usize, usize)>;

    /// Asks for one callback at the next display refresh.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancels a requested frame. Unknown or already-delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Attaches a listener for `event`.
    fn listen(&mut self, event: HostEvent) -> Option<ListenerId>;

    /// Detaches a listener. Unknown ids are ignored.
    fn unlisten(&mut self, id: ListenerId);
}

/// In-memory host. At most one frame is pending; [`ManualHost::take_frame`]
/// delivers it.
#[derive(Debug, Clone)]
pub struct ManualHost {
    size: Option<(usize, usize)>,
    frames_available: bool,
    next_token: u64,
    pending: Option<FrameHandle>,
    frames_requested: u64,
    listeners: Vec<(ListenerId, HostEvent)>,
}

impl ManualHost {
    /// A host with a `width × height` surface.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            size: Some((width, height)),
            frames_available: true,
            next_token: 0,
            pending: None,
            frames_requested: 0,
            listeners: Vec::new(),
        }
    }

    /// A host whose surface is missing.
    pub fn detached() -> Self {
        Self {
            size: None,
            ..Self::new(0, 0)
        }
    }

    /// Changes the surface size, as a window resize would.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.size = Some((width, height));
    }

    /// When `false`, frame requests fail as if the surface went away.
    pub fn set_frames_available(&mut self, available: bool) {
        self.frames_available = available;
    }

    /// Removes and returns the pending frame, as a display refresh would.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Total successful frame requests since creation.
    pub fn frames_requested(&self) -> u64 {
        self.frames_requested
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_listening(&self, event: HostEvent) -> bool {
        self.listeners.iter().any(|&(_, e)| e == event)
    }

    fn next_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

impl Host for ManualHost {
    fn surface_size(&self) -> Option<(usize, usize)> {
        self.size
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        if !self.frames_available {
            return None;
        }
        let handle = FrameHandle(self.next_token());
        self.pending = Some(handle);
        self.frames_requested += 1;
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn listen(&mut self, event: HostEvent) -> Option<ListenerId> {
        let id = ListenerId(self.next_token());
        self.listeners.push((id, event));
        Some(id)
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.retain(|&(existing, _)| existing != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_then_take_delivers_once() {
        let mut host = ManualHost::new(10, 10);
        let handle = host.request_frame().unwrap();
        assert_eq!(host.take_frame(), Some(handle));
        assert_eq!(host.take_frame(), None);
    }

    #[test]
    fn new_request_supersedes_pending() {
        let mut host = ManualHost::new(10, 10);
        let first = host.request_frame().unwrap();
        let second = host.request_frame().unwrap();
        assert_ne!(first, second);
        assert_eq!(host.pending_frame(), Some(second));
        assert_eq!(host.frames_requested(), 2);
    }

    #[test]
    fn cancel_removes_matching_pending_frame() {
        let mut host = ManualHost::new(10, 10);
        let handle = host.request_frame().unwrap();
        host.cancel_frame(handle);
        assert_eq!(host.take_frame(), None);
    }

    #[test]
    fn cancel_with_stale_handle_keeps_pending() {
        let mut host = ManualHost::new(10, 10);
        let stale = host.request_frame().unwrap();
        let current = host.request_frame().unwrap();
        host.cancel_frame(stale);
        assert_eq!(host.pending_frame(), Some(current));
    }

    #[test]
    fn unavailable_frames_return_none() {
        let mut host = ManualHost::new(10, 10);
        host.set_frames_available(false);
        assert!(host.request_frame().is_none());
        assert_eq!(host.frames_requested(), 0);
    }

    #[test]
    fn listen_and_unlisten_track_registrations() {
        let mut host = ManualHost::new(10, 10);
        let resize = host.listen(HostEvent::Resize).unwrap();
        let pointer = host.listen(HostEvent::PointerMove).unwrap();
        assert_ne!(resize, pointer);
        assert!(host.is_listening(HostEvent::Resize));
        host.unlisten(resize);
        assert!(!host.is_listening(HostEvent::Resize));
        assert!(host.is_listening(HostEvent::PointerMove));
        assert_eq!(host.listener_count(), 1);
    }

    #[test]
    fn set_size_changes_reported_size() {
        let mut host = ManualHost::detached();
        host.set_size(1920, 1080);
        assert_eq!(host.surface_size(), Some((1920, 1080)));
    }

    #[test]
    fn detached_host_has_no_size() {
        assert_eq!(ManualHost::detached().surface_size(), None);
        assert_eq!(ManualHost::new(3, 4).surface_size(), Some((3, 4)));
    }
}
