use log::debug;

use crate::core::errors::PlayerError;
use crate::core::events::HandleId;
use crate::core::models::MediaFile;
use crate::core::traits::MediaDevice;

/// A live, revocable reference letting the device read one file's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHandle {
    id: HandleId,
    name: String,
}

impl StreamHandle {
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Name of the file the handle was minted for.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Mints and revokes stream handles on behalf of one controller.
///
/// Invariant: at most one handle is live at any time. Acquiring always
/// revokes the previous handle before the device mints a new stream, so a
/// revoked track can never keep bleeding audio under the next one.
#[derive(Debug, Default)]
pub struct ResourceManager {
    live: Option<StreamHandle>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the prior handle, then mint a new one for `file`.
    ///
    /// On failure the prior handle is already gone and nothing is live;
    /// the caller falls back to the `Idle` state.
    pub fn acquire<D: MediaDevice>(
        &mut self,
        device: &mut D,
        file: &MediaFile,
    ) -> Result<StreamHandle, PlayerError> {
        self.release_current(device);
        let id = device.open(file)?;
        let handle = StreamHandle { id, name: file.name.clone() };
        debug!("minted stream {} for {}", handle.id, handle.name);
        self.live = Some(handle.clone());
        Ok(handle)
    }

    /// Revoke `handle` if it is still the live one. Idempotent: releasing
    /// an already-released handle is a no-op.
    pub fn release<D: MediaDevice>(&mut self, device: &mut D, handle: &StreamHandle) {
        if self.live.as_ref().map(StreamHandle::id) == Some(handle.id) {
            self.release_current(device);
        }
    }

    /// Revoke whatever is live, if anything.
    pub fn release_current<D: MediaDevice>(&mut self, device: &mut D) {
        if let Some(handle) = self.live.take() {
            debug!("revoking stream {} ({})", handle.id, handle.name);
            device.close(handle.id);
        }
    }

    pub fn live(&self) -> Option<&StreamHandle> {
        self.live.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::MediaKind;
    use crate::device::mock::MockDevice;
    use std::path::PathBuf;

    fn file(name: &str) -> MediaFile {
        MediaFile {
            path: PathBuf::from(name),
            name: name.to_string(),
            kind: MediaKind::Audio,
            title: name.to_string(),
            artist: None,
            duration: None,
        }
    }

    #[test]
    fn acquire_mints_a_live_handle() {
        let mut device = MockDevice::new();
        let mut manager = ResourceManager::new();

        let handle = manager.acquire(&mut device, &file("a.mp3")).unwrap();
        assert_eq!(manager.live().map(StreamHandle::id), Some(handle.id()));
        assert_eq!(device.open_streams.len(), 1);
    }

    #[test]
    fn acquire_revokes_the_previous_handle_first() {
        let mut device = MockDevice::new();
        let mut manager = ResourceManager::new();

        let first = manager.acquire(&mut device, &file("a.mp3")).unwrap();
        let second = manager.acquire(&mut device, &file("b.mp3")).unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(device.open_streams, vec![second.id()], "only the new stream may be live");
        assert!(device.closed.contains(&first.id()));
    }

    #[test]
    fn at_most_one_live_handle_across_any_sequence() {
        let mut device = MockDevice::new();
        let mut manager = ResourceManager::new();

        for name in ["a.mp3", "b.mp3", "c.mp3", "a.mp3", "b.mp3"] {
            manager.acquire(&mut device, &file(name)).unwrap();
            assert!(device.open_streams.len() <= 1, "no-leak invariant violated");
        }
    }

    #[test]
    fn release_is_idempotent() {
        let mut device = MockDevice::new();
        let mut manager = ResourceManager::new();

        let handle = manager.acquire(&mut device, &file("a.mp3")).unwrap();
        manager.release(&mut device, &handle);
        manager.release(&mut device, &handle); // second call is a no-op

        assert!(manager.live().is_none());
        assert_eq!(device.closed, vec![handle.id()], "device closed exactly once");
    }

    #[test]
    fn release_of_a_stale_handle_does_not_touch_the_live_one() {
        let mut device = MockDevice::new();
        let mut manager = ResourceManager::new();

        let old = manager.acquire(&mut device, &file("a.mp3")).unwrap();
        let current = manager.acquire(&mut device, &file("b.mp3")).unwrap();

        manager.release(&mut device, &old);
        assert_eq!(manager.live().map(StreamHandle::id), Some(current.id()));
    }

    #[test]
    fn failed_acquire_leaves_nothing_live() {
        let mut device = MockDevice::new();
        let mut manager = ResourceManager::new();

        manager.acquire(&mut device, &file("a.mp3")).unwrap();
        device.fail_next_open = Some("corrupt container".to_string());

        assert!(manager.acquire(&mut device, &file("b.mp3")).is_err());
        assert!(manager.live().is_none());
        assert!(device.open_streams.is_empty(), "prior stream must still be revoked");
    }
}
