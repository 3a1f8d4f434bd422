use std::fs::File;
use std::io::BufReader;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::debug;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::core::errors::PlayerError;
use crate::core::events::{DeviceEvent, HandleId};
use crate::core::models::MediaFile;
use crate::core::traits::MediaDevice;

/// Bookkeeping for the one stream the device may have open.
struct LiveStream {
    id: HandleId,
    duration: Duration,
    /// Set while audio is actually running.
    playback_start: Option<Instant>,
    /// Elapsed time accumulated across pauses and seeks.
    base_elapsed: Duration,
    ended_emitted: bool,
}

impl LiveStream {
    fn elapsed(&self) -> Duration {
        match self.playback_start {
            Some(start) => self.base_elapsed + start.elapsed(),
            None => self.base_elapsed,
        }
    }
}

/// [`MediaDevice`] over a rodio sink.
///
/// Each minted stream gets a fresh sink, so revoking a handle silences it
/// immediately and a stale stream can never keep playing under the next
/// one. Position ticks and end-of-stream detection are derived on poll,
/// the cadence the application loop runs at.
pub struct RodioDevice {
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    live: Option<LiveStream>,
    next_id: HandleId,
    queue: Vec<DeviceEvent>,
    volume: f32,
    muted: bool,
}

impl RodioDevice {
    pub fn new() -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        // Keeps the audio engine running for the life of the program
        // without binding it to this struct. If we simply dropped it,
        // sound would stop.
        std::mem::forget(stream);

        Ok(Self {
            stream_handle,
            sink: None,
            live: None,
            next_id: 0,
            queue: Vec::new(),
            volume: 1.0,
            muted: false,
        })
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn resource_error(file: &MediaFile, reason: impl ToString) -> PlayerError {
        PlayerError::Resource {
            name: file.name.clone(),
            reason: reason.to_string(),
        }
    }
}

impl MediaDevice for RodioDevice {
    fn open(&mut self, file: &MediaFile) -> Result<HandleId, PlayerError> {
        // The caller has already revoked the previous handle; make sure its
        // sink is gone too.
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.live = None;

        let reader = File::open(&file.path).map_err(|e| Self::resource_error(file, e))?;
        let source =
            Decoder::new(BufReader::new(reader)).map_err(|e| Self::resource_error(file, e))?;
        let sink = Sink::try_new(&self.stream_handle).map_err(|e| Self::resource_error(file, e))?;

        // Duration from the decoder when it knows it, otherwise from the
        // tag probe done at file load.
        let duration = source
            .total_duration()
            .or(file.duration)
            .unwrap_or_default();

        sink.pause();
        sink.set_volume(self.effective_volume());
        sink.append(source);

        self.next_id += 1;
        let id = self.next_id;
        debug!("opened {} as stream {id} ({duration:?})", file.name);

        self.sink = Some(sink);
        self.live = Some(LiveStream {
            id,
            duration,
            playback_start: None,
            base_elapsed: Duration::ZERO,
            ended_emitted: false,
        });
        self.queue.push(DeviceEvent::MetadataReady { handle: id, duration });
        Ok(id)
    }

    fn close(&mut self, handle: HandleId) {
        if self.live.as_ref().map(|l| l.id) == Some(handle) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
            self.live = None;
        }
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        let (Some(sink), Some(live)) = (self.sink.as_ref(), self.live.as_mut()) else {
            return Err(PlayerError::playback("no stream loaded"));
        };
        sink.play();
        if live.playback_start.is_none() {
            live.playback_start = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if let Some(live) = self.live.as_mut() {
            if let Some(start) = live.playback_start.take() {
                live.base_elapsed += start.elapsed();
            }
        }
    }

    fn set_position(&mut self, position: Duration) -> Result<(), PlayerError> {
        let (Some(sink), Some(live)) = (self.sink.as_ref(), self.live.as_mut()) else {
            return Err(PlayerError::playback("no stream loaded"));
        };
        sink.try_seek(position)
            .map_err(|e| PlayerError::playback(format!("seek failed: {e:?}")))?;
        live.base_elapsed = position;
        if live.playback_start.is_some() {
            live.playback_start = Some(Instant::now());
        }
        live.ended_emitted = false;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.effective_volume());
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(sink) = &self.sink {
            sink.set_volume(self.effective_volume());
        }
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        if let (Some(sink), Some(live)) = (self.sink.as_ref(), self.live.as_mut()) {
            if sink.empty() && !live.ended_emitted {
                // The queued source drained: natural end of media.
                live.ended_emitted = true;
                if let Some(start) = live.playback_start.take() {
                    live.base_elapsed += start.elapsed();
                }
                debug!("stream {} ended", live.id);
                self.queue.push(DeviceEvent::Ended { handle: live.id });
            } else if live.playback_start.is_some() {
                let position = if live.duration > Duration::ZERO {
                    live.elapsed().min(live.duration)
                } else {
                    live.elapsed()
                };
                self.queue.push(DeviceEvent::PositionChanged { handle: live.id, position });
            }
        }
        std::mem::take(&mut self.queue)
    }
}

// To avoid leaks
impl Drop for RodioDevice {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
