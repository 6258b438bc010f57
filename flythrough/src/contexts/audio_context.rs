use std::sync::Arc;

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Stream,
};
use generational_arena::{Arena, Index};
use log::{debug, info, warn};
use oddio::{Cycle, Frames, FramesSignal, Handle, Mixer, SplitSignal, Stop};
use symphonia::core::{
    audio::SampleBuffer, errors::Error as SymphoniaError, io::MediaSourceStream, probe::Hint,
};

use crate::{FlythroughError, FlythroughResult};

type StereoFrames = Arc<Frames<[f32; 2]>>;
type MusicTrackHandle = Handle<Stop<FramesSignal<[f32; 2]>>>;
type LoopHandle = Handle<Stop<Cycle<[f32; 2]>>>;

/// The state of a piece of audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundState {
    Stopped,
    Playing,
    Paused,
}

/// A music track, created by [`AudioContext::add_music_track`]
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct MusicTrack {
    index: Index,
}

/// The calls a game makes to drive its soundtrack.
///
/// [`AudioContext`] is the real implementation; anything else that can start, pause and report
/// on a single music track (and keep background loops running) can stand in for it.
pub trait MusicPlayer {
    /// Play a music track from the beginning, stopping whatever track was playing before
    fn play_music_track(&mut self, track: MusicTrack);
    /// Pause the current music track, if there is one
    fn pause_music_track(&mut self);
    /// Resume the current music track, if there is one
    fn resume_music_track(&mut self);
    /// Get the status of the current music track
    fn music_track_status(&mut self) -> SoundState;
    /// The track most recently started with [`MusicPlayer::play_music_track`], if any
    fn current_music_track(&self) -> Option<MusicTrack>;
    /// Play a track on repeat, alongside any music
    fn loop_track(&mut self, track: MusicTrack);
}

/// Wrapper around `oddio` and `cpal` to represent the audio playing in an application
pub struct AudioContext {
    /// Handle to the `oddio` mixer
    pub mixer_handle: Handle<Mixer<[f32; 2]>>,
    /// The `cpal` output stream. `None` if the context is headless.
    pub stream: Option<Stream>,
    /// The currently playing music track
    pub current_music_track: Option<MusicTrack>,
    music_tracks_inner: Arena<StereoFrames>,
    music_track_handle: Option<MusicTrackHandle>,
    loop_handles: Vec<LoopHandle>,
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioContext {
    /// Create an audio context that plays through the default output device.
    /// If there's no device to play to, the context carries on headless.
    pub fn new() -> Self {
        let (mixer_handle, mixer) = oddio::split(Mixer::new());
        let stream = match open_output_stream(mixer) {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!("Unable to open audio output, continuing without sound: {e}");
                None
            }
        };

        Self::from_parts(mixer_handle, stream)
    }

    /// Create an audio context that is never connected to any hardware. Tracks can still be
    /// played and paused, but nobody will hear them. Useful for testing.
    pub fn headless() -> Self {
        let (mixer_handle, _) = oddio::split(Mixer::new());
        Self::from_parts(mixer_handle, None)
    }

    fn from_parts(mixer_handle: Handle<Mixer<[f32; 2]>>, stream: Option<Stream>) -> Self {
        Self {
            mixer_handle,
            stream,
            current_music_track: None,
            music_tracks_inner: Arena::new(),
            music_track_handle: None,
            loop_handles: Vec::new(),
        }
    }

    /// Decode an MP3 or WAV file and add it as a music track
    pub fn add_music_track(&mut self, bytes: &[u8]) -> FlythroughResult<MusicTrack> {
        debug!("Decoding {} bytes of audio..", bytes.len());
        let frames = get_stereo_frames(bytes.to_vec())?;
        debug!("..done!");
        Ok(MusicTrack {
            index: self.music_tracks_inner.insert(frames),
        })
    }

    /// Create an empty MusicTrack. Useful for testing
    pub fn dummy_track(&mut self) -> MusicTrack {
        let frames = Frames::from_slice(0, &[]);
        MusicTrack {
            index: self.music_tracks_inner.insert(frames),
        }
    }
}

impl MusicPlayer for AudioContext {
    fn play_music_track(&mut self, track: MusicTrack) {
        let Some(frames) = self.music_tracks_inner.get(track.index) else {
            warn!("Tried to play {track:?}, which doesn't belong to this context");
            return;
        };
        let signal = FramesSignal::from(frames.clone());

        if let Some(mut handle) = self.music_track_handle.take() {
            handle.control::<Stop<_>, _>().stop();
        }

        self.music_track_handle = Some(self.mixer_handle.control().play(signal));
        self.current_music_track = Some(track);
    }

    fn pause_music_track(&mut self) {
        if let Some(h) = self.music_track_handle.as_mut() {
            h.control::<Stop<_>, _>().pause()
        }
    }

    fn resume_music_track(&mut self) {
        if let Some(h) = self.music_track_handle.as_mut() {
            h.control::<Stop<_>, _>().resume()
        }
    }

    fn music_track_status(&mut self) -> SoundState {
        if let Some(handle) = self.music_track_handle.as_mut() {
            let control = handle.control::<Stop<_>, _>();
            if control.is_paused() {
                return SoundState::Paused;
            }
            if control.is_stopped() {
                return SoundState::Stopped;
            }
            SoundState::Playing
        } else {
            SoundState::Stopped
        }
    }

    fn current_music_track(&self) -> Option<MusicTrack> {
        self.current_music_track
    }

    fn loop_track(&mut self, track: MusicTrack) {
        let Some(frames) = self.music_tracks_inner.get(track.index) else {
            warn!("Tried to loop {track:?}, which doesn't belong to this context");
            return;
        };
        let signal = Cycle::new(frames.clone());
        self.loop_handles
            .push(self.mixer_handle.control().play(signal));
    }
}

fn open_output_stream(mixer: SplitSignal<Mixer<[f32; 2]>>) -> FlythroughResult<Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(FlythroughError::NoAudioDevice)?;
    info!(
        "Using default audio device: {}",
        device.name().unwrap_or_else(|_| "<unknown>".into())
    );
    let sample_rate = device
        .default_output_config()
        .map_err(anyhow::Error::from)?
        .sample_rate();
    let config = cpal::StreamConfig {
        channels: 2,
        sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };
    debug!("cpal AudioConfig: {:?}", config);

    // Pipe the mixer to the audio hardware.
    let stream = device
        .build_output_stream(
            &config,
            move |out_flat: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let out_stereo: &mut [[f32; 2]] = oddio::frame_stereo(out_flat);
                oddio::run(&mixer, sample_rate.0, out_stereo);
            },
            |err| warn!("An error occurred playing the audio stream: {}", err),
            None,
        )
        .map_err(anyhow::Error::from)?;
    stream.play().map_err(anyhow::Error::from)?;

    Ok(stream)
}

fn get_stereo_frames(bytes: Vec<u8>) -> FlythroughResult<StereoFrames> {
    let (samples, channels, sample_rate) = decode(bytes)?;
    let stereo = match channels {
        1 => samples.iter().map(|s| [*s, *s]).collect::<Vec<_>>(),
        _ => samples
            .chunks_exact(channels)
            .map(|frame| [frame[0], frame[1]])
            .collect(),
    };
    Ok(Frames::from_slice(sample_rate, &stereo))
}

fn decode(bytes: Vec<u8>) -> FlythroughResult<(Vec<f32>, usize, u32)> {
    let decode_error = |e: SymphoniaError| FlythroughError::AudioDecodeError(e.to_string());

    let cursor = Box::new(std::io::Cursor::new(bytes));
    let mss = MediaSourceStream::new(cursor, Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &Default::default(),
            &Default::default(),
        )
        .map_err(decode_error)?;

    let mut reader = probed.format;
    let track = reader
        .default_track()
        .ok_or_else(|| FlythroughError::AudioDecodeError("no audio track".into()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| FlythroughError::AudioDecodeError("unknown sample rate".into()))?;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &Default::default())
        .map_err(decode_error)?;

    let mut samples: Vec<f32> = Vec::new();
    let mut channels = 0;

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(e) => {
                warn!("Error reading packet: {:?}", e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                channels = decoded.spec().channels.count();
                let mut sample_buf =
                    SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
                sample_buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(sample_buf.samples());
            }
            // A corrupt packet only loses a few milliseconds of audio.
            Err(SymphoniaError::DecodeError(e)) => debug!("Skipping corrupt packet: {e}"),
            Err(e) => {
                warn!("Error while decoding: {:?}", e);
                break;
            }
        }
    }

    if channels == 0 {
        return Err(FlythroughError::AudioDecodeError(
            "no audio could be decoded".into(),
        ));
    }

    Ok((samples, channels, sample_rate))
}
