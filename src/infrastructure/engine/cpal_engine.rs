//! Cross-platform capture engine using cpal
//!
//! One engine instance per session open; the factory hands out a fresh
//! engine plus its event channel, and the controller tears the previous
//! one down before binding again.
//!
//! The cpal stream lives on a dedicated thread (cpal::Stream is not
//! Send); the engine talks to it through atomics. Pausing gates the
//! input callback instead of tearing the stream down, so resume is
//! instant and elapsed time counts active capture only.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::sync::mpsc;
use tokio::time::Duration as TokioDuration;
use tracing::debug;

use super::flac::{encode_flac, TARGET_SAMPLE_RATE};
use crate::application::ports::{
    CaptureEngine, EngineBinding, EngineError, EngineEvent, EngineFactory,
};
use crate::domain::recording::{DeviceId, RecordedAudio, RecordedMimeType};

/// How often the capture thread updates elapsed time and emits progress
const TICK_MS: u64 = 100;

/// Capture engine backed by a cpal input stream.
pub struct CpalEngine {
    /// Recorded audio samples (mono, i16, at device sample rate)
    samples: Arc<StdMutex<Vec<i16>>>,
    /// Device sample rate (may differ from the 16kHz target)
    device_sample_rate: Arc<AtomicU32>,
    /// Whether a capture is in flight (paused included)
    capturing: Arc<AtomicBool>,
    /// Whether the input callback is gated off
    paused: Arc<AtomicBool>,
    /// Active capture time in milliseconds
    elapsed_ms: Arc<AtomicU64>,
    /// Error raised by the capture thread during startup, if any
    start_error: Arc<StdMutex<Option<EngineError>>>,
    /// Typed notifications consumed by the session controller
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl CpalEngine {
    /// Create an engine that reports through the given event channel
    pub fn new(events: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self {
            samples: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            capturing: Arc::new(AtomicBool::new(false)),
            paused: Arc::new(AtomicBool::new(false)),
            elapsed_ms: Arc::new(AtomicU64::new(0)),
            start_error: Arc::new(StdMutex::new(None)),
            events,
        }
    }

    /// Resolve the requested device, or the host default when `None`
    fn resolve_device(device: Option<&str>) -> Result<cpal::Device, EngineError> {
        let host = cpal::default_host();
        match device {
            Some(wanted) => host
                .input_devices()
                .map_err(|e| EngineError::DeviceUnavailable(e.to_string()))?
                .find(|d| d.name().map(|n| n == wanted).unwrap_or(false))
                .ok_or_else(|| EngineError::DeviceUnavailable(wanted.to_string())),
            None => host
                .default_input_device()
                .ok_or_else(|| EngineError::DeviceUnavailable("no default input device".into())),
        }
    }

    /// Get a suitable input configuration, preferring mono and the
    /// 16kHz target rate
    fn pick_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), EngineError> {
        let supported = device
            .supported_input_configs()
            .map_err(|e| EngineError::PermissionDenied(e.to_string()))?;

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && config.max_sample_rate().0 >= TARGET_SAMPLE_RATE;

            let is_better = match &best {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > TARGET_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best = Some(config);
            }
        }

        let range = best.ok_or_else(|| {
            EngineError::DeviceUnavailable("no supported input configuration".into())
        })?;

        let sample_rate = if range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            range.min_sample_rate()
        };

        let sample_format = range.sample_format();
        let config = StreamConfig {
            channels: range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix interleaved multi-channel samples down to mono
    fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Resample from the device rate to 16kHz if needed
    fn resample_to_16k(samples: &[i16], source_rate: u32) -> Result<Vec<i16>, EngineError> {
        if source_rate == TARGET_SAMPLE_RATE {
            return Ok(samples.to_vec());
        }

        let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

        let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
        let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            TARGET_SAMPLE_RATE as usize,
            1024, // Chunk size
            2,    // Sub-chunks
            1,    // Mono
        )
        .map_err(|e| EngineError::CaptureFailed(format!("Resampler init failed: {}", e)))?;

        let mut output = Vec::with_capacity(output_len);
        let mut input_pos = 0;

        while input_pos < samples_f32.len() {
            let frames_needed = resampler.input_frames_next();
            let end_pos = (input_pos + frames_needed).min(samples_f32.len());
            let mut chunk = samples_f32[input_pos..end_pos].to_vec();
            if chunk.len() < frames_needed {
                chunk.resize(frames_needed, 0.0);
            }

            let resampled = resampler
                .process(&[chunk], None)
                .map_err(|e| EngineError::CaptureFailed(format!("Resampling failed: {}", e)))?;

            output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
            input_pos = end_pos;
        }

        output.truncate(output_len);

        Ok(output)
    }

    /// Resample and FLAC-encode the captured PCM
    fn encode(samples: &[i16], sample_rate: u32) -> Result<RecordedAudio, EngineError> {
        let resampled = Self::resample_to_16k(samples, sample_rate)?;

        let flac = encode_flac(&resampled)
            .map_err(|e| EngineError::CaptureFailed(format!("Encoding failed: {}", e)))?;

        if flac.is_empty() {
            return Err(EngineError::CaptureFailed("encoded audio is empty".into()));
        }

        Ok(RecordedAudio::new(flac, RecordedMimeType::Flac))
    }
}

#[async_trait]
impl CaptureEngine for CpalEngine {
    async fn start(&self, device: Option<&DeviceId>) -> Result<(), EngineError> {
        if self.capturing.load(Ordering::SeqCst) {
            return Err(EngineError::CaptureFailed(
                "capture already in progress".into(),
            ));
        }

        {
            let mut samples = self
                .samples
                .lock()
                .map_err(|_| EngineError::CaptureFailed("sample buffer poisoned".into()))?;
            samples.clear();
        }
        self.start_error
            .lock()
            .map_err(|_| EngineError::CaptureFailed("state poisoned".into()))?
            .take();
        self.elapsed_ms.store(0, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        self.capturing.store(true, Ordering::SeqCst);

        let wanted_device = device.map(|d| d.as_str().to_string());
        let samples = Arc::clone(&self.samples);
        let device_sample_rate = Arc::clone(&self.device_sample_rate);
        let capturing = Arc::clone(&self.capturing);
        let paused = Arc::clone(&self.paused);
        let elapsed_ms = Arc::clone(&self.elapsed_ms);
        let start_error = Arc::clone(&self.start_error);
        let events = self.events.clone();

        // The stream must live on its own thread; it is not Send.
        std::thread::spawn(move || {
            // Failures that outrun the startup grace period return from
            // start() directly; slower ones reach the controller as a
            // Faulted event, so the session never records into a dead
            // pipeline.
            let fail = |err: EngineError| {
                let _ = events.send(EngineEvent::Faulted {
                    reason: err.to_string(),
                });
                if let Ok(mut slot) = start_error.lock() {
                    *slot = Some(err);
                }
                capturing.store(false, Ordering::SeqCst);
            };

            let device = match CpalEngine::resolve_device(wanted_device.as_deref()) {
                Ok(d) => d,
                Err(e) => return fail(e),
            };

            let (config, sample_format) = match CpalEngine::pick_config(&device) {
                Ok(c) => c,
                Err(e) => return fail(e),
            };

            let sample_rate = config.sample_rate.0;
            let channels = config.channels;
            device_sample_rate.store(sample_rate, Ordering::SeqCst);

            let stream_result = match sample_format {
                SampleFormat::I16 => {
                    let samples = Arc::clone(&samples);
                    let capturing = Arc::clone(&capturing);
                    let paused = Arc::clone(&paused);

                    device.build_input_stream(
                        &config,
                        move |data: &[i16], _: &cpal::InputCallbackInfo| {
                            if capturing.load(Ordering::SeqCst) && !paused.load(Ordering::SeqCst) {
                                let mono = CpalEngine::downmix(data, channels);
                                if let Ok(mut buffer) = samples.lock() {
                                    buffer.extend_from_slice(&mono);
                                }
                            }
                        },
                        |err| debug!(error = %err, "audio stream error"),
                        None,
                    )
                }

                SampleFormat::F32 => {
                    let samples = Arc::clone(&samples);
                    let capturing = Arc::clone(&capturing);
                    let paused = Arc::clone(&paused);

                    device.build_input_stream(
                        &config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            if capturing.load(Ordering::SeqCst) && !paused.load(Ordering::SeqCst) {
                                let i16_data: Vec<i16> =
                                    data.iter().map(|&s| (s * 32767.0) as i16).collect();
                                let mono = CpalEngine::downmix(&i16_data, channels);
                                if let Ok(mut buffer) = samples.lock() {
                                    buffer.extend_from_slice(&mono);
                                }
                            }
                        },
                        |err| debug!(error = %err, "audio stream error"),
                        None,
                    )
                }

                _ => {
                    return fail(EngineError::DeviceUnavailable(
                        "unsupported sample format".into(),
                    ))
                }
            };

            let stream = match stream_result {
                Ok(s) => s,
                Err(e) => return fail(EngineError::PermissionDenied(e.to_string())),
            };

            if let Err(e) = stream.play() {
                return fail(EngineError::PermissionDenied(e.to_string()));
            }

            // Tick until finalize/teardown flips the flag. Elapsed time
            // accumulates active spans only.
            let mut last_tick = Instant::now();
            while capturing.load(Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(TICK_MS));
                let delta = last_tick.elapsed().as_millis() as u64;
                last_tick = Instant::now();

                if !paused.load(Ordering::SeqCst) {
                    let elapsed = elapsed_ms.fetch_add(delta, Ordering::SeqCst) + delta;
                    let _ = events.send(EngineEvent::Progress {
                        elapsed_ms: elapsed,
                    });
                }
            }

            drop(stream);
        });

        // Give the thread a moment to surface startup failures
        tokio::time::sleep(TokioDuration::from_millis(50)).await;

        if !self.capturing.load(Ordering::SeqCst) {
            let err = self
                .start_error
                .lock()
                .ok()
                .and_then(|mut slot| slot.take())
                .unwrap_or_else(|| EngineError::PermissionDenied("failed to start capture".into()));
            return Err(err);
        }

        Ok(())
    }

    async fn pause(&self) -> Result<(), EngineError> {
        if !self.capturing.load(Ordering::SeqCst) {
            return Err(EngineError::CaptureFailed("no capture in progress".into()));
        }
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> Result<(), EngineError> {
        if !self.capturing.load(Ordering::SeqCst) {
            return Err(EngineError::CaptureFailed("no capture in progress".into()));
        }
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn finalize(&self) -> Result<(), EngineError> {
        if !self.capturing.load(Ordering::SeqCst) {
            return Err(EngineError::CaptureFailed("no capture in progress".into()));
        }

        self.capturing.store(false, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);

        // Let the capture thread drop the stream
        tokio::time::sleep(TokioDuration::from_millis(TICK_MS)).await;

        let sample_rate = self.device_sample_rate.load(Ordering::SeqCst);
        if sample_rate == 0 {
            return Err(EngineError::CaptureFailed("sample rate not set".into()));
        }

        let samples = {
            let mut buffer = self
                .samples
                .lock()
                .map_err(|_| EngineError::CaptureFailed("sample buffer poisoned".into()))?;
            std::mem::take(&mut *buffer)
        };

        if samples.is_empty() {
            let reason = "no audio data captured".to_string();
            let _ = self.events.send(EngineEvent::Faulted {
                reason: reason.clone(),
            });
            return Err(EngineError::CaptureFailed(reason));
        }

        // CPU-heavy encode off the async runtime
        let audio = tokio::task::spawn_blocking(move || Self::encode(&samples, sample_rate))
            .await
            .map_err(|e| EngineError::CaptureFailed(format!("Encode task error: {}", e)))??;

        let elapsed_ms = self.elapsed_ms.load(Ordering::SeqCst);
        let _ = self.events.send(EngineEvent::Completed { audio, elapsed_ms });

        Ok(())
    }

    async fn teardown(&self) {
        if self.capturing.swap(false, Ordering::SeqCst) {
            // Let the capture thread drop the stream
            tokio::time::sleep(TokioDuration::from_millis(TICK_MS)).await;
        }
        self.paused.store(false, Ordering::SeqCst);
        self.elapsed_ms.store(0, Ordering::SeqCst);
        if let Ok(mut buffer) = self.samples.lock() {
            buffer.clear();
        }
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.load(Ordering::SeqCst)
    }
}

/// Factory producing one cpal engine per session open.
#[derive(Debug, Default)]
pub struct CpalEngineFactory;

impl CpalEngineFactory {
    /// Create the factory
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EngineFactory for CpalEngineFactory {
    async fn bind(&self) -> Result<EngineBinding, EngineError> {
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(EngineBinding {
            engine: Arc::new(CpalEngine::new(tx)),
            events: rx,
        })
    }
}
