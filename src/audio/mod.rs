use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info, warn};

use crate::audio_api::{AudioCommand, Voices};

mod engine;
mod frame;
mod sample_buffer;
mod voice;

pub use engine::LoadedKit;
pub use frame::StereoFrame;
pub use sample_buffer::SampleBuffer;

use engine::Engine;

const BLOCK_FRAMES: usize = 1024; // scratch size so we wont malloc in the callback

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    retired: Receiver<LoadedKit>,
    sample_rate: u32,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn send(&self, cmd: AudioCommand) {
        // free kits the engine has swapped out
        while self.retired.try_recv().is_ok() {}
        if self.tx.try_send(cmd).is_err() {
            warn!("audio command queue full, dropping command");
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Voices for AudioHandle {
    fn play(&mut self, voice: usize) {
        self.send(AudioCommand::Play { voice });
    }

    fn stop(&mut self, voice: usize) {
        self.send(AudioCommand::Stop { voice });
    }
}

pub fn start_audio() -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(1024);
    let (retired_tx, retired) = crossbeam_channel::bounded::<LoadedKit>(4);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate = config.sample_rate() as u32;
    let channels = config.channels() as usize;

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let output_stream =
                build_output_stream_f32(&device, &config.into(), rx, retired_tx, sample_rate, channels)?;
            output_stream.play().context("failed to play output stream")?;
            info!(sample_rate, channels, "audio output started");

            Ok(AudioHandle {
                tx,
                retired,
                sample_rate,
                _output_stream: output_stream,
            })
        }
        _ => anyhow::bail!("unsupported sample format (only f32 supported for now)"),
    }
}

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    retired: Sender<LoadedKit>,
    sample_rate: u32,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let mut engine = Engine::new(sample_rate as f32, retired);
    let mut scratch = vec![StereoFrame::zero(); BLOCK_FRAMES];

    let err_fn = |err| error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }

            for chunk in data.chunks_mut(channels * BLOCK_FRAMES) {
                let block = &mut scratch[..chunk.len() / channels];
                engine.render_block(block);
                write_interleaved(chunk, block, channels);
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

fn write_interleaved(out: &mut [f32], frames: &[StereoFrame], channels: usize) {
    for (slot, frame) in out.chunks_exact_mut(channels).zip(frames) {
        match slot {
            [mono] => *mono = 0.5 * (frame.left + frame.right),
            [left, right, rest @ ..] => {
                *left = frame.left;
                *right = frame.right;
                rest.fill(0.0);
            }
            [] => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_stereo_and_surround() {
        let frames = [StereoFrame { left: 0.25, right: -0.25 }; 2];
        let mut out = [1.0f32; 8];
        write_interleaved(&mut out, &frames, 4);
        assert_eq!(out, [0.25, -0.25, 0.0, 0.0, 0.25, -0.25, 0.0, 0.0]);

        let mut mono = [1.0f32; 2];
        write_interleaved(&mut mono, &frames, 1);
        assert_eq!(mono, [0.0, 0.0]);
    }
}
