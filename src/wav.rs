use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};
use tempfile::NamedTempFile;

use crate::audio::{AudioFormat, Recording};
use crate::{Error, Result};

/// Load 16-bit PCM WAV audio from a reader into a `Recording`.
///
/// The recording keeps the file's own sample rate and channel count; `frames_per_chunk`
/// only controls how the samples are split into frames.
///
/// Format requirements:
/// - Integer PCM
/// - 16 bits per sample
pub fn read_recording<R>(reader: R, frames_per_chunk: usize) -> Result<Recording>
where
    R: Read,
{
    let mut reader = WavReader::new(reader)?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(Error::msg(format!(
            "expected 16-bit integer PCM WAV, got {} bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let format = AudioFormat {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: 16,
        frames_per_chunk: frames_per_chunk.max(1),
    };

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<i16>, _>>()?;

    Ok(Recording::from_samples(format, &samples))
}

/// Load a WAV file from disk (used for cue sounds and file playback).
pub fn read_recording_from_path(path: &Path, frames_per_chunk: usize) -> Result<Recording> {
    let file = File::open(path).map_err(|err| Error::io("failed to open WAV file", path, err))?;
    read_recording(BufReader::new(file), frames_per_chunk)
}

/// Encode a recording as WAV into any seekable writer.
pub fn write_wav<W>(recording: &Recording, writer: W) -> Result<()>
where
    W: Write + Seek,
{
    let mut writer = WavWriter::new(writer, recording.format().wav_spec())?;
    for sample in recording.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Encode a recording as an in-memory WAV file.
pub fn to_wav_bytes(recording: &Recording) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(recording, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Write a recording to a temporary `.wav` file for engines that only accept paths.
///
/// The file is deleted when the returned handle is dropped.
pub fn write_temp_wav(recording: &Recording) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("jasper-")
        .suffix(".wav")
        .tempfile()?;
    write_wav(recording, file.as_file_mut())?;
    Ok(file)
}
