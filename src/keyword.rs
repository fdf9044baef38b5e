//! Passive listening: spot loudness spikes, buffer them, and ask a transcriber whether the
//! wake word was spoken.
//!
//! The frame loop never blocks on speech-to-text. Completed candidates are queued to a
//! small pool of worker threads; the loop polls a per-session "woken" flag after every
//! frame and returns as soon as any worker reports a match.
//!
//! State machine (per frame):
//! - `Idle`: a frame at or above the trigger SNR starts a candidate seeded with recent
//!   history. Otherwise the frame joins the background history, and a full history window
//!   recalibrates the noise floor.
//! - `Candidate`: frames are appended; once past the minimum size, a quiet trailing window
//!   or the hard cap completes the candidate and hands it to the workers. Candidate frames
//!   never enter the background history, so the floor is only ever computed from idle frames.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::audio::{AudioFormat, Frame, Recording};
use crate::backend::SpeechToText;
use crate::mic::Cancellation;
use crate::opts::ListenOpts;
use crate::signal::SignalLevel;
use crate::{Error, Result};

/// How a keyword wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// A worker heard the keyword.
    Detected,
    /// The cancellation flag was raised.
    Cancelled,
    /// The frame stream ended and no pending candidate contained the keyword.
    Exhausted,
}

/// Background-history and candidate bookkeeping, without any threading.
pub(crate) struct CandidateTracker {
    trigger_snr_db: f32,
    release_snr_db: f32,
    history_frames: usize,
    onset_frames: usize,
    min_candidate_frames: usize,
    max_candidate_frames: usize,
    release_window_frames: usize,

    history: VecDeque<Frame>,
    candidate: Option<Vec<Frame>>,
}

impl CandidateTracker {
    pub(crate) fn new(opts: &ListenOpts) -> Self {
        Self {
            trigger_snr_db: opts.trigger_snr_db,
            release_snr_db: opts.release_snr_db,
            history_frames: opts.history_frames.max(1),
            onset_frames: opts.onset_frames,
            min_candidate_frames: opts.min_candidate_frames,
            max_candidate_frames: opts.max_candidate_frames,
            release_window_frames: opts.release_window_frames.max(1),
            history: VecDeque::with_capacity(opts.history_frames.max(1)),
            candidate: None,
        }
    }

    pub(crate) fn is_buffering(&self) -> bool {
        self.candidate.is_some()
    }

    /// Consume one frame. Returns a completed candidate when this frame finishes one.
    pub(crate) fn push(&mut self, frame: Frame, level: &mut SignalLevel) -> Option<Vec<Frame>> {
        if let Some(buf) = &mut self.candidate {
            buf.push(frame);

            let mut complete = false;
            if buf.len() > self.min_candidate_frames {
                let tail = &buf[buf.len().saturating_sub(self.release_window_frames)..];
                let snr = level.score(tail);
                complete = snr <= self.release_snr_db || buf.len() >= self.max_candidate_frames;
                trace!(snr_db = snr, frames = buf.len(), complete, "candidate check");
            }

            if complete {
                return self.candidate.take();
            }
            return None;
        }

        let snr = level.score_frame(&frame);
        if level.is_calibrated() && snr >= self.trigger_snr_db {
            let skip = self.history.len().saturating_sub(self.onset_frames);
            let mut buf: Vec<Frame> = self.history.iter().skip(skip).cloned().collect();
            buf.push(frame);
            debug!(
                snr_db = snr,
                seeded = buf.len(),
                "loudness spike, buffering keyword candidate"
            );
            self.candidate = Some(buf);
            return None;
        }

        self.remember(frame);
        if self.history.len() >= self.history_frames {
            level.update_threshold(self.history.make_contiguous());
            trace!(threshold = level.threshold(), "noise floor updated");
        }
        None
    }

    /// Take whatever candidate is in progress (used when the frame stream ends).
    pub(crate) fn finish(&mut self) -> Option<Vec<Frame>> {
        self.candidate.take()
    }

    fn remember(&mut self, frame: Frame) {
        if self.history.len() == self.history_frames {
            self.history.pop_front();
        }
        self.history.push_back(frame);
    }
}

/// Shared state for one `wait_for_keyword` call.
///
/// Every job carries its own session, so a slow worker finishing after the wait returned
/// can't wake a later wait.
#[derive(Default)]
struct Session {
    woken: AtomicBool,
    pending: Mutex<usize>,
    settled: Condvar,
}

impl Session {
    fn is_woken(&self) -> bool {
        self.woken.load(Ordering::SeqCst)
    }

    fn wake(&self) {
        self.woken.store(true, Ordering::SeqCst);
        self.settled.notify_all();
    }

    fn job_started(&self) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn job_finished(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending = pending.saturating_sub(1);
        self.settled.notify_all();
    }

    /// Block until no job is outstanding, the keyword was heard, or `cancel` is raised.
    fn wait_settled(&self, cancel: &Cancellation) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        while *pending > 0 && !self.is_woken() && !cancel.is_cancelled() {
            pending = self
                .settled
                .wait_timeout(pending, Duration::from_millis(50))
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// Decrements the session's pending count even if the transcriber panics.
struct JobGuard<'a>(&'a Session);

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        self.0.job_finished();
    }
}

struct Job {
    recording: Recording,
    session: Arc<Session>,
}

/// Wake-word detector backed by a fixed pool of passive transcription workers.
///
/// Dropping the detector closes the queue and joins the workers.
pub struct KeywordDetector {
    keyword: Arc<str>,
    opts: ListenOpts,
    queue: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl KeywordDetector {
    /// Start `opts.worker_count()` workers sharing `stt`.
    pub fn new(
        keyword: &str,
        stt: Arc<dyn SpeechToText + Send + Sync>,
        opts: &ListenOpts,
    ) -> Result<Self> {
        let keyword: Arc<str> = Arc::from(keyword.trim().to_lowercase());
        if keyword.is_empty() {
            return Err(Error::config("keyword must not be empty"));
        }

        let (tx, rx) = mpsc::channel::<Job>();
        let rx = Arc::new(Mutex::new(rx));

        let count = opts.worker_count();
        let mut workers = Vec::with_capacity(count);
        for id in 0..count {
            let rx = Arc::clone(&rx);
            let stt = Arc::clone(&stt);
            let keyword = Arc::clone(&keyword);
            let handle = thread::Builder::new()
                .name(format!("jasper-keyword-{id}"))
                .spawn(move || run_worker(rx, stt, keyword))?;
            workers.push(handle);
        }

        debug!(workers = count, keyword = %keyword, "keyword detector started");

        Ok(Self {
            keyword,
            opts: opts.clone(),
            queue: Some(tx),
            workers,
        })
    }

    /// The normalized (lowercase) keyword.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Consume `frames` until the keyword is heard, `cancel` is raised, or the stream ends.
    ///
    /// `level` carries the noise floor across calls; it's recalibrated from background
    /// frames while no candidate is being buffered.
    pub fn wait_for_keyword<I>(
        &self,
        frames: I,
        level: &mut SignalLevel,
        format: AudioFormat,
        cancel: &Cancellation,
    ) -> Result<Wake>
    where
        I: IntoIterator<Item = io::Result<Frame>>,
    {
        let session = Arc::new(Session::default());
        let mut tracker = CandidateTracker::new(&self.opts);
        let mut read_errors = 0usize;

        info!(keyword = %self.keyword, "waiting for keyword");

        for item in frames {
            if cancel.is_cancelled() {
                debug!("keyword wait cancelled");
                return Ok(Wake::Cancelled);
            }
            if session.is_woken() {
                return Ok(Wake::Detected);
            }

            let frame = match item {
                Ok(frame) => {
                    read_errors = 0;
                    frame
                }
                Err(err) => {
                    read_errors += 1;
                    warn!(error = %err, consecutive = read_errors, "skipping unreadable frame");
                    if read_errors > self.opts.max_read_errors {
                        return Err(Error::device(format!(
                            "{read_errors} consecutive read errors, last: {err}"
                        )));
                    }
                    continue;
                }
            };

            if let Some(candidate) = tracker.push(frame, level) {
                self.submit(&session, Recording::new(format, candidate))?;
            }

            if session.is_woken() {
                info!(keyword = %self.keyword, "keyword detected");
                return Ok(Wake::Detected);
            }
        }

        // Input closed: give the tail a chance, then let outstanding jobs report.
        if let Some(candidate) = tracker.finish() {
            self.submit(&session, Recording::new(format, candidate))?;
        }
        session.wait_settled(cancel);

        if session.is_woken() {
            info!(keyword = %self.keyword, "keyword detected");
            Ok(Wake::Detected)
        } else if cancel.is_cancelled() {
            Ok(Wake::Cancelled)
        } else {
            debug!("frame stream ended without keyword");
            Ok(Wake::Exhausted)
        }
    }

    fn submit(&self, session: &Arc<Session>, recording: Recording) -> Result<()> {
        let queue = self
            .queue
            .as_ref()
            .ok_or_else(|| Error::msg("keyword workers have shut down"))?;

        debug!(frames = recording.len(), "queueing keyword candidate");
        session.job_started();

        let job = Job {
            recording,
            session: Arc::clone(session),
        };
        if queue.send(job).is_err() {
            session.job_finished();
            return Err(Error::msg("keyword worker queue disconnected"));
        }
        Ok(())
    }
}

impl Drop for KeywordDetector {
    fn drop(&mut self) {
        // Closing the sender makes every idle worker's `recv` fail.
        self.queue.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("keyword worker panicked");
            }
        }
    }
}

fn run_worker(
    rx: Arc<Mutex<Receiver<Job>>>,
    stt: Arc<dyn SpeechToText + Send + Sync>,
    keyword: Arc<str>,
) {
    loop {
        let job = {
            let rx = rx.lock().unwrap_or_else(PoisonError::into_inner);
            rx.recv()
        };
        let Ok(job) = job else {
            break;
        };

        let _guard = JobGuard(&job.session);
        if job.session.is_woken() {
            continue;
        }

        match stt.transcribe(&job.recording) {
            Ok(texts) => match texts.iter().find(|t| contains_keyword(t, &keyword)) {
                Some(text) => {
                    info!(transcript = %text, "keyword uttered");
                    job.session.wake();
                }
                None => debug!(?texts, "candidate did not contain keyword"),
            },
            Err(err) => {
                warn!(engine = stt.name(), error = %err, "passive transcription failed");
            }
        }
    }
}

/// Case-insensitive substring match against an already-lowercased keyword.
pub(crate) fn contains_keyword(transcript: &str, keyword_lower: &str) -> bool {
    transcript.to_lowercase().contains(keyword_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    const QUIET: i16 = 100;
    const LOUD: i16 = 1000;

    fn opts() -> ListenOpts {
        ListenOpts {
            keyword_workers: 2,
            ..ListenOpts::default()
        }
    }

    fn frame(value: i16) -> Frame {
        Frame::constant(32, value)
    }

    /// 16 quiet frames (calibrates the floor), `loud` loud frames, then `tail` quiet frames.
    fn utterance(loud: usize, tail: usize) -> Vec<io::Result<Frame>> {
        let mut frames = Vec::new();
        frames.extend((0..16).map(|_| Ok(frame(QUIET))));
        frames.extend((0..loud).map(|_| Ok(frame(LOUD))));
        frames.extend((0..tail).map(|_| Ok(frame(QUIET))));
        frames
    }

    struct ScriptedStt {
        replies: Mutex<VecDeque<std::result::Result<Vec<String>, String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedStt {
        fn new(replies: Vec<std::result::Result<Vec<&str>, &str>>) -> Arc<Self> {
            let replies = replies
                .into_iter()
                .map(|r| {
                    r.map(|texts| texts.into_iter().map(str::to_owned).collect())
                        .map_err(str::to_owned)
                })
                .collect();
            Arc::new(Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SpeechToText for ScriptedStt {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn transcribe(&self, _audio: &Recording) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .replies
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            match next {
                Some(Ok(texts)) => Ok(texts),
                Some(Err(msg)) => Err(Error::backend("scripted", msg)),
                None => Ok(Vec::new()),
            }
        }
    }

    #[test]
    fn tracker_does_not_trigger_before_calibration() {
        let mut tracker = CandidateTracker::new(&opts());
        let mut level = SignalLevel::new();

        for _ in 0..15 {
            assert!(tracker.push(frame(LOUD), &mut level).is_none());
            assert!(!tracker.is_buffering());
        }
        assert!(!level.is_calibrated());

        // The 16th frame fills the history and calibrates the floor.
        tracker.push(frame(QUIET), &mut level);
        assert!(level.is_calibrated());
    }

    #[test]
    fn tracker_seeds_candidate_with_onset_history() {
        let mut tracker = CandidateTracker::new(&opts());
        let mut level = SignalLevel::new();

        for _ in 0..16 {
            tracker.push(frame(QUIET), &mut level);
        }
        assert!((level.threshold() - QUIET as f32).abs() < 1e-3);

        tracker.push(frame(LOUD), &mut level);
        assert!(tracker.is_buffering());

        let candidate = tracker.finish().expect("candidate in progress");
        assert_eq!(candidate.len(), 11);
        assert_eq!(candidate[..10], vec![frame(QUIET); 10][..]);
        assert_eq!(candidate[10], frame(LOUD));
    }

    #[test]
    fn tracker_trigger_threshold_boundary() {
        let mut tracker = CandidateTracker::new(&ListenOpts {
            trigger_snr_db: 20.0,
            ..opts()
        });

        // 999 / 100 is just under 20 dB, 1001 / 100 just over.
        let mut level = SignalLevel::with_threshold(QUIET as f32);
        tracker.push(frame(999), &mut level);
        assert!(!tracker.is_buffering());

        let mut level = SignalLevel::with_threshold(QUIET as f32);
        tracker.push(frame(1001), &mut level);
        assert!(tracker.is_buffering());
    }

    #[test]
    fn tracker_releases_once_trailing_window_is_quiet() {
        let mut tracker = CandidateTracker::new(&opts());
        let mut level = SignalLevel::new();

        let mut completed = None;
        for item in utterance(5, 20) {
            let frame = item.expect("scripted frame");
            if let Some(candidate) = tracker.push(frame, &mut level) {
                completed = Some(candidate);
                break;
            }
        }

        // 10 onset + 5 loud + 10 quiet: the first length past 20 whose trailing 10 frames
        // are all at floor level.
        let candidate = completed.expect("candidate released");
        assert_eq!(candidate.len(), 25);
        assert!(!tracker.is_buffering());
    }

    #[test]
    fn tracker_hard_caps_continuous_noise() {
        let mut tracker = CandidateTracker::new(&opts());
        let mut level = SignalLevel::new();

        let mut completed = None;
        for item in utterance(200, 0) {
            if let Some(candidate) = tracker.push(item.expect("scripted frame"), &mut level) {
                completed = Some(candidate);
                break;
            }
        }

        assert_eq!(completed.expect("candidate capped").len(), 60);
    }

    #[test]
    fn floor_is_not_raised_by_candidate_frames() {
        let mut tracker = CandidateTracker::new(&opts());
        let mut level = SignalLevel::new();

        for _ in 0..16 {
            tracker.push(frame(QUIET), &mut level);
        }
        let completed = (0..100).find_map(|_| tracker.push(frame(LOUD), &mut level));
        assert_eq!(completed.map(|c| c.len()), Some(60));

        for _ in 0..5 {
            tracker.push(frame(QUIET), &mut level);
        }
        assert!((level.threshold() - QUIET as f32).abs() < 1e-3);

        // The same loudness as the first utterance triggers again right away.
        tracker.push(frame(LOUD), &mut level);
        assert!(tracker.is_buffering());
    }

    /// Blocks every transcription until the test opens the gate, then hears the keyword.
    struct GatedStt {
        gate: Mutex<Receiver<()>>,
        done: Sender<()>,
        calls: AtomicUsize,
    }

    impl SpeechToText for GatedStt {
        fn name(&self) -> &'static str {
            "gated"
        }

        fn transcribe(&self, _audio: &Recording) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let opened = self
                .gate
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .recv();
            if opened.is_err() {
                return Ok(Vec::new());
            }
            let _ = self.done.send(());
            Ok(vec!["jasper".to_owned()])
        }
    }

    #[test]
    fn late_result_from_a_cancelled_wait_does_not_wake_the_next_one() -> anyhow::Result<()> {
        let (gate_tx, gate_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let stt = Arc::new(GatedStt {
            gate: Mutex::new(gate_rx),
            done: done_tx,
            calls: AtomicUsize::new(0),
        });
        let detector = KeywordDetector::new(
            "jasper",
            stt.clone(),
            &ListenOpts {
                keyword_workers: 1,
                ..opts()
            },
        )?;
        // Dropped before the detector, so a failed assertion never parks the worker on the gate.
        let gate_tx = gate_tx;
        let mut level = SignalLevel::new();

        // First wait: the candidate is queued, then the wait is cancelled while the worker
        // is still blocked on it.
        let cancel = Cancellation::new();
        let remote = cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            remote.cancel();
        });
        let frames = utterance(5, 20)
            .into_iter()
            .chain(std::iter::repeat_with(|| Ok(frame(QUIET))));
        let wake = detector.wait_for_keyword(frames, &mut level, AudioFormat::default(), &cancel)?;
        canceller.join().expect("canceller thread");
        assert_eq!(wake, Wake::Cancelled);
        assert_eq!(stt.calls.load(Ordering::SeqCst), 1);

        // Second wait: the stale job hears the keyword before any frame is consumed.
        let mut released = false;
        let quiet = std::iter::from_fn(|| {
            if !released {
                released = true;
                gate_tx.send(()).expect("worker waiting on gate");
                done_rx.recv().expect("stale job finished");
                thread::sleep(Duration::from_millis(20));
            }
            Some(Ok(frame(QUIET)))
        })
        .take(40);

        let wake = detector.wait_for_keyword(
            quiet,
            &mut level,
            AudioFormat::default(),
            &Cancellation::new(),
        )?;
        assert_eq!(wake, Wake::Exhausted);
        assert_eq!(stt.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[test]
    fn detects_keyword_case_insensitively() -> anyhow::Result<()> {
        let stt = ScriptedStt::new(vec![Ok(vec!["hey Jasper"])]);
        let detector = KeywordDetector::new("JASPER", stt.clone(), &opts())?;
        let mut level = SignalLevel::new();

        let wake = detector.wait_for_keyword(
            utterance(5, 20),
            &mut level,
            AudioFormat::default(),
            &Cancellation::new(),
        )?;

        assert_eq!(wake, Wake::Detected);
        assert_eq!(stt.calls(), 1);
        Ok(())
    }

    #[test]
    fn other_words_exhaust_the_stream() -> anyhow::Result<()> {
        let stt = ScriptedStt::new(vec![Ok(vec!["hello there", "yellow pepper"])]);
        let detector = KeywordDetector::new("jasper", stt.clone(), &opts())?;
        let mut level = SignalLevel::new();

        let wake = detector.wait_for_keyword(
            utterance(5, 20),
            &mut level,
            AudioFormat::default(),
            &Cancellation::new(),
        )?;

        assert_eq!(wake, Wake::Exhausted);
        assert_eq!(stt.calls(), 1);
        Ok(())
    }

    #[test]
    fn transcription_failures_are_not_fatal() -> anyhow::Result<()> {
        let stt = ScriptedStt::new(vec![Err("decoder crashed"), Ok(vec!["JASPER"])]);
        let detector = KeywordDetector::new("jasper", stt.clone(), &opts())?;
        let mut level = SignalLevel::new();

        // Two separate utterances; the first candidate fails to transcribe.
        let mut frames = utterance(5, 20);
        frames.extend((0..5).map(|_| Ok(frame(LOUD))));
        frames.extend((0..30).map(|_| Ok(frame(QUIET))));

        let wake = detector.wait_for_keyword(
            frames,
            &mut level,
            AudioFormat::default(),
            &Cancellation::new(),
        )?;

        assert_eq!(wake, Wake::Detected);
        assert_eq!(stt.calls(), 2);
        Ok(())
    }

    #[test]
    fn detection_returns_without_draining_an_infinite_stream() -> anyhow::Result<()> {
        let stt = ScriptedStt::new(vec![Ok(vec!["jasper"])]);
        let detector = KeywordDetector::new("jasper", stt, &opts())?;
        let mut level = SignalLevel::new();

        let frames = utterance(5, 20)
            .into_iter()
            .chain(std::iter::repeat_with(|| Ok(frame(QUIET))));

        let wake = detector.wait_for_keyword(
            frames,
            &mut level,
            AudioFormat::default(),
            &Cancellation::new(),
        )?;
        assert_eq!(wake, Wake::Detected);
        Ok(())
    }

    #[test]
    fn cancellation_stops_an_infinite_stream() -> anyhow::Result<()> {
        let stt = ScriptedStt::new(vec![]);
        let detector = KeywordDetector::new("jasper", stt, &opts())?;
        let mut level = SignalLevel::new();
        let cancel = Cancellation::new();

        let remote = cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            remote.cancel();
        });

        let frames = std::iter::repeat_with(|| Ok(frame(QUIET)));
        let wake = detector.wait_for_keyword(frames, &mut level, AudioFormat::default(), &cancel)?;

        canceller.join().expect("canceller thread");
        assert_eq!(wake, Wake::Cancelled);
        Ok(())
    }

    #[test]
    fn isolated_read_errors_are_skipped() -> anyhow::Result<()> {
        let stt = ScriptedStt::new(vec![Ok(vec!["jasper"])]);
        let detector = KeywordDetector::new("jasper", stt, &opts())?;
        let mut level = SignalLevel::new();

        let mut frames = utterance(5, 20);
        frames.insert(3, Err(io::Error::other("buffer overrun")));
        frames.insert(20, Err(io::Error::other("buffer overrun")));

        let wake = detector.wait_for_keyword(
            frames,
            &mut level,
            AudioFormat::default(),
            &Cancellation::new(),
        )?;
        assert_eq!(wake, Wake::Detected);
        Ok(())
    }

    #[test]
    fn persistent_read_errors_are_a_device_failure() -> anyhow::Result<()> {
        let stt = ScriptedStt::new(vec![]);
        let detector = KeywordDetector::new(
            "jasper",
            stt,
            &ListenOpts {
                max_read_errors: 3,
                ..opts()
            },
        )?;
        let mut level = SignalLevel::new();

        let frames = std::iter::repeat_with(|| Err(io::Error::other("device unplugged")));
        let err = detector
            .wait_for_keyword(frames, &mut level, AudioFormat::default(), &Cancellation::new())
            .unwrap_err();

        assert!(matches!(err, Error::Device(_)));
        assert!(err.to_string().contains("device unplugged"));
        Ok(())
    }

    #[test]
    fn blank_keyword_is_rejected() {
        let stt = ScriptedStt::new(vec![]);
        assert!(KeywordDetector::new("   ", stt, &opts()).is_err());
    }
}
