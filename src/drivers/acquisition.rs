use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::drivers::params::{AcquisitionSettings, ControlCommand};
use crate::drivers::queue::{
    control_channel, sample_queue, ControlReceiver, ControlSender, Poll, SampleProducer,
    SampleQueue,
};
use crate::drivers::source::{SampleSource, SourceKind, SyntheticSource};
use crate::drivers::ScopeError;

/// Why the sampler loop returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerExit {
    /// Run flag cleared by the display loop.
    Stopped,
    Shutdown,
    /// A command whose index is outside its table.
    Malformed(ControlCommand),
    /// The display side dropped one of the channels.
    Disconnected,
}

#[derive(Clone, Copy, Debug)]
pub struct SamplerReport {
    pub exit: SamplerExit,
    pub produced: u64,
    pub kind: SourceKind,
}

pub type BoxedSource = Box<dyn SampleSource + Send>;

impl SamplerReport {
    fn new(exit: SamplerExit, produced: u64, source: &BoxedSource) -> Self {
        Self {
            exit,
            produced,
            kind: source.kind(),
        }
    }
}

fn fall_back(settings: AcquisitionSettings, err: &ScopeError) -> BoxedSource {
    log::warn!("sampler: accelerometer failed ({err}), switching to synthetic signal");
    Box::new(SyntheticSource::new(settings))
}

/// The sampler body: one sample per tick, at most one command per tick.
pub fn run_sampler(
    mut source: BoxedSource,
    samples: SampleProducer,
    control: ControlReceiver,
    run: &AtomicBool,
) -> SamplerReport {
    let mut produced = 0;
    while run.load(Ordering::Acquire) {
        let sample = match source.next_sample() {
            Ok(sample) => sample,
            Err(err) if source.kind() == SourceKind::Hardware => {
                source = fall_back(source.settings(), &err);
                continue;
            }
            Err(err) => {
                log::error!("sampler: generator failed: {err}");
                return SamplerReport::new(SamplerExit::Stopped, produced, &source);
            }
        };
        if samples.push(sample).is_err() {
            return SamplerReport::new(SamplerExit::Disconnected, produced, &source);
        }
        produced += 1;

        let cmd = match control.poll() {
            Poll::Empty => {
                thread::sleep(source.idle_delay());
                continue;
            }
            Poll::Disconnected => {
                return SamplerReport::new(SamplerExit::Disconnected, produced, &source)
            }
            Poll::Command(cmd) => cmd,
        };
        match source.settings().with_command(cmd) {
            Ok(Some(next)) => {
                log::debug!("sampler: applying {cmd:?}");
                if let Err(err) = source.configure(next) {
                    source = fall_back(next, &err);
                }
            }
            Ok(None) => return SamplerReport::new(SamplerExit::Shutdown, produced, &source),
            Err(err) => {
                log::error!("sampler: malformed command {cmd:?}: {err}");
                return SamplerReport::new(SamplerExit::Malformed(cmd), produced, &source);
            }
        }
    }
    SamplerReport::new(SamplerExit::Stopped, produced, &source)
}

/// Handle to the sampler thread and the shared run flag.
pub struct Acquisition {
    run: Arc<AtomicBool>,
    thread: Option<JoinHandle<SamplerReport>>,
}

impl Acquisition {
    /// Start the sampler. `open` picks the source on the sampler thread so a slow
    /// device check never holds up the first frame.
    pub fn spawn<F>(open: F) -> Result<(Self, SampleQueue, ControlSender), ScopeError>
    where
        F: FnOnce() -> BoxedSource + Send + 'static,
    {
        let (producer, queue) = sample_queue();
        let (control_tx, control_rx) = control_channel();
        let run = Arc::new(AtomicBool::new(true));
        let thread_run = run.clone();
        let thread = thread::Builder::new()
            .name("sampler".into())
            .spawn(move || {
                let source = open();
                log::info!("sampler: started ({:?})", source.kind());
                let report = run_sampler(source, producer, control_rx, &thread_run);
                log::info!(
                    "sampler: {:?} after {} samples ({:?})",
                    report.exit,
                    report.produced,
                    report.kind
                );
                report
            })?;
        let acquisition = Self {
            run,
            thread: Some(thread),
        };
        Ok((acquisition, queue, control_tx))
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.run.load(Ordering::Acquire)
    }

    /// Clear the run flag. The sampler leaves its loop at the next tick.
    pub fn stop(&self) {
        self.run.store(false, Ordering::Release);
    }

    /// Clear the run flag and wait for the sampler. Safe to call more than once.
    pub fn shutdown(&mut self) -> Option<SamplerReport> {
        self.stop();
        let thread = self.thread.take()?;
        match thread.join() {
            Ok(report) => Some(report),
            Err(_) => {
                log::error!("sampler thread panicked");
                None
            }
        }
    }
}

impl Drop for Acquisition {
    fn drop(&mut self) {
        self.shutdown();
    }
}
