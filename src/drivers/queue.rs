use std::cell::Cell;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use crate::drivers::params::ControlCommand;
use crate::drivers::ScopeError;
use crate::types::Sample;

/// Unbounded sample handoff: the sampler pushes, the display loop drains.
pub fn sample_queue() -> (SampleProducer, SampleQueue) {
    let (tx, rx) = channel();
    let queue = SampleQueue {
        rx,
        connected: Cell::new(true),
    };
    (SampleProducer { tx }, queue)
}

pub struct SampleProducer {
    tx: Sender<Sample>,
}

impl SampleProducer {
    /// Never blocks. Fails only once the consumer is gone.
    pub fn push(&self, sample: Sample) -> Result<(), ScopeError> {
        self.tx.send(sample).map_err(|_| ScopeError::Disconnected)
    }
}

pub struct SampleQueue {
    rx: Receiver<Sample>,
    connected: Cell<bool>,
}

impl SampleQueue {
    /// Everything available right now, oldest first. An empty queue is just zero samples.
    pub fn drain(&self) -> Vec<Sample> {
        let mut samples = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(sample) => samples.push(sample),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.connected.set(false);
                    break;
                }
            }
        }
        samples
    }

    /// False once a drain has found the producer gone and the backlog empty.
    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }
}

/// One-way command channel from the UI thread to the sampler.
pub fn control_channel() -> (ControlSender, ControlReceiver) {
    let (tx, rx) = channel();
    (ControlSender { tx }, ControlReceiver { rx })
}

#[derive(Clone)]
pub struct ControlSender {
    tx: Sender<ControlCommand>,
}

impl ControlSender {
    /// Fire and forget; the sampler never acknowledges.
    pub fn send(&self, cmd: ControlCommand) {
        log::debug!("control: sending {cmd:?}");
        if self.tx.send(cmd).is_err() {
            log::warn!("control: sampler is gone, dropped {cmd:?}");
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Poll {
    Empty,
    Command(ControlCommand),
    Disconnected,
}

pub struct ControlReceiver {
    rx: Receiver<ControlCommand>,
}

impl ControlReceiver {
    pub fn poll(&self) -> Poll {
        match self.rx.try_recv() {
            Ok(cmd) => Poll::Command(cmd),
            Err(TryRecvError::Empty) => Poll::Empty,
            Err(TryRecvError::Disconnected) => Poll::Disconnected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_push_order_and_empties() {
        let (producer, queue) = sample_queue();
        for i in 0..100 {
            producer.push(Sample(i as f64, 0.0, 0.0)).unwrap();
        }
        let drained = queue.drain();
        assert_eq!(drained.len(), 100);
        assert!(drained.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn drain_after_producer_exit_keeps_backlog() {
        let (producer, queue) = sample_queue();
        producer.push(Sample(1.0, 2.0, 3.0)).unwrap();
        drop(producer);
        assert!(queue.is_connected());
        assert_eq!(queue.drain(), vec![Sample(1.0, 2.0, 3.0)]);
        assert!(!queue.is_connected());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn push_fails_without_consumer() {
        let (producer, queue) = sample_queue();
        drop(queue);
        assert!(matches!(
            producer.push(Sample::ZERO),
            Err(ScopeError::Disconnected)
        ));
    }

    #[test]
    fn control_poll_reports_each_state() {
        let (tx, rx) = control_channel();
        assert_eq!(rx.poll(), Poll::Empty);
        tx.send(ControlCommand::Rate(3));
        tx.send(ControlCommand::Mode(1));
        assert_eq!(rx.poll(), Poll::Command(ControlCommand::Rate(3)));
        assert_eq!(rx.poll(), Poll::Command(ControlCommand::Mode(1)));
        drop(tx);
        assert_eq!(rx.poll(), Poll::Disconnected);
    }
}
