//! Lane-direction input from the external gesture collaborator
//!
//! The classifier runs on its own cadence (a camera pipeline in the real
//! product) and pushes values into a channel. The frame loop never blocks on
//! it: `LatestSignal` drains whatever has arrived and keeps the most recent
//! value, reusing the previous one whenever nothing new is ready.

use crossbeam_channel::{Receiver, Sender, TrySendError};

/// Queue depth between producer and consumer. The consumer drains the whole
/// queue every frame, so this only needs to absorb one frame of burst.
const SIGNAL_QUEUE_DEPTH: usize = 16;

/// Direction signal produced by the hand classifier.
///
/// `Both` is deliberately treated like `None`: an ambiguous signal causes no
/// lateral movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaneSignal {
    Left,
    Right,
    #[default]
    None,
    Both,
}

impl LaneSignal {
    /// Lateral direction in lane units per second of steering: -1 toward
    /// lane zero, +1 away from it, 0 to hold the lane.
    pub fn lateral_dir(self) -> f32 {
        match self {
            LaneSignal::Left => -1.0,
            LaneSignal::Right => 1.0,
            LaneSignal::None | LaneSignal::Both => 0.0,
        }
    }
}

/// Producer half handed to the gesture collaborator.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: Sender<LaneSignal>,
}

impl SignalSender {
    /// Push a freshly classified signal without blocking. A full queue drops
    /// the value; the consumer only ever wants the latest one anyway.
    pub fn send(&self, signal: LaneSignal) {
        match self.tx.try_send(signal) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("lane signal consumer is gone");
            }
        }
    }
}

/// Latest-value cache owned by the frame loop controller.
#[derive(Debug)]
pub struct LatestSignal {
    rx: Receiver<LaneSignal>,
    current: LaneSignal,
}

impl LatestSignal {
    /// Create a connected producer/cache pair.
    pub fn channel() -> (SignalSender, LatestSignal) {
        let (tx, rx) = crossbeam_channel::bounded(SIGNAL_QUEUE_DEPTH);
        (
            SignalSender { tx },
            LatestSignal {
                rx,
                current: LaneSignal::None,
            },
        )
    }

    /// Non-blocking poll: drain the queue and keep the newest value. Reuses
    /// the previous value when nothing new arrived, including after the
    /// producer disconnects.
    pub fn poll(&mut self) -> LaneSignal {
        if let Some(latest) = self.rx.try_iter().last() {
            self.current = latest;
        }
        self.current
    }

    /// Last polled value, without consuming anything new.
    pub fn current(&self) -> LaneSignal {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_keeps_only_the_newest_value() {
        let (tx, mut cache) = LatestSignal::channel();
        tx.send(LaneSignal::Left);
        tx.send(LaneSignal::Right);
        tx.send(LaneSignal::None);
        tx.send(LaneSignal::Left);

        assert_eq!(cache.poll(), LaneSignal::Left);
    }

    #[test]
    fn test_poll_reuses_previous_value_when_queue_is_empty() {
        let (tx, mut cache) = LatestSignal::channel();
        assert_eq!(cache.poll(), LaneSignal::None);

        tx.send(LaneSignal::Right);
        assert_eq!(cache.poll(), LaneSignal::Right);
        // Nothing new arrived; the cache holds.
        assert_eq!(cache.poll(), LaneSignal::Right);
        assert_eq!(cache.current(), LaneSignal::Right);
    }

    #[test]
    fn test_poll_survives_producer_disconnect() {
        let (tx, mut cache) = LatestSignal::channel();
        tx.send(LaneSignal::Left);
        drop(tx);

        assert_eq!(cache.poll(), LaneSignal::Left);
        assert_eq!(cache.poll(), LaneSignal::Left);
    }

    #[test]
    fn test_producer_thread_feeds_the_cache() {
        let (tx, mut cache) = LatestSignal::channel();
        let producer = std::thread::spawn(move || {
            for _ in 0..8 {
                tx.send(LaneSignal::Right);
            }
        });
        producer.join().unwrap();

        assert_eq!(cache.poll(), LaneSignal::Right);
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let (tx, mut cache) = LatestSignal::channel();
        for _ in 0..SIGNAL_QUEUE_DEPTH + 8 {
            tx.send(LaneSignal::Left);
        }
        assert_eq!(cache.poll(), LaneSignal::Left);
    }

    #[test]
    fn test_ambiguous_signals_do_not_steer() {
        assert_eq!(LaneSignal::Both.lateral_dir(), 0.0);
        assert_eq!(LaneSignal::None.lateral_dir(), 0.0);
        assert_eq!(LaneSignal::Left.lateral_dir(), -1.0);
        assert_eq!(LaneSignal::Right.lateral_dir(), 1.0);
    }
}
