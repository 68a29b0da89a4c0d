//! Tokio-backed periodic timer for the room drop loop
//!
//! Each scheduled timer is a spawned task that pushes `Tick(handle)` into the
//! room's own event queue, so ticks are ordered with player messages. The first
//! tick fires one full period after scheduling.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::core::{RoomEvent, Timer, TimerHandle};
use crate::room_task::RoomInput;

pub struct TokioTimer {
    tx: mpsc::Sender<RoomInput>,
    next_id: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioTimer {
    pub fn new(tx: mpsc::Sender<RoomInput>) -> Self {
        Self {
            tx,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    #[cfg(test)]
    fn active(&self) -> usize {
        self.tasks.len()
    }
}

impl Timer for TokioTimer {
    fn schedule_periodic(&mut self, period: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(RoomInput::Event(RoomEvent::Tick(handle))).await.is_err() {
                    break;
                }
            }
        });

        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_after_each_period() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timer = TokioTimer::new(tx);
        let handle = timer.schedule_periodic(Duration::from_millis(100));

        let start = Instant::now();
        for _ in 0..3 {
            match rx.recv().await {
                Some(RoomInput::Event(RoomEvent::Tick(h))) => assert_eq!(h, handle),
                _ => panic!("expected a tick"),
            }
        }
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut timer = TokioTimer::new(tx);
        let first = timer.schedule_periodic(Duration::from_millis(100));
        timer.cancel(first);
        let second = timer.schedule_periodic(Duration::from_millis(50));
        assert_ne!(first, second);
        assert_eq!(timer.active(), 1);

        time::sleep(Duration::from_millis(220)).await;
        let mut ticks = Vec::new();
        while let Ok(RoomInput::Event(RoomEvent::Tick(h))) = rx.try_recv() {
            ticks.push(h);
        }
        assert_eq!(ticks, vec![second, second, second, second]);
    }
}
