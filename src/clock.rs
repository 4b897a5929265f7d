use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub const TICK: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct Clock {
    now: watch::Receiver<DateTime<Local>>,
}

impl Clock {
    pub fn spawn(tick: Duration) -> (Self, JoinHandle<()>) {
        let (tx, rx) = watch::channel(Local::now());
        let handle = tokio::spawn(async move {
            let mut ticker = interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(Local::now()).is_err() {
                    break;
                }
            }
        });
        (Self { now: rx }, handle)
    }

    pub fn now(&self) -> DateTime<Local> {
        *self.now.borrow()
    }
}

pub fn time_label(at: DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}
