//! Simulated machine telemetry.
//!
//! One owner task regenerates the readings on a fixed interval and publishes
//! each complete triple through a `watch` channel, so handlers always see a
//! consistent snapshot.

use crate::domain::model::SensorReading;
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 100.0..=150.0;
pub const PRESSURE_RANGE: RangeInclusive<f64> = 150.0..=300.0;
pub const STRESS_RANGE: RangeInclusive<f64> = 300.0..=400.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl SensorReading {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            temperature: round2(rng.gen_range(TEMPERATURE_RANGE)),
            pressure: round2(rng.gen_range(PRESSURE_RANGE)),
            stress: round2(rng.gen_range(STRESS_RANGE)),
        }
    }
}

/// Read side of the simulator. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SensorFeed {
    rx: watch::Receiver<SensorReading>,
}

impl SensorFeed {
    /// Publish a first reading immediately, then start the refresh loop.
    pub fn spawn(interval: Duration) -> (Self, JoinHandle<()>) {
        let initial = SensorReading::sample(&mut rand::thread_rng());
        let (tx, rx) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let reading = SensorReading::sample(&mut rand::thread_rng());
                tracing::trace!(?reading, "sensor values refreshed");
                if tx.send(reading).is_err() {
                    tracing::debug!("no sensor readers left, stopping simulator");
                    break;
                }
            }
        });

        (Self { rx }, handle)
    }

    pub fn latest(&self) -> SensorReading {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SensorReading> {
        self.rx.clone()
    }
}
