// DelayStage - 正規分布で揺らぐ固定遅延の作業関数

use crate::core::{Item, Processor, WorkOutcome};
use crate::services::config::{DelayConfig, NegativeDelayPolicy};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// 再抽選の上限。超えたら0に丸める
const MAX_RESAMPLES: usize = 16;

/// 遅延付きダミーステージ
///
/// 実効遅延 = base + N(0, stddev)。負になった場合の扱いは`NegativeDelayPolicy`で決める。
/// 遅延中はキャンセルを確認しない。
#[derive(Debug)]
pub struct DelayStage {
    base_secs: f64,
    stddev_secs: f64,
    policy: NegativeDelayPolicy,
    rng: Mutex<StdRng>,
}

impl DelayStage {
    /// 負の遅延は0に丸める
    pub fn new(base: Duration, stddev: Duration) -> Self {
        Self::from_config(
            &DelayConfig::default()
                .with_base(base)
                .with_stddev(stddev),
        )
    }

    pub fn from_config(config: &DelayConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        Self {
            base_secs: config.base().as_secs_f64(),
            stddev_secs: config.stddev().as_secs_f64(),
            policy: config.negative_delay,
            rng: Mutex::new(rng),
        }
    }

    pub fn policy(&self) -> NegativeDelayPolicy {
        self.policy
    }

    /// 次の1回分の遅延
    pub fn sample_delay(&self) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut draw = || rng.sample::<f64, _>(StandardNormal);
        resolve_delay(self.base_secs, self.stddev_secs, self.policy, &mut draw)
    }
}

/// 標準正規分布の値から実効遅延を決める
fn resolve_delay(
    base_secs: f64,
    stddev_secs: f64,
    policy: NegativeDelayPolicy,
    draw: &mut dyn FnMut() -> f64,
) -> Duration {
    let mut secs = base_secs + draw() * stddev_secs;

    match policy {
        NegativeDelayPolicy::Clamp => {}
        NegativeDelayPolicy::Reflect => secs = secs.abs(),
        NegativeDelayPolicy::Resample => {
            for _ in 0..MAX_RESAMPLES {
                if secs >= 0.0 {
                    break;
                }
                secs = base_secs + draw() * stddev_secs;
            }
        }
    }

    if secs <= 0.0 || !secs.is_finite() {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

#[async_trait]
impl Processor for DelayStage {
    async fn process(&self, item: Item) -> WorkOutcome {
        let delay = self.sample_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        WorkOutcome::Emit(item)
    }

    fn kind(&self) -> &'static str {
        "delay"
    }
}
