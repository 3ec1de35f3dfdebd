//! 轮询退避策略

use std::time::Duration;

/// 指数退避参数（秒）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub initial: f64,
    pub factor: f64,
    pub max_interval: f64,
    pub max_wait: f64,
}

impl Backoff {
    pub fn new(initial: f64, factor: f64, max_interval: f64, max_wait: f64) -> Self {
        Self {
            initial,
            factor,
            max_interval,
            max_wait,
        }
    }

    pub fn start(&self) -> BackoffTimer {
        BackoffTimer {
            policy: *self,
            interval: self.initial.min(self.max_interval),
            waited: 0.0,
            halted: false,
        }
    }

    /// 完整的等待序列，直到累计等待达到上限
    #[cfg(test)]
    pub fn intervals(&self) -> impl Iterator<Item = Duration> {
        let mut timer = self.start();
        std::iter::from_fn(move || {
            if timer.exhausted() {
                None
            } else {
                Some(timer.next_delay())
            }
        })
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(1.0, 1.8, 8.0, 60.0)
    }
}

/// 一次轮询过程中的退避状态
#[derive(Debug, Clone)]
pub struct BackoffTimer {
    policy: Backoff,
    interval: f64,
    waited: f64,
    halted: bool,
}

impl BackoffTimer {
    /// 累计等待是否已达到上限，上限不是有效数字时视为已达到
    pub fn exhausted(&self) -> bool {
        self.halted || self.policy.max_wait.is_nan() || self.waited >= self.policy.max_wait
    }

    /// 取出下一次等待时长，并推进累计等待
    ///
    /// 间隔不是有限正数时直接耗尽计时器并返回零时长
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.interval;
        match Duration::try_from_secs_f64(delay) {
            Ok(duration) if delay > 0.0 => {
                self.waited += delay;
                self.interval = (self.interval * self.policy.factor).min(self.policy.max_interval);
                duration
            }
            _ => {
                self.halted = true;
                Duration::ZERO
            }
        }
    }

    pub fn waited(&self) -> Duration {
        Duration::try_from_secs_f64(self.waited).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(d: Duration) -> f64 {
        d.as_secs_f64()
    }

    #[test]
    fn test_first_intervals() {
        let mut timer = Backoff::default().start();
        let expected = [1.0, 1.8, 3.24, 5.832, 8.0, 8.0];
        for want in expected {
            let got = secs(timer.next_delay());
            assert!((got - want).abs() < 1e-9, "got {} want {}", got, want);
        }
    }

    #[test]
    fn test_schedule_stops_at_max_wait() {
        let intervals: Vec<Duration> = Backoff::default().intervals().collect();
        let total: f64 = intervals.iter().map(|d| secs(*d)).sum();

        assert_eq!(intervals.len(), 11);
        assert!(total >= 60.0);
        // 最后一次等待之前还没到上限
        assert!(total - secs(*intervals.last().unwrap()) < 60.0);
        assert!(intervals.iter().all(|d| secs(*d) <= 8.0 + 1e-9));
    }

    #[test]
    fn test_exhausted_tracks_waited() {
        let mut timer = Backoff::new(1.0, 2.0, 4.0, 3.0).start();
        assert!(!timer.exhausted());
        timer.next_delay();
        assert!(!timer.exhausted());
        timer.next_delay();
        assert!(timer.exhausted());
        assert_eq!(timer.waited(), Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_interval_exhausts_instead_of_panicking() {
        let mut timer = Backoff::new(-1.0, 1.8, -0.5, 60.0).start();
        assert_eq!(timer.next_delay(), Duration::ZERO);
        assert!(timer.exhausted());
        assert_eq!(timer.waited(), Duration::ZERO);

        let mut timer = Backoff::new(f64::NAN, 1.8, 8.0, 60.0).start();
        assert_eq!(timer.next_delay(), Duration::ZERO);
        assert!(timer.exhausted());

        let timer = Backoff::new(1.0, 1.8, 8.0, f64::NAN).start();
        assert!(timer.exhausted());
    }
}
