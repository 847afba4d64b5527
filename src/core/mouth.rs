/// Mouth flap: picks mouth sprites on a jittered interval while talking.
use rand::Rng;

use crate::core::bucket::CooldownSampler;
use crate::core::config::MouthConfig;

/// Pool value meaning "mouth closed".
const CLOSED: i32 = -1;

#[derive(Debug, Clone)]
pub struct MouthFlap {
    min_duration: f64,
    max_duration: f64,
    next_move_time: f64,
    frames: CooldownSampler,
}

impl MouthFlap {
    pub fn new(config: &MouthConfig) -> Self {
        Self {
            min_duration: config.min_duration,
            max_duration: config.max_duration,
            next_move_time: 0.0,
            frames: CooldownSampler::with_range(
                config.cooldown,
                CLOSED,
                i32::try_from(config.sprite_count).unwrap_or(i32::MAX),
            ),
        }
    }

    pub fn next_move_time(&self) -> f64 {
        self.next_move_time
    }

    /// Advance to `now`. When a new frame is due, returns it: `Some(None)`
    /// closes the mouth, `Some(Some(i))` shows sprite `i`.
    pub fn update<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R) -> Option<Option<usize>> {
        if now < self.next_move_time {
            return None;
        }

        let frame = self.frames.take(rng);
        self.next_move_time = now + rng.gen_range(self.min_duration..=self.max_duration);

        Some(usize::try_from(frame).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn frames_change_every_pick() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut mouth = MouthFlap::new(&MouthConfig::default());
        let mut frames = Vec::new();
        let mut now = 0.0;
        while frames.len() < 100 {
            if let Some(frame) = mouth.update(now, &mut rng) {
                frames.push(frame);
            }
            now += 1.0 / 60.0;
        }

        for pair in frames.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert!(frames.contains(&None));
        for sprite in frames.iter().flatten() {
            assert!(*sprite < 3);
        }
    }

    #[test]
    fn interval_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(8);
        let config = MouthConfig::default();
        let mut mouth = MouthFlap::new(&config);
        let mut now = 0.0;
        for _ in 0..100 {
            assert!(mouth.update(now, &mut rng).is_some());
            let gap = mouth.next_move_time() - now;
            assert!(gap >= config.min_duration && gap <= config.max_duration);
            assert!(mouth.update(now + gap * 0.5, &mut rng).is_none());
            now = mouth.next_move_time();
        }
    }

    #[test]
    fn fixed_interval() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = MouthConfig {
            min_duration: 0.1,
            max_duration: 0.1,
            ..MouthConfig::default()
        };
        let mut mouth = MouthFlap::new(&config);
        mouth.update(2.0, &mut rng);
        assert!((mouth.next_move_time() - 2.1).abs() < 1e-12);
    }
}
