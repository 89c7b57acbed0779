/// Coin grant rule applied to a finished interview.
///
/// Coins are `round(technical_accuracy * coins_per_accuracy)` when the
/// authenticity score is at least `min_authenticity`, otherwise zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardPolicy {
    pub min_authenticity: u32,
    pub coins_per_accuracy: f64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            min_authenticity: 60,
            coins_per_accuracy: 100.0,
        }
    }
}

impl RewardPolicy {
    pub fn coins(&self, authenticity_score: u32, technical_accuracy: f64) -> u64 {
        if authenticity_score < self.min_authenticity {
            return 0;
        }
        let coins = (technical_accuracy.clamp(0.0, 1.0) * self.coins_per_accuracy).round();
        if coins.is_finite() && coins > 0.0 {
            coins as u64
        } else {
            0
        }
    }
}

/// Default reward: `technical_accuracy * 100` coins, only when the
/// authenticity score is 60 or more.
pub fn decide_reward(authenticity_score: u32, technical_accuracy: f64) -> u64 {
    RewardPolicy::default().coins(authenticity_score, technical_accuracy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_requires_authenticity() {
        assert_eq!(decide_reward(59, 1.0), 0);
        assert_eq!(decide_reward(60, 0.75), 75);
        assert_eq!(decide_reward(100, 0.0), 0);
    }

    #[test]
    fn test_reward_rounds() {
        assert_eq!(decide_reward(90, 0.666), 67);
    }

    #[test]
    fn test_custom_policy() {
        let policy = RewardPolicy {
            min_authenticity: 80,
            coins_per_accuracy: 10.0,
        };
        assert_eq!(policy.coins(79, 1.0), 0);
        assert_eq!(policy.coins(80, 0.5), 5);
    }

    #[test]
    fn test_out_of_range_accuracy_is_clamped() {
        assert_eq!(decide_reward(90, 1.5), 100);
        assert_eq!(decide_reward(90, -0.2), 0);
        assert_eq!(decide_reward(90, f64::NAN), 0);
    }
}
