//! 대체 값 선택기.
//!
//! 대체 문구 풀에서 하나를 고르는 난수 원천을 주입 가능하게 둡니다.
//! 운영에서는 엔트로피로 시드한 [`RandomPicker`], 테스트에서는 고정 시드나
//! [`FixedPicker`]를 사용합니다.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// `0..len` 범위의 인덱스를 고르는 선택기.
pub trait FallbackPicker: Send + Sync {
    /// `len`은 1 이상이어야 합니다. 0이면 0을 반환합니다.
    fn pick_index(&self, len: usize) -> usize;
}

/// 슬라이스에서 하나를 고릅니다. 빈 슬라이스면 `None`.
pub fn pick<'a, T>(picker: &dyn FallbackPicker, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(picker.pick_index(items.len()).min(items.len() - 1))
}

/// 균등 분포 난수 선택기.
pub struct RandomPicker {
    rng: Mutex<StdRng>,
}

impl RandomPicker {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// 결정적 선택기 (테스트용).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl FallbackPicker for RandomPicker {
    fn pick_index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..len)
    }
}

/// 항상 같은 인덱스를 고르는 선택기. 범위를 넘으면 마지막 원소.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker(pub usize);

impl FallbackPicker for FixedPicker {
    fn pick_index(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_picker_is_deterministic() {
        let a = RandomPicker::seeded(42);
        let b = RandomPicker::seeded(42);
        let seq_a: Vec<usize> = (0..16).map(|_| a.pick_index(3)).collect();
        let seq_b: Vec<usize> = (0..16).map(|_| b.pick_index(3)).collect();
        assert_eq!(seq_a, seq_b);
        assert!(seq_a.iter().all(|i| *i < 3));
    }

    #[test]
    fn test_random_picker_covers_pool() {
        let picker = RandomPicker::seeded(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[picker.pick_index(3)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_fixed_picker_clamps() {
        assert_eq!(FixedPicker(1).pick_index(3), 1);
        assert_eq!(FixedPicker(9).pick_index(3), 2);
        assert_eq!(FixedPicker(9).pick_index(0), 0);
    }

    #[test]
    fn test_pick_helper() {
        let pool = ["HODL!", "To the moon!", "Diamond hands!"];
        assert_eq!(pick(&FixedPicker(2), &pool), Some(&"Diamond hands!"));
        assert_eq!(pick::<&str>(&FixedPicker(0), &[]), None);
    }
}
