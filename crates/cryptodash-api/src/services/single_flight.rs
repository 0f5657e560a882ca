//! 키별 단일 실행 잠금.
//!
//! 같은 캐시 키에 대한 재생성(조회 → 검증 → 외부 호출 → 저장)을 한 번에
//! 하나만 진행시킵니다. 뒤에 도착한 요청은 잠금을 얻은 뒤 캐시를 다시 읽어
//! 앞선 요청이 저장한 결과를 사용합니다.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 키별 비동기 잠금 맵.
pub struct KeyedLocks<K> {
    locks: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 키의 잠금을 획득합니다. 가드가 drop되면 해제됩니다.
    pub async fn lock(&self, key: &K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // 아무도 쥐고 있지 않은 항목 정리 (지난 날짜 키 누적 방지)
            locks.retain(|k, l| k == key || Arc::strong_count(l) > 1);
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// 현재 추적 중인 키 수.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
