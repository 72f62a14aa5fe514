use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// 哈希前导零的十六进制位数
pub const DIFFICULTY: usize = 4;

const CHALLENGE_TTL: Duration = Duration::from_secs(300);

/// 评论提交前的工作量证明，挡住最廉价的灌水脚本
#[derive(Clone, Default)]
pub struct PowGuard {
    issued: Arc<Mutex<HashMap<String, SystemTime>>>,
}

impl PowGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate_challenge(&self) -> String {
        let secret = format!("{:x}", rand::random::<u128>());
        let now = SystemTime::now();
        let mut issued = self.issued.lock().unwrap();
        // 顺手清掉过期条目，map 不会无限增长
        issued.retain(|_, expiry| *expiry > now);
        issued.insert(secret.clone(), now + CHALLENGE_TTL);
        secret
    }

    /// 一次性校验：无论成败，密钥都被消费
    pub fn verify(&self, secret: &str, nonce: &str) -> bool {
        {
            let mut issued = self.issued.lock().unwrap();
            match issued.remove(secret) {
                Some(expiry) if SystemTime::now() <= expiry => {}
                _ => return false,
            }
        }

        let digest = hex::encode(Sha256::digest(format!("{}{}", secret, nonce)));
        digest.starts_with(&"0".repeat(DIFFICULTY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(secret: &str) -> String {
        let prefix = "0".repeat(DIFFICULTY);
        let mut nonce: u64 = 0;
        loop {
            let hash = hex::encode(Sha256::digest(format!("{}{}", secret, nonce)));
            if hash.starts_with(&prefix) {
                return nonce.to_string();
            }
            nonce += 1;
        }
    }

    #[test]
    fn challenge_round_trip() {
        let guard = PowGuard::new();

        let secret = guard.generate_challenge();
        assert!(!secret.is_empty());

        let nonce = solve(&secret);
        assert!(guard.verify(&secret, &nonce));

        // 密钥是一次性的，重放失败
        assert!(!guard.verify(&secret, &nonce));
    }

    #[test]
    fn wrong_nonce_consumes_the_secret() {
        let guard = PowGuard::new();
        let secret = guard.generate_challenge();

        assert!(!guard.verify(&secret, "not-a-solution"));
        // 失败的尝试也消费掉了密钥
        let nonce = solve(&secret);
        assert!(!guard.verify(&secret, &nonce));
    }

    #[test]
    fn unknown_secret_is_rejected() {
        let guard = PowGuard::new();
        assert!(!guard.verify("never-issued", "0"));
    }
}
