use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: f64,
    pub burst_allowance: u32,
}

impl RateLimitConfig {
    /// Limiter settings for the LLM provider. Every analysis is submitted at
    /// once; this is what actually spaces the calls out.
    pub fn from_requests_per_second(requests_per_second: f64) -> Self {
        Self {
            requests_per_second,
            burst_allowance: 2,
        }
    }
}

#[derive(Debug)]
pub struct TokenBucket {
    tokens: Arc<Mutex<f64>>,
    capacity: f64,
    refill_rate: f64, // tokens per second
    last_refill: Arc<Mutex<Instant>>,
}

impl TokenBucket {
    pub fn new(config: &RateLimitConfig) -> Self {
        let capacity = config.burst_allowance as f64;

        Self {
            tokens: Arc::new(Mutex::new(capacity)),
            capacity,
            refill_rate: config.requests_per_second,
            last_refill: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub async fn acquire(&self, tokens_needed: f64) -> Result<(), Duration> {
        let now = Instant::now();

        // Refill tokens based on elapsed time
        {
            let mut tokens = self.tokens.lock().await;
            let mut last_refill = self.last_refill.lock().await;

            let elapsed = now.duration_since(*last_refill);
            let tokens_to_add = elapsed.as_secs_f64() * self.refill_rate;

            *tokens = (*tokens + tokens_to_add).min(self.capacity);
            *last_refill = now;
        }

        let mut tokens = self.tokens.lock().await;
        if *tokens >= tokens_needed {
            *tokens -= tokens_needed;
            Ok(())
        } else {
            // Wait time until enough tokens have refilled
            let tokens_short = tokens_needed - *tokens;
            let wait_time = Duration::from_secs_f64(tokens_short / self.refill_rate);
            Err(wait_time)
        }
    }

    pub async fn get_available_tokens(&self) -> f64 {
        let now = Instant::now();
        let mut tokens = self.tokens.lock().await;
        let mut last_refill = self.last_refill.lock().await;

        let elapsed = now.duration_since(*last_refill);
        let tokens_to_add = elapsed.as_secs_f64() * self.refill_rate;

        *tokens = (*tokens + tokens_to_add).min(self.capacity);
        *last_refill = now;

        *tokens
    }
}

/// Throttles LLM dispatch: a semaphore bounds in-flight acquisitions and a
/// token bucket spaces them at the configured rate. Callers hold the permit
/// for the duration of one LLM call.
#[derive(Debug)]
pub struct RateLimiter {
    token_bucket: TokenBucket,
    semaphore: Arc<Semaphore>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.burst_allowance as usize));
        let token_bucket = TokenBucket::new(&config);

        Self {
            token_bucket,
            semaphore,
        }
    }

    pub async fn acquire_permit(&self) -> RateLimitPermit {
        let start_time = Instant::now();
        let _permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("Semaphore should not be closed");

        loop {
            match self.token_bucket.acquire(1.0).await {
                Ok(()) => break,
                Err(wait_time) => {
                    tracing::debug!("Rate limit reached, waiting {:?}", wait_time);
                    sleep(wait_time).await;
                }
            }
        }

        let queue_wait_time = start_time.elapsed();
        RateLimitPermit {
            _permit,
            queue_wait_time,
        }
    }

    pub async fn get_available_tokens(&self) -> f64 {
        self.token_bucket.get_available_tokens().await
    }
}

#[derive(Debug)]
pub struct RateLimitPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
    pub queue_wait_time: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Duration};

    #[tokio::test]
    async fn test_token_bucket_basic() {
        let config = RateLimitConfig {
            requests_per_second: 1.0,
            burst_allowance: 5,
        };

        let bucket = TokenBucket::new(&config);

        // Should be able to acquire up to burst allowance
        for _ in 0..5 {
            assert!(bucket.acquire(1.0).await.is_ok());
        }

        // Next acquisition should fail
        assert!(bucket.acquire(1.0).await.is_err());
    }

    #[tokio::test]
    async fn test_token_bucket_refill() {
        let config = RateLimitConfig {
            requests_per_second: 1.0, // 1 token per second
            burst_allowance: 2,
        };

        let bucket = TokenBucket::new(&config);

        // Use all tokens
        assert!(bucket.acquire(2.0).await.is_ok());
        assert!(bucket.acquire(1.0).await.is_err());

        // Wait for refill
        sleep(Duration::from_millis(1100)).await;

        // Should be able to acquire one token now
        assert!(bucket.acquire(1.0).await.is_ok());
    }

    #[tokio::test]
    async fn test_rate_limiter() {
        let config = RateLimitConfig::from_requests_per_second(100.0);
        let limiter = RateLimiter::new(config);

        let _permit1 = limiter.acquire_permit().await;
        let _permit2 = limiter.acquire_permit().await;

        let available = limiter.get_available_tokens().await;
        assert!(available <= 2.0);
    }

    #[tokio::test]
    async fn test_permit_wait_time_tracking() {
        let config = RateLimitConfig::from_requests_per_second(100.0);
        let limiter = RateLimiter::new(config);

        let permit = limiter.acquire_permit().await;

        assert!(permit.queue_wait_time >= Duration::from_secs(0));
    }
}
