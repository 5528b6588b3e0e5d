//! One-shot hand-off of a success notice across a redirect.
//!
//! A mutating page answers with a redirect and a cookie holding a random
//! token; the next list render redeems the token exactly once and expires the
//! cookie.

use axum::http::{HeaderMap, HeaderValue, header};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const FLASH_COOKIE: &str = "users_notice";

/// Pending notices beyond this count push out the oldest ones.
const MAX_PENDING: usize = 256;

#[derive(Clone, Default)]
pub struct FlashStore {
    pending: Arc<Mutex<VecDeque<(Uuid, String)>>>,
}

impl FlashStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, message: String) -> Uuid {
        let token = Uuid::new_v4();
        let mut pending = self.pending.lock().await;
        if pending.len() >= MAX_PENDING {
            pending.pop_front();
        }
        pending.push_back((token, message));
        token
    }

    pub async fn take(&self, token: Uuid) -> Option<String> {
        let mut pending = self.pending.lock().await;
        let index = pending.iter().position(|(t, _)| *t == token)?;
        pending.remove(index).map(|(_, message)| message)
    }

    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }
}

/// Finds the flash token in the request's `Cookie` headers.
pub fn token_from(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .and_then(|(_, token)| Uuid::parse_str(token).ok())
}

pub fn set_cookie(token: Uuid) -> HeaderValue {
    // A hyphenated UUID is always a valid header value.
    HeaderValue::from_str(&format!(
        "{FLASH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .unwrap_or_else(|_| clear_cookie())
}

pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("users_notice=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notice_is_redeemed_once() {
        let flash = FlashStore::new();
        let token = flash.put("User updated successfully!".to_string()).await;

        assert_eq!(flash.take(token).await.as_deref(), Some("User updated successfully!"));
        assert_eq!(flash.take(token).await, None);
        assert_eq!(flash.take(Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn oldest_notice_is_evicted() {
        let flash = FlashStore::new();
        let first = flash.put("first".to_string()).await;
        for n in 0..MAX_PENDING {
            flash.put(format!("later {n}")).await;
        }
        assert_eq!(flash.len().await, MAX_PENDING);
        assert_eq!(flash.take(first).await, None);
    }

    #[test]
    fn token_from_cookie_header() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {FLASH_COOKIE}={token}")).unwrap(),
        );
        assert_eq!(token_from(&headers), Some(token));

        let mut garbage = HeaderMap::new();
        garbage.insert(header::COOKIE, HeaderValue::from_static("users_notice=nope"));
        assert_eq!(token_from(&garbage), None);
        assert_eq!(token_from(&HeaderMap::new()), None);
    }
}
