//! In-memory store for controller and router tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;

use super::{StoreError, UserStore};
use crate::model::{User, UserId};

#[derive(Default)]
pub struct FakeUserStore {
    users: Mutex<Vec<Value>>,
    failure: Mutex<Option<StoreError>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeUserStore {
    pub fn with_users(users: Vec<Value>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    /// Every following call fails with `error`.
    pub fn fail_with(&self, error: StoreError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn records(&self) -> Vec<Value> {
        self.users.lock().unwrap().clone()
    }

    fn enter(&self, call: String) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub fn sample_user(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "username": name.to_lowercase(),
        "email": format!("{}@example.com", name.to_lowercase()),
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031",
        "website": "hildegard.org",
        "company": { "name": "Romaguera-Crona", "catchPhrase": "Multi-layered", "bs": "e-markets" }
    })
}

#[async_trait]
impl UserStore for FakeUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.enter("GET /users".to_string())?;
        self.records()
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(|e| StoreError::Decode(e.to_string())))
            .collect()
    }

    async fn get(&self, id: &UserId) -> Result<Value, StoreError> {
        self.enter(format!("GET /users/{id}"))?;
        self.records()
            .into_iter()
            .find(|u| u["id"] == id.as_str())
            .ok_or(StoreError::status(404))
    }

    async fn create(&self, draft: &Value) -> Result<Value, StoreError> {
        self.enter("POST /users".to_string())?;
        let mut users = self.users.lock().unwrap();
        let mut created = draft.clone();
        created["id"] = json!((users.len() + 1).to_string());
        users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &UserId, record: &Value) -> Result<Value, StoreError> {
        self.enter(format!("PUT /users/{id}"))?;
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u["id"] == id.as_str())
            .ok_or(StoreError::status(404))?;
        *slot = record.clone();
        Ok(record.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        self.enter(format!("DELETE /users/{id}"))?;
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u["id"] != id.as_str());
        if users.len() == before {
            return Err(StoreError::status(404));
        }
        Ok(())
    }
}
