//! Per-user application data view.

model_view! {
    /// Application data keyed by user id, each user holding a key/value map.
    ///
    /// Containers answer `appdata.get` with `{ "<userId>": { "<key>": "<value>" } }`.
    AppData => AppData
}

impl AppData {
    /// Value stored under `key` for `user_id`.
    pub fn value_for(&self, user_id: &str, key: &str) -> Option<&str> {
        self.0.object(user_id)?.string(key)
    }

    /// Keys stored for `user_id`, sorted. Empty if the user has no data.
    pub fn keys_for(&self, user_id: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .0
            .object(user_id)
            .map(|data| data.field_names().collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// User ids present in this entry, sorted.
    pub fn user_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.0.field_names().collect();
        ids.sort_unstable();
        ids
    }
}
