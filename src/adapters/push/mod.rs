//! Push delivery adapters.

mod expo;

pub use expo::{
    is_expo_push_token, ExpoPushClient, ExpoPushConfig, PushError, PushMessage,
    DEFAULT_EXPO_ENDPOINT,
};
