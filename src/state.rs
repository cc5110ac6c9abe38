use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::AppConfig;
use crate::db::ClinicStore;
use crate::models::Conversation;

pub struct AppState {
    pub store: Box<dyn ClinicStore>,
    pub config: AppConfig,
    pub conversations: Mutex<HashMap<String, Conversation>>,
}
