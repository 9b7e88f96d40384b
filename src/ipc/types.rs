use std::path::PathBuf;

use serde::Deserialize;

use crate::api::ApiClient;
use crate::marking::MarkingSession;
use crate::models::DepartmentTsaPayload;
use crate::session::SessionContext;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub api: ApiClient,
    pub session: Option<SessionContext>,
    /// Last fetched department TSA analytics; filter views re-derive from
    /// this without refetching.
    pub department: Option<DepartmentTsaPayload>,
    pub marking: Option<MarkingSession>,
}

impl AppState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            workspace: None,
            api,
            session: None,
            department: None,
            marking: None,
        }
    }
}
