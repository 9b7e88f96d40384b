use std::path::PathBuf;

use serde::Deserialize;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::session;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceConfig {
    api_base_url: Option<String>,
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "apiBaseUrl": state.api.base_url(),
            "loggedIn": state.session.is_some(),
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    if let Err(e) = std::fs::create_dir_all(&path) {
        return err(&req.id, "workspace_failed", format!("{e:?}"), None);
    }

    // Best-effort: pick up an API origin override from config.json. This must
    // not prevent the workspace from opening.
    if let Some(base_url) = read_config(&path).api_base_url {
        state.api.set_base_url(base_url);
    }

    // Resume a persisted session, if one exists and still parses.
    match session::load(&path) {
        Ok(Some(ctx)) => state.session = Some(ctx),
        Ok(None) => {}
        Err(e) => log::warn!("ignoring unreadable session file: {e:?}"),
    }

    state.workspace = Some(path.clone());
    ok(
        &req.id,
        json!({
            "workspacePath": path.to_string_lossy(),
            "apiBaseUrl": state.api.base_url(),
            "session": &state.session,
        }),
    )
}

fn read_config(workspace: &std::path::Path) -> WorkspaceConfig {
    let path = workspace.join("config.json");
    let Ok(raw) = std::fs::read_to_string(&path) else {
        return WorkspaceConfig::default();
    };
    match serde_json::from_str(&raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("ignoring malformed config.json: {e}");
            WorkspaceConfig::default()
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
