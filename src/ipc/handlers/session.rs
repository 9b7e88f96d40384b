use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::session::{self, Role, SessionContext};

fn login(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let role_raw = get_required_str(params, "role")?;
    let user_id = get_required_str(params, "userId")?;
    let password = get_required_str(params, "password")?;

    let Some(role) = Role::parse(&role_raw) else {
        return Err(HandlerErr::new(
            "bad_params",
            format!("unknown role: {}", role_raw),
        ));
    };

    let resp = state.api.login(role, &user_id, &password)?;
    if resp.status != "success" {
        return Err(HandlerErr::new(
            "login_failed",
            resp.message.unwrap_or_else(|| "invalid credentials".to_string()),
        ));
    }
    let Some(token) = resp.token else {
        return Err(HandlerErr::new("bad_payload", "login response carried no token"));
    };
    let token_role = Role::parse(&token.role).unwrap_or(role);

    let ctx = SessionContext::new(token.user_id, token_role);
    if let Some(ws) = &state.workspace {
        if let Err(e) = session::save(ws, &ctx) {
            log::warn!("session not persisted: {e:?}");
        }
    }
    log::info!("logged in as {} ({})", ctx.user_id, ctx.role.as_str());
    state.session = Some(ctx);

    Ok(json!({ "session": &state.session }))
}

fn get(state: &AppState) -> serde_json::Value {
    json!({ "session": &state.session })
}

fn logout(state: &mut AppState) -> serde_json::Value {
    let was_logged_in = state.session.take().is_some();
    // Logging out also abandons whatever the session was in the middle of.
    state.marking = None;
    state.department = None;
    if let Some(ws) = &state.workspace {
        if let Err(e) = session::clear(ws) {
            log::warn!("session file not removed: {e:?}");
        }
    }
    json!({ "loggedOut": was_logged_in })
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.login" => Some(match login(state, &req.params) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        }),
        "session.get" => Some(ok(&req.id, get(state))),
        "session.logout" => Some(ok(&req.id, logout(state))),
        _ => None,
    }
}
