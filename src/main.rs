mod analytics;
mod api;
mod ipc;
mod marking;
mod models;
mod reconcile;
mod session;

use std::io::{self, BufRead, Write};

fn main() {
    env_logger::init();

    let base_url = std::env::var("ATTENDANCE_API_URL")
        .unwrap_or_else(|_| api::DEFAULT_BASE_URL.to_string());
    let mut state = ipc::AppState::new(api::ApiClient::new(base_url));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id; ignore.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
