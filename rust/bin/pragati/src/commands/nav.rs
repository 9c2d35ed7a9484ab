//! Route inspection and protected API calls.

use anyhow::Result;

use pragati_auth::guard::GuardDecision;
use pragati_auth::routes::Access;
use pragati_client::ApiError;

use super::shell::Shell;

/// Open a path as the app would and report what gets rendered.
pub async fn open(shell: &Shell, path: &str) -> Result<()> {
    shell.start(path).await;
    shell.show_notice().await;
    if let Some(route) = shell.route() {
        println!("{} → {}", route.path, route.view.title());
    }
    Ok(())
}

/// The route table and what the current session may open.
pub fn routes(shell: &Shell) {
    let guard = shell.ctx.navigator.guard();
    println!("{:<20} {:<20} {:<18} {}", "PATH", "VIEW", "REQUIRES", "DECISION");
    for route in guard.routes().iter() {
        let requires = match route.access {
            Access::Public => "-".to_string(),
            Access::Authenticated => "login".to_string(),
            Access::Module(m) => m.as_str().to_string(),
        };
        let decision = match guard.evaluate(route.path) {
            GuardDecision::Render { .. } => "render",
            GuardDecision::RedirectToLogin => "login",
            GuardDecision::Deny { .. } => "denied",
        };
        println!(
            "{:<20} {:<20} {:<18} {}",
            route.path,
            route.view.title(),
            requires,
            decision
        );
    }
}

/// GET an API path with the stored token and print the JSON reply.
pub async fn get(shell: &Shell, path: &str) -> Result<()> {
    shell.require_server()?;
    if !shell.ctx.session().is_authenticated() {
        anyhow::bail!("Not logged in. Run `pragati login`.");
    }
    match shell.api().get_json::<serde_json::Value>(path).await {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(ApiError::Unauthorized(_)) => {
            shell.show_notice().await;
            anyhow::bail!("Session expired. Run `pragati login`.")
        }
        Err(e) => Err(e.into()),
    }
}
