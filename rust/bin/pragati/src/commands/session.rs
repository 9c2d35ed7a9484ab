//! Login / logout / whoami.

use std::io::Write;

use anyhow::Result;

use pragati_auth::permission::{Action, ModuleKey};
use pragati_auth::request::*;
use pragati_auth::routes::LOGIN_PATH;
use pragati_auth::state::HandshakePhase;

use super::shell::Shell;

fn prompt(label: &str) -> Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Interactive two-step login.
pub async fn login(shell: &Shell, user: Option<String>, password: Option<String>) -> Result<()> {
    shell.require_server()?;
    shell.start(LOGIN_PATH).await;

    let username = match user {
        Some(u) => u,
        None => prompt("Username: ")?,
    };
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")?,
    };
    let flux = &shell.flux;
    flux.emit(UsernameInputReq::PATH, UsernameInputReq { value: username }).await;
    flux.emit(PasswordInputReq::PATH, PasswordInputReq { value: password }).await;

    let state = shell.login_state();
    if let Some(e) = state.username_error.as_ref().or(state.password_error.as_ref()) {
        anyhow::bail!("{}", e);
    }

    flux.emit(SendOtpReq::PATH, SendOtpReq).await;
    shell.show_notice().await;
    if shell.login_state().otp.is_none() {
        anyhow::bail!("Login failed.");
    }

    let otp = rpassword::prompt_password("OTP: ")?;
    for (index, c) in otp.trim().chars().enumerate() {
        flux.emit(OtpInputReq::PATH, OtpInputReq { index, text: c.to_string() }).await;
    }
    flux.emit(VerifyOtpReq::PATH, VerifyOtpReq).await;
    shell.show_notice().await;

    if shell.login_state().phase != HandshakePhase::Authenticated {
        anyhow::bail!("Login failed.");
    }
    let user = shell.ctx.session().user_data();
    println!("Logged in as {} ({}).", user.name, user.role_name);
    Ok(())
}

pub async fn logout(shell: &Shell) -> Result<()> {
    let was_logged_in = shell.ctx.session().is_authenticated();
    shell.flux.emit(LogoutReq::PATH, LogoutReq).await;
    if was_logged_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn whoami(shell: &Shell, json: bool) -> Result<()> {
    let Some(record) = shell.ctx.session().get_session() else {
        anyhow::bail!("Not logged in. Run `pragati login`.");
    };
    let user = record.user;
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("Name: {}", user.name);
    println!("Role: {} ({})", user.role_name, user.role_id);
    println!();
    println!("{:<18} {:<5} {:<5} {:<5} {:<6}", "MODULE", "READ", "ADD", "EDIT", "DELETE");
    let mark = |b: bool| if b { "yes" } else { "-" };
    for module in ModuleKey::ALL {
        let p = &user.permissions;
        println!(
            "{:<18} {:<5} {:<5} {:<5} {:<6}",
            module.as_str(),
            mark(p.allows(module, Action::Read)),
            mark(p.allows(module, Action::Add)),
            mark(p.allows(module, Action::Edit)),
            mark(p.allows(module, Action::Delete)),
        );
    }
    Ok(())
}
