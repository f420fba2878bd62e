#![deny(clippy::all, clippy::pedantic)]

use happyart::application::auth::{Credentials, SessionGate, SignUpForm};
use serde_json::json;

use crate::args::{AuthCmd, PasswordArgs};
use crate::ctx::{CliError, Ctx};
use crate::io::read_value;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: AuthCmd) -> Result<(), CliError> {
    let sessions = ctx.sessions()?;
    match cmd {
        AuthCmd::Login { email, password } => {
            let credentials = Credentials {
                email,
                password: password_from(password)?,
            };
            let session = sessions.sign_in(&credentials).await;
            ctx.flush_toasts();
            print_json(&session?.user)
        }
        AuthCmd::Signup {
            email,
            full_name,
            password,
            confirm_password,
        } => {
            let password = password_from(password)?;
            let form = SignUpForm {
                email,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
                full_name,
            };
            let outcome = sessions.sign_up(&form).await;
            ctx.flush_toasts();
            let outcome = outcome?;
            print_json(&json!({
                "user": outcome.user,
                "signed_in": outcome.session.is_some(),
            }))
        }
        AuthCmd::Logout => {
            sessions.restore().await?;
            let outcome = sessions.sign_out().await;
            ctx.flush_toasts();
            print_json(&json!({ "status": outcome? }))
        }
        AuthCmd::ResetPassword { email } => {
            let outcome = sessions.reset_password(&email).await;
            ctx.flush_toasts();
            outcome?;
            print_json(&json!({ "status": "sent" }))
        }
        AuthCmd::Whoami => match sessions.restore().await? {
            SessionGate::SignedIn(session) => print_json(&session.user),
            SessionGate::Loading | SessionGate::SignedOut => {
                print_json(&json!({ "state": "signed_out" }))
            }
        },
        AuthCmd::Profile { full_name } => {
            if sessions.restore().await?.session().is_none() {
                return Err(CliError::SignedOut);
            }
            let user = sessions.update_profile(&full_name).await;
            ctx.flush_toasts();
            print_json(&user?)
        }
    }
}

fn password_from(args: PasswordArgs) -> Result<String, CliError> {
    if args.password.is_none() && args.password_file.is_none() {
        return Err(CliError::InvalidInput(
            "password required (set HAPPYART_PASSWORD or pass --password-file)".into(),
        ));
    }
    read_value(args.password, args.password_file)
}
