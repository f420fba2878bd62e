#![deny(clippy::all, clippy::pedantic)]

use serde_json::json;

use crate::ctx::{CliError, Ctx};
use crate::print::print_json;

pub async fn stats(ctx: &Ctx) -> Result<(), CliError> {
    let console = ctx.console().await?;
    print_json(&console.stats())
}

/// Session, backend mode and banner in one document. Works signed out.
pub async fn status(ctx: &Ctx) -> Result<(), CliError> {
    let configured = ctx.settings.backend.credentials().is_some();
    let gate = ctx.sessions()?.restore().await?;
    let Some(session) = gate.session() else {
        return print_json(&json!({
            "session": "signed_out",
            "backend_configured": configured,
        }));
    };

    let console = ctx.console_as(session).await?;
    print_json(&json!({
        "session": "signed_in",
        "user": session.user,
        "backend_configured": configured,
        "mode": console.mode(),
        "banner": console.banner(),
        "busy": console.busy(),
    }))
}
