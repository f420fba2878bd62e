#![deny(clippy::all, clippy::pedantic)]

use happyart::application::admin::SettingsForm;

use crate::args::{SettingsCmd, SettingsSaveArgs};
use crate::ctx::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: SettingsCmd) -> Result<(), CliError> {
    let console = ctx.console().await?;
    let stored = console.load_settings().await;

    match cmd {
        SettingsCmd::Get => print_json(&stored),
        SettingsCmd::Save(args) => {
            let mut form = SettingsForm::from_settings(&stored);
            apply(&mut form, args);
            let saved = console.save_settings(form.into_map()).await;
            ctx.flush_toasts();
            saved?;
            print_json(&console.snapshot().settings)
        }
    }
}

fn apply(form: &mut SettingsForm, args: SettingsSaveArgs) {
    let SettingsSaveArgs {
        site_name,
        site_description,
        contact_email,
        max_courses_per_user,
    } = args;

    if let Some(value) = site_name {
        form.site_name = value;
    }
    if let Some(value) = site_description {
        form.site_description = value;
    }
    if let Some(value) = contact_email {
        form.contact_email = value;
    }
    if let Some(value) = max_courses_per_user {
        form.max_courses_per_user = value;
    }
}
