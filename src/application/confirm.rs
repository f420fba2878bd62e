/// Yes/no prompt shown before destructive actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(target = "happyart::confirm", prompt, answer = self.0, "prompt answered");
        self.0
    }
}

pub fn delete_prompt(kind: crate::domain::types::ContentKind) -> String {
    format!("Are you sure you want to delete this {kind}?")
}

pub const LOGOUT_PROMPT: &str = "Are you sure you want to logout?";
