//! Interactive prompts with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::{StockpotError, StockpotResult};

/// Ask a yes/no question.
///
/// Returns `true` under `--yes` and `default` when nobody can answer.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> StockpotResult<bool> {
    if ctx.auto_yes() {
        println!("  {} (auto-approved)", message);
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    let message = message.to_string();
    let result = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message).initial_value(default).interact()
    })
    .await
    .map_err(|e| StockpotError::Internal(format!("Prompt task failed: {}", e)))?;

    result.map_err(|e| StockpotError::User(format!("Prompt cancelled: {}", e)))
}

/// Pick any number of `options` with a checkbox list.
///
/// Returns nothing selected when non-interactive or when `options` is empty.
pub async fn multiselect(
    ctx: &UiContext,
    message: &str,
    options: &[String],
) -> StockpotResult<Vec<String>> {
    if options.is_empty() || !ctx.is_interactive() {
        return Ok(Vec::new());
    }

    let message = message.to_string();
    let items = options.to_vec();

    let result = tokio::task::spawn_blocking(move || {
        let mut prompt = cliclack::multiselect(&message).required(false);
        for item in items {
            prompt = prompt.item(item.clone(), item, "");
        }
        prompt.interact()
    })
    .await
    .map_err(|e| StockpotError::Internal(format!("Prompt task failed: {}", e)))?;

    result.map_err(|e| StockpotError::User(format!("Selection cancelled: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirm_auto_yes() {
        let ctx = UiContext::non_interactive().with_auto_yes(true);
        assert!(confirm(&ctx, "Delete cache?", false).await.unwrap());
    }

    #[tokio::test]
    async fn confirm_non_interactive_default() {
        let ctx = UiContext::non_interactive();
        assert!(confirm(&ctx, "Delete cache?", true).await.unwrap());
        assert!(!confirm(&ctx, "Delete cache?", false).await.unwrap());
    }

    #[tokio::test]
    async fn multiselect_non_interactive_is_empty() {
        let ctx = UiContext::non_interactive();
        let options = vec!["auth".to_string(), "forms".to_string()];
        assert!(multiselect(&ctx, "Modules", &options).await.unwrap().is_empty());
    }
}
