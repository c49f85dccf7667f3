//! Unit selection
//!
//! The engine never decides which units to install; a selector does. The
//! interactive selector prompts with a checkbox list, the scripted ones
//! come from command-line flags.

use crate::catalog::CatalogEntry;
use crate::error::StockpotResult;
use crate::provision::namespace::Namespace;
use crate::ui::{self, StepKind, UiContext};
use async_trait::async_trait;
use serde::Serialize;

/// Ordered, duplicate-free unit names (first occurrence wins)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSet(Vec<String>);

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut names: Vec<String> = Vec::new();
        for name in iter {
            let name = name.into();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self(names)
    }
}

/// Chooses which of the available units to install
#[async_trait]
pub trait UnitSelector: Send + Sync {
    async fn select(
        &self,
        namespace: Namespace,
        available: &[CatalogEntry],
    ) -> StockpotResult<SelectionSet>;
}

/// Fixed list of names, e.g. from `--select auth,forms`
#[derive(Debug, Clone, Default)]
pub struct PresetSelector {
    names: Vec<String>,
}

impl PresetSelector {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

#[async_trait]
impl UnitSelector for PresetSelector {
    async fn select(
        &self,
        _namespace: Namespace,
        _available: &[CatalogEntry],
    ) -> StockpotResult<SelectionSet> {
        // Unknown names are rejected by the installer
        Ok(self.names.iter().cloned().collect())
    }
}

/// Every available unit
#[derive(Debug, Clone, Copy, Default)]
pub struct AllSelector;

#[async_trait]
impl UnitSelector for AllSelector {
    async fn select(
        &self,
        _namespace: Namespace,
        available: &[CatalogEntry],
    ) -> StockpotResult<SelectionSet> {
        let mut names: Vec<&str> = available.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        Ok(names.into_iter().collect())
    }
}

/// Checkbox prompt in a terminal; selects nothing when non-interactive
#[derive(Debug, Clone)]
pub struct PromptSelector {
    ctx: UiContext,
}

impl PromptSelector {
    pub fn new(ctx: UiContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl UnitSelector for PromptSelector {
    async fn select(
        &self,
        namespace: Namespace,
        available: &[CatalogEntry],
    ) -> StockpotResult<SelectionSet> {
        if available.is_empty() {
            ui::step(
                &self.ctx,
                StepKind::Warn,
                &format!("No {} available in the catalog", namespace),
            );
            return Ok(SelectionSet::default());
        }

        if !self.ctx.is_interactive() {
            ui::step_with(
                &self.ctx,
                StepKind::Warn,
                &format!("Not a terminal, no {} selected", namespace),
                Some("Use --select <names> or --all"),
            );
            return Ok(SelectionSet::default());
        }

        let mut names: Vec<String> = available.iter().map(|e| e.name.clone()).collect();
        names.sort();

        let chosen =
            ui::multiselect(&self.ctx, &format!("Select {} to import", namespace), &names).await?;
        Ok(chosen.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entries(names: &[&str]) -> Vec<CatalogEntry> {
        names
            .iter()
            .map(|n| CatalogEntry {
                name: n.to_string(),
                path: PathBuf::from("/catalog/modules").join(n),
            })
            .collect()
    }

    #[test]
    fn selection_set_drops_duplicates_keeping_order() {
        let set: SelectionSet = ["forms", "auth", "forms", "auth"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["forms", "auth"]);
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn preset_returns_given_names() {
        let selector = PresetSelector::new(vec!["auth".into(), "auth".into(), "ghost".into()]);
        let set = selector
            .select(Namespace::Modules, &entries(&["auth"]))
            .await
            .unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["auth", "ghost"]);
    }

    #[tokio::test]
    async fn all_selects_every_unit_sorted() {
        let set = AllSelector
            .select(Namespace::Components, &entries(&["forms", "auth"]))
            .await
            .unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["auth", "forms"]);
    }

    #[tokio::test]
    async fn prompt_selects_nothing_when_non_interactive() {
        let selector = PromptSelector::new(UiContext::non_interactive());
        let set = selector
            .select(Namespace::Modules, &entries(&["auth", "forms"]))
            .await
            .unwrap();
        assert!(set.is_empty());
    }
}
