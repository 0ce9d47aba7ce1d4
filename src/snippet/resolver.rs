//! Snippet resolution - picks the effective source for a tenant, renders it and
//! expands embedded snippet markers

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{PlaceholderEngine, RenderEngine};
use crate::store::{SnippetOverride, SnippetOverrideStore};

use super::catalog::SnippetCatalog;
use super::config::ResolverConfig;
use super::definition::{Snippet, SnippetDefinition};
use super::error::SnippetError;
use super::marker::find_markers;

/// What [`SnippetResolver::update_source`] did to the override store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Created,
    Updated,
    /// Override deleted; the snippet reverts to its default source
    Removed,
    /// Empty source and no override to delete
    Unchanged,
}

/// Ids of the snippets currently being expanded, outermost first
#[derive(Debug, Default)]
struct ExpansionContext {
    chain: Vec<String>,
}

impl ExpansionContext {
    fn is_expanding(&self, id: &str) -> bool {
        self.chain.iter().any(|entry| entry == id)
    }

    fn depth(&self) -> usize {
        self.chain.len()
    }

    fn cycle_through(&self, id: &str) -> Vec<String> {
        let mut chain = self.chain.clone();
        chain.push(id.to_string());
        chain
    }
}

/// Renders snippets for tenants.
///
/// Combines the static catalog, the override store and a render engine. The
/// catalog is fixed at construction; the store is the only mutable part.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use tenant_snippets::{
///     InMemoryOverrideStore, SnippetCatalog, SnippetDefinition, SnippetResolver,
///     VariableDefinition, VariableType,
/// };
///
/// let catalog = SnippetCatalog::from_definitions([
///     SnippetDefinition::new("welcome", "Welcome", "Hello {name}! ###SNIPPET_footer###")
///         .with_variable(VariableDefinition::new("name", VariableType::String).required(true)),
///     SnippetDefinition::new("footer", "Footer", "Bye."),
/// ])
/// .unwrap();
///
/// let mut resolver = SnippetResolver::new(catalog, InMemoryOverrideStore::new());
/// let vars = HashMap::from([("name".to_string(), "Ada".to_string())]);
/// assert_eq!(resolver.render("welcome", "acme", &vars).unwrap(), "Hello Ada! Bye.");
///
/// resolver.update_source("footer", "acme", "See you.").unwrap();
/// assert_eq!(resolver.render("welcome", "acme", &vars).unwrap(), "Hello Ada! See you.");
/// ```
#[derive(Debug)]
pub struct SnippetResolver<S, E = PlaceholderEngine> {
    catalog: SnippetCatalog,
    store: S,
    engine: E,
    config: ResolverConfig,
}

impl<S: SnippetOverrideStore> SnippetResolver<S, PlaceholderEngine> {
    /// Create a resolver using the strict placeholder engine
    pub fn new(catalog: SnippetCatalog, store: S) -> Self {
        Self::with_engine(catalog, store, PlaceholderEngine::new())
    }
}

impl<S: SnippetOverrideStore, E: RenderEngine> SnippetResolver<S, E> {
    /// Create a resolver with a custom render engine
    pub fn with_engine(catalog: SnippetCatalog, store: S, engine: E) -> Self {
        Self {
            catalog,
            store,
            engine,
            config: ResolverConfig::default(),
        }
    }

    /// Set the resolver configuration
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &SnippetCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the resolver and return its store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Look up a definition
    pub fn definition(&self, snippet_id: &str) -> Result<Arc<SnippetDefinition>, SnippetError> {
        self.catalog.definition(snippet_id)
    }

    /// All definitions in declaration order
    pub fn definitions(&self) -> impl Iterator<Item = &Arc<SnippetDefinition>> {
        self.catalog.all_definitions()
    }

    /// The source text in effect for a tenant: its override, else the default
    pub fn resolve_source(&self, snippet_id: &str, tenant_id: &str) -> Result<String, SnippetError> {
        Ok(self.snippet(snippet_id, tenant_id)?.source().to_string())
    }

    /// Build the snippet as seen by one tenant
    pub fn snippet(&self, snippet_id: &str, tenant_id: &str) -> Result<Snippet, SnippetError> {
        let definition = self.catalog.definition(snippet_id)?;
        let snippet = match self.store.find(tenant_id, snippet_id)? {
            Some(entry) => Snippet::new(definition, entry.source().to_string(), true),
            None => {
                let source = definition.default_source().to_string();
                Snippet::new(definition, source, false)
            }
        };

        tracing::trace!(
            snippet = snippet_id,
            tenant = tenant_id,
            overridden = snippet.is_overridden(),
            "resolved effective source"
        );
        Ok(snippet)
    }

    /// Every catalog snippet as seen by one tenant, in declaration order
    pub fn snippets(&self, tenant_id: &str) -> Result<Vec<Snippet>, SnippetError> {
        self.catalog
            .ids()
            .map(|id| self.snippet(id, tenant_id))
            .collect()
    }

    /// Set or clear a tenant's override.
    ///
    /// An empty `new_source` deletes an existing override, reverting the
    /// snippet to its default; with no override present it does nothing.
    /// The snippet id is checked against the catalog before the store is
    /// touched.
    pub fn update_source(
        &mut self,
        snippet_id: &str,
        tenant_id: &str,
        new_source: &str,
    ) -> Result<UpdateOutcome, SnippetError> {
        self.catalog.definition(snippet_id)?;

        let outcome = match self.store.find(tenant_id, snippet_id)? {
            Some(existing) if new_source.is_empty() => {
                self.store.remove(&existing)?;
                UpdateOutcome::Removed
            }
            Some(mut existing) => {
                existing.update(new_source);
                self.store.update(existing)?;
                UpdateOutcome::Updated
            }
            None if new_source.is_empty() => UpdateOutcome::Unchanged,
            None => {
                self.store
                    .add(SnippetOverride::new(tenant_id, snippet_id, new_source))?;
                UpdateOutcome::Created
            }
        };

        tracing::info!(snippet = snippet_id, tenant = tenant_id, ?outcome, "updated snippet source");
        Ok(outcome)
    }

    /// Render a snippet for a tenant.
    ///
    /// Supplied variables are converted against the snippet's declarations;
    /// undeclared ones are ignored. Markers in the rendered output are replaced
    /// by rendering the referenced snippet with the same tenant and the same
    /// supplied variables.
    pub fn render(
        &self,
        snippet_id: &str,
        tenant_id: &str,
        variables: &HashMap<String, String>,
    ) -> Result<String, SnippetError> {
        let mut ctx = ExpansionContext::default();
        self.render_nested(snippet_id, tenant_id, variables, &mut ctx)
    }

    fn render_nested(
        &self,
        snippet_id: &str,
        tenant_id: &str,
        variables: &HashMap<String, String>,
        ctx: &mut ExpansionContext,
    ) -> Result<String, SnippetError> {
        if ctx.is_expanding(snippet_id) {
            return Err(SnippetError::CyclicSnippetReference {
                chain: ctx.cycle_through(snippet_id),
            });
        }
        // The top-level snippet is depth 0
        if ctx.depth() > self.config.max_depth {
            return Err(SnippetError::NestingTooDeep {
                id: snippet_id.to_string(),
                limit: self.config.max_depth,
            });
        }

        let snippet = self.snippet(snippet_id, tenant_id)?;
        let typed = snippet
            .definition()
            .convert_variables(variables)
            .map_err(|e| SnippetError::from_variable(snippet_id, e))?;

        let rendered = self
            .engine
            .render(snippet.source(), &typed)
            .map_err(|source| SnippetError::Template {
                snippet: snippet_id.to_string(),
                source,
            })?;

        if !self.config.marker_expansion {
            return Ok(rendered);
        }

        let markers = find_markers(&rendered);
        if markers.is_empty() {
            return Ok(rendered);
        }

        ctx.chain.push(snippet_id.to_string());
        let mut expanded = String::with_capacity(rendered.len());
        let mut last = 0;
        for marker in &markers {
            tracing::debug!(snippet = snippet_id, nested = marker.id, "expanding snippet marker");
            expanded.push_str(&rendered[last..marker.range.start]);
            expanded.push_str(&self.render_nested(marker.id, tenant_id, variables, ctx)?);
            last = marker.range.end;
        }
        expanded.push_str(&rendered[last..]);
        ctx.chain.pop();

        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::variable::{VariableDefinition, VariableType};
    use crate::store::InMemoryOverrideStore;

    fn resolver(definitions: Vec<SnippetDefinition>) -> SnippetResolver<InMemoryOverrideStore> {
        let catalog = SnippetCatalog::from_definitions(definitions).expect("unique ids");
        SnippetResolver::new(catalog, InMemoryOverrideStore::new())
    }

    fn no_vars() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_resolve_source_defaults() {
        let r = resolver(vec![SnippetDefinition::new("welcome", "Welcome", "Hello")]);
        assert_eq!(r.resolve_source("welcome", "acme").unwrap(), "Hello");
        assert!(!r.snippet("welcome", "acme").unwrap().is_overridden());
    }

    #[test]
    fn test_update_source_lifecycle() {
        let mut r = resolver(vec![SnippetDefinition::new("welcome", "Welcome", "Hello")]);

        assert_eq!(
            r.update_source("welcome", "acme", "").unwrap(),
            UpdateOutcome::Unchanged
        );
        assert!(r.store().is_empty());

        assert_eq!(
            r.update_source("welcome", "acme", "Hi").unwrap(),
            UpdateOutcome::Created
        );
        assert_eq!(
            r.update_source("welcome", "acme", "Hey").unwrap(),
            UpdateOutcome::Updated
        );
        assert_eq!(r.resolve_source("welcome", "acme").unwrap(), "Hey");
        assert_eq!(r.store().len(), 1);

        assert_eq!(
            r.update_source("welcome", "acme", "").unwrap(),
            UpdateOutcome::Removed
        );
        assert_eq!(r.resolve_source("welcome", "acme").unwrap(), "Hello");
        assert!(r.store().is_empty());
    }

    #[test]
    fn test_update_unknown_snippet_leaves_store_untouched() {
        let mut r = resolver(vec![]);
        let err = r.update_source("nope", "acme", "text").unwrap_err();
        assert!(matches!(err, SnippetError::UnknownSnippet { .. }));
        assert!(r.store().is_empty());
    }

    #[test]
    fn test_render_converts_and_ignores_undeclared() {
        let r = resolver(vec![SnippetDefinition::new(
            "stock",
            "Stock",
            "{count} left",
        )
        .with_variable(VariableDefinition::new("count", VariableType::Integer).required(true))]);

        let vars = HashMap::from([
            ("count".to_string(), "7".to_string()),
            ("extra".to_string(), "ignored".to_string()),
        ]);
        assert_eq!(r.render("stock", "acme", &vars).unwrap(), "7 left");
    }

    #[test]
    fn test_undeclared_variable_is_not_interpolated() {
        let r = resolver(vec![SnippetDefinition::new("s", "S", "Hi {name}")]);
        let vars = HashMap::from([("name".to_string(), "Ada".to_string())]);
        let err = r.render("s", "acme", &vars).unwrap_err();
        assert!(matches!(
            err,
            SnippetError::Template {
                source: crate::error::TemplateError::UndefinedVariable { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_conversion_error_is_fatal() {
        let r = resolver(vec![SnippetDefinition::new("stock", "Stock", "{count}")
            .with_variable(VariableDefinition::new("count", VariableType::Integer))]);
        let vars = HashMap::from([("count".to_string(), "seven".to_string())]);
        let err = r.render("stock", "acme", &vars).unwrap_err();
        assert!(matches!(
            err,
            SnippetError::VariableConversion { ref snippet, ref variable, .. }
                if snippet == "stock" && variable == "count"
        ));
    }

    #[test]
    fn test_nested_render_forwards_tenant_and_variables() {
        let mut r = resolver(vec![
            SnippetDefinition::new("mail", "Mail", "Dear {name}, ###SNIPPET_sig###")
                .with_variable(VariableDefinition::new("name", VariableType::String)),
            SnippetDefinition::new("sig", "Signature", "-- team")
                .with_variable(VariableDefinition::new("name", VariableType::String)),
        ]);
        r.update_source("sig", "acme", "-- {name}'s friends at ACME")
            .unwrap();

        let vars = HashMap::from([("name".to_string(), "Ada".to_string())]);
        assert_eq!(
            r.render("mail", "acme", &vars).unwrap(),
            "Dear Ada, -- Ada's friends at ACME"
        );
        assert_eq!(r.render("mail", "globex", &vars).unwrap(), "Dear Ada, -- team");
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let r = resolver(vec![SnippetDefinition::new("a", "A", "x ###SNIPPET_a###")]);
        let err = r.render("a", "acme", &no_vars()).unwrap_err();
        match err {
            SnippetError::CyclicSnippetReference { chain } => {
                assert_eq!(chain, vec!["a".to_string(), "a".to_string()])
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_indirect_cycle_reports_chain() {
        let r = resolver(vec![
            SnippetDefinition::new("a", "A", "###SNIPPET_b###"),
            SnippetDefinition::new("b", "B", "###SNIPPET_c###"),
            SnippetDefinition::new("c", "C", "###SNIPPET_a###"),
        ]);
        let err = r.render("b", "acme", &no_vars()).unwrap_err();
        assert_eq!(err.to_string(), "circular snippet reference detected: b -> c -> a -> b");
    }

    #[test]
    fn test_repeated_sibling_is_not_a_cycle() {
        let r = resolver(vec![
            SnippetDefinition::new("row", "Row", "###SNIPPET_dot######SNIPPET_dot###|###SNIPPET_dot###"),
            SnippetDefinition::new("dot", "Dot", "."),
        ]);
        assert_eq!(r.render("row", "acme", &no_vars()).unwrap(), "..|.");
    }

    #[test]
    fn test_max_depth() {
        let r = resolver(vec![
            SnippetDefinition::new("a", "A", "a###SNIPPET_b###"),
            SnippetDefinition::new("b", "B", "b###SNIPPET_c###"),
            SnippetDefinition::new("c", "C", "c"),
        ]);
        assert_eq!(r.render("a", "t", &no_vars()).unwrap(), "abc");

        let r = r.with_config(ResolverConfig::new().with_max_depth(1));
        let err = r.render("a", "t", &no_vars()).unwrap_err();
        assert!(matches!(err, SnippetError::NestingTooDeep { ref id, limit: 1 } if id == "c"));
    }

    #[test]
    fn test_marker_expansion_disabled() {
        let r = resolver(vec![
            SnippetDefinition::new("a", "A", "A: ###SNIPPET_b###"),
            SnippetDefinition::new("b", "B", "bee"),
        ])
        .with_config(ResolverConfig::new().with_marker_expansion(false));
        assert_eq!(r.render("a", "t", &no_vars()).unwrap(), "A: ###SNIPPET_b###");
    }

    #[test]
    fn test_snippets_lists_catalog_order_with_overrides() {
        let mut r = resolver(vec![
            SnippetDefinition::new("b", "B", "bee"),
            SnippetDefinition::new("a", "A", "ay"),
        ]);
        r.update_source("a", "acme", "AY").unwrap();

        let snippets = r.snippets("acme").unwrap();
        let view: Vec<_> = snippets
            .iter()
            .map(|s| (s.id(), s.source(), s.is_overridden()))
            .collect();
        assert_eq!(view, vec![("b", "bee", false), ("a", "AY", true)]);
    }
}
