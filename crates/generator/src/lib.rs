//! TypeScript client generation
//!
//! This crate turns a [`ParsedApi`] into one TypeScript module containing, in
//! order:
//! - the named types (type registry order)
//! - the runtime `request` helper
//! - per operation: params type, result union, result variants and binding

pub mod naming;
mod render;
mod templates;

pub use naming::OperationNames;

use oapi_tsgen_common::{
    GenerateOptions, GeneratorError, NamedType, ParsedApi, Result, TypeRegistry,
};
use render::{OperationDeclarations, OperationView};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tera::Tera;

/// Names the runtime helper declares
const RUNTIME_NAMES: [&str; 3] = ["RequestOptions", "RequestParams", "request"];

/// Client generator
///
/// Renders a [`ParsedApi`] with the sections selected in [`GenerateOptions`].
pub struct ClientGenerator {
    api: ParsedApi,
    options: GenerateOptions,
    tera: Tera,
}

impl ClientGenerator {
    /// Create a new client generator from a parsed API
    pub fn new(api: ParsedApi, options: GenerateOptions) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { api, options, tera })
    }

    /// Render the whole module
    ///
    /// Returns an empty string when every section is disabled.
    pub fn render(&self) -> Result<String> {
        if !self.options.types && !self.options.request && !self.options.operations {
            return Ok(String::new());
        }

        if self.options.request {
            for name in RUNTIME_NAMES {
                if self.api.types.contains(name) {
                    return Err(GeneratorError::ConflictingTypeDefinition {
                        name: name.to_string(),
                    });
                }
            }
        }

        let types: Vec<String> = if self.options.types {
            self.api
                .types
                .iter()
                .map(|(name, named)| render::declaration(name, named))
                .collect()
        } else {
            Vec::new()
        };

        let operations = if self.options.operations {
            self.operation_views()?
        } else {
            Vec::new()
        };

        let mut context = tera::Context::new();
        context.insert("types", &types);
        context.insert("request", &self.options.request);
        context.insert("operations", &operations);

        let rendered = self
            .tera
            .render("client.ts", &context)
            .map_err(|e| GeneratorError::Generation(format!("Template error: {:?}", e)))?;

        tracing::info!(
            types = types.len(),
            operations = operations.len(),
            bytes = rendered.len(),
            "rendered client"
        );
        Ok(rendered)
    }

    /// Render the module to `output_path`, creating parent directories
    pub fn generate_to_file(&self, output_path: &Path) -> Result<()> {
        let rendered = self.render()?;

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                GeneratorError::Generation(format!("Failed to create output directory: {}", e))
            })?;
        }

        fs::write(output_path, rendered).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to write {}: {}",
                output_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Build every operation's view, checking declaration names for conflicts
    fn operation_views(&self) -> Result<Vec<OperationView>> {
        let mut declared = TypeRegistry::new();
        let mut functions: HashSet<String> = HashSet::new();

        let mut views = Vec::with_capacity(self.api.operations.len());
        for operation in &self.api.operations {
            let declarations = OperationDeclarations::new(operation, &self.options);
            let names = &declarations.names;

            if !functions.insert(names.function.clone())
                || self.api.types.contains(&names.function)
            {
                return Err(GeneratorError::ConflictingTypeDefinition {
                    name: names.function.clone(),
                });
            }

            self.declare(&mut declared, &names.params, NamedType::new(declarations.params.clone()))?;
            self.declare(
                &mut declared,
                &names.result,
                NamedType::new(declarations.result_type()),
            )?;
            if let Some(variants) = &declarations.variants {
                for (name, named) in variants {
                    self.declare(&mut declared, name, named.clone())?;
                }
            }

            tracing::debug!(
                operation = %operation.label(),
                function = %names.function,
                "rendering binding"
            );
            views.push(declarations.view(operation, &self.api.server, self.options.with_doc));
        }

        Ok(views)
    }

    /// Register an operation-level declaration, rejecting clashes with named types
    fn declare(&self, declared: &mut TypeRegistry, name: &str, named: NamedType) -> Result<()> {
        if self.api.types.contains(name) || (self.options.request && RUNTIME_NAMES.contains(&name))
        {
            return Err(GeneratorError::ConflictingTypeDefinition {
                name: name.to_string(),
            });
        }
        declared.register(name, named)
    }
}

/// Render a parsed API (convenience function)
pub fn generate_client(api: ParsedApi, options: GenerateOptions) -> Result<String> {
    ClientGenerator::new(api, options)?.render()
}
