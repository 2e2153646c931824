// C++ code generation orchestrator.

pub mod wrapper;

use std::path::Path;

use crate::config::UnsupportedPolicy;
use crate::context::CodegenContext;
use crate::error::{CodegenError, CodegenResult};
use crate::schema::VkFunction;
use crate::strategy_table::StrategyTable;

pub const THUNKS_FILE: &str = "vk_thunks.cpp";
pub const MARSHAL_IN_FILE: &str = "marshal_in_types.txt";

/// Result of emitting every wrapper into one translation unit.
pub struct ThunkFile {
    pub code: String,
    /// Names of functions whose wrapper was emitted.
    pub emitted: Vec<String>,
    /// Functions left out, with the reason.
    pub skipped: Vec<(String, String)>,
}

/// Emit every function's wrapper, sorted by name for deterministic output.
pub fn generate_thunks(
    ctx: &mut CodegenContext,
    table: &StrategyTable,
    mut functions: Vec<VkFunction>,
    policy: UnsupportedPolicy,
) -> CodegenResult<ThunkFile> {
    functions.sort_by(|a, b| a.sig.name.cmp(&b.sig.name));

    let mut code = String::with_capacity(functions.len() * 512 + 128);
    code.push_str("// Generated by vkthunk-codegen. Do not edit.\n\n");

    let mut emitted = Vec::new();
    let mut skipped = Vec::new();
    for mut func in functions {
        match wrapper::emit_function(ctx, table, &mut func) {
            Ok(text) => {
                code.push_str(&text);
                code.push('\n');
                emitted.push(func.sig.name);
            }
            Err(err @ CodegenError::Unsupported { .. }) => match policy {
                UnsupportedPolicy::Skip => {
                    tracing::warn!("skipping {}: {err}", func.sig.name);
                    skipped.push((func.sig.name, err.to_string()));
                }
                UnsupportedPolicy::Abort => return Err(err),
            },
            Err(err) => return Err(err),
        }
    }

    Ok(ThunkFile { code, emitted, skipped })
}

/// List of types whose marshal-in routine must be generated downstream.
pub fn generate_marshal_in_list(ctx: &CodegenContext) -> String {
    let mut content = ctx.registry.marshal_in_types().collect::<Vec<_>>().join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    content
}

/// Write the generated files into the output directory.
pub fn write_outputs(thunks: &ThunkFile, ctx: &CodegenContext, out_dir: &Path) -> CodegenResult<()> {
    std::fs::create_dir_all(out_dir).map_err(|source| CodegenError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    write_file(&out_dir.join(THUNKS_FILE), &thunks.code)?;
    write_file(&out_dir.join(MARSHAL_IN_FILE), &generate_marshal_in_list(ctx))?;
    Ok(())
}

fn write_file(path: &Path, content: &str) -> CodegenResult<()> {
    std::fs::write(path, content).map_err(|source| CodegenError::Write {
        path: path.to_path_buf(),
        source,
    })
}
