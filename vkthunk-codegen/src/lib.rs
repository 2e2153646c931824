// vkthunk-codegen: reads Vulkan descriptors, generates guest/host marshaling thunks.

pub mod error;
pub mod schema;
pub mod naming;
pub mod config;
pub mod context;
pub mod marshal;
pub mod strategy_table;
pub mod cpp_gen;

use std::path::{Path, PathBuf};

use crate::config::CodegenConfig;
use crate::context::CodegenContext;
use crate::error::{CodegenError, CodegenResult};
use crate::schema::DescriptorFile;
use crate::strategy_table::{PlanEntry, StrategyTable};

/// Summary of one generation run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub out_dir: PathBuf,
    pub emitted: usize,
    pub skipped: Vec<(String, String)>,
    pub marshal_in_types: usize,
}

/// Run the generate command. Main entry point for codegen.
pub fn run_generate(config_path: &Path) -> CodegenResult<GenerateReport> {
    let config = config::load_config(config_path)?;
    generate(&config.codegen, &config_dir(config_path))
}

/// Resolve every parameter's strategy without writing anything.
pub fn run_plan(config_path: &Path) -> CodegenResult<Vec<PlanEntry>> {
    let config = config::load_config(config_path)?;
    let codegen = &config.codegen;
    let descriptors = load_descriptors(&config_dir(config_path).join(&codegen.paths.descriptors))?;
    let ctx = CodegenContext::new(descriptors.types, codegen.emit.clone());
    let table = StrategyTable::new(&codegen.marshal);
    Ok(table.plan(&descriptors.functions, &ctx.registry))
}

/// Generate thunks for `config`, resolving its paths against `base_dir`.
pub fn generate(codegen: &CodegenConfig, base_dir: &Path) -> CodegenResult<GenerateReport> {
    let descriptors_path = base_dir.join(&codegen.paths.descriptors);
    let out_dir = base_dir.join(&codegen.paths.out);

    tracing::info!("loading descriptors from {}", descriptors_path.display());
    let descriptors = load_descriptors(&descriptors_path)?;
    tracing::info!(
        "loaded {} types, {} functions",
        descriptors.types.len(),
        descriptors.functions.len()
    );

    let mut ctx = CodegenContext::new(descriptors.types, codegen.emit.clone());
    let table = StrategyTable::new(&codegen.marshal);

    tracing::info!("generating wrappers...");
    let thunks = cpp_gen::generate_thunks(
        &mut ctx,
        &table,
        descriptors.functions,
        codegen.marshal.on_unsupported,
    )?;
    cpp_gen::write_outputs(&thunks, &ctx, &out_dir)?;

    tracing::info!("verifying output...");
    verify_output(&out_dir)?;

    let report = GenerateReport {
        out_dir,
        emitted: thunks.emitted.len(),
        skipped: thunks.skipped,
        marshal_in_types: ctx.registry.marshal_in_types().count(),
    };
    tracing::info!(
        "OK: {} wrappers, {} skipped, {} marshal-in types",
        report.emitted,
        report.skipped.len(),
        report.marshal_in_types
    );
    Ok(report)
}

fn config_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf()
}

fn load_descriptors(path: &Path) -> CodegenResult<DescriptorFile> {
    let data = std::fs::read_to_string(path).map_err(|source| CodegenError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    DescriptorFile::from_json(&data).map_err(|source| CodegenError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Verify codegen output integrity.
fn verify_output(out_dir: &Path) -> CodegenResult<()> {
    let mut errors: Vec<String> = Vec::new();

    // The thunk file always carries at least its header.
    let thunks = out_dir.join(cpp_gen::THUNKS_FILE);
    match std::fs::metadata(&thunks) {
        Ok(m) if m.len() == 0 => errors.push(format!("output empty: {}", thunks.display())),
        Err(_) => errors.push(format!("output missing: {}", thunks.display())),
        _ => {}
    }

    // The marshal-in list may legitimately be empty.
    let marshal_in = out_dir.join(cpp_gen::MARSHAL_IN_FILE);
    if !marshal_in.exists() {
        errors.push(format!("output missing: {}", marshal_in.display()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CodegenError::Verify(errors))
    }
}
