// Configuration types for vkthunk-codegen, deserialized from vkthunk.config.toml.

use std::path::Path;

use serde::Deserialize;

use crate::error::{CodegenError, CodegenResult};

/// Top-level config file.
#[derive(Deserialize)]
pub struct VkThunkConfig {
    pub codegen: CodegenConfig,
}

#[derive(Deserialize)]
pub struct CodegenConfig {
    pub paths: CodegenPaths,
    #[serde(default)]
    pub emit: EmitSettings,
    #[serde(default)]
    pub marshal: MarshalConfig,
}

#[derive(Deserialize)]
pub struct CodegenPaths {
    /// Descriptor JSON produced by the registry parser.
    pub descriptors: String,
    /// Output directory for generated sources.
    pub out: String,
}

/// Names of the emulator-side symbols the generated text refers to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmitSettings {
    /// Prefix of every generated wrapper function.
    pub wrapper_prefix: String,
    /// Shared marshal context handed to every marshal constructor.
    pub marshal_context: String,
    /// Guest memory accessor expression.
    pub memory_accessor: String,
    /// Prepended to the Vulkan function name to form the dispatch expression.
    pub dispatch_prefix: String,
    /// Local holding the native call's result.
    pub status_local: String,
    pub success_value: String,
    /// Emulator logging function used by generated diagnostics.
    pub log_fn: String,
    /// Mapping-table registration function: `map_fn(handle, pointer, size)`.
    pub map_fn: String,
    /// Guest 32-bit write: `guest_write(address, value)`.
    pub guest_write: String,
    /// Statement storing the call result for the guest; `{value}` is substituted.
    pub return_store: String,
    /// Canonical name for the pointer written back through a double pointer.
    pub placeholder: String,
}

impl Default for EmitSettings {
    fn default() -> Self {
        EmitSettings {
            wrapper_prefix: "boxed_".into(),
            marshal_context: "pBoxedInfo".into(),
            memory_accessor: "cpu->memory".into(),
            dispatch_prefix: "pBoxedInfo->p".into(),
            status_local: "result".into(),
            success_value: "VK_SUCCESS".into(),
            log_fn: "klog".into(),
            map_fn: "mapVkMemory".into(),
            guest_write: "cpu->memory->writed".into(),
            return_store: "EAX = {value};".into(),
            placeholder: "pData".into(),
        }
    }
}

impl EmitSettings {
    pub fn return_statement(&self, value: &str) -> String {
        self.return_store.replace("{value}", value)
    }
}

/// What the driver does with a function whose marshaling cannot be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Log and leave the function out of the output.
    #[default]
    Skip,
    /// Stop the whole run.
    Abort,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct MarshalConfig {
    /// Types with no supported host representation; marshaled as null.
    pub excluded_types: Vec<String>,
    pub on_unsupported: UnsupportedPolicy,
    pub map_memory: Vec<MapMemoryEntry>,
}

impl Default for MarshalConfig {
    fn default() -> Self {
        MarshalConfig {
            excluded_types: vec!["VkAllocationCallbacks".into()],
            on_unsupported: UnsupportedPolicy::Skip,
            map_memory: Vec::new(),
        }
    }
}

/// One acquire/report call site.
#[derive(Debug, Clone, Deserialize)]
pub struct MapMemoryEntry {
    pub function: String,
    pub param: String,
    /// Expression for the originating memory handle.
    pub handle: String,
    /// Expression for the requested size.
    pub size: String,
    /// Guest address that receives the guest-visible mapping, if any.
    #[serde(default)]
    pub guest_out: Option<String>,
}

/// Read and parse a config file.
pub fn load_config(path: &Path) -> CodegenResult<VkThunkConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| CodegenError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| CodegenError::Toml {
        path: path.to_path_buf(),
        source,
    })
}
