// Descriptor types matching the Vulkan registry parser's JSON output.

use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Top-level file wrapper
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct DescriptorFile {
    #[serde(default)]
    pub types: Vec<TypeInfo>,
    #[serde(default)]
    pub functions: Vec<VkFunction>,
}

impl DescriptorFile {
    /// Parse a descriptor file and fill in derived fields.
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        let mut file: DescriptorFile = serde_json::from_str(data)?;
        for func in &mut file.functions {
            func.normalize();
        }
        Ok(file)
    }
}

// ---------------------------------------------------------------------------
// Type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    Struct,
    Union,
    Handle,
    Enum,
    Base,
}

impl TypeCategory {
    /// Only aggregates have a field-by-field marshal-in routine.
    pub fn has_layout(self) -> bool {
        matches!(self, TypeCategory::Struct | TypeCategory::Union)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    pub category: TypeCategory,
}

// ---------------------------------------------------------------------------
// Function
// ---------------------------------------------------------------------------

/// Outcome of the native call as seen by post-call hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// The call returns a `VkResult` that is compared against the success value.
    Checked,
    /// The call is known to have succeeded; there is nothing to compare.
    Succeeded,
    /// The call is known to fail; nothing it produced may be published.
    Failed,
}

/// Everything about a function except its parameters. Hooks receive this
/// while the loop holds the parameter list mutably.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionSig {
    pub name: String,
    #[serde(default, deserialize_with = "deser_return_type")]
    pub return_type: Option<String>,
    #[serde(default)]
    pub status: Option<CallStatus>,
}

impl FunctionSig {
    pub fn new(name: &str, return_type: Option<&str>) -> Self {
        FunctionSig {
            name: name.to_string(),
            return_type: return_type.filter(|t| *t != "void").map(str::to_string),
            status: None,
        }
    }

    pub fn with_status(mut self, status: CallStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Explicit status, or the one implied by the return type.
    pub fn call_status(&self) -> CallStatus {
        match (self.status, self.return_type.as_deref()) {
            (Some(status), _) => status,
            (None, Some("VkResult")) => CallStatus::Checked,
            (None, _) => CallStatus::Succeeded,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VkFunction {
    #[serde(flatten)]
    pub sig: FunctionSig,
    #[serde(default)]
    pub params: Vec<VkParam>,
}

impl VkFunction {
    pub fn new(sig: FunctionSig, params: Vec<VkParam>) -> Self {
        let mut func = VkFunction { sig, params };
        func.normalize();
        func
    }

    pub fn name(&self) -> &str {
        &self.sig.name
    }

    fn normalize(&mut self) {
        for param in &mut self.params {
            if param.name_in_function.is_empty() {
                param.name_in_function = param.name.clone();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function parameter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct VkParam {
    /// Local name in the generated wrapper. Strategies may rename it.
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub is_pointer: bool,
    #[serde(default)]
    pub is_double_pointer: bool,
    /// Expression yielding the guest value (e.g. `ARG2`).
    pub param_arg: String,
    /// Expression passed to the native call. Defaults to `name`.
    #[serde(default)]
    pub name_in_function: String,
}

impl VkParam {
    pub fn new(name: &str, param_type: &str, param_arg: &str) -> Self {
        VkParam {
            name: name.to_string(),
            param_type: param_type.to_string(),
            is_pointer: false,
            is_double_pointer: false,
            param_arg: param_arg.to_string(),
            name_in_function: name.to_string(),
        }
    }

    pub fn pointer(mut self) -> Self {
        self.is_pointer = true;
        self
    }

    pub fn double_pointer(mut self) -> Self {
        self.is_pointer = true;
        self.is_double_pointer = true;
        self
    }

    /// `is_double_pointer` implies `is_pointer`.
    pub fn has_consistent_arity(&self) -> bool {
        self.is_pointer || !self.is_double_pointer
    }
}

// ---------------------------------------------------------------------------
// Serde helpers: the parser writes "void" for functions without a result.
// ---------------------------------------------------------------------------

fn deser_return_type<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<String>::deserialize(d)?;
    Ok(v.filter(|t| t != "void"))
}
