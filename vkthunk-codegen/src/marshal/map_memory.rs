// Acquire/report strategy for memory-mapping calls.
//
// `before` declares the host pointer the native call writes into; `after`
// registers (handle, pointer, size) with the emulator's mapping table once the
// call succeeded, optionally writing the guest-visible address back.

use crate::config::MapMemoryEntry;
use crate::context::CodegenContext;
use crate::error::{CodegenError, CodegenResult};
use crate::naming::{address_of, c_type};
use crate::schema::{CallStatus, FunctionSig, VkParam};

use super::{INDENT, MarshalStrategy};

#[derive(Debug, Clone)]
pub struct MapMemoryStrategy {
    /// Expression for the originating memory handle.
    handle: String,
    /// Expression for the mapped size.
    size: String,
    /// Guest address receiving the mapping, if the call reports one.
    guest_out: Option<String>,
}

impl MapMemoryStrategy {
    pub fn new(handle: &str, size: &str, guest_out: Option<&str>) -> Self {
        MapMemoryStrategy {
            handle: handle.to_string(),
            size: size.to_string(),
            guest_out: guest_out.map(str::to_string),
        }
    }

    pub fn from_entry(entry: &MapMemoryEntry) -> Self {
        MapMemoryStrategy::new(&entry.handle, &entry.size, entry.guest_out.as_deref())
    }

    fn registration(&self, ctx: &CodegenContext, pointer: &str) -> String {
        let settings = &ctx.settings;
        let call = format!("{}({}, {pointer}, {})", settings.map_fn, self.handle, self.size);
        match &self.guest_out {
            Some(addr) => format!("{}({addr}, {call});", settings.guest_write),
            None => format!("{call};"),
        }
    }
}

impl MarshalStrategy for MapMemoryStrategy {
    fn name(&self) -> &'static str {
        "map_memory"
    }

    fn before(
        &self,
        ctx: &mut CodegenContext,
        func: &FunctionSig,
        out: &mut String,
        param: &mut VkParam,
    ) -> CodegenResult<()> {
        if !param.is_pointer {
            return Err(CodegenError::unsupported(
                &func.name,
                &param.name,
                "mapped memory must be returned through a pointer",
            ));
        }
        if let Some(placeholder) = self.renamed_to(ctx, param) {
            param.name_in_function = address_of(&placeholder);
            param.name = placeholder;
        }
        let ty = c_type(&param.param_type, param.is_pointer);
        out.push_str(&format!("{INDENT}{ty} {} = NULL;\n", param.name));
        Ok(())
    }

    fn renamed_to(&self, ctx: &CodegenContext, param: &VkParam) -> Option<String> {
        param
            .is_double_pointer
            .then(|| ctx.settings.placeholder.clone())
    }

    fn after(
        &self,
        ctx: &mut CodegenContext,
        func: &FunctionSig,
        out: &mut String,
        param: &mut VkParam,
    ) -> CodegenResult<()> {
        let registration = self.registration(ctx, &param.name);
        match func.call_status() {
            CallStatus::Checked => {
                let settings = &ctx.settings;
                out.push_str(&format!(
                    "{INDENT}if ({} == {}) {{\n",
                    settings.status_local, settings.success_value
                ));
                out.push_str(&format!("{INDENT}{INDENT}{registration}\n"));
                out.push_str(&format!("{INDENT}}}\n"));
            }
            CallStatus::Succeeded => {
                out.push_str(&format!("{INDENT}{registration}\n"));
            }
            CallStatus::Failed => {}
        }
        Ok(())
    }
}
