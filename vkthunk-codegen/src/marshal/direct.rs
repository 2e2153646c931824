// Pass-through strategy: cast the guest argument straight to the host type.

use crate::context::CodegenContext;
use crate::error::{CodegenError, CodegenResult};
use crate::naming::c_type;
use crate::schema::{FunctionSig, VkParam};

use super::{INDENT, MarshalStrategy};

/// Handles, scalars and pointers that need no translation.
#[derive(Debug, Default)]
pub struct DirectStrategy;

impl MarshalStrategy for DirectStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn before(
        &self,
        _ctx: &mut CodegenContext,
        func: &FunctionSig,
        out: &mut String,
        param: &mut VkParam,
    ) -> CodegenResult<()> {
        if param.is_double_pointer {
            return Err(CodegenError::unsupported(
                &func.name,
                &param.name,
                "double pointers need an explicit strategy",
            ));
        }
        let ty = c_type(&param.param_type, param.is_pointer);
        out.push_str(&format!("{INDENT}{ty} {} = ({ty}){};\n", param.name, param.param_arg));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmitSettings;

    #[test]
    fn casts_scalar_argument() {
        let mut ctx = CodegenContext::new([], EmitSettings::default());
        let sig = FunctionSig::new("vkDestroyDevice", None);
        let mut param = VkParam::new("device", "VkDevice", "ARG1");
        let mut out = String::new();
        DirectStrategy.before(&mut ctx, &sig, &mut out, &mut param).unwrap();
        assert_eq!(out, "    VkDevice device = (VkDevice)ARG1;\n");
        assert_eq!(param.name_in_function, "device");
    }

    #[test]
    fn casts_pointer_argument() {
        let mut ctx = CodegenContext::new([], EmitSettings::default());
        let sig = FunctionSig::new("vkGetDeviceProcAddr", None);
        let mut param = VkParam::new("pName", "char", "ARG2").pointer();
        let mut out = String::new();
        DirectStrategy.before(&mut ctx, &sig, &mut out, &mut param).unwrap();
        assert_eq!(out, "    char* pName = (char*)ARG2;\n");
    }

    #[test]
    fn after_is_noop() {
        let mut ctx = CodegenContext::new([], EmitSettings::default());
        let sig = FunctionSig::new("vkDestroyDevice", None);
        let mut param = VkParam::new("device", "VkDevice", "ARG1");
        let mut out = String::new();
        DirectStrategy.after(&mut ctx, &sig, &mut out, &mut param).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn rejects_double_pointer() {
        let mut ctx = CodegenContext::new([], EmitSettings::default());
        let sig = FunctionSig::new("vkMapMemory", Some("VkResult"));
        let mut param = VkParam::new("ppData", "void", "ARG6").double_pointer();
        let mut out = String::new();
        let err = DirectStrategy.before(&mut ctx, &sig, &mut out, &mut param).unwrap_err();
        assert!(matches!(err, CodegenError::Unsupported { .. }));
        assert!(out.is_empty());
    }
}
