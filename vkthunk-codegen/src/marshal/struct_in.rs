// Marshal-in strategy: copy a guest struct into a local host struct before the call.
//
// Types in the excluded set have no host representation. For those the wrapper
// logs once per call site (at emulator runtime) and passes NULL instead.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::context::CodegenContext;
use crate::error::{CodegenError, CodegenResult};
use crate::naming::{escape_c_string, local_name, marshal_class, shown_flag};
use crate::schema::{FunctionSig, VkParam};

use super::{INDENT, MarshalStrategy};

pub struct StructInStrategy {
    excluded: BTreeSet<String>,
    /// Set once the generator has warned about excluded types during this run.
    warned: AtomicBool,
}

impl StructInStrategy {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StructInStrategy {
            excluded: excluded.into_iter().map(Into::into).collect(),
            warned: AtomicBool::new(false),
        }
    }

    pub fn is_excluded(&self, type_name: &str) -> bool {
        self.excluded.contains(type_name)
    }

    /// Whether the generator-side warning has been logged this run.
    pub fn has_warned(&self) -> bool {
        self.warned.load(Ordering::Relaxed)
    }

    /// Forget the generator-side warning so the next excluded parameter logs again.
    pub fn reset(&self) {
        self.warned.store(false, Ordering::Relaxed);
    }

    fn emit_null(&self, ctx: &CodegenContext, func: &FunctionSig, out: &mut String, param: &VkParam) {
        if !self.warned.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                function = %func.name,
                param = %param.name,
                "{} is not implemented; generated wrappers pass NULL",
                param.param_type
            );
        }

        let flag = shown_flag(&param.name);
        let message = escape_c_string(&format!("{}:{} not implemented", func.name, param.param_type));
        let log_fn = &ctx.settings.log_fn;
        out.push_str(&format!("{INDENT}static bool {flag};\n"));
        out.push_str(&format!("{INDENT}if (!{flag} && {}) {{\n", param.param_arg));
        out.push_str(&format!("{INDENT}{INDENT}{log_fn}(\"{message}\");\n"));
        out.push_str(&format!("{INDENT}{INDENT}{flag} = true;\n"));
        out.push_str(&format!("{INDENT}}}\n"));
        out.push_str(&format!("{INDENT}{}* {} = NULL;\n", param.param_type, param.name));
    }
}

impl MarshalStrategy for StructInStrategy {
    fn name(&self) -> &'static str {
        "struct_in"
    }

    fn before(
        &self,
        ctx: &mut CodegenContext,
        func: &FunctionSig,
        out: &mut String,
        param: &mut VkParam,
    ) -> CodegenResult<()> {
        if !param.is_pointer || param.is_double_pointer {
            return Err(CodegenError::unsupported(
                &func.name,
                &param.name,
                "struct marshal-in expects a single pointer",
            ));
        }

        if self.is_excluded(&param.param_type) {
            self.emit_null(ctx, func, out, param);
            return Ok(());
        }

        match ctx.registry.get(&param.param_type) {
            Some(t) if t.category.has_layout() => {}
            Some(t) => {
                return Err(CodegenError::unsupported(
                    &func.name,
                    &param.name,
                    format!("type `{}` is a {:?}, not a struct or union", t.name, t.category),
                ));
            }
            None => {
                return Err(CodegenError::unsupported(
                    &func.name,
                    &param.name,
                    format!("type `{}` has no known layout", param.param_type),
                ));
            }
        }

        let ty = &param.param_type;
        let local = local_name(&param.name);
        let settings = &ctx.settings;
        out.push_str(&format!(
            "{INDENT}{} {local}({}, {}, {});\n",
            marshal_class(ty),
            settings.marshal_context,
            settings.memory_accessor,
            param.param_arg
        ));
        out.push_str(&format!("{INDENT}{ty}* {} = &{local}.s;\n", param.name));

        ctx.stage_marshal_in(ty);
        Ok(())
    }
}
