// Per-parameter marshaling strategies.
//
// The emission loop calls `before` for every parameter in declaration order,
// emits the native call, then calls `after` for every parameter, again in
// declaration order. Emitted code may reference locals declared by earlier
// parameters' hooks.

pub mod direct;
pub mod struct_in;
pub mod map_memory;

use crate::context::CodegenContext;
use crate::error::CodegenResult;
use crate::schema::{FunctionSig, VkParam};

pub use direct::DirectStrategy;
pub use map_memory::MapMemoryStrategy;
pub use struct_in::StructInStrategy;

/// Indentation of statements inside a generated wrapper body.
pub(crate) const INDENT: &str = "    ";

/// A policy for translating one guest parameter into a host value and back.
pub trait MarshalStrategy {
    /// Short name used in plans and logs.
    fn name(&self) -> &'static str;

    /// Append statements that leave a host-usable value under
    /// `param.name_in_function`. May rename the parameter and stage
    /// marshal-in requests on the context.
    fn before(
        &self,
        ctx: &mut CodegenContext,
        func: &FunctionSig,
        out: &mut String,
        param: &mut VkParam,
    ) -> CodegenResult<()>;

    /// The name `before` will give `param`, if it renames it. Lets the loop
    /// reject clashing locals before anything is emitted.
    fn renamed_to(&self, _ctx: &CodegenContext, _param: &VkParam) -> Option<String> {
        None
    }

    /// Append statements that publish host results back to the guest once the
    /// native call returned. No-op by default.
    fn after(
        &self,
        _ctx: &mut CodegenContext,
        _func: &FunctionSig,
        _out: &mut String,
        _param: &mut VkParam,
    ) -> CodegenResult<()> {
        Ok(())
    }
}
