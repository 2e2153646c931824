// Per-function wrapper emission: before hooks, native call, after hooks.

use std::collections::HashSet;

use crate::context::CodegenContext;
use crate::error::{CodegenError, CodegenResult};
use crate::marshal::{INDENT, MarshalStrategy};
use crate::naming::is_c_identifier;
use crate::schema::{CallStatus, VkFunction};
use crate::strategy_table::StrategyTable;

/// Generate one host-call wrapper.
///
/// All `before` hooks run in parameter order, then the native call is emitted,
/// then all `after` hooks run in parameter order. The body is assembled in a
/// scratch buffer; if any hook fails the error is returned and nothing of the
/// function is emitted. Marshal-in requests staged by the hooks reach the
/// registry only when the whole wrapper was produced.
pub fn emit_function(
    ctx: &mut CodegenContext,
    table: &StrategyTable,
    func: &mut VkFunction,
) -> CodegenResult<String> {
    let result = emit_wrapper(ctx, table, func);
    if result.is_ok() {
        ctx.commit_staged();
    } else {
        ctx.discard_staged();
    }
    result
}

fn emit_wrapper(
    ctx: &mut CodegenContext,
    table: &StrategyTable,
    func: &mut VkFunction,
) -> CodegenResult<String> {
    validate_signature(ctx, func)?;

    // Resolve up front: hooks may rename parameters.
    let strategies: Vec<&dyn MarshalStrategy> = func
        .params
        .iter()
        .map(|p| table.resolve(&func.sig.name, p, &ctx.registry))
        .collect();

    validate_locals(ctx, func, &strategies)?;

    let mut body = String::with_capacity(512);
    for (param, strategy) in func.params.iter_mut().zip(&strategies) {
        strategy.before(ctx, &func.sig, &mut body, param)?;
    }

    emit_native_call(ctx, func, &mut body);

    for (param, strategy) in func.params.iter_mut().zip(&strategies) {
        strategy.after(ctx, &func.sig, &mut body, param)?;
    }

    if func.sig.return_type.is_some() {
        let store = ctx.settings.return_statement(&ctx.settings.status_local);
        body.push_str(&format!("{INDENT}{store}\n"));
    }

    let name = &func.sig.name;
    let mut out = String::with_capacity(body.len() + 64);
    out.push_str(&format!("// {name}\n"));
    out.push_str(&format!("void {}{name}(CPU* cpu) {{\n", ctx.settings.wrapper_prefix));
    out.push_str(&body);
    out.push_str("}\n");

    tracing::debug!(function = %name, params = func.params.len(), "emitted wrapper");
    Ok(out)
}

fn validate_signature(ctx: &CodegenContext, func: &VkFunction) -> CodegenResult<()> {
    if !is_c_identifier(func.name()) {
        return Err(CodegenError::unsupported(
            func.name(),
            "",
            "function name is not a C identifier",
        ));
    }
    // A checked call compares the status local, which only exists for non-void returns.
    if func.sig.return_type.is_none() && func.sig.call_status() == CallStatus::Checked {
        return Err(CodegenError::unsupported(
            func.name(),
            "",
            format!("void function cannot be checked against {}", ctx.settings.success_value),
        ));
    }
    for param in &func.params {
        if !is_c_identifier(&param.name) {
            return Err(CodegenError::unsupported(
                func.name(),
                &param.name,
                "name is not a C identifier",
            ));
        }
        if !param.has_consistent_arity() {
            return Err(CodegenError::unsupported(
                func.name(),
                &param.name,
                "double pointer not marked as pointer",
            ));
        }
    }
    Ok(())
}

/// Every local the wrapper declares for a parameter, after any rename, must be
/// distinct and must not shadow the status local.
fn validate_locals(
    ctx: &CodegenContext,
    func: &VkFunction,
    strategies: &[&dyn MarshalStrategy],
) -> CodegenResult<()> {
    let mut seen = HashSet::new();
    for (param, strategy) in func.params.iter().zip(strategies) {
        let local = strategy
            .renamed_to(ctx, param)
            .unwrap_or_else(|| param.name.clone());
        if func.sig.return_type.is_some() && local == ctx.settings.status_local {
            return Err(CodegenError::unsupported(
                func.name(),
                &param.name,
                "name collides with the status local",
            ));
        }
        if !seen.insert(local.clone()) {
            return Err(CodegenError::unsupported(
                func.name(),
                &param.name,
                format!("local `{local}` is declared twice"),
            ));
        }
    }
    Ok(())
}

fn emit_native_call(ctx: &CodegenContext, func: &VkFunction, out: &mut String) {
    let settings = &ctx.settings;
    let args = func
        .params
        .iter()
        .map(|p| p.name_in_function.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let call = format!("{}{}({args})", settings.dispatch_prefix, func.sig.name);
    match &func.sig.return_type {
        Some(ret) => out.push_str(&format!("{INDENT}{ret} {} = {call};\n", settings.status_local)),
        None => out.push_str(&format!("{INDENT}{call};\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmitSettings, MarshalConfig};
    use crate::marshal::MapMemoryStrategy;
    use crate::schema::{FunctionSig, TypeCategory, TypeInfo, VkParam};

    fn ctx() -> CodegenContext {
        CodegenContext::new(
            [
                TypeInfo { name: "VkMemoryMapInfo".into(), category: TypeCategory::Struct },
                TypeInfo { name: "VkInstanceCreateInfo".into(), category: TypeCategory::Struct },
                TypeInfo { name: "VkDevice".into(), category: TypeCategory::Handle },
            ],
            EmitSettings::default(),
        )
    }

    fn table() -> StrategyTable {
        StrategyTable::new(&MarshalConfig::default()).with_map_memory(
            "vkMapMemory2",
            "ppData",
            MapMemoryStrategy::new("pMemoryMapInfo->memory", "pMemoryMapInfo->size", Some("ARG3")),
        )
    }

    fn map_memory2() -> VkFunction {
        VkFunction::new(
            FunctionSig::new("vkMapMemory2", Some("VkResult")),
            vec![
                VkParam::new("device", "VkDevice", "ARG1"),
                VkParam::new("pMemoryMapInfo", "VkMemoryMapInfo", "ARG2").pointer(),
                VkParam::new("ppData", "void", "ARG3").double_pointer(),
            ],
        )
    }

    #[test]
    fn emits_full_map_memory_wrapper() {
        let mut ctx = ctx();
        let mut func = map_memory2();
        let out = emit_function(&mut ctx, &table(), &mut func).unwrap();
        assert_eq!(
            out,
            "// vkMapMemory2\n\
             void boxed_vkMapMemory2(CPU* cpu) {\n\
             \x20   VkDevice device = (VkDevice)ARG1;\n\
             \x20   MarshalVkMemoryMapInfo local_pMemoryMapInfo(pBoxedInfo, cpu->memory, ARG2);\n\
             \x20   VkMemoryMapInfo* pMemoryMapInfo = &local_pMemoryMapInfo.s;\n\
             \x20   void* pData = NULL;\n\
             \x20   VkResult result = pBoxedInfo->pvkMapMemory2(device, pMemoryMapInfo, &pData);\n\
             \x20   if (result == VK_SUCCESS) {\n\
             \x20       cpu->memory->writed(ARG3, mapVkMemory(pMemoryMapInfo->memory, pData, pMemoryMapInfo->size));\n\
             \x20   }\n\
             \x20   EAX = result;\n\
             }\n"
        );
        assert_eq!(func.params[2].name, "pData");
        assert!(ctx.registry.needs_marshal_in("VkMemoryMapInfo"));
    }

    #[test]
    fn void_function_has_no_status() {
        let mut ctx = ctx();
        let mut func = VkFunction::new(
            FunctionSig::new("vkDestroyDevice", None),
            vec![
                VkParam::new("device", "VkDevice", "ARG1"),
                VkParam::new("pAllocator", "VkAllocationCallbacks", "ARG2").pointer(),
            ],
        );
        let out = emit_function(&mut ctx, &table(), &mut func).unwrap();
        assert!(out.contains("    pBoxedInfo->pvkDestroyDevice(device, pAllocator);\n"));
        assert!(!out.contains("result"));
        assert!(!out.contains("EAX"));
        assert!(out.contains("static bool shown_pAllocator;"));
    }

    #[test]
    fn before_and_after_follow_parameter_order() {
        let mut ctx = ctx();
        let table = StrategyTable::new(&MarshalConfig::default())
            .with_map_memory("vkTriple", "pA", MapMemoryStrategy::new("hA", "sA", None))
            .with_map_memory("vkTriple", "pB", MapMemoryStrategy::new("hB", "sB", None))
            .with_map_memory("vkTriple", "pC", MapMemoryStrategy::new("hC", "sC", None));
        let mut func = VkFunction::new(
            FunctionSig::new("vkTriple", Some("VkResult")).with_status(CallStatus::Succeeded),
            vec![
                VkParam::new("pA", "void", "ARG1").pointer(),
                VkParam::new("pB", "void", "ARG2").pointer(),
                VkParam::new("pC", "void", "ARG3").pointer(),
            ],
        );
        let out = emit_function(&mut ctx, &table, &mut func).unwrap();
        let pos = |needle: &str| out.find(needle).unwrap();

        assert!(pos("void* pA = NULL;") < pos("void* pB = NULL;"));
        assert!(pos("void* pB = NULL;") < pos("void* pC = NULL;"));
        let call = pos("pBoxedInfo->pvkTriple(pA, pB, pC);");
        assert!(pos("void* pC = NULL;") < call);
        assert!(call < pos("mapVkMemory(hA, pA, sA);"));
        assert!(pos("mapVkMemory(hA, pA, sA);") < pos("mapVkMemory(hB, pB, sB);"));
        assert!(pos("mapVkMemory(hB, pB, sB);") < pos("mapVkMemory(hC, pC, sC);"));
    }

    #[test]
    fn failing_hook_discards_function() {
        let mut ctx = ctx();
        let mut func = VkFunction::new(
            FunctionSig::new("vkCreateMystery", Some("VkResult")),
            vec![
                VkParam::new("device", "VkDevice", "ARG1"),
                VkParam::new("ppOut", "void", "ARG2").double_pointer(),
            ],
        );
        let err = emit_function(&mut ctx, &table(), &mut func).unwrap_err();
        assert!(matches!(err, CodegenError::Unsupported { ref param, .. } if param == "ppOut"));
    }

    #[test]
    fn inconsistent_arity_is_rejected() {
        let mut ctx = ctx();
        let mut bad = VkParam::new("ppData", "void", "ARG3");
        bad.is_double_pointer = true;
        let mut func = VkFunction::new(FunctionSig::new("vkMapMemory2", Some("VkResult")), vec![bad]);
        assert!(emit_function(&mut ctx, &table(), &mut func).is_err());
    }

    #[test]
    fn status_local_collision_is_rejected() {
        let mut ctx = ctx();
        let mut func = VkFunction::new(
            FunctionSig::new("vkGetThing", Some("VkResult")),
            vec![VkParam::new("result", "uint32_t", "ARG1")],
        );
        assert!(emit_function(&mut ctx, &table(), &mut func).is_err());
    }

    #[test]
    fn checked_void_function_is_rejected() {
        let mut ctx = ctx();
        let table = StrategyTable::new(&MarshalConfig::default()).with_map_memory(
            "vkF",
            "ppData",
            MapMemoryStrategy::new("memory", "size", None),
        );
        let mut func = VkFunction::new(
            FunctionSig::new("vkF", None).with_status(CallStatus::Checked),
            vec![VkParam::new("ppData", "void", "ARG1").double_pointer()],
        );
        let err = emit_function(&mut ctx, &table, &mut func).unwrap_err();
        assert!(matches!(err, CodegenError::Unsupported { ref function, .. } if function == "vkF"));
    }

    #[test]
    fn placeholder_collision_is_rejected() {
        let mut ctx = ctx();
        let table = StrategyTable::new(&MarshalConfig::default()).with_map_memory(
            "vkF",
            "ppData",
            MapMemoryStrategy::new("memory", "size", None),
        );
        let mut func = VkFunction::new(
            FunctionSig::new("vkF", Some("VkResult")),
            vec![
                VkParam::new("pData", "uint32_t", "ARG1"),
                VkParam::new("ppData", "void", "ARG2").double_pointer(),
            ],
        );
        let err = emit_function(&mut ctx, &table, &mut func).unwrap_err();
        assert!(matches!(err, CodegenError::Unsupported { ref param, .. } if param == "ppData"));
        assert_eq!(func.params[0].name, "pData");
        assert_eq!(func.params[1].name, "ppData");
    }

    #[test]
    fn two_renamed_params_are_rejected() {
        let mut ctx = ctx();
        let table = StrategyTable::new(&MarshalConfig::default())
            .with_map_memory("vkF", "ppA", MapMemoryStrategy::new("hA", "sA", None))
            .with_map_memory("vkF", "ppB", MapMemoryStrategy::new("hB", "sB", None));
        let mut func = VkFunction::new(
            FunctionSig::new("vkF", Some("VkResult")),
            vec![
                VkParam::new("ppA", "void", "ARG1").double_pointer(),
                VkParam::new("ppB", "void", "ARG2").double_pointer(),
            ],
        );
        let err = emit_function(&mut ctx, &table, &mut func).unwrap_err();
        assert!(err.to_string().contains("`pData` is declared twice"));
    }

    #[test]
    fn function_name_must_be_identifier() {
        let mut ctx = ctx();
        let mut func = VkFunction::new(
            FunctionSig::new("vkF(); evil", Some("VkResult")),
            vec![VkParam::new("device", "VkDevice", "ARG1")],
        );
        let err = emit_function(&mut ctx, &table(), &mut func).unwrap_err();
        assert!(err.to_string().contains("unsupported signature"));
    }

    #[test]
    fn failed_function_leaves_no_marshal_in_flags() {
        let mut ctx = ctx();
        let mut func = VkFunction::new(
            FunctionSig::new("vkBad", Some("VkResult")),
            vec![
                VkParam::new("pInfo", "VkInstanceCreateInfo", "ARG1").pointer(),
                VkParam::new("ppX", "void", "ARG2").double_pointer(),
            ],
        );
        assert!(emit_function(&mut ctx, &table(), &mut func).is_err());
        assert!(!ctx.registry.needs_marshal_in("VkInstanceCreateInfo"));
        assert!(!ctx.is_staged("VkInstanceCreateInfo"));

        // A later successful function is unaffected by the discarded one.
        emit_function(&mut ctx, &table(), &mut map_memory2()).unwrap();
        assert_eq!(ctx.registry.marshal_in_types().collect::<Vec<_>>(), vec!["VkMemoryMapInfo"]);
    }

    #[test]
    fn same_input_same_output() {
        let first = emit_function(&mut ctx(), &table(), &mut map_memory2()).unwrap();
        let second = emit_function(&mut ctx(), &table(), &mut map_memory2()).unwrap();
        assert_eq!(first, second);
    }
}
