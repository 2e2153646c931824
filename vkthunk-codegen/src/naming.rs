// Name and expression helpers for the emitted C++ text.

/// C spelling of a parameter's declared type, one `*` per pointer level.
pub fn c_type(type_name: &str, is_pointer: bool) -> String {
    if is_pointer {
        format!("{type_name}*")
    } else {
        type_name.to_string()
    }
}

/// Name of the marshal-context local backing a parameter.
pub fn local_name(param_name: &str) -> String {
    format!("local_{param_name}")
}

/// Name of the marshal constructor class for a type (e.g. `MarshalVkSubmitInfo`).
pub fn marshal_class(type_name: &str) -> String {
    format!("Marshal{type_name}")
}

/// Name of the per-call-site `static bool` guarding a one-time log line.
pub fn shown_flag(param_name: &str) -> String {
    format!("shown_{param_name}")
}

pub fn address_of(expr: &str) -> String {
    format!("&{expr}")
}

/// Escape text for use inside a C string literal.
pub fn escape_c_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

/// Check that a name can be used verbatim as a C identifier.
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
