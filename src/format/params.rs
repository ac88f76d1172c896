//! Parameter list rendering.

use super::value::{format_value, ValueFormat};
use crate::parser::{ParamKind, Parameter};
use crate::utils::config::COMPACT_PARAM_LIMIT;

/// Rendering mode for parameter lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsFormat {
    /// One line; long lists collapse to the first two plus a count
    Compact { max_value_len: usize },
    /// One parameter per line, values pretty-printed
    Full,
}

/// Render a parameter list without surrounding parentheses
pub fn format_parameters(params: Option<&[Parameter]>, mode: ParamsFormat) -> String {
    let params = match params {
        Some(p) if !p.is_empty() => p,
        _ => return String::new(),
    };

    match mode {
        ParamsFormat::Compact { max_value_len } => {
            let value_mode = ValueFormat::Compact {
                max_len: max_value_len,
            };
            if params.len() > COMPACT_PARAM_LIMIT {
                let shown: Vec<String> = params
                    .iter()
                    .take(2)
                    .map(|p| format_parameter(p, value_mode))
                    .collect();
                format!("{}, +{} more", shown.join(", "), params.len() - 2)
            } else {
                params
                    .iter()
                    .map(|p| format_parameter(p, value_mode))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
        ParamsFormat::Full => params
            .iter()
            .map(|p| format_parameter(p, ValueFormat::Full))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render one parameter according to how it is bound
pub fn format_parameter(param: &Parameter, mode: ValueFormat) -> String {
    let prefix = match param.kind {
        ParamKind::Rest => "*",
        ParamKind::Keyrest => "**",
        ParamKind::Block => "&",
        ParamKind::Req | ParamKind::Opt | ParamKind::Key | ParamKind::Keyreq => "",
    };

    if param.kind == ParamKind::Block {
        return format!("{}{}", prefix, param.name);
    }

    let value = format_value(param.value.as_ref(), mode);
    if param.name.is_empty() {
        return format!("{}{}", prefix, value);
    }

    match param.kind {
        ParamKind::Key | ParamKind::Keyreq => format!("{}: {}", param.name, value),
        _ => format!("{}{}={}", prefix, param.name, value),
    }
}
