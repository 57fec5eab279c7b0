//! JUnit 5 skeleton rendering.
//!
//! Two shapes are produced: a per-method class with one stub per generated
//! case, and a whole-class skeleton with one stub per public method. Neither
//! asserts anything; every stub ends in an explicit failure so the missing
//! oracle cannot go unnoticed.

use crate::core::signatures::{ClassSignature, MethodSignature, Parameter};
use crate::synthesis::combinations::TestCase;
use crate::synthesis::values::{CandidateKind, CandidateValue, NumericKind, TypeClass};

const IMPORTS: &str = "import org.junit.jupiter.api.Test;\nimport static org.junit.jupiter.api.Assertions.*;\n";
const VALUE_PLACEHOLDER: &str = "/* TODO: provide value */";
const INDENT: &str = "        ";

/// Name used for the method in test identifiers; constructors become `<Class>Constructor`.
pub fn method_display_name(class: &ClassSignature, method: &MethodSignature) -> String {
    if method.is_constructor {
        format!("{}Constructor", class.class_name)
    } else {
        method.name.clone()
    }
}

/// Test class name for a whole-class skeleton, e.g. `CartTest`.
pub fn test_class_name(class: &ClassSignature, suffix: &str) -> String {
    format!("{}{}", class.class_name, suffix)
}

/// Test class name for generated cases of one method, e.g. `CartAddItemGeneratedTest`.
pub fn generated_test_class_name(class: &ClassSignature, method: &MethodSignature) -> String {
    let display = method_display_name(class, method);
    if method.is_constructor {
        format!("{display}GeneratedTest")
    } else {
        format!("{}{}GeneratedTest", class.class_name, capitalize(&display))
    }
}

/// Render one test stub per case, in case order.
pub fn render_case_class(class: &ClassSignature, method: &MethodSignature, cases: &[TestCase]) -> String {
    let display = method_display_name(class, method);
    let mut lines = Vec::new();

    lines.push(format!(
        "public class {} {{",
        generated_test_class_name(class, method)
    ));
    lines.push(String::new());

    for case in cases {
        lines.push("    @Test".to_string());
        lines.push(format!("    void test_{}_case{}() {{", display, case.index));
        lines.push(format!("{INDENT}// Arrange"));
        if method.needs_instance() {
            lines.push(instance_line(class));
        }
        for parameter in &method.parameters {
            lines.push(case_parameter_line(parameter, case));
        }
        push_act_and_assert(&mut lines, class, method);
    }

    lines.push("}".to_string());
    assemble(class, &lines)
}

/// Render a whole-class skeleton with one stub per public method.
pub fn render_class_skeleton(class: &ClassSignature, suffix: &str) -> String {
    let mut lines = Vec::new();

    lines.push(format!("public class {} {{", test_class_name(class, suffix)));
    lines.push(String::new());

    for method in class.methods.iter().filter(|m| m.is_public()) {
        lines.push("    @Test".to_string());
        lines.push(format!(
            "    void test_{}() {{",
            method_display_name(class, method)
        ));
        lines.push(format!("{INDENT}// Arrange"));
        if method.needs_instance() {
            lines.push(instance_line(class));
        }
        for parameter in &method.parameters {
            lines.push(format!(
                "{INDENT}// TODO: initialize parameter '{}' of type '{}'",
                parameter.name, parameter.type_name
            ));
        }
        push_act_and_assert(&mut lines, class, method);
    }

    lines.push("}".to_string());
    assemble(class, &lines)
}

fn assemble(class: &ClassSignature, body: &[String]) -> String {
    let mut out = String::new();
    if !class.package.is_empty() {
        out.push_str(&format!("package {};\n\n", class.package));
    }
    out.push_str(IMPORTS);
    out.push('\n');
    out.push_str(&body.join("\n"));
    out.push('\n');
    out
}

fn instance_line(class: &ClassSignature) -> String {
    format!(
        "{INDENT}{name} obj = new {name}();",
        name = class.class_name
    )
}

fn push_act_and_assert(lines: &mut Vec<String>, class: &ClassSignature, method: &MethodSignature) {
    let arguments = method
        .parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let call = if method.is_constructor {
        format!("new {}({})", class.class_name, arguments)
    } else if method.is_static {
        format!("{}.{}({})", class.class_name, method.name, arguments)
    } else {
        format!("obj.{}({})", method.name, arguments)
    };

    lines.push(String::new());
    lines.push(format!("{INDENT}// Act"));
    if method.returns_value() {
        lines.push(format!("{INDENT}var result = {call};"));
    } else {
        lines.push(format!("{INDENT}{call};"));
    }
    lines.push(String::new());
    lines.push(format!("{INDENT}// Assert"));
    lines.push(format!("{INDENT}// TODO: add meaningful assertions"));
    lines.push(format!("{INDENT}fail(\"Not yet implemented\");"));
    lines.push("    }".to_string());
    lines.push(String::new());
}

fn case_parameter_line(parameter: &Parameter, case: &TestCase) -> String {
    let type_class = TypeClass::classify(&parameter.type_name);
    let literal = match (case.values.get(&parameter.name), case.origins.get(&parameter.name)) {
        (Some(value), Some(origin)) => java_literal(value, origin.kind, type_class),
        _ => VALUE_PLACEHOLDER.to_string(),
    };
    let annotation = case
        .origins
        .get(&parameter.name)
        .map(|origin| format!(" // {} ({})", origin.label, origin.kind))
        .unwrap_or_default();

    format!(
        "{INDENT}{} {} = {};{}",
        parameter.type_name, parameter.name, literal, annotation
    )
}

/// Java source text for a candidate value.
pub fn java_literal(value: &CandidateValue, kind: CandidateKind, type_class: TypeClass) -> String {
    match value {
        CandidateValue::Null if kind == CandidateKind::EquivalenceNull || type_class == TypeClass::Text => {
            "null".to_string()
        }
        CandidateValue::Null => VALUE_PLACEHOLDER.to_string(),
        CandidateValue::Int(n) => match type_class {
            TypeClass::Numeric(NumericKind::Long) => format!("{n}L"),
            TypeClass::Numeric(NumericKind::Short) => format!("(short) {n}"),
            TypeClass::Numeric(NumericKind::Byte) => format!("(byte) {n}"),
            _ => n.to_string(),
        },
        CandidateValue::Float(x) => match type_class {
            TypeClass::Numeric(NumericKind::Float) => format!("{x:?}f"),
            _ => format!("{x:?}"),
        },
        CandidateValue::Text(text) => java_string_literal(text),
    }
}

fn java_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
