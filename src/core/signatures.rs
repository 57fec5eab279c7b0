//! Class and method signatures produced by the external Java source analyzer.
//!
//! The engine never parses Java itself. It consumes a JSON document holding an
//! array of [`ClassSignature`] values and trusts its shape.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{Result, TestforgeError};

/// A declared method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Signature of a single method or constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_constructor: bool,
}

impl MethodSignature {
    pub fn is_public(&self) -> bool {
        self.modifiers.iter().any(|m| m == "public")
    }

    /// True when invoking the method yields a value worth capturing.
    pub fn returns_value(&self) -> bool {
        self.return_type
            .as_deref()
            .map(|ty| !ty.eq_ignore_ascii_case("void"))
            .unwrap_or(false)
    }

    /// True when the method is called through an instance of its class.
    pub fn needs_instance(&self) -> bool {
        !self.is_static && !self.is_constructor
    }

    fn parameter_types_match(&self, types: &[String]) -> bool {
        self.parameters.len() == types.len()
            && self
                .parameters
                .iter()
                .zip(types)
                .all(|(param, ty)| param.type_name == *ty)
    }
}

/// Signature of a top-level class and its methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSignature {
    #[serde(default)]
    pub package: String,
    pub class_name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
}

impl ClassSignature {
    /// Package-qualified class name; the bare class name in the default package.
    pub fn fqn(&self) -> String {
        if self.package.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package, self.class_name)
        }
    }

    pub fn has_public_methods(&self) -> bool {
        self.methods.iter().any(MethodSignature::is_public)
    }

    /// Find a method by name, optionally narrowed by exact parameter types.
    ///
    /// Without a type list the first declared method with the name wins.
    pub fn find_method(&self, name: &str, parameter_types: Option<&[String]>) -> Option<&MethodSignature> {
        self.methods.iter().find(|method| {
            method.name == name
                && parameter_types
                    .map(|types| method.parameter_types_match(types))
                    .unwrap_or(true)
        })
    }
}

/// A method resolved together with the class that declares it
#[derive(Debug, Clone)]
pub struct ResolvedTarget<'a> {
    pub class: &'a ClassSignature,
    pub method: &'a MethodSignature,
}

/// Counts over a signature set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub num_classes: usize,
    pub num_methods: usize,
    pub num_public_methods: usize,
}

/// Load a signatures document from disk.
pub fn load_signatures(path: &Path) -> Result<Vec<ClassSignature>> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        TestforgeError::io(
            format!("Failed to read signatures file at {}", path.display()),
            err,
        )
    })?;
    let classes = parse_signatures(&content)?;
    debug!(
        "Loaded {} class signatures from {}",
        classes.len(),
        path.display()
    );
    Ok(classes)
}

/// Parse a signatures document held in memory.
pub fn parse_signatures(content: &str) -> Result<Vec<ClassSignature>> {
    serde_json::from_str(content).map_err(|err| TestforgeError::Serialization {
        message: format!("Failed to parse class signatures: {err}"),
        data_type: Some("signatures".to_string()),
        source: Some(Box::new(err)),
    })
}

/// Resolve a class by fully-qualified name and a method within it.
pub fn resolve_target<'a>(
    classes: &'a [ClassSignature],
    class_fqn: &str,
    method_name: &str,
    parameter_types: Option<&[String]>,
) -> Result<ResolvedTarget<'a>> {
    classes
        .iter()
        .filter(|class| class.fqn() == class_fqn)
        .find_map(|class| {
            class
                .find_method(method_name, parameter_types)
                .map(|method| ResolvedTarget { class, method })
        })
        .ok_or_else(|| TestforgeError::resolution(class_fqn, method_name))
}

/// Summarize a signature set.
pub fn summarize(classes: &[ClassSignature]) -> ProjectSummary {
    ProjectSummary {
        num_classes: classes.len(),
        num_methods: classes.iter().map(|c| c.methods.len()).sum(),
        num_public_methods: classes
            .iter()
            .flat_map(|c| c.methods.iter())
            .filter(|m| m.is_public())
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "package": "com.shop",
            "class_name": "Cart",
            "file_path": "src/main/java/com/shop/Cart.java",
            "methods": [
                {
                    "name": "applyDiscount",
                    "return_type": "double",
                    "parameters": [
                        {"name": "amount", "type": "int"},
                        {"name": "discount", "type": "int"}
                    ],
                    "modifiers": ["public"],
                    "is_static": false,
                    "is_constructor": false
                },
                {
                    "name": "applyDiscount",
                    "return_type": "double",
                    "parameters": [{"name": "code", "type": "String"}],
                    "modifiers": ["public"]
                },
                {
                    "name": "Cart",
                    "parameters": [],
                    "modifiers": ["public"],
                    "is_constructor": true
                },
                {
                    "name": "recalc",
                    "return_type": "void",
                    "modifiers": ["private"]
                }
            ]
        },
        {
            "package": "",
            "class_name": "Util",
            "methods": []
        }
    ]"#;

    #[test]
    fn parses_analyzer_output() {
        let classes = parse_signatures(SAMPLE).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].fqn(), "com.shop.Cart");
        assert_eq!(classes[1].fqn(), "Util");
        assert_eq!(classes[0].methods[0].parameters[1].type_name, "int");
    }

    #[test]
    fn resolves_first_declared_overload_without_types() {
        let classes = parse_signatures(SAMPLE).unwrap();
        let target = resolve_target(&classes, "com.shop.Cart", "applyDiscount", None).unwrap();
        assert_eq!(target.method.parameters.len(), 2);
    }

    #[test]
    fn resolves_overload_by_parameter_types() {
        let classes = parse_signatures(SAMPLE).unwrap();
        let types = vec!["String".to_string()];
        let target =
            resolve_target(&classes, "com.shop.Cart", "applyDiscount", Some(&types)).unwrap();
        assert_eq!(target.method.parameters[0].name, "code");
    }

    #[test]
    fn unknown_target_is_a_resolution_failure() {
        let classes = parse_signatures(SAMPLE).unwrap();
        let err = resolve_target(&classes, "com.shop.Missing", "applyDiscount", None).unwrap_err();
        assert!(matches!(
            err,
            TestforgeError::Resolution { ref class_fqn, ref method }
                if class_fqn == "com.shop.Missing" && method == "applyDiscount"
        ));

        let err = resolve_target(&classes, "com.shop.Cart", "checkout", None).unwrap_err();
        assert!(matches!(err, TestforgeError::Resolution { .. }));
    }

    #[test]
    fn return_value_and_instance_flags() {
        let classes = parse_signatures(SAMPLE).unwrap();
        let cart = &classes[0];
        assert!(cart.methods[0].returns_value());
        assert!(cart.methods[0].needs_instance());
        assert!(!cart.methods[2].returns_value());
        assert!(!cart.methods[2].needs_instance());
        assert!(!cart.methods[3].returns_value());
    }

    #[test]
    fn summary_counts_public_methods() {
        let classes = parse_signatures(SAMPLE).unwrap();
        let summary = summarize(&classes);
        assert_eq!(
            summary,
            ProjectSummary {
                num_classes: 2,
                num_methods: 4,
                num_public_methods: 3,
            }
        );
    }

    #[test]
    fn malformed_document_is_a_serialization_error() {
        let err = parse_signatures("{not json").unwrap_err();
        assert!(matches!(err, TestforgeError::Serialization { .. }));
    }
}
