//! Heuristic coverage-improvement guidance.
//!
//! Rules are ordered tables of (predicate, message) pairs. Method name rules
//! are first-match-wins; the null-input rule and every class rule are
//! evaluated independently.

/// Coverage facts a method rule may inspect
#[derive(Debug, Clone, Copy)]
pub struct MethodFacts<'a> {
    pub name: &'a str,
    pub descriptor: &'a str,
    pub instruction_ratio: f64,
    pub uncovered_lines: usize,
}

/// Coverage facts a class rule may inspect
#[derive(Debug, Clone, Copy)]
pub struct ClassFacts<'a> {
    pub fqn: &'a str,
    pub instruction_ratio: f64,
    pub branch_ratio: f64,
    pub uncovered_lines_total: usize,
}

/// A named method rule
pub struct MethodRule {
    pub id: &'static str,
    pub applies: fn(&MethodFacts<'_>) -> bool,
    pub message: &'static str,
}

/// A named class rule; the message may interpolate facts
pub struct ClassRule {
    pub id: &'static str,
    pub applies: fn(&ClassFacts<'_>, f64) -> bool,
    pub render: fn(&ClassFacts<'_>) -> String,
}

/// Name-pattern rules in precedence order. The last rule always matches.
pub const METHOD_NAME_RULES: &[MethodRule] = &[
    MethodRule {
        id: "accessor",
        applies: |m| m.name.starts_with("get") || m.name.starts_with("set"),
        message: "Add tests exercising this accessor/mutator with representative field values.",
    },
    MethodRule {
        id: "equals",
        applies: |m| m.name.to_lowercase().contains("equals"),
        message: "Add tests for equals() covering same-object, equal-object, and non-equal cases.",
    },
    MethodRule {
        id: "to_string",
        applies: |m| m.name.contains("toString"),
        message: "Add tests verifying the toString() output for key object states.",
    },
    MethodRule {
        id: "branches",
        applies: |_| true,
        message: "Add tests that execute all branches and edge cases for this method.",
    },
];

/// Appended after the name rule, independently of which one fired.
pub const NULL_INPUT_RULE: MethodRule = MethodRule {
    id: "null_input",
    applies: |m| m.descriptor.to_lowercase().contains("null"),
    message: "Include tests with null or missing inputs if allowed by the API.",
};

/// Class rules; every matching rule contributes a message.
pub const CLASS_RULES: &[ClassRule] = &[
    ClassRule {
        id: "instruction_coverage",
        applies: |c, threshold| c.instruction_ratio < threshold,
        render: |c| {
            format!(
                "Increase instruction coverage for {} (current ~{}); focus on methods with uncovered lines.",
                c.fqn,
                percent(c.instruction_ratio)
            )
        },
    },
    ClassRule {
        id: "branch_coverage",
        applies: |c, threshold| c.branch_ratio < threshold,
        render: |c| {
            format!(
                "Add tests to exercise alternate branches in {} (branch coverage ~{}).",
                c.fqn,
                percent(c.branch_ratio)
            )
        },
    },
    ClassRule {
        id: "hidden_paths",
        applies: |c, _| c.uncovered_lines_total == 0 && c.instruction_ratio < 1.0,
        render: |_| {
            "JaCoCo reports partial coverage; confirm that helper methods and early returns are tested."
                .to_string()
        },
    },
];

/// Guidance for one method; empty unless it is under threshold with uncovered lines.
pub fn method_recommendations(facts: &MethodFacts<'_>, threshold: f64) -> Vec<String> {
    if facts.instruction_ratio >= threshold || facts.uncovered_lines == 0 {
        return Vec::new();
    }

    let mut recommendations: Vec<String> = METHOD_NAME_RULES
        .iter()
        .find(|rule| (rule.applies)(facts))
        .map(|rule| rule.message.to_string())
        .into_iter()
        .collect();

    if (NULL_INPUT_RULE.applies)(facts) {
        recommendations.push(NULL_INPUT_RULE.message.to_string());
    }

    recommendations
}

/// Guidance for one class.
pub fn class_recommendations(facts: &ClassFacts<'_>, threshold: f64) -> Vec<String> {
    CLASS_RULES
        .iter()
        .filter(|rule| (rule.applies)(facts, threshold))
        .map(|rule| (rule.render)(facts))
        .collect()
}

/// Ratio as a rounded whole percentage, e.g. `0.654` -> `"65%"`.
pub fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &'static str, descriptor: &'static str) -> MethodFacts<'static> {
        MethodFacts {
            name,
            descriptor,
            instruction_ratio: 0.4,
            uncovered_lines: 3,
        }
    }

    fn class(instruction_ratio: f64, branch_ratio: f64, uncovered: usize) -> ClassFacts<'static> {
        ClassFacts {
            fqn: "com.shop.Cart",
            instruction_ratio,
            branch_ratio,
            uncovered_lines_total: uncovered,
        }
    }

    #[test]
    fn accessor_rule_wins_over_equals() {
        let recs = method_recommendations(&method("getEqualsFlag", "()Z"), 0.8);
        assert_eq!(recs, vec![METHOD_NAME_RULES[0].message.to_string()]);
    }

    #[test]
    fn equals_match_is_case_insensitive() {
        let recs = method_recommendations(&method("deepEQUALS", "(Ljava/lang/Object;)Z"), 0.8);
        assert_eq!(recs, vec![METHOD_NAME_RULES[1].message.to_string()]);
    }

    #[test]
    fn to_string_match_is_case_sensitive() {
        let recs = method_recommendations(&method("toString", "()Ljava/lang/String;"), 0.8);
        assert_eq!(recs, vec![METHOD_NAME_RULES[2].message.to_string()]);

        let recs = method_recommendations(&method("tostring", "()Ljava/lang/String;"), 0.8);
        assert_eq!(recs, vec![METHOD_NAME_RULES[3].message.to_string()]);
    }

    #[test]
    fn null_rule_is_appended_independently() {
        let recs = method_recommendations(&method("setOwner", "(Lcom/shop/NullableOwner;)V"), 0.8);
        assert_eq!(
            recs,
            vec![
                METHOD_NAME_RULES[0].message.to_string(),
                NULL_INPUT_RULE.message.to_string()
            ]
        );
    }

    #[test]
    fn no_method_guidance_without_uncovered_lines_or_above_threshold() {
        let mut facts = method("compute", "()I");
        facts.uncovered_lines = 0;
        assert!(method_recommendations(&facts, 0.8).is_empty());

        let mut facts = method("compute", "()I");
        facts.instruction_ratio = 0.8;
        assert!(method_recommendations(&facts, 0.8).is_empty());
    }

    #[test]
    fn fully_covered_class_gets_no_guidance() {
        assert!(class_recommendations(&class(1.0, 1.0, 0), 0.8).is_empty());
    }

    #[test]
    fn class_rules_render_rounded_percentages() {
        let recs = class_recommendations(&class(0.654, 0.4, 12), 0.8);
        assert_eq!(
            recs,
            vec![
                "Increase instruction coverage for com.shop.Cart (current ~65%); focus on methods with uncovered lines.".to_string(),
                "Add tests to exercise alternate branches in com.shop.Cart (branch coverage ~40%).".to_string(),
            ]
        );
    }

    #[test]
    fn partial_coverage_without_uncovered_lines_adds_caveat() {
        let recs = class_recommendations(&class(0.95, 0.9, 0), 0.8);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("early returns"));
    }

    #[test]
    fn last_name_rule_is_a_catch_all() {
        let last = METHOD_NAME_RULES.last().unwrap();
        assert_eq!(last.id, "branches");
        assert!((last.applies)(&method("", "")));
    }
}
